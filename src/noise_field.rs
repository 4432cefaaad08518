use noise::{NoiseFn, Perlin};

/// Coherent-noise sampler with outputs normalized to [0, 1].
///
/// The geometry and paint stages only ever see this trait, so tests can
/// substitute a constant field and pin exact outputs.
pub trait NoiseSource {
    fn sample2(&self, x: f64, y: f64) -> f64;

    fn sample1(&self, x: f64) -> f64 {
        self.sample2(x, 0.0)
    }

    fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let _ = z;
        self.sample2(x, y)
    }
}

/// Seeded Perlin field. The `noise` crate emits values in roughly [-1, 1];
/// they are remapped and clamped into [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct PerlinField {
    perlin: Perlin,
}

impl PerlinField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

fn unit(v: f64) -> f64 {
    (0.5 * (v + 1.0)).clamp(0.0, 1.0)
}

impl NoiseSource for PerlinField {
    fn sample2(&self, x: f64, y: f64) -> f64 {
        unit(self.perlin.get([x, y]))
    }

    fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        unit(self.perlin.get([x, y, z]))
    }
}

/// Fixed-value field for tests and calibration.
#[derive(Clone, Copy, Debug)]
pub struct ConstantField(pub f64);

impl NoiseSource for ConstantField {
    fn sample2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}
