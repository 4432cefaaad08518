use rand::Rng;

use crate::{
    cancel::CancelToken,
    chain::{build_circle_chain, uniform},
    error::{CumulusError, CumulusResult},
    geom::{CircleChain, Point, PointPath},
    noise_field::NoiseSource,
    path::generate_noise_path,
    walk::walk_circle_chain,
};

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RadiusRange {
    pub min: f64,
    pub max: f64,
}

/// Explicit knobs for one pipeline run. Defaults give the reference look:
/// coarse construction circles in [30, 240], fine in [10, 60], one-degree
/// arc resolution, random layer count.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Horizontal overshoot on both ends of every baseline.
    pub padding: f64,
    /// 0 picks a random count in [6, 20).
    pub layer_count: usize,
    pub coarse_radius: RadiusRange,
    pub fine_radius: RadiusRange,
    /// Walk resolution in degrees per emitted outline point.
    pub angular_step: f64,
    /// Keep per-layer construction circles and the coarse outline.
    pub capture_debug: bool,
}

impl PipelineConfig {
    pub fn new(canvas_width: f64, canvas_height: f64, padding: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            padding,
            layer_count: 0,
            coarse_radius: RadiusRange {
                min: 30.0,
                max: 240.0,
            },
            fine_radius: RadiusRange {
                min: 10.0,
                max: 60.0,
            },
            angular_step: 1.0,
            capture_debug: false,
        }
    }

    pub fn validate(&self) -> CumulusResult<()> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(CumulusError::invalid_input(
                "canvas width/height must be > 0",
            ));
        }
        if self.padding < 0.0 {
            return Err(CumulusError::invalid_input("padding must be >= 0"));
        }
        for (name, r) in [("coarse", self.coarse_radius), ("fine", self.fine_radius)] {
            if !(r.min > 0.0 && r.min <= r.max) {
                return Err(CumulusError::invalid_input(format!(
                    "{name} radius range must satisfy 0 < min <= max"
                )));
            }
        }
        if self.angular_step <= 0.0 {
            return Err(CumulusError::invalid_input("angular step must be > 0"));
        }
        Ok(())
    }
}

/// One cloud layer with all of its construction stages.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CloudLayer {
    pub baseline: PointPath,
    pub coarse_circles: CircleChain,
    pub coarse_outline: PointPath,
    pub fine_circles: CircleChain,
    /// The drawable silhouette; the only field downstream painting consumes.
    pub outline: PointPath,
}

pub type LayerSet = Vec<CloudLayer>;

/// Intermediate artifacts kept per layer when `capture_debug` is set.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerDebug {
    pub coarse_circles: CircleChain,
    pub coarse_outline: PointPath,
    pub fine_circles: CircleChain,
}

/// Everything one generation run produces. `outlines[i]` is built on
/// `baselines[i]`; a cancelled run stops early, so `outlines` may be shorter
/// than `baselines` and its final entry may itself be truncated or empty.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CloudPaths {
    pub baselines: Vec<PointPath>,
    pub outlines: Vec<PointPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<LayerDebug>>,
}

/// Runs both construction passes for one baseline: coarse circles and
/// outline to rough out the silhouette, then fine circles and outline over
/// the coarse result for the fluffy edge.
///
/// A cancellation observed between stages freezes the layer: later stages
/// stay empty rather than erroring on a truncated input.
#[tracing::instrument(skip_all, fields(baseline_points = baseline.len()))]
pub fn build_cloud_layer<R: Rng + ?Sized>(
    baseline: PointPath,
    cfg: &PipelineConfig,
    rng: &mut R,
    token: &CancelToken,
) -> CumulusResult<CloudLayer> {
    let mut layer = CloudLayer {
        baseline,
        coarse_circles: CircleChain::new(),
        coarse_outline: PointPath::new(),
        fine_circles: CircleChain::new(),
        outline: PointPath::new(),
    };

    layer.coarse_circles = build_circle_chain(
        &layer.baseline,
        cfg.coarse_radius.min,
        cfg.coarse_radius.max,
        rng,
        token,
    )?;
    if token.is_cancelled() {
        return Ok(layer);
    }

    layer.coarse_outline = walk_circle_chain(&layer.coarse_circles, cfg.angular_step, token)?;
    if token.is_cancelled() {
        return Ok(layer);
    }

    layer.fine_circles = build_circle_chain(
        &layer.coarse_outline,
        cfg.fine_radius.min,
        cfg.fine_radius.max,
        rng,
        token,
    )?;
    if token.is_cancelled() {
        return Ok(layer);
    }

    layer.outline = walk_circle_chain(&layer.fine_circles, cfg.angular_step, token)?;
    Ok(layer)
}

/// Generates all baselines, then builds one cloud layer per baseline.
///
/// Layers are evenly stacked over the lower 60% of the canvas, each baseline
/// spanning the full width plus `padding` overshoot on both ends. A failure
/// in any stage aborts the run, tagged with the layer index; cancellation
/// instead returns the layers completed so far.
#[tracing::instrument(skip_all, fields(layers = cfg.layer_count))]
pub fn run_cloud_pipeline<R: Rng + ?Sized>(
    cfg: &PipelineConfig,
    field: &dyn NoiseSource,
    rng: &mut R,
    token: &CancelToken,
) -> CumulusResult<CloudPaths> {
    cfg.validate()?;

    let layer_count = if cfg.layer_count > 0 {
        cfg.layer_count
    } else {
        rng.gen_range(6..20)
    };
    let layer_dist = cfg.canvas_height * 0.6 / layer_count as f64;

    let mut baselines = Vec::with_capacity(layer_count);
    for i in 0..layer_count {
        let y = 0.4 * cfg.canvas_height + i as f64 * layer_dist;
        let p1 = Point::new(-cfg.padding, y);
        let p2 = Point::new(cfg.canvas_width + cfg.padding, y);
        let noise_scale = uniform(rng, 0.001, 0.003);
        let waving_height = uniform(rng, 0.1, 0.4) * cfg.canvas_height;
        baselines.push(generate_noise_path(
            p1,
            p2,
            noise_scale,
            waving_height,
            field,
            token,
        ));
    }

    let mut outlines = Vec::with_capacity(layer_count);
    let mut debug = cfg.capture_debug.then(Vec::new);

    for (i, baseline) in baselines.iter().enumerate() {
        if token.is_cancelled() {
            tracing::debug!(layer = i, "cancelled before layer");
            break;
        }

        let layer = build_cloud_layer(baseline.clone(), cfg, rng, token)
            .map_err(|e| CumulusError::layer(i, e))?;
        tracing::debug!(layer = i, outline_points = layer.outline.len(), "layer built");

        outlines.push(layer.outline);
        if let Some(debug) = debug.as_mut() {
            debug.push(LayerDebug {
                coarse_circles: layer.coarse_circles,
                coarse_outline: layer.coarse_outline,
                fine_circles: layer.fine_circles,
            });
        }
    }

    Ok(CloudPaths {
        baselines,
        outlines,
        debug,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::ConstantField;
    use rand::{SeedableRng, rngs::StdRng};

    fn small_cfg() -> PipelineConfig {
        let mut cfg = PipelineConfig::new(400.0, 300.0, 20.0);
        cfg.layer_count = 2;
        cfg
    }

    #[test]
    fn validate_rejects_bad_configs() {
        let mut cfg = small_cfg();
        cfg.canvas_width = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = small_cfg();
        cfg.fine_radius = RadiusRange {
            min: 60.0,
            max: 10.0,
        };
        assert!(cfg.validate().is_err());

        let mut cfg = small_cfg();
        cfg.angular_step = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn baselines_are_stacked_over_the_lower_canvas() {
        let cfg = {
            let mut c = small_cfg();
            c.layer_count = 4;
            c
        };
        let mut rng = StdRng::seed_from_u64(3);
        let token = CancelToken::new();
        // Midpoint noise keeps every baseline perfectly flat.
        let got = run_cloud_pipeline(&cfg, &ConstantField(0.5), &mut rng, &token).unwrap();

        assert_eq!(got.baselines.len(), 4);
        let layer_dist = 300.0 * 0.6 / 4.0;
        for (i, baseline) in got.baselines.iter().enumerate() {
            let y = 0.4 * 300.0 + i as f64 * layer_dist;
            assert_eq!(baseline[0], Point::new(-20.0, y));
            for p in baseline {
                assert!((p.y - y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn zero_layer_count_draws_between_6_and_19() {
        let token = CancelToken::new();
        for seed in 0..10 {
            let mut cfg = small_cfg();
            cfg.layer_count = 0;
            let mut rng = StdRng::seed_from_u64(seed);
            let got = run_cloud_pipeline(&cfg, &ConstantField(0.5), &mut rng, &token).unwrap();
            assert!((6..20).contains(&got.baselines.len()));
        }
    }

    #[test]
    fn outlines_match_baselines_one_to_one() {
        let cfg = small_cfg();
        let mut rng = StdRng::seed_from_u64(17);
        let token = CancelToken::new();
        let got = run_cloud_pipeline(&cfg, &ConstantField(0.5), &mut rng, &token).unwrap();

        assert_eq!(got.outlines.len(), got.baselines.len());
        assert!(got.debug.is_none());
        for outline in &got.outlines {
            assert!(outline.len() > 50);
        }
    }

    #[test]
    fn debug_capture_keeps_intermediates() {
        let mut cfg = small_cfg();
        cfg.capture_debug = true;
        let mut rng = StdRng::seed_from_u64(17);
        let token = CancelToken::new();
        let got = run_cloud_pipeline(&cfg, &ConstantField(0.5), &mut rng, &token).unwrap();

        let debug = got.debug.unwrap();
        assert_eq!(debug.len(), got.outlines.len());
        for d in &debug {
            assert!(d.coarse_circles.len() >= 2);
            assert!(!d.coarse_outline.is_empty());
            assert!(d.fine_circles.len() >= 2);
        }
    }

    /// Cancels its token after a fixed number of draws, which lands the
    /// cancellation inside a layer build rather than between layers.
    struct CancellingRng {
        inner: StdRng,
        draws_left: u32,
        token: CancelToken,
    }

    impl rand::RngCore for CancellingRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            if self.draws_left == 0 {
                self.token.cancel();
            } else {
                self.draws_left -= 1;
            }
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.inner.fill_bytes(dest);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn cancellation_inside_a_layer_pushes_its_truncated_outline() {
        let mut cfg = small_cfg();
        cfg.layer_count = 3;
        let token = CancelToken::new();
        let mut rng = CancellingRng {
            inner: StdRng::seed_from_u64(13),
            // Enough draws to finish all baselines (two per layer) and get
            // into the first layer's chain building, not enough to leave it.
            draws_left: 20,
            token: token.clone(),
        };
        let got = run_cloud_pipeline(&cfg, &ConstantField(0.5), &mut rng, &token).unwrap();

        assert_eq!(got.baselines.len(), 3);
        for baseline in &got.baselines {
            assert!(!baseline.is_empty());
        }
        // The interrupted layer still contributes an entry; its outline never
        // got walked, so the final entry is empty.
        assert_eq!(got.outlines.len(), 1);
        assert!(got.outlines[0].is_empty());
    }

    #[test]
    fn pre_set_cancellation_returns_no_outlines() {
        let cfg = small_cfg();
        let mut rng = StdRng::seed_from_u64(8);
        let token = CancelToken::new();
        token.cancel();
        let got = run_cloud_pipeline(&cfg, &ConstantField(0.5), &mut rng, &token).unwrap();

        assert!(got.outlines.is_empty());
        assert_eq!(got.baselines.len(), 2);
        for baseline in &got.baselines {
            assert!(baseline.is_empty());
        }
    }
}
