use crate::{
    cancel::{CancelToken, Checkpoint},
    geom::{Point, PointPath, heading_deg, heading_vec},
    noise_field::NoiseSource,
};

/// Generates a wavy baseline between `p1` and `p2`: one sample per unit of
/// straight-line distance, each displaced perpendicular to the travel
/// direction by coherent noise scaled to `waving_height`.
///
/// Coincident endpoints yield the single endpoint. Cancellation returns the
/// samples produced so far.
pub fn generate_noise_path(
    p1: Point,
    p2: Point,
    noise_scale: f64,
    waving_height: f64,
    field: &dyn NoiseSource,
    token: &CancelToken,
) -> PointPath {
    let dist = p1.distance(p2);
    let samples = dist.ceil() as usize;
    if samples == 0 {
        return vec![p1];
    }

    let waving_dir = heading_vec(heading_deg(p1, p2) + 90.0);
    let mut path = PointPath::with_capacity(samples);
    let mut checkpoint = Checkpoint::default();

    for i in 0..samples {
        if checkpoint.poll(token) {
            break;
        }

        let pos = p1.lerp(p2, i as f64 / dist);
        let n = (field.sample2(pos.x * noise_scale, pos.y * noise_scale) - 0.5) * 2.0;
        let offset = waving_height * n;

        // The -0.5*offset term on both axes shifts the whole path off-center
        // by half a wave. Intentional; the cloud shapes depend on it.
        path.push(Point::new(
            pos.x + waving_dir.x * offset - 0.5 * offset,
            pos.y + waving_dir.y * offset - 0.5 * offset,
        ));
    }

    path
}
