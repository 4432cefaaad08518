use rand::Rng;

use crate::{
    cancel::{CancelToken, Checkpoint},
    error::{CumulusError, CumulusResult},
    geom::{Circle, CircleChain, Point, heading_deg, heading_vec},
};

pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min < max { rng.gen_range(min..max) } else { min }
}

/// Spacing to the next circle center, drawn so that consecutive circles
/// always overlap: somewhere between the larger radius and the sum of radii
/// (biased off both ends so neighbours neither coincide nor just graze).
fn next_spacing<R: Rng + ?Sized>(rng: &mut R, last_radius: f64, next_radius: f64) -> f64 {
    let min_dist = last_radius.max(next_radius);
    let max_dist = last_radius + next_radius;
    let t = uniform(rng, 0.1, 0.9);
    min_dist + (max_dist - min_dist) * t
}

/// Walks `path` at unit-step resolution and places randomly sized circles
/// spaced by [`next_spacing`], starting with one at `path[0]` and ending with
/// one extrapolated past the final path point. The result always holds at
/// least two circles and satisfies the pairwise-overlap invariant.
///
/// Cancellation returns the circles committed so far.
pub fn build_circle_chain<R: Rng + ?Sized>(
    path: &[Point],
    min_radius: f64,
    max_radius: f64,
    rng: &mut R,
    token: &CancelToken,
) -> CumulusResult<CircleChain> {
    if path.len() < 2 {
        return Err(CumulusError::invalid_input(
            "circle chain needs a path of at least 2 points",
        ));
    }

    let mut last_radius = uniform(rng, min_radius, max_radius);
    let mut next_radius = uniform(rng, min_radius, max_radius);
    let mut next_dist = next_spacing(rng, last_radius, next_radius);

    let mut circles = CircleChain::new();
    circles.push(Circle::new(path[0], last_radius));
    let mut last_center = path[0];

    let mut checkpoint = Checkpoint::default();

    for seg in 0..path.len() - 1 {
        let from = path[seg];
        let to = path[seg + 1];
        let steps = from.distance(to).floor().max(1.0) as u64;

        for step in 0..=steps {
            if checkpoint.poll(token) {
                return Ok(circles);
            }

            let cursor = from.lerp(to, step as f64 / steps as f64);
            let d = cursor.distance(last_center);
            if d >= next_dist {
                // Sparse input points can make the cursor overshoot the
                // overlap window in one step; pull the center back onto the
                // bound so consecutive circles always at least touch.
                let max_dist = last_radius + next_radius;
                let center = if d > max_dist {
                    last_center + (cursor - last_center) * (max_dist / d)
                } else {
                    cursor
                };
                circles.push(Circle::new(center, next_radius));
                last_center = center;
                last_radius = next_radius;
                next_radius = uniform(rng, min_radius, max_radius);
                next_dist = next_spacing(rng, last_radius, next_radius);
            }
        }
    }

    // Close out the chain: one more circle on the ray from the last placed
    // center through the final path point, at the pending spacing.
    let end = path[path.len() - 1];
    let dir = heading_vec(heading_deg(last_center, end));
    circles.push(Circle::new(last_center + dir * next_dist, next_radius));

    Ok(circles)
}
