pub use kurbo::{Point, Vec2};

/// Ordered point sequence; insertion order is traversal order along the path.
pub type PointPath = Vec<Point>;

/// Ordered construction circles; the builder guarantees every consecutive
/// pair overlaps or touches, which keeps the tangent-arc walk well-defined.
pub type CircleChain = Vec<Circle>;

/// Angles are measured in degrees from the "up" direction (screen -y),
/// clockwise positive, so the unit vector for angle `a` is `(sin a, -cos a)`.
/// This is the compass convention the walker's state machine is written in.
pub fn heading_deg(from: Point, to: Point) -> f64 {
    let d = to - from;
    d.x.atan2(-d.y).to_degrees()
}

/// Unit vector for a compass heading in degrees.
pub fn heading_vec(deg: f64) -> Vec2 {
    let r = deg.to_radians();
    Vec2::new(r.sin(), -r.cos())
}

/// A construction circle placed on or near a baseline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Point on the circumference at a compass angle in degrees.
    pub fn surface_point(&self, deg: f64) -> Point {
        self.center + heading_vec(deg) * self.radius
    }

    /// Compass angle of `p` relative to the center, in (-180, 180].
    pub fn point_angle(&self, p: Point) -> f64 {
        heading_deg(self.center, p)
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }

    /// Compass angles (relative to `self`) of the two points where the two
    /// circle boundaries cross, ordered `[theta - alpha, theta + alpha]`
    /// where `theta` points at `other`'s center. `None` when the circles are
    /// concentric, separate, or one contains the other.
    pub fn crossing_angles(&self, other: &Circle) -> Option<[f64; 2]> {
        let d = self.center.distance(other.center);
        if d == 0.0 {
            return None;
        }
        let cos_alpha =
            (d * d + self.radius * self.radius - other.radius * other.radius) / (2.0 * d * self.radius);
        // Centers placed at exactly r1 + r2 apart can recompute a distance a
        // float epsilon past the sum; treat near-tangency as tangency.
        if cos_alpha.abs() > 1.0 + 1e-9 {
            return None;
        }
        let alpha = cos_alpha.clamp(-1.0, 1.0).acos().to_degrees();
        let theta = heading_deg(self.center, other.center);
        Some([theta - alpha, theta + alpha])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn heading_follows_compass_convention() {
        let o = Point::new(0.0, 0.0);
        assert!(close(heading_deg(o, Point::new(0.0, -1.0)), 0.0)); // up
        assert!(close(heading_deg(o, Point::new(1.0, 0.0)), 90.0)); // right
        assert!(close(heading_deg(o, Point::new(0.0, 1.0)), 180.0)); // down
        assert!(close(heading_deg(o, Point::new(-1.0, 0.0)), -90.0)); // left
    }

    #[test]
    fn surface_point_and_point_angle_are_inverse() {
        let c = Circle::new(Point::new(10.0, -4.0), 7.5);
        for deg in [-90.0, -30.0, 0.0, 45.0, 120.0, 180.0] {
            let p = c.surface_point(deg);
            assert!(close(c.center.distance(p), 7.5));
            assert!((c.point_angle(p) - deg).abs() < 1e-9);
        }
    }

    #[test]
    fn crossing_angles_of_equal_overlapping_circles() {
        // Two radius-1 circles, centers 1 apart along +x: crossings at
        // theta 90 +/- 60 degrees.
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        let b = Circle::new(Point::new(1.0, 0.0), 1.0);
        let [lo, hi] = a.crossing_angles(&b).unwrap();
        assert!(close(lo, 30.0));
        assert!(close(hi, 150.0));
    }

    #[test]
    fn crossing_angles_rejects_degenerate_pairs() {
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        assert!(a.crossing_angles(&a).is_none()); // concentric
        let far = Circle::new(Point::new(10.0, 0.0), 1.0);
        assert!(a.crossing_angles(&far).is_none());
        let inside = Circle::new(Point::new(0.1, 0.0), 0.2);
        assert!(a.crossing_angles(&inside).is_none());
    }

    #[test]
    fn crossing_tolerates_an_epsilon_past_tangency() {
        // One ulp beyond tangent distance still counts as tangent.
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        let b = Circle::new(Point::new(2.0_f64.next_up(), 0.0), 1.0);
        let [lo, hi] = a.crossing_angles(&b).unwrap();
        assert!((lo - 90.0).abs() < 1e-3);
        assert!((hi - 90.0).abs() < 1e-3);
        // A genuinely separate pair is still rejected.
        let far = Circle::new(Point::new(2.1, 0.0), 1.0);
        assert!(a.crossing_angles(&far).is_none());
    }

    #[test]
    fn tangent_circles_cross_on_the_center_line() {
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        let b = Circle::new(Point::new(2.0, 0.0), 1.0);
        let [lo, hi] = a.crossing_angles(&b).unwrap();
        assert!(close(lo, 90.0));
        assert!(close(hi, 90.0));
    }
}
