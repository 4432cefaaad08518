use crate::{
    cancel::{CancelToken, Checkpoint},
    error::{CumulusError, CumulusResult},
    geom::{Circle, Point, PointPath},
};

/// Lazy walk along the outer arcs of a circle chain.
///
/// Starting at -90 degrees on the first circle (its leftmost point), the walk
/// advances by a fixed angular step, hopping to the next circle once it
/// reaches the crossing angle with that circle, and finishes with a
/// semicircle cap (end angle 90 degrees) on the last circle. The sequence is
/// finite and non-restartable; build a fresh walk to trace again.
#[derive(Debug)]
pub struct ChainWalk<'a> {
    circles: &'a [Circle],
    index: usize,
    angle: f64,
    end_angle: f64,
    step: f64,
    pending: Option<Point>,
    done: bool,
}

impl<'a> ChainWalk<'a> {
    pub fn new(circles: &'a [Circle], angular_step: f64) -> CumulusResult<Self> {
        if circles.len() < 2 {
            return Err(CumulusError::invalid_input(
                "circle walk needs a chain of at least 2 circles",
            ));
        }
        if angular_step <= 0.0 {
            return Err(CumulusError::invalid_input(
                "angular step must be > 0 degrees",
            ));
        }

        // Validate the whole chain up front so the walk itself cannot get
        // stuck on an unanswerable crossing.
        let mut first_end = 0.0;
        for (i, pair) in circles.windows(2).enumerate() {
            let [lo, _] = pair[0].crossing_angles(&pair[1]).ok_or_else(|| {
                CumulusError::geometry(format!(
                    "construction circles {i} and {} do not cross",
                    i + 1
                ))
            })?;
            if i == 0 {
                first_end = lo;
            }
        }

        let angle = -90.0;
        Ok(Self {
            circles,
            index: 0,
            angle,
            end_angle: first_end,
            step: angular_step,
            pending: Some(circles[0].surface_point(angle)),
            done: false,
        })
    }

    /// Crossing angle between circle `index` and its successor, lifted by a
    /// full turn when needed so the forward walk stays monotonic.
    fn lifted_end_angle(&self, from_angle: f64) -> Option<f64> {
        let [lo, _] = self.circles[self.index].crossing_angles(&self.circles[self.index + 1])?;
        Some(if lo < from_angle { lo + 360.0 } else { lo })
    }
}

impl Iterator for ChainWalk<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let out = self.pending.take()?;

        self.angle += self.step;
        let p = self.circles[self.index].surface_point(self.angle);

        if self.angle >= self.end_angle {
            self.index += 1;

            if self.index == self.circles.len() {
                // Walked past the final semicircle cap; `out` is the last point.
                self.done = true;
                return Some(out);
            }

            // Carry the walk over at the angle of the just-computed point as
            // seen from the next circle. The point itself still lies on the
            // previous circle, which keeps the outline continuous across the
            // hop.
            let carried = self.circles[self.index].point_angle(p);
            if self.index == self.circles.len() - 1 {
                self.angle = if carried > 180.0 {
                    carried - 360.0
                } else {
                    carried
                };
                self.end_angle = 90.0;
            } else {
                self.angle = if carried < 0.0 {
                    carried + 360.0
                } else if carried >= 360.0 {
                    carried - 360.0
                } else {
                    carried
                };
                match self.lifted_end_angle(self.angle) {
                    Some(end) => self.end_angle = end,
                    // Unreachable after the constructor's validation pass.
                    None => {
                        self.done = true;
                        return Some(out);
                    }
                }
            }
        }

        self.pending = Some(p);
        Some(out)
    }
}

impl std::iter::FusedIterator for ChainWalk<'_> {}

/// Collects a full [`ChainWalk`] into a path, yielding at the usual
/// checkpoints; cancellation returns the points emitted so far.
pub fn walk_circle_chain(
    chain: &[Circle],
    angular_step: f64,
    token: &CancelToken,
) -> CumulusResult<PointPath> {
    let mut walk = ChainWalk::new(chain, angular_step)?;
    let mut out = PointPath::new();
    let mut checkpoint = Checkpoint::default();

    loop {
        if checkpoint.poll(token) {
            break;
        }
        match walk.next() {
            Some(p) => out.push(p),
            None => break,
        }
    }

    Ok(out)
}
