//! Per-axis affine rescaling of layout coordinates into a fixed cube.

use crate::config::CoordRange;
use crate::utils::math::Vec3;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateNormalizer {
    range: CoordRange,
}

impl CoordinateNormalizer {
    pub fn new(range: CoordRange) -> Self {
        Self { range }
    }

    /// Rescale `positions` in place so each axis spans `[range.min, range.max]`.
    ///
    /// An axis on which every node shares one coordinate uses a span of 1, so
    /// all nodes land on `range.min` for that axis.
    pub fn normalize(&self, positions: &mut [Vec3]) {
        if positions.is_empty() {
            return;
        }

        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for p in positions.iter() {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
        }

        let mut span = [0.0; 3];
        for axis in 0..3 {
            let s = hi[axis] - lo[axis];
            span[axis] = if s > 0.0 && s.is_finite() {
                s
            } else {
                tracing::warn!(axis, "Zero coordinate range, substituting 1");
                1.0
            };
        }

        let target = self.range;
        for p in positions.iter_mut() {
            for axis in 0..3 {
                let t = (p[axis] - lo[axis]) / span[axis];
                p[axis] = if t >= 1.0 {
                    target.max
                } else {
                    (target.min + t * target.span()).clamp(target.min, target.max)
                };
            }
        }
    }
}
