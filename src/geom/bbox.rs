use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A grid cell rectangle in an R-tree, associated with a cell by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding cell in the grid
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding cell.
    pub(crate) fn idx(&self) -> usize { self.idx }

    /// Half-open containment: min edges inclusive, max edges exclusive.
    #[inline]
    pub(crate) fn contains_half_open(&self, x: f64, y: f64) -> bool {
        let (min, max) = (self.bbox.min(), self.bbox.max());
        min.x <= x && x < max.x && min.y <= y && y < max.y
    }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}
