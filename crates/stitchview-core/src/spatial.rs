use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Point};

/// A circular hit target in the R-tree, referencing a draw item by index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the draw list the index was built from.
    pub item_index: usize,
    pub center: Point,
    pub radius: f64,
}

impl SpatialEntry {
    pub fn bbox(&self) -> BBox {
        BBox::new(self.center, self.center).expand(self.radius)
    }

    fn contains(&self, point: &Point) -> bool {
        self.center.distance_to(point) <= self.radius
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let bbox = self.bbox();
        AABB::from_corners([bbox.min.x, bbox.min.y], [bbox.max.x, bbox.max.y])
    }
}

impl PointDistance for SpatialEntry {
    /// Squared distance to the circle; zero anywhere inside it.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = Point::new(point[0], point[1]);
        let outside = (self.center.distance_to(&p) - self.radius).max(0.0);
        outside * outside
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.contains(&Point::new(point[0], point[1]))
    }
}

/// Spatial index for point picking over drawn stitches.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All entries whose circle contains `point`, in no particular order.
    pub fn query_point(&self, point: &Point) -> Vec<&SpatialEntry> {
        self.tree.locate_all_at_point(&[point.x, point.y]).collect()
    }

    /// The entry with the highest item index whose circle contains `point`.
    /// Later draw items paint over earlier ones, so this is the one on top.
    pub fn topmost_at(&self, point: &Point) -> Option<&SpatialEntry> {
        self.query_point(point)
            .into_iter()
            .max_by_key(|e| e.item_index)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
