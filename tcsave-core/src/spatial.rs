use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::circuit::Circuit;
use crate::error::ShapeError;
use crate::gate::GateId;
use crate::geometry::{Point, Rect};
use crate::shape::ShapeRegistry;

/// An entry in the R-tree spatial index, referencing a gate by id.
#[derive(Debug, Clone, PartialEq)]
pub struct GateEntry {
    pub gate_id: GateId,
    /// Grid cells the placed footprint touches.
    pub cells: Rect,
}

impl RTreeObject for GateEntry {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.cells.x, self.cells.y],
            [self.cells.right() - 1, self.cells.bottom() - 1],
        )
    }
}

impl PointDistance for GateEntry {
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        self.envelope().distance_2(point)
    }

    fn contains_point(&self, point: &[i64; 2]) -> bool {
        self.envelope().contains_point(point)
    }
}

/// Spatial index over placed gates for cell lookups and region queries.
pub struct GateIndex {
    tree: RTree<GateEntry>,
}

impl GateIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Index every gate of `circuit` by its rotated footprint.
    pub fn build<R>(circuit: &Circuit, registry: &R) -> Result<Self, ShapeError>
    where
        R: ShapeRegistry + ?Sized,
    {
        let entries = circuit
            .gates
            .iter()
            .map(|gate| {
                let shape = registry.lookup(&gate.kind, &gate.shape_variant())?;
                Ok(GateEntry {
                    gate_id: gate.id,
                    cells: gate.cell_bounds(shape)?,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;
        Ok(Self {
            tree: RTree::bulk_load(entries),
        })
    }

    pub fn insert(&mut self, entry: GateEntry) {
        self.tree.insert(entry);
    }

    /// Drop the entry for `gate_id`, if indexed.
    pub fn remove(&mut self, gate_id: GateId) -> Option<GateEntry> {
        let entry = self.tree.iter().find(|e| e.gate_id == gate_id)?.clone();
        self.tree.remove(&entry)
    }

    /// Gates whose footprint covers the cell `point`.
    pub fn query_point(&self, point: Point) -> Vec<&GateEntry> {
        self.tree
            .locate_all_at_point(&[point.x.into(), point.y.into()])
            .collect()
    }

    /// Gates whose footprint overlaps the cells of `region`.
    pub fn query_rect(&self, region: &Rect) -> Vec<&GateEntry> {
        if region.width <= 0 || region.height <= 0 {
            return Vec::new();
        }
        let envelope = AABB::from_corners(
            [region.x, region.y],
            [region.right() - 1, region.bottom() - 1],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for GateIndex {
    fn default() -> Self {
        Self::new()
    }
}
