use serde_json::{Map, Value};

use crate::error::ShapeError;
use crate::geometry::{Extent, Point, Rect, Rotation};
use crate::shape::{GateShape, PinKey, ShapeVariant};

/// Unique gate identifier within a circuit.
pub type GateId = u64;

/// Kind name of components that reference a nested custom circuit.
pub const CUSTOM_KIND: &str = "Custom";

/// A component placed on the circuit grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub kind: String,
    /// Anchor cell; shape offsets are relative to it.
    pub position: Point,
    pub rotation: Rotation,
    pub id: GateId,
    /// Kind-dependent payload (constant value, label, ...).
    pub custom_data: String,
    /// Nested circuit definition, only meaningful for `Custom` gates.
    pub custom_id: i64,
    pub program_name: String,
    /// Record fields this model does not interpret, written back verbatim.
    pub(crate) extra: Map<String, Value>,
}

impl Gate {
    pub fn new(id: GateId, kind: &str, position: Point, rotation: Rotation) -> Self {
        Self {
            kind: kind.to_string(),
            position,
            rotation,
            id,
            custom_data: String::new(),
            custom_id: 0,
            program_name: String::new(),
            extra: Map::new(),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.kind == CUSTOM_KIND
    }

    /// Which footprint of this gate's kind applies.
    pub fn shape_variant(&self) -> ShapeVariant {
        if self.is_custom() {
            ShapeVariant::Custom(self.custom_id)
        } else {
            ShapeVariant::Data(self.custom_data.clone())
        }
    }

    /// Rotate a local offset by this gate's rotation.
    pub fn rotate(&self, offset: Point) -> Point {
        self.rotation.apply(offset)
    }

    /// Map a local offset to an absolute grid cell, or `None` if it falls off the grid.
    pub fn translate(&self, offset: Point) -> Option<Point> {
        let (x, y) = self.place(offset.x.into(), offset.y.into());
        Some(Point::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
    }

    fn place(&self, x: i64, y: i64) -> (i64, i64) {
        let (dx, dy) = self.rotation.apply_xy(x, y);
        (i64::from(self.position.x) + dx, i64::from(self.position.y) + dy)
    }

    /// Absolute position of a pin of `shape` on this placement.
    pub fn pin_position(&self, shape: &GateShape, pin: &PinKey) -> Option<Point> {
        shape.pins.get(pin).and_then(|p| self.translate(p.pos))
    }

    /// Absolute cells covered by the shape's blocks.
    pub fn occupied_cells<'a>(&'a self, shape: &'a GateShape) -> impl Iterator<Item = Point> + 'a {
        shape.blocks.iter().filter_map(move |b| self.translate(*b))
    }

    /// The shape's local box placed on the grid.
    ///
    /// Both corners of the local box are transformed independently and the
    /// result is normalised back to an axis-aligned rectangle. The far corner
    /// is exclusive, so width and height match the local box.
    pub fn footprint_bounds(&self, shape: &GateShape) -> Result<Rect, ShapeError> {
        let local = shape.bounding_box()?;
        Ok(self.placed_extent(local.x, local.y, local.right(), local.bottom()).span())
    }

    /// Inclusive range of grid cells the placed shape touches.
    pub fn cell_bounds(&self, shape: &GateShape) -> Result<Rect, ShapeError> {
        let local = shape.bounding_box()?;
        self.placed_extent(local.x, local.y, local.right() - 1, local.bottom() - 1)
            .cells()
            .ok_or_else(|| ShapeError::Unbounded {
                name: shape.name.clone(),
            })
    }

    fn placed_extent(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Extent {
        let mut extent = Extent::new();
        for (x, y) in [(x0, y0), (x1, y1)] {
            let (px, py) = self.place(x, y);
            extent.include_xy(px, py);
        }
        extent
    }
}
