//! Static component footprints and the registry seam that supplies them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ShapeError;
use crate::geometry::{Extent, Point, Rect};

/// Key of a pin within a shape: either a name or a positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PinKey {
    Index(u32),
    Name(String),
}

impl From<&str> for PinKey {
    fn from(value: &str) -> Self {
        PinKey::Name(value.to_string())
    }
}

impl From<String> for PinKey {
    fn from(value: String) -> Self {
        PinKey::Name(value)
    }
}

impl From<u32> for PinKey {
    fn from(value: u32) -> Self {
        PinKey::Index(value)
    }
}

impl fmt::Display for PinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinKey::Index(i) => write!(f, "#{}", i),
            PinKey::Name(n) => f.write_str(n),
        }
    }
}

/// A connection point on a component, relative to its anchor cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitPin {
    pub pos: Point,
    pub is_input: bool,
    #[serde(default)]
    pub is_byte: bool,
    #[serde(default)]
    pub is_delayed: bool,
    #[serde(default)]
    pub name: Option<String>,
}

impl CircuitPin {
    pub fn input(x: i32, y: i32) -> Self {
        Self {
            pos: Point::new(x, y),
            is_input: true,
            is_byte: false,
            is_delayed: false,
            name: None,
        }
    }

    pub fn output(x: i32, y: i32) -> Self {
        Self {
            is_input: false,
            ..Self::input(x, y)
        }
    }

    pub fn byte(mut self) -> Self {
        self.is_byte = true;
        self
    }

    pub fn delayed(mut self) -> Self {
        self.is_delayed = true;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Visual outline that extends past the logical footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigShape {
    pub tl: Point,
    pub size: Point,
}

impl BigShape {
    pub fn new(tl: Point, size: Point) -> Self {
        Self { tl, size }
    }

    pub fn br(&self) -> Point {
        self.tl + self.size
    }
}

/// Footprint of one component kind (or kind variant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateShape {
    pub name: String,
    pub color: Rgb,
    pub pins: BTreeMap<PinKey, CircuitPin>,
    pub blocks: Vec<Point>,
    pub is_io: bool,
    pub big_shape: Option<BigShape>,
}

impl GateShape {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: Rgb::default(),
            pins: BTreeMap::new(),
            blocks: Vec::new(),
            is_io: false,
            big_shape: None,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_pin(mut self, key: impl Into<PinKey>, pin: CircuitPin) -> Self {
        self.pins.insert(key.into(), pin);
        self
    }

    pub fn with_blocks<I: IntoIterator<Item = (i32, i32)>>(mut self, blocks: I) -> Self {
        self.blocks.extend(blocks.into_iter().map(Point::from));
        self
    }

    pub fn with_big_shape(mut self, big_shape: BigShape) -> Self {
        self.big_shape = Some(big_shape);
        self
    }

    pub fn io(mut self) -> Self {
        self.is_io = true;
        self
    }

    /// Tightest cell rectangle covering every pin, block and big-shape corner.
    pub fn bounding_box(&self) -> Result<Rect, ShapeError> {
        let big_corners = self
            .big_shape
            .iter()
            .flat_map(|big| [big.tl, big.br()]);
        let extent = Extent::from_points(
            self.pins
                .values()
                .map(|p| p.pos)
                .chain(self.blocks.iter().copied())
                .chain(big_corners),
        );
        extent.cells().ok_or_else(|| ShapeError::Unbounded {
            name: self.name.clone(),
        })
    }

    /// Absolute pin position for an unrotated placement at `anchor`.
    pub fn pin_position(&self, anchor: Point, pin: &PinKey) -> Option<Point> {
        self.pins.get(pin).map(|p| anchor + p.pos)
    }

    pub fn inputs(&self) -> impl Iterator<Item = (&PinKey, &CircuitPin)> {
        self.pins.iter().filter(|(_, p)| p.is_input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&PinKey, &CircuitPin)> {
        self.pins.iter().filter(|(_, p)| !p.is_input)
    }
}

/// Selects which footprint of a component kind applies to a placed gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeVariant {
    /// Custom sub-circuit, by its definition id.
    Custom(i64),
    /// Kind-specific payload such as a constant value or a label.
    Data(String),
}

impl fmt::Display for ShapeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeVariant::Custom(id) => write!(f, "custom {}", id),
            ShapeVariant::Data(d) if d.is_empty() => f.write_str("default"),
            ShapeVariant::Data(d) => write!(f, "data {:?}", d),
        }
    }
}

/// Source of component footprints.
pub trait ShapeRegistry {
    /// Resolve the footprint of `kind` placed with `variant`.
    fn lookup(&self, kind: &str, variant: &ShapeVariant) -> Result<&GateShape, ShapeError>;
}

/// In-memory registry keyed by kind, with optional per-variant overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticShapeRegistry {
    by_kind: HashMap<String, GateShape>,
    by_variant: HashMap<(String, ShapeVariant), GateShape>,
}

impl StaticShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the footprint used for every variant of `kind`.
    pub fn insert(&mut self, kind: &str, shape: GateShape) {
        self.by_kind.insert(kind.to_string(), shape);
    }

    /// Register a footprint for one variant only, taking precedence over the kind default.
    pub fn insert_variant(&mut self, kind: &str, variant: ShapeVariant, shape: GateShape) {
        self.by_variant.insert((kind.to_string(), variant), shape);
    }

    pub fn with(mut self, kind: &str, shape: GateShape) -> Self {
        self.insert(kind, shape);
        self
    }

    pub fn len(&self) -> usize {
        self.by_kind.len() + self.by_variant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ShapeRegistry for StaticShapeRegistry {
    fn lookup(&self, kind: &str, variant: &ShapeVariant) -> Result<&GateShape, ShapeError> {
        self.by_variant
            .get(&(kind.to_string(), variant.clone()))
            .or_else(|| self.by_kind.get(kind))
            .ok_or_else(|| ShapeError::UnknownComponent {
                kind: kind.to_string(),
                variant: variant.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nand() -> GateShape {
        GateShape::new("NAND")
            .with_pin(0u32, CircuitPin::input(0, 0))
            .with_pin(1u32, CircuitPin::output(1, 0))
            .with_blocks([(0, 0)])
    }

    #[test]
    fn test_bounding_box_covers_pins_and_blocks() {
        assert_eq!(nand().bounding_box().unwrap(), Rect::new(0, 0, 2, 1));
    }

    #[test]
    fn test_bounding_box_includes_big_shape() {
        let shape = nand().with_big_shape(BigShape::new(Point::new(-1, -1), Point::new(3, 3)));
        // big shape spans (-1,-1)..(2,2)
        assert_eq!(shape.bounding_box().unwrap(), Rect::new(-1, -1, 4, 4));
    }

    #[test]
    fn test_bounding_box_of_empty_shape_fails() {
        let err = GateShape::new("Hollow").bounding_box().unwrap_err();
        assert_eq!(
            err,
            ShapeError::Unbounded {
                name: "Hollow".into()
            }
        );
    }

    #[test]
    fn test_pin_position_at_anchor() {
        let shape = nand();
        assert_eq!(
            shape.pin_position(Point::new(4, 4), &PinKey::Index(1)),
            Some(Point::new(5, 4))
        );
        assert_eq!(shape.pin_position(Point::new(4, 4), &"missing".into()), None);
    }

    #[test]
    fn test_inputs_and_outputs() {
        let shape = nand();
        assert_eq!(shape.inputs().count(), 1);
        assert_eq!(shape.outputs().count(), 1);
    }

    #[test]
    fn test_registry_prefers_variant() {
        let mut registry = StaticShapeRegistry::new().with("Constant", nand());
        let wide = GateShape::new("Wide").with_blocks([(0, 0), (1, 0), (2, 0)]);
        registry.insert_variant("Constant", ShapeVariant::Data("255".into()), wide);

        let default = registry
            .lookup("Constant", &ShapeVariant::Data("1".into()))
            .unwrap();
        assert_eq!(default.name, "NAND");
        let special = registry
            .lookup("Constant", &ShapeVariant::Data("255".into()))
            .unwrap();
        assert_eq!(special.name, "Wide");
    }

    #[test]
    fn test_registry_unknown_kind() {
        let registry = StaticShapeRegistry::new();
        let err = registry
            .lookup("Custom", &ShapeVariant::Custom(7))
            .unwrap_err();
        assert!(matches!(err, ShapeError::UnknownComponent { .. }));
        assert!(err.to_string().contains("custom 7"));
    }
}
