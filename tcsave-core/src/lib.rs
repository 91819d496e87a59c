//! # tcsave Core
//!
//! In-memory model of a logic-circuit save: placed gates and wires on an
//! integer grid, quarter-turn placement transforms, rotated bounding boxes,
//! wire-endpoint connectivity and a lossless round trip through an external
//! save codec.

pub mod geometry;
pub mod color;
pub mod shape;
pub mod gate;
pub mod wire;
pub mod record;
pub mod codec;
pub mod circuit;
pub mod connectivity;
pub mod spatial;
pub mod error;

pub use circuit::{Circuit, GateFields, WireFields};
pub use codec::{SaveCodec, SaveRecord};
pub use connectivity::Connections;
pub use error::{CircuitError, InvalidRotation, ShapeError, WireError};
pub use gate::{Gate, GateId};
pub use geometry::{Point, Rect, Rotation};
pub use record::{SaveMetadata, SCORE_SENTINEL};
pub use shape::{CircuitPin, GateShape, PinKey, ShapeRegistry, ShapeVariant, StaticShapeRegistry};
pub use spatial::GateIndex;
pub use wire::{Wire, WireId, WireKind};
