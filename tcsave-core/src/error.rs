use thiserror::Error;

use crate::shape::ShapeVariant;
use crate::wire::WireKind;

/// Failures while decoding, encoding or measuring a circuit.
#[derive(Error, Debug)]
pub enum CircuitError {
    #[error("Unknown wire kind '{0}'")]
    UnknownWireKind(String),

    #[error("Malformed save record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("Save record is missing '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("Codec failure: {0}")]
    Codec(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failures reported by a shape registry or a malformed shape descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Shape '{name}' has no pins, blocks or big shape to bound")]
    Unbounded { name: String },

    #[error("No shape registered for component '{kind}' ({variant})")]
    UnknownComponent { kind: String, variant: ShapeVariant },
}

/// Queries a wire's width class cannot answer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("Width classification is not implemented for {0:?} wires")]
    UnsupportedWidth(WireKind),
}

/// A stored rotation outside the four quarter-turn steps.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Rotation {0} is not a quarter-turn step (expected 0..=3)")]
pub struct InvalidRotation(pub u8);
