use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::color::{self, Rgb};
use crate::error::{CircuitError, WireError};
use crate::geometry::Point;

/// Unique wire identifier within a circuit.
pub type WireId = u64;

/// Signal width class of a wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireKind {
    #[default]
    Bit,
    Byte,
    Qword,
}

impl WireKind {
    pub fn tag(self) -> &'static str {
        match self {
            WireKind::Bit => "ck_bit",
            WireKind::Byte => "ck_byte",
            WireKind::Qword => "ck_qword",
        }
    }
}

impl FromStr for WireKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ck_bit" => Ok(WireKind::Bit),
            "ck_byte" => Ok(WireKind::Byte),
            "ck_qword" => Ok(WireKind::Qword),
            other => Err(CircuitError::UnknownWireKind(other.to_string())),
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A connector drawn along grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub id: WireId,
    pub kind: WireKind,
    /// Palette index; 0 selects the kind's default color.
    pub color: u8,
    pub label: String,
    /// Path cells; the first and last are the electrical endpoints.
    pub positions: Vec<Point>,
    pub(crate) extra: Map<String, Value>,
}

impl Wire {
    pub fn new(id: WireId, kind: WireKind, positions: Vec<Point>) -> Self {
        Self {
            id,
            kind,
            color: 0,
            label: String::new(),
            positions,
            extra: Map::new(),
        }
    }

    /// Both endpoints, or `None` for a path too short to connect anything.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self.positions.as_slice() {
            [first, .., last] => Some((*first, *last)),
            _ => None,
        }
    }

    /// Whether this wire carries a byte.
    ///
    /// Word-wide wires have no answer here yet and report an error instead.
    pub fn is_byte(&self) -> Result<bool, WireError> {
        match self.kind {
            WireKind::Bit => Ok(false),
            WireKind::Byte => Ok(true),
            WireKind::Qword => Err(WireError::UnsupportedWidth(self.kind)),
        }
    }

    /// Color shown for this wire, or `None` for an out-of-palette tag.
    pub fn display_color(&self) -> Option<Rgb> {
        if self.color != 0 {
            return color::palette(self.color);
        }
        Some(match self.kind {
            WireKind::Bit => color::WIRE_PALETTE[0],
            WireKind::Byte => color::DEFAULT_BYTE_WIRE,
            WireKind::Qword => color::DEFAULT_QWORD_WIRE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for kind in [WireKind::Bit, WireKind::Byte, WireKind::Qword] {
            assert_eq!(kind.tag().parse::<WireKind>().unwrap(), kind);
        }
        let err = "ck_nibble".parse::<WireKind>().unwrap_err();
        assert!(matches!(err, CircuitError::UnknownWireKind(ref k) if k == "ck_nibble"));
    }

    #[test]
    fn test_is_byte() {
        let mut wire = Wire::new(1, WireKind::Bit, vec![Point::ORIGIN]);
        assert_eq!(wire.is_byte(), Ok(false));
        wire.kind = WireKind::Byte;
        assert_eq!(wire.is_byte(), Ok(true));
    }

    #[test]
    fn test_is_byte_refuses_qword() {
        let wire = Wire::new(1, WireKind::Qword, vec![Point::ORIGIN]);
        assert_eq!(
            wire.is_byte(),
            Err(WireError::UnsupportedWidth(WireKind::Qword))
        );
    }

    #[test]
    fn test_endpoints() {
        let single = Wire::new(1, WireKind::Bit, vec![Point::new(1, 1)]);
        assert_eq!(single.endpoints(), None);

        let path = Wire::new(
            2,
            WireKind::Bit,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 4)],
        );
        assert_eq!(path.endpoints(), Some((Point::new(0, 0), Point::new(1, 4))));
    }

    #[test]
    fn test_display_color_defaults_by_kind() {
        let mut wire = Wire::new(1, WireKind::Byte, vec![Point::ORIGIN]);
        assert_eq!(wire.display_color(), Some(color::DEFAULT_BYTE_WIRE));
        wire.kind = WireKind::Qword;
        assert_eq!(wire.display_color(), Some(color::DEFAULT_QWORD_WIRE));
        wire.color = 5;
        assert_eq!(wire.display_color(), Some(Rgb::new(68, 68, 228)));
        wire.color = 40;
        assert_eq!(wire.display_color(), None);
    }
}
