use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        NORMAL
    }
}

pub const SPECIAL_RED: Rgb = Rgb::new(206, 89, 107);
pub const SPECIAL_GREEN: Rgb = Rgb::new(0, 179, 33);
pub const NORMAL: Rgb = Rgb::new(28, 95, 147);
pub const CUSTOM: Rgb = Rgb::new(30, 165, 174);

/// Selectable wire colors, indexed by the wire's color tag.
pub const WIRE_PALETTE: [Rgb; 12] = [
    Rgb::new(227, 158, 69),
    Rgb::new(219, 227, 69),
    Rgb::new(150, 227, 69),
    Rgb::new(69, 227, 150),
    Rgb::new(68, 220, 228),
    Rgb::new(68, 68, 228),
    Rgb::new(152, 68, 228),
    Rgb::new(227, 69, 201),
    Rgb::new(227, 110, 79),
    Rgb::new(255, 255, 255),
    Rgb::new(122, 122, 122),
    Rgb::new(54, 54, 54),
];

/// Default color of an untagged byte wire.
pub const DEFAULT_BYTE_WIRE: Rgb = Rgb::new(61, 154, 204);
/// Default color of an untagged word wire.
pub const DEFAULT_QWORD_WIRE: Rgb = Rgb::new(59, 198, 64);

pub fn palette(index: u8) -> Option<Rgb> {
    WIRE_PALETTE.get(index as usize).copied()
}
