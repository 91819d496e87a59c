use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::InvalidRotation;

/// A cell on the circuit grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Clockwise quarter-turn rotation of a placed component.
///
/// Built from any integer step count modulo 4. Stored on disk as `0..=3`;
/// anything else is rejected on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn from_steps(steps: i64) -> Self {
        match steps.rem_euclid(4) {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    pub fn steps(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        Self::from_steps(4 - self.steps() as i64)
    }

    /// Rotate an offset around the origin.
    pub fn apply(self, p: Point) -> Point {
        match self {
            Rotation::R0 => p,
            Rotation::R90 => Point::new(-p.y, p.x),
            Rotation::R180 => Point::new(-p.x, -p.y),
            Rotation::R270 => Point::new(p.y, -p.x),
        }
    }

    /// [`Rotation::apply`] on widened coordinates.
    pub fn apply_xy(self, x: i64, y: i64) -> (i64, i64) {
        match self {
            Rotation::R0 => (x, y),
            Rotation::R90 => (-y, x),
            Rotation::R180 => (-x, -y),
            Rotation::R270 => (y, -x),
        }
    }
}

impl TryFrom<u8> for Rotation {
    type Error = InvalidRotation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=3 => Ok(Self::from_steps(value.into())),
            _ => Err(InvalidRotation(value)),
        }
    }
}

impl From<Rotation> for u8 {
    fn from(value: Rotation) -> Self {
        value.steps()
    }
}

/// An axis-aligned rectangle as `(x, y, width, height)`.
///
/// Wider than grid coordinates: a box spanning the whole `i32` grid still fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// True if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Running min/max accumulator over grid coordinates.
///
/// Starts out empty instead of seeded with sentinel coordinates, and tracks
/// bounds as `i64` so spans between extreme grid points cannot overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    bounds: Option<([i64; 2], [i64; 2])>,
}

impl Extent {
    pub fn new() -> Self {
        Self { bounds: None }
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut extent = Self::new();
        for p in points {
            extent.include(p);
        }
        extent
    }

    pub fn include(&mut self, p: Point) {
        self.include_xy(p.x.into(), p.y.into());
    }

    pub fn include_xy(&mut self, x: i64, y: i64) {
        self.bounds = Some(match self.bounds {
            None => ([x, y], [x, y]),
            Some((min, max)) => (
                [min[0].min(x), min[1].min(y)],
                [max[0].max(x), max[1].max(y)],
            ),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Rectangle spanning corner to corner (`width = max.x - min.x`).
    pub fn span(&self) -> Rect {
        match self.bounds {
            None => Rect::EMPTY,
            Some((min, max)) => Rect::new(min[0], min[1], max[0] - min[0], max[1] - min[1]),
        }
    }

    /// Rectangle covering every included cell (`width = max.x - min.x + 1`).
    pub fn cells(&self) -> Option<Rect> {
        self.bounds.map(|(min, max)| {
            Rect::new(min[0], min[1], max[0] - min[0] + 1, max[1] - min[1] + 1)
        })
    }
}
