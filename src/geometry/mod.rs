//! geometry primitives shared by positions, conditions and hosts

use std::fmt;

use serde::{Deserialize, Serialize};

/// width x height of a container or child, never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// create a size, clamping negative and non-finite components to zero
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_non_negative(width),
            height: clamp_non_negative(height),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// width / height, or 0 for a zero-height size
    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// parse "800x600" (also accepts 'X' and '*' as separator)
    pub fn parse(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        let (w, h) = trimmed
            .split_once(['x', 'X', '*'])
            .ok_or_else(|| format!("invalid size '{}', expected WIDTHxHEIGHT (e.g. 800x600)", s))?;

        let width: f64 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width in '{}'", s))?;
        let height: f64 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height in '{}'", s))?;

        if !width.is_finite() || !height.is_finite() {
            return Err(format!("size '{}' must be finite", s));
        }
        if width < 0.0 || height < 0.0 {
            return Err(format!("size '{}' must not be negative", s));
        }

        Ok(Self::new(width, height))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// origin + size, origin at the top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            origin: Point::new(
                center.x - size.width / 2.0,
                center.y - size.height / 2.0,
            ),
            size,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.size, self.origin)
    }
}

fn clamp_non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
