//! layout positions - how a child's frame is computed from its container's size
//!
//! a position is immutable once built and `resolve` is total: degenerate
//! containers produce zero-area frames, never errors.
//!
//! positions can be written as JSON or as a compact string:
//! - `"full"` - fill the container
//! - `"50%x100%@left"` - width x height, anchored to an edge/corner
//! - `"200x100@bottom-right+10,10"` - with offsets from the anchor
//! - `{ "anchor": "top", "y": 8, "width": "80%", "height": 44 }`
//! - `{ "fill": { "top": 20, "bottom": "10%" } }`
//! - `{ "rect": [x, y, width, height] }`

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::geometry::{Rect, Size};

lazy_static! {
    static ref LENGTH_RE: Regex =
        Regex::new(r"^(-?\d+(?:\.\d+)?)\s*(%|pt|px)?$").expect("length regex is valid");
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("invalid length '{0}', expected points (120, 120pt, 120px) or a percentage (50%)")]
    InvalidLength(String),

    #[error("negative width or height '{0}'")]
    NegativeExtent(String),

    #[error("unknown anchor '{0}', expected one of: {}", ANCHOR_NAMES.join(", "))]
    UnknownAnchor(String),

    #[error("invalid position '{input}': {reason}")]
    InvalidShape { input: String, reason: String },
}

impl PositionError {
    fn shape(input: impl Into<String>, reason: impl Into<String>) -> Self {
        PositionError::InvalidShape {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// a length along one axis of the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// absolute points
    Points(f64),
    /// fraction of the container dimension (0.5 = 50%)
    Fraction(f64),
}

impl Length {
    pub const ZERO: Length = Length::Points(0.0);
    pub const FULL: Length = Length::Fraction(1.0);

    pub fn resolve(&self, extent: f64) -> f64 {
        match self {
            Length::Points(p) => *p,
            Length::Fraction(f) => extent * f,
        }
    }

    pub fn parse(s: &str) -> Result<Self, PositionError> {
        let caps = LENGTH_RE
            .captures(s.trim())
            .ok_or_else(|| PositionError::InvalidLength(s.to_string()))?;

        let number: f64 = caps[1]
            .parse()
            .map_err(|_| PositionError::InvalidLength(s.to_string()))?;
        if !number.is_finite() {
            return Err(PositionError::InvalidLength(s.to_string()));
        }

        match caps.get(2).map(|m| m.as_str()) {
            Some("%") => Ok(Length::Fraction(number / 100.0)),
            _ => Ok(Length::Points(number)),
        }
    }

    pub fn from_json(json: &JsonValue) -> Result<Self, PositionError> {
        match json {
            JsonValue::Number(n) => n
                .as_f64()
                .filter(|p| p.is_finite())
                .map(Length::Points)
                .ok_or_else(|| PositionError::InvalidLength(n.to_string())),
            JsonValue::String(s) => Length::parse(s),
            other => Err(PositionError::InvalidLength(other.to_string())),
        }
    }

    /// widths and heights; offsets may go negative, extents may not
    fn non_negative(self, input: &str) -> Result<Self, PositionError> {
        let negative = match self {
            Length::Points(p) => p < 0.0,
            Length::Fraction(f) => f < 0.0,
        };
        if negative {
            return Err(PositionError::NegativeExtent(input.to_string()));
        }
        Ok(self)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Points(p) => write!(f, "{}", p),
            // rounded so "7%" does not print as 7.000000000000001%
            Length::Fraction(fr) => write!(f, "{}%", (fr * 100.0 * 1e9).round() / 1e9),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Start,
    Center,
    End,
}

/// which point of the container (and of the child) offsets are measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

const ANCHOR_NAMES: [&str; 9] = [
    "top-left",
    "top",
    "top-right",
    "left",
    "center",
    "right",
    "bottom-left",
    "bottom",
    "bottom-right",
];

impl Anchor {
    pub fn parse(s: &str) -> Result<Self, PositionError> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "top-left" | "topleft" => Ok(Anchor::TopLeft),
            "top" => Ok(Anchor::Top),
            "top-right" | "topright" => Ok(Anchor::TopRight),
            "left" => Ok(Anchor::Left),
            "center" | "middle" => Ok(Anchor::Center),
            "right" => Ok(Anchor::Right),
            "bottom-left" | "bottomleft" => Ok(Anchor::BottomLeft),
            "bottom" => Ok(Anchor::Bottom),
            "bottom-right" | "bottomright" => Ok(Anchor::BottomRight),
            _ => Err(PositionError::UnknownAnchor(s.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::Top => "top",
            Anchor::TopRight => "top-right",
            Anchor::Left => "left",
            Anchor::Center => "center",
            Anchor::Right => "right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::Bottom => "bottom",
            Anchor::BottomRight => "bottom-right",
        }
    }

    fn horizontal(&self) -> Align {
        match self {
            Anchor::TopLeft | Anchor::Left | Anchor::BottomLeft => Align::Start,
            Anchor::Top | Anchor::Center | Anchor::Bottom => Align::Center,
            Anchor::TopRight | Anchor::Right | Anchor::BottomRight => Align::End,
        }
    }

    fn vertical(&self) -> Align {
        match self {
            Anchor::TopLeft | Anchor::Top | Anchor::TopRight => Align::Start,
            Anchor::Left | Anchor::Center | Anchor::Right => Align::Center,
            Anchor::BottomLeft | Anchor::Bottom | Anchor::BottomRight => Align::End,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// edge insets for `LayoutPosition::Fill`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    pub top: Length,
    pub left: Length,
    pub bottom: Length,
    pub right: Length,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: Length::ZERO,
        left: Length::ZERO,
        bottom: Length::ZERO,
        right: Length::ZERO,
    };

    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            left: length,
            bottom: length,
            right: length,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Insets::ZERO
    }
}

impl Default for Insets {
    fn default() -> Self {
        Insets::ZERO
    }
}

/// caller-supplied resolver, must be pure
pub type PositionFn = Arc<dyn Fn(Size) -> Rect + Send + Sync>;

#[derive(Clone)]
pub enum LayoutPosition {
    /// the container's whole area, shrunk by insets
    Fill { insets: Insets },
    /// a sized frame placed relative to an anchor point
    Frame {
        anchor: Anchor,
        x: Length,
        y: Length,
        width: Length,
        height: Length,
    },
    /// a fixed rectangle, independent of the container size
    Absolute(Rect),
    Custom(PositionFn),
}

impl LayoutPosition {
    pub fn full() -> Self {
        LayoutPosition::Fill {
            insets: Insets::ZERO,
        }
    }

    pub fn frame(anchor: Anchor, width: Length, height: Length) -> Self {
        LayoutPosition::Frame {
            anchor,
            x: Length::ZERO,
            y: Length::ZERO,
            width,
            height,
        }
    }

    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(Size) -> Rect + Send + Sync + 'static,
    {
        LayoutPosition::Custom(Arc::new(resolver))
    }

    /// builder-style offsets for `Frame`; other variants are returned unchanged
    pub fn with_offset(self, dx: Length, dy: Length) -> Self {
        match self {
            LayoutPosition::Frame {
                anchor,
                width,
                height,
                ..
            } => LayoutPosition::Frame {
                anchor,
                x: dx,
                y: dy,
                width,
                height,
            },
            other => other,
        }
    }

    /// compute the absolute frame inside a container of the given size
    pub fn resolve(&self, container: Size) -> Rect {
        match self {
            LayoutPosition::Fill { insets } => {
                let top = insets.top.resolve(container.height);
                let left = insets.left.resolve(container.width);
                let bottom = insets.bottom.resolve(container.height);
                let right = insets.right.resolve(container.width);
                Rect::new(
                    left,
                    top,
                    container.width - left - right,
                    container.height - top - bottom,
                )
            }
            LayoutPosition::Frame {
                anchor,
                x,
                y,
                width,
                height,
            } => {
                let size = Size::new(
                    width.resolve(container.width),
                    height.resolve(container.height),
                );
                let dx = x.resolve(container.width);
                let dy = y.resolve(container.height);

                let origin_x = align(anchor.horizontal(), container.width, size.width, dx);
                let origin_y = align(anchor.vertical(), container.height, size.height, dy);

                Rect::new(origin_x, origin_y, size.width, size.height)
            }
            LayoutPosition::Absolute(rect) => *rect,
            LayoutPosition::Custom(resolver) => resolver(container),
        }
    }

    /// parse the compact string form (`full`, `WxH[@anchor[+x,y]]`)
    pub fn parse(s: &str) -> Result<Self, PositionError> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        if lower == "full" || lower == "fill" {
            return Ok(LayoutPosition::full());
        }

        let (dims, placement) = match trimmed.split_once('@') {
            Some((d, p)) => (d, Some(p)),
            None => (trimmed, None),
        };

        let sep = find_dimension_separator(dims)
            .ok_or_else(|| PositionError::shape(s, "expected WIDTHxHEIGHT"))?;
        let width = Length::parse(&dims[..sep])?.non_negative(&dims[..sep])?;
        let height = Length::parse(&dims[sep + 1..])?.non_negative(&dims[sep + 1..])?;

        let (anchor, x, y) = match placement {
            None => (Anchor::Center, Length::ZERO, Length::ZERO),
            Some(p) => match p.split_once('+') {
                Some((anchor, offsets)) => {
                    let (ox, oy) = offsets
                        .split_once(',')
                        .ok_or_else(|| PositionError::shape(s, "offsets must be written as +X,Y"))?;
                    (Anchor::parse(anchor)?, Length::parse(ox)?, Length::parse(oy)?)
                }
                None => (Anchor::parse(p)?, Length::ZERO, Length::ZERO),
            },
        };

        Ok(LayoutPosition::Frame {
            anchor,
            x,
            y,
            width,
            height,
        })
    }

    /// parse a position from its JSON form (string or object)
    pub fn from_json(json: &JsonValue) -> Result<Self, PositionError> {
        match json {
            JsonValue::String(s) => LayoutPosition::parse(s),
            JsonValue::Object(obj) => {
                for key in ["fill", "rect"] {
                    if obj.contains_key(key) && obj.len() > 1 {
                        return Err(PositionError::shape(
                            json.to_string(),
                            format!("'{}' cannot be combined with other keys", key),
                        ));
                    }
                }
                if let Some(fill) = obj.get("fill") {
                    return parse_fill(fill);
                }
                if let Some(rect) = obj.get("rect") {
                    return parse_rect(rect);
                }

                for key in obj.keys() {
                    if !matches!(key.as_str(), "anchor" | "x" | "y" | "width" | "height") {
                        return Err(PositionError::shape(
                            json.to_string(),
                            format!("unknown key '{}'", key),
                        ));
                    }
                }

                let anchor = match obj.get("anchor") {
                    Some(JsonValue::String(a)) => Anchor::parse(a)?,
                    Some(other) => return Err(PositionError::UnknownAnchor(other.to_string())),
                    None => Anchor::TopLeft,
                };
                let length_or = |key: &str, default: Length| -> Result<Length, PositionError> {
                    obj.get(key).map(Length::from_json).unwrap_or(Ok(default))
                };

                Ok(LayoutPosition::Frame {
                    anchor,
                    x: length_or("x", Length::ZERO)?,
                    y: length_or("y", Length::ZERO)?,
                    width: length_or("width", Length::FULL)?.non_negative(&json.to_string())?,
                    height: length_or("height", Length::FULL)?.non_negative(&json.to_string())?,
                })
            }
            other => Err(PositionError::shape(
                other.to_string(),
                "expected a string or an object",
            )),
        }
    }
}

fn align(mode: Align, extent: f64, length: f64, offset: f64) -> f64 {
    match mode {
        Align::Start => offset,
        Align::Center => (extent - length) / 2.0 + offset,
        Align::End => extent - length - offset,
    }
}

/// index of the 'x' between width and height, skipping the one in "px"
fn find_dimension_separator(dims: &str) -> Option<usize> {
    let bytes = dims.as_bytes();
    dims.char_indices()
        .find(|&(i, c)| (c == 'x' || c == 'X') && !(i > 0 && bytes[i - 1] == b'p'))
        .map(|(i, _)| i)
}

fn parse_fill(fill: &JsonValue) -> Result<LayoutPosition, PositionError> {
    let insets = match fill {
        JsonValue::Bool(true) => Insets::ZERO,
        JsonValue::Number(_) | JsonValue::String(_) => Insets::uniform(Length::from_json(fill)?),
        JsonValue::Object(edges) => {
            let mut insets = Insets::ZERO;
            for (edge, value) in edges {
                let length = Length::from_json(value)?;
                match edge.as_str() {
                    "top" => insets.top = length,
                    "left" => insets.left = length,
                    "bottom" => insets.bottom = length,
                    "right" => insets.right = length,
                    other => {
                        return Err(PositionError::shape(
                            fill.to_string(),
                            format!("unknown edge '{}'", other),
                        ))
                    }
                }
            }
            insets
        }
        other => {
            return Err(PositionError::shape(
                other.to_string(),
                "'fill' must be true, a length or an object of edges",
            ))
        }
    };

    Ok(LayoutPosition::Fill { insets })
}

fn parse_rect(rect: &JsonValue) -> Result<LayoutPosition, PositionError> {
    let values: Option<Vec<f64>> = rect
        .as_array()
        .and_then(|arr| arr.iter().map(|v| v.as_f64()).collect::<Option<Vec<f64>>>());

    match values.as_deref() {
        Some(&[x, y, w, h]) => Ok(LayoutPosition::Absolute(Rect::new(x, y, w, h))),
        _ => Err(PositionError::shape(
            rect.to_string(),
            "'rect' must be [x, y, width, height]",
        )),
    }
}

impl fmt::Debug for LayoutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPosition::Fill { insets } => {
                f.debug_struct("Fill").field("insets", insets).finish()
            }
            LayoutPosition::Frame {
                anchor,
                x,
                y,
                width,
                height,
            } => f
                .debug_struct("Frame")
                .field("anchor", anchor)
                .field("x", x)
                .field("y", y)
                .field("width", width)
                .field("height", height)
                .finish(),
            LayoutPosition::Absolute(rect) => f.debug_tuple("Absolute").field(rect).finish(),
            LayoutPosition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// custom resolvers compare by identity
impl PartialEq for LayoutPosition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LayoutPosition::Fill { insets: a }, LayoutPosition::Fill { insets: b }) => a == b,
            (
                LayoutPosition::Frame {
                    anchor: a1,
                    x: x1,
                    y: y1,
                    width: w1,
                    height: h1,
                },
                LayoutPosition::Frame {
                    anchor: a2,
                    x: x2,
                    y: y2,
                    width: w2,
                    height: h2,
                },
            ) => a1 == a2 && x1 == x2 && y1 == y2 && w1 == w2 && h1 == h2,
            (LayoutPosition::Absolute(a), LayoutPosition::Absolute(b)) => a == b,
            (LayoutPosition::Custom(a), LayoutPosition::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for LayoutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPosition::Fill { insets } if insets.is_zero() => write!(f, "full"),
            LayoutPosition::Fill { insets } => write!(
                f,
                "fill(top: {}, left: {}, bottom: {}, right: {})",
                insets.top, insets.left, insets.bottom, insets.right
            ),
            LayoutPosition::Frame {
                anchor,
                x,
                y,
                width,
                height,
            } => {
                write!(f, "{}x{}@{}", width, height, anchor)?;
                if *x != Length::ZERO || *y != Length::ZERO {
                    write!(f, "+{},{}", x, y)?;
                }
                Ok(())
            }
            LayoutPosition::Absolute(rect) => write!(
                f,
                "rect({}, {}, {}, {})",
                rect.origin.x, rect.origin.y, rect.size.width, rect.size.height
            ),
            LayoutPosition::Custom(_) => write!(f, "custom"),
        }
    }
}
