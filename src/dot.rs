//! Dot and viewport types shared by the generator and the exporters.
//!
//! The generator produces dots in an abstract unit system centered at the
//! origin, with Y pointing down. Every consumer frames that space with the
//! same [`Viewport`].

/// A single dot of a generated pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    /// Position in draw order (0..86).
    pub index: usize,
    /// Horizontal center.
    pub x: f64,
    /// Vertical center (Y down).
    pub y: f64,
    /// Radius, shared by every dot of one generation pass.
    pub r: f64,
    /// Darkness in `[0.6, 1.0]`, where 1.0 is black.
    pub value: f64,
    /// Gray fill derived from `value`, e.g. `#565656`.
    pub color: String,
}

impl Dot {
    /// Distance of the dot center from the origin.
    pub fn distance_from_origin(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Square framing of the pattern, centered at the origin.
///
/// The half-size is `spread + dot_radius + padding / 100`, so the outer ring
/// plus its dots always fits with the requested border around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Half the side length of the square.
    pub total_radius: f64,
}

impl Viewport {
    /// Creates a viewport from generator-space measures.
    ///
    /// `padding` is a percentage (0-100) of the unit radius.
    pub fn new(spread: f64, dot_radius: f64, padding: f64) -> Self {
        Self {
            total_radius: spread + dot_radius + padding / 100.0,
        }
    }

    /// Left/top edge of the viewport.
    pub fn min(&self) -> f64 {
        -self.total_radius
    }

    /// Side length of the square.
    pub fn size(&self) -> f64 {
        self.total_radius * 2.0
    }

    /// The SVG `viewBox` attribute value (`min-x min-y width height`).
    pub fn view_box(&self) -> String {
        format!("{} {} {} {}", self.min(), self.min(), self.size(), self.size())
    }
}
