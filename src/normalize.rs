//! Conversion of region geometry from input space into render space.
//!
//! Input space has its origin at the top-left of the page with y growing downwards and
//! may be measured in some other unit (viewport pixels, say). Render space is PDF user
//! space: origin at the bottom-left, y growing upwards, measured in points. Given the
//! page height in points, converting a rectangle is:
//!
//! ```text
//! x'      = x / s
//! y'      = y / s                  (still measured from the top)
//! bottom' = page_height - y' - h'
//! ```

use crate::rect::Rect;
use crate::units::{Pt, Px};

/// Input units per render unit. A scale of 2 means 2 input pixels make up one point
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scale(f32);

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}

impl Scale {
    /// Coordinates are already in points
    pub const IDENTITY: Scale = Scale(1.0);

    /// Resolve an optional scale; anything absent, non-positive or not finite means
    /// no conversion
    pub fn resolve(scale: Option<f64>) -> Scale {
        match scale {
            Some(s) if s > 0.0 && s.is_finite() => Scale(s as f32),
            _ => Scale::IDENTITY,
        }
    }

    pub fn factor(&self) -> f32 {
        self.0
    }

    /// Convert an input length into points
    pub fn to_pt(&self, v: Px) -> Pt {
        Pt(v.0 / self.0)
    }
}

/// A region's geometry after conversion into points, still measured from the top of the
/// page. Width and height stay optional: an absent width disables width fitting and an
/// absent height is substituted by the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Converted {
    pub x: Pt,
    /// Distance from the top edge of the page to the top of the region
    pub y_top: Pt,
    pub width: Option<Pt>,
    pub height: Option<Pt>,
}

/// Convert a region's raw input geometry into points
pub fn convert(x: Px, y: Px, width: Option<Px>, height: Option<Px>, scale: Scale) -> Converted {
    Converted {
        x: scale.to_pt(x),
        y_top: scale.to_pt(y),
        width: width.map(|w| scale.to_pt(w)),
        height: height.map(|h| scale.to_pt(h)),
    }
}

/// Flip a rectangle anchored at its top edge `y_top` (measured down from the top of the
/// page) into a render space rectangle anchored at its bottom-left corner
pub fn flip(page_height: Pt, x: Pt, y_top: Pt, width: Pt, height: Pt) -> Rect {
    let bottom = page_height - y_top - height;
    Rect::from_origin(x, bottom, width, height)
}

/// Convert and flip in one go. A width or height that is absent, or not positive once
/// converted, is replaced by `default_size`.
pub fn normalize(
    page_height: Pt,
    x: Px,
    y: Px,
    width: Option<Px>,
    height: Option<Px>,
    scale: Scale,
    default_size: Pt,
) -> Rect {
    let c = convert(x, y, width, height, scale);
    let size = |v: Option<Pt>| v.filter(|v| *v > Pt(0.0)).unwrap_or(default_size);
    flip(page_height, c.x, c.y_top, size(c.width), size(c.height))
}
