//! Length units used throughout the crate.
//!
//! [Pt] is the render space unit: PDF user space, 1/72 of an inch, origin at the
//! bottom-left of the page. [Px] is the input space unit that region definitions may
//! be authored in (typically viewport pixels of a page preview), origin top-left.

use derive_more::{Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};

/// A length in PDF points (render space)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    DivAssign,
    Sum,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

/// A length in input units, as authored in a region definition
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    Mul,
    Div,
    Display,
    From,
    Into,
)]
pub struct Px(pub f32);

impl Pt {
    /// The larger of two lengths
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }
}

impl From<f64> for Px {
    fn from(v: f64) -> Self {
        Px(v as f32)
    }
}
