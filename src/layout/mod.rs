//! Text measurement and placement for single-line overlay text.
//!
//! Overlay values are placed into fixed boxes, so instead of wrapping, text that is too
//! wide for its box is first drawn smaller and, once the minimum size is reached, cut
//! short with an ellipsis:
//!
//! - [`fit_text`](crate::layout::fit_text) - shrink-to-fit, then truncate
//! - [`baseline`](crate::layout::baseline) - vertical placement of the resulting line
//!
//! # Example
//!
//! ```
//! use pdf_overlay::{Font, Pt, VerticalAlign};
//! use pdf_overlay::layout::{baseline, fit_text, width_budget};
//!
//! let font = Font::helvetica();
//! let budget = width_budget(Some(Pt(60.0)), Pt(3.0));
//! let fitted = fit_text(&font, "A rather long value", budget, Pt(12.0), Pt(6.0));
//! assert!(fitted.size < Pt(12.0));
//!
//! let y = baseline(VerticalAlign::Middle, Pt(842.0), Pt(100.0), Pt(24.0), Pt(0.0), &font, fitted.size);
//! assert!(y > Pt(842.0 - 124.0) && y < Pt(842.0 - 100.0));
//! ```

mod baseline;
mod fit;

pub use baseline::*;
pub use fit::*;
