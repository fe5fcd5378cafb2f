use crate::colour::Colour;
use crate::content::{render_contents, ResourceNames};
use crate::document::ImageHandle;
use crate::error::{OverlayError, Result};
use crate::font::Font;
use crate::rect::Rect;
use crate::units::Pt;

/// A single line of text, positioned by its baseline origin in render space
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub size: Pt,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image: ImageHandle,
    pub position: Rect,
}

#[derive(Clone, PartialEq, Debug)]
pub enum OverlayContents {
    Text(SpanLayout),
    Image(ImageLayout),
}

/// The drawing surface for one page: paint commands are recorded here and appended to
/// the page in one go by [crate::OverlayTarget::append_overlay]. Commands are kept in
/// the order they were added, so later ones paint over earlier ones.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PageOverlay {
    pub contents: Vec<OverlayContents>,
}

fn finite(values: &[Pt]) -> bool {
    values.iter().all(|v| v.0.is_finite())
}

impl PageOverlay {
    pub fn new() -> PageOverlay {
        PageOverlay::default()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Record a line of text. The overlay font encodes one byte per character, so text
    /// containing anything past U+00FF is rejected with [OverlayError::GlyphEncoding].
    pub fn add_span(&mut self, span: SpanLayout) -> Result<()> {
        if let Some(ch) = span.text.chars().find(|ch| u32::from(*ch) > 0xff) {
            return Err(OverlayError::GlyphEncoding(ch));
        }
        if !finite(&[span.size, span.coords.0, span.coords.1]) || span.size <= Pt(0.0) {
            return Err(OverlayError::InvalidGeometry(format!(
                "text at ({}, {}) with size {}",
                span.coords.0, span.coords.1, span.size
            )));
        }
        self.contents.push(OverlayContents::Text(span));
        Ok(())
    }

    /// Record an image stretched over `position`
    pub fn add_image(&mut self, image: ImageLayout) -> Result<()> {
        let r = &image.position;
        if !finite(&[r.x1, r.y1, r.x2, r.y2]) || r.width() <= Pt(0.0) || r.height() <= Pt(0.0) {
            return Err(OverlayError::InvalidGeometry(format!(
                "image at ({}, {}) sized {}x{}",
                r.x1,
                r.y1,
                r.width(),
                r.height()
            )));
        }
        self.contents.push(OverlayContents::Image(image));
        Ok(())
    }

    /// Render the recorded commands into content stream operators
    pub(crate) fn render(&self, font: &Font, names: &ResourceNames) -> Vec<u8> {
        render_contents(&self.contents, font, names)
    }
}
