use crate::units::Pt;

/// Vertical metrics from a font descriptor, in 1/1000 em
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Distance from the baseline to the top of the tallest glyphs
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the deepest glyphs. Usually negative
    pub descent: f32,
}

/// Ascent ratio used when a font carries no descriptor. This is an approximation
/// taken from Helvetica and is only roughly right for other faces.
pub const FALLBACK_ASCENT: f32 = 0.718;
/// Descent ratio used when a font carries no descriptor, see [FALLBACK_ASCENT]
pub const FALLBACK_DESCENT: f32 = -0.176;

/// A simple (single byte encoded) font used to draw overlay text.
///
/// Text is drawn with `/WinAnsiEncoding`, one byte per character, so the width table
/// is indexed by byte code and the font can only show characters in `0..=255`. Run text
/// through [crate::layout::to_latin1_safe] before measuring or drawing it.
///
/// Fonts are not embedded: the `base_font` must name one of the standard 14 fonts that
/// every PDF reader provides.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    base_font: String,
    widths: [u16; 256],
    descriptor: Option<FontDescriptor>,
}

impl Default for Font {
    fn default() -> Self {
        Font::helvetica()
    }
}

impl Font {
    /// Build a font from a width table (1/1000 em, indexed by byte code). A font without
    /// a descriptor gets [FALLBACK_ASCENT] / [FALLBACK_DESCENT] as its vertical metrics.
    pub fn new<S: ToString>(
        base_font: S,
        widths: [u16; 256],
        descriptor: Option<FontDescriptor>,
    ) -> Font {
        Font {
            base_font: base_font.to_string(),
            widths,
            descriptor,
        }
    }

    /// Standard 14 Helvetica
    pub fn helvetica() -> Font {
        Font::new(
            "Helvetica",
            HELVETICA_WIDTHS,
            Some(FontDescriptor {
                ascent: 718.0,
                descent: -207.0,
            }),
        )
    }

    /// Standard 14 Courier. Every glyph is 600/1000 em wide
    pub fn courier() -> Font {
        let mut widths = [0u16; 256];
        for (code, w) in widths.iter_mut().enumerate() {
            if HELVETICA_WIDTHS[code] > 0 {
                *w = 600;
            }
        }
        Font::new(
            "Courier",
            widths,
            Some(FontDescriptor {
                ascent: 629.0,
                descent: -157.0,
            }),
        )
    }

    /// The `/BaseFont` name written to the font dictionary
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    pub fn descriptor(&self) -> Option<&FontDescriptor> {
        self.descriptor.as_ref()
    }

    /// Advance width of a single character in 1/1000 em. Characters outside the
    /// single byte range have no glyph and measure as zero.
    pub fn glyph_width(&self, ch: char) -> u16 {
        u8::try_from(u32::from(ch))
            .map(|code| self.widths[code as usize])
            .unwrap_or_default()
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the
    /// given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        match &self.descriptor {
            Some(descriptor) => size * descriptor.ascent / 1000.0,
            None => size * FALLBACK_ASCENT,
        }
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for
    /// the given font size. Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        match &self.descriptor {
            Some(descriptor) => size * descriptor.descent / 1000.0,
            None => size * FALLBACK_DESCENT,
        }
    }

    /// Encode text as WinAnsi byte codes for a `Tj` operator. Characters outside the
    /// single byte range become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
            .collect()
    }
}

// Helvetica advance widths from the standard 14 AFM, laid out by WinAnsi code.
// Control codes and the five unassigned WinAnsi slots carry no glyph.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 256] = [
    // 0x00 - 0x1f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x20 - 0x3f
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40 - 0x5f
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60 - 0x7f
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    // 0x80 - 0x9f
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    // 0xa0 - 0xbf
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xc0 - 0xdf
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xe0 - 0xff
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];
