use crate::font::Font;
use crate::units::Pt;
use std::borrow::Cow;

/// Marker appended to text that had to be cut short
pub const ELLIPSIS: &str = "...";

/// How much the font size drops on each step of [shrink_to_fit]
pub const SHRINK_STEP: f32 = 1.0;

/// Replace every character the single byte fonts cannot show (anything above U+00FF)
/// with `?`. Must run before measuring so the measured and the drawn text agree.
pub fn to_latin1_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(|ch| u32::from(ch) <= 0xff) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|ch| if u32::from(ch) <= 0xff { ch } else { '?' })
            .collect(),
    )
}

// Summed as f64: a u32 total overflows after a few million wide glyphs
fn units_of_text(text: &str, font: &Font) -> f64 {
    text.chars().map(|ch| f64::from(font.glyph_width(ch))).sum()
}

fn units_to_width(units: f64, size: Pt) -> Pt {
    Pt((f64::from(size.0) * units / 1000.0) as f32)
}

/// Calculate the width of a given string of text given the font and font size
pub fn width_of_text(text: &str, font: &Font, size: Pt) -> Pt {
    units_to_width(units_of_text(text, font), size)
}

/// Find the largest font size, stepping down from `max_size` by [SHRINK_STEP], at which
/// `text` is no wider than `width_limit`. Never returns less than `min_size`; if nothing
/// fits, `min_size` is returned and the caller should truncate.
///
/// Sizes are stepped by an integer count from `max_size`, so the search ends after at
/// most `(max_size - min_size) / SHRINK_STEP` steps whatever the magnitudes. Bounds that
/// are not finite, or a `max_size` below `min_size`, give `min_size`.
pub fn shrink_to_fit(font: &Font, text: &str, width_limit: Pt, max_size: Pt, min_size: Pt) -> Pt {
    let max = f64::from(max_size.0);
    let step = f64::from(SHRINK_STEP);
    let span = max - f64::from(min_size.0);
    if !span.is_finite() || span < 0.0 {
        return min_size;
    }
    let steps = (span / step).floor() as u64;

    // width is linear in size, so every size above `limit / units` is too wide and
    // can be skipped; start a step early to stay clear of rounding
    let units = units_of_text(text, font);
    let first = if units > 0.0 {
        let fits_below = f64::from(width_limit.0) * 1000.0 / units;
        let skip = ((max - fits_below) / step).floor() - 1.0;
        if skip > 0.0 {
            (skip as u64).min(steps)
        } else {
            0
        }
    } else {
        0
    };

    (first..=steps)
        .map(|k| Pt((max - k as f64 * step) as f32))
        .find(|size| units_to_width(units, *size) <= width_limit)
        .unwrap_or(min_size)
}

/// Cut characters off the end of `text` until it plus [ELLIPSIS] is no wider than
/// `width_limit` at the given size. If not even the ellipsis fits, the ellipsis alone
/// is returned.
pub fn truncate_with_ellipsis(font: &Font, text: &str, size: Pt, width_limit: Pt) -> String {
    let ellipsis_width = width_of_text(ELLIPSIS, font, size);
    let max_text_width = width_limit - ellipsis_width;
    if max_text_width <= Pt(0.0) {
        return ELLIPSIS.to_string();
    }

    // widths only ever grow with the prefix, so the longest fitting prefix is the one
    // left over after dropping characters from the end one at a time
    let mut units = 0f64;
    let mut end = 0usize;
    for (i, ch) in text.char_indices() {
        units += f64::from(font.glyph_width(ch));
        if units_to_width(units, size) > max_text_width {
            break;
        }
        end = i + ch.len_utf8();
    }

    let mut truncated = String::with_capacity(end + ELLIPSIS.len());
    truncated.push_str(&text[..end]);
    truncated.push_str(ELLIPSIS);
    truncated
}

/// The outcome of fitting a value into a region
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    /// Text to draw, after the Latin-1 guard and any truncation
    pub text: String,
    pub size: Pt,
    pub truncated: bool,
}

/// Fit text into an optional width budget. Without a budget the text is drawn at
/// `max_size` as is; with one the size is shrunk first and the text truncated only
/// if it still overflows at the resulting size.
pub fn fit_text(
    font: &Font,
    text: &str,
    width_limit: Option<Pt>,
    max_size: Pt,
    min_size: Pt,
) -> FittedText {
    let safe = to_latin1_safe(text);

    let Some(width_limit) = width_limit else {
        return FittedText {
            text: safe.into_owned(),
            size: max_size,
            truncated: false,
        };
    };

    let size = shrink_to_fit(font, &safe, width_limit, max_size, min_size);
    if width_of_text(&safe, font, size) > width_limit {
        FittedText {
            text: truncate_with_ellipsis(font, &safe, size, width_limit),
            size,
            truncated: true,
        }
    } else {
        FittedText {
            text: safe.into_owned(),
            size,
            truncated: false,
        }
    }
}

/// The width available to text inside a region of the given width. Padding is taken
/// off both sides; when the padding would eat the whole box, half the box is used
/// instead. Regions with no (or no positive) width have no limit.
pub fn width_budget(width: Option<Pt>, padding_x: Pt) -> Option<Pt> {
    let width = width.filter(|w| *w > Pt(0.0))?;
    if width > padding_x * 2.0 {
        Some(width - padding_x * 2.0)
    } else {
        Some(width * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courier() -> Font {
        Font::courier()
    }

    #[test]
    fn latin1_guard_replaces_wide_characters() {
        assert!(matches!(to_latin1_safe("café"), Cow::Borrowed("café")));
        assert_eq!(to_latin1_safe("日本 ok €"), "?? ok ?");
    }

    #[test]
    fn width_is_linear_in_size() {
        let font = courier();
        assert_eq!(width_of_text("abcd", &font, Pt(10.0)), Pt(24.0));
        assert_eq!(width_of_text("abcd", &font, Pt(5.0)), Pt(12.0));
        assert_eq!(width_of_text("", &font, Pt(12.0)), Pt(0.0));
    }

    #[test]
    fn no_shrink_when_text_fits() {
        let font = courier();
        // 5 chars at 12pt = 36pt
        assert_eq!(
            shrink_to_fit(&font, "hello", Pt(36.0), Pt(12.0), Pt(6.0)),
            Pt(12.0)
        );
    }

    #[test]
    fn shrinks_to_largest_fitting_size() {
        let font = courier();
        // 10 chars: 6pt per 1pt of size, budget 50pt -> 8pt (48pt) fits, 9pt (54pt) does not
        assert_eq!(
            shrink_to_fit(&font, "abcdefghij", Pt(50.0), Pt(12.0), Pt(6.0)),
            Pt(8.0)
        );
    }

    #[test]
    fn shrink_clamps_to_minimum() {
        let font = courier();
        assert_eq!(
            shrink_to_fit(&font, "abcdefghijklmnopqrstuvwxyz", Pt(10.0), Pt(12.0), Pt(6.0)),
            Pt(6.0)
        );
    }

    #[test]
    fn longer_text_never_gets_a_larger_size() {
        let font = Font::helvetica();
        let text = lipsum::lipsum_words(12);
        let mut last = Pt(f32::MAX);
        for end in (1..=text.len()).filter(|i| text.is_char_boundary(*i)) {
            let size = shrink_to_fit(&font, &text[..end], Pt(120.0), Pt(12.0), Pt(6.0));
            assert!(size <= last);
            assert!(size >= Pt(6.0) && size <= Pt(12.0));
            last = size;
        }
    }

    #[test]
    fn truncation_ends_with_ellipsis_and_fits() {
        let font = Font::helvetica();
        let text = "ThisIsAVeryLongStringThatWillBeTruncated";
        let out = truncate_with_ellipsis(&font, text, Pt(6.0), Pt(24.0));
        assert!(out.ends_with(ELLIPSIS));
        assert!(out.len() > ELLIPSIS.len());
        assert!(text.starts_with(out.trim_end_matches(ELLIPSIS)));
        assert!(width_of_text(&out, &font, Pt(6.0)) <= Pt(24.0));
    }

    #[test]
    fn truncation_without_room_is_ellipsis_alone() {
        let font = courier();
        // the ellipsis alone is 3 * 0.6 * 10 = 18pt
        assert_eq!(truncate_with_ellipsis(&font, "abc", Pt(10.0), Pt(18.0)), "...");
        assert_eq!(truncate_with_ellipsis(&font, "abc", Pt(10.0), Pt(2.0)), "...");
        assert_eq!(truncate_with_ellipsis(&font, "", Pt(10.0), Pt(0.0)), "...");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let font = courier();
        // each char is 6pt at 10pt; 18pt for the ellipsis leaves 12pt = 2 chars
        assert_eq!(truncate_with_ellipsis(&font, "ééééé", Pt(10.0), Pt(30.0)), "éé...");
    }

    #[test]
    fn fit_without_width_keeps_default_size() {
        let font = Font::helvetica();
        let long = lipsum::lipsum(40);
        let fitted = fit_text(&font, &long, None, Pt(12.0), Pt(6.0));
        assert_eq!(fitted.size, Pt(12.0));
        assert_eq!(fitted.text, long);
        assert!(!fitted.truncated);
    }

    #[test]
    fn fit_shrinks_then_truncates() {
        let font = Font::helvetica();
        let text = "ThisIsAVeryLongStringThatWillBeTruncated";
        let fitted = fit_text(&font, text, width_budget(Some(Pt(30.0)), Pt(3.0)), Pt(12.0), Pt(6.0));
        assert_eq!(fitted.size, Pt(6.0));
        assert!(fitted.truncated);
        assert!(fitted.text.ends_with(ELLIPSIS));
        assert_ne!(fitted.text, text);
    }

    #[test]
    fn fit_measures_the_guarded_text() {
        let font = courier();
        // 4 chars at 12pt = 28.8pt; the CJK chars would measure zero if not replaced
        let fitted = fit_text(&font, "ab日本", Some(Pt(28.8)), Pt(12.0), Pt(6.0));
        assert_eq!(fitted.text, "ab??");
        assert_eq!(fitted.size, Pt(12.0));
    }

    #[test]
    fn huge_maximum_sizes_still_terminate() {
        let font = Font::helvetica();
        // f32 cannot step 1pt down from 1e8, so sizes are counted from the top instead
        let size = shrink_to_fit(&font, "hello", Pt(50.0), Pt(1.0e8), Pt(6.0));
        assert_eq!(size, shrink_to_fit(&font, "hello", Pt(50.0), Pt(30.0), Pt(6.0)));
        assert!(width_of_text("hello", &font, size) <= Pt(50.0));
        assert!(width_of_text("hello", &font, size + Pt(1.0)) > Pt(50.0));
    }

    #[test]
    fn unusable_bounds_give_the_minimum() {
        let font = Font::helvetica();
        assert_eq!(
            shrink_to_fit(&font, "hello", Pt(50.0), Pt(f32::INFINITY), Pt(6.0)),
            Pt(6.0)
        );
        assert_eq!(shrink_to_fit(&font, "hello", Pt(50.0), Pt(f32::NAN), Pt(6.0)), Pt(6.0));
        assert_eq!(shrink_to_fit(&font, "hello", Pt(500.0), Pt(4.0), Pt(6.0)), Pt(6.0));
    }

    #[test]
    fn very_long_text_is_measured_without_overflow() {
        let font = Font::helvetica();
        // 4.6M glyphs of 944 units each is past u32::MAX units
        let text = "W".repeat(4_600_000);
        let width = width_of_text(&text, &font, Pt(12.0));
        let expected = 4_600_000.0 * 944.0 * 12.0 / 1000.0;
        assert!((f64::from(width.0) - expected).abs() / expected < 1e-6);

        let fitted = fit_text(&font, &text, Some(Pt(100.0)), Pt(12.0), Pt(6.0));
        assert_eq!(fitted.size, Pt(6.0));
        assert!(fitted.truncated);
        assert!(width_of_text(&fitted.text, &font, Pt(6.0)) <= Pt(100.0));
    }

    #[test]
    fn width_budget_rules() {
        assert_eq!(width_budget(None, Pt(3.0)), None);
        assert_eq!(width_budget(Some(Pt(0.0)), Pt(3.0)), None);
        assert_eq!(width_budget(Some(Pt(200.0)), Pt(3.0)), Some(Pt(194.0)));
        assert_eq!(width_budget(Some(Pt(6.0)), Pt(3.0)), Some(Pt(3.0)));
        assert_eq!(width_budget(Some(Pt(4.0)), Pt(3.0)), Some(Pt(2.0)));
    }
}
