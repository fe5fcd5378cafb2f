use crate::font::Font;
use crate::region::VerticalAlign;
use crate::units::Pt;

/// Where to put the baseline of a single line of text inside a region.
///
/// `y_top` is the distance from the top edge of the page to the top of the region and
/// `rect_height` its height, both in points. The result is a render space y coordinate.
///
/// * [VerticalAlign::Top] hangs the text `padding_y` below the top of the region
/// * [VerticalAlign::Middle] puts the visual centre of the text, halfway between its
///   ascent and descent, on the centre of the region
pub fn baseline(
    align: VerticalAlign,
    page_height: Pt,
    y_top: Pt,
    rect_height: Pt,
    padding_y: Pt,
    font: &Font,
    size: Pt,
) -> Pt {
    let ascent = font.ascent(size);
    match align {
        VerticalAlign::Top => page_height - (y_top + padding_y) - ascent,
        VerticalAlign::Middle => {
            let rect_top = page_height - y_top;
            let rect_bottom = rect_top - rect_height;
            let text_centre = (ascent + font.descent(size)) / 2.0;
            (rect_top + rect_bottom) / 2.0 - text_centre
        }
    }
}
