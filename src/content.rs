//! Content stream rendering for page overlays.

use crate::colour::Colour;
use crate::document::ImageHandle;
use crate::font::Font;
use crate::page::{OverlayContents, SpanLayout};
use pdf_writer::{Content, Name, Str};
use std::collections::HashMap;

/// Resource names the overlay is drawn against, as registered in the page's
/// `/Resources` dictionary
#[derive(Debug, Clone, Default)]
pub(crate) struct ResourceNames {
    pub font: String,
    pub images: HashMap<ImageHandle, String>,
}

/// Renders overlay contents to a PDF content stream.
///
/// Consecutive text spans share one `q .. Q` block and only switch size or colour
/// when the span needs it. Images without a registered name are skipped.
pub(crate) fn render_contents(
    contents: &[OverlayContents],
    font: &Font,
    names: &ResourceNames,
) -> Vec<u8> {
    let mut content = Content::new();

    let mut i = 0;
    while i < contents.len() {
        match &contents[i] {
            OverlayContents::Text(_) => {
                let run: Vec<&SpanLayout> = contents[i..]
                    .iter()
                    .map_while(|c| match c {
                        OverlayContents::Text(span) => Some(span),
                        OverlayContents::Image(_) => None,
                    })
                    .collect();
                i += run.len();
                render_text_spans(&mut content, &run, font, names);
            }
            OverlayContents::Image(image) => {
                i += 1;
                let Some(name) = names.images.get(&image.image) else {
                    continue;
                };
                let p = &image.position;
                content.save_state();
                content.transform([p.width().0, 0.0, 0.0, p.height().0, p.x1.0, p.y1.0]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
        }
    }

    content.finish()
}

fn render_text_spans(content: &mut Content, spans: &[&SpanLayout], font: &Font, names: &ResourceNames) {
    let Some(first) = spans.first() else {
        return;
    };

    content.save_state();

    let mut current_size = first.size;
    let mut current_colour: Colour = first.colour;
    content.set_font(Name(names.font.as_bytes()), current_size.0);
    write_colour(content, current_colour);

    for span in spans.iter() {
        if span.size != current_size {
            current_size = span.size;
            content.set_font(Name(names.font.as_bytes()), current_size.0);
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_colour(content, current_colour);
        }

        content.begin_text();
        content.next_line(span.coords.0 .0, span.coords.1 .0);
        content.show(Str(&font.encode(&span.text)));
        content.end_text();
    }

    content.restore_state();
}

fn write_colour(content: &mut Content, colour: Colour) {
    content.set_fill_rgb(colour.r, colour.g, colour.b);
}
