//! Places values into the regions of a document.
//!
//! [render] never fails: regions that cannot be drawn are skipped and recorded in the
//! returned [RenderReport], and the rest of the page (and document) is drawn as normal.

use crate::document::{ImageHandle, OverlayTarget};
use crate::image::StampImage;
use crate::layout::{baseline, fit_text, width_budget};
use crate::normalize::{convert, normalize};
use crate::options::{RenderOptions, DEFAULT_LINE_HEIGHT_FACTOR, DEFAULT_STAMP_SIZE};
use crate::page::{ImageLayout, PageOverlay, SpanLayout};
use crate::region::{RegionDescriptor, RegionKind};
use crate::units::{Pt, Px};
use crate::value::{Value, ValueMap};
use std::collections::BTreeMap;

/// Why a region was not drawn
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// The region has no name, `x`, `y` or page
    MissingFields,
    /// The region's page is past the end of the document
    PageOutOfRange { page: u32, page_count: usize },
    /// A text region whose value is absent or empty
    EmptyValue,
    /// A checked checkbox with no stamp image to draw. Reported for the first such
    /// region only
    ImageUnavailable(String),
    DrawFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Name of the region, empty if it had none
    pub region: String,
    pub kind: DiagnosticKind,
}

/// What a call to [render] did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderReport {
    pub texts_drawn: usize,
    pub images_drawn: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderReport {
    /// True if no region was skipped for any reason
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn note<S: ToString>(&mut self, region: S, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic {
            region: region.to_string(),
            kind,
        });
    }
}

/// The checkbox stamp, loaded the first time a checked checkbox needs it
enum Stamp {
    NotLoaded,
    Ready(ImageHandle),
    Unavailable,
}

struct Compositor<'a, D: OverlayTarget + ?Sized> {
    doc: &'a mut D,
    values: &'a ValueMap,
    options: &'a RenderOptions,
    stamp: Stamp,
    report: RenderReport,
}

/// Draw `values` into `regions` of `doc`.
///
/// Regions are grouped by page and drawn page by page in ascending page order; on each
/// page they are drawn in the order given. Each page gets a single overlay appended
/// on top of its existing content.
///
/// * text regions draw their value, shrunk and if need be truncated to fit the region's
///   width. Absent and empty values draw nothing.
/// * checkbox regions draw the stamp image from [RenderOptions::checkbox_image] when
///   their value is `true`, and nothing otherwise. The image is loaded at most once
///   per call.
pub fn render<D: OverlayTarget + ?Sized>(
    doc: &mut D,
    regions: &[RegionDescriptor],
    values: &ValueMap,
    options: &RenderOptions,
) -> RenderReport {
    if regions.is_empty() {
        return RenderReport::default();
    }

    let mut compositor = Compositor {
        doc,
        values,
        options,
        stamp: Stamp::NotLoaded,
        report: RenderReport::default(),
    };

    let mut by_page: BTreeMap<u32, Vec<(&RegionDescriptor, Px, Px)>> = BTreeMap::new();
    for region in regions {
        match region.placement() {
            Some((x, y, page)) => by_page.entry(page).or_default().push((region, x, y)),
            None => {
                log::debug!("region {:?} is missing required fields, skipping", region.name);
                compositor
                    .report
                    .note(&region.name, DiagnosticKind::MissingFields);
            }
        }
    }

    for (page, regions) in by_page {
        compositor.render_page(page, &regions);
    }

    compositor.report
}

impl<'a, D: OverlayTarget + ?Sized> Compositor<'a, D> {
    fn render_page(&mut self, page: u32, regions: &[(&RegionDescriptor, Px, Px)]) {
        let page_count = self.doc.page_count();
        let page_index = (page - 1) as usize;
        if page_index >= page_count {
            log::warn!(
                "page {} exceeds document pages ({}), skipping {} region(s)",
                page,
                page_count,
                regions.len()
            );
            for (region, _, _) in regions {
                self.report
                    .note(&region.name, DiagnosticKind::PageOutOfRange { page, page_count });
            }
            return;
        }

        let page_height = match self.doc.page_height(page_index) {
            Ok(height) => height,
            Err(e) => {
                log::warn!("could not read the height of page {}: {}", page, e);
                for (region, _, _) in regions {
                    self.report
                        .note(&region.name, DiagnosticKind::DrawFailed(e.to_string()));
                }
                return;
            }
        };

        let mut overlay = PageOverlay::new();
        let mut drawn: Vec<(&str, RegionKind)> = Vec::with_capacity(regions.len());

        for (region, x, y) in regions {
            let result = match region.kind {
                RegionKind::Checkbox => self.checkbox(&mut overlay, region, *x, *y, page_height),
                RegionKind::Text => self.text(&mut overlay, region, *x, *y, page_height),
            };
            match result {
                Ok(true) => drawn.push((region.name.as_str(), region.kind)),
                Ok(false) => {}
                Err(e) => {
                    log::warn!("overlay failed for region '{}': {}", region.name, e);
                    self.report
                        .note(&region.name, DiagnosticKind::DrawFailed(e.to_string()));
                }
            }
        }

        if overlay.is_empty() {
            return;
        }

        match self
            .doc
            .append_overlay(page_index, &overlay, &self.options.font)
        {
            Ok(()) => {
                for (_, kind) in drawn.iter() {
                    match kind {
                        RegionKind::Text => self.report.texts_drawn += 1,
                        RegionKind::Checkbox => self.report.images_drawn += 1,
                    }
                }
                log::debug!("page {}: drew {} region(s)", page, drawn.len());
            }
            Err(e) => {
                log::warn!("could not write the overlay for page {}: {}", page, e);
                for (name, _) in drawn {
                    self.report
                        .note(name, DiagnosticKind::DrawFailed(e.to_string()));
                }
            }
        }
    }

    /// Returns whether anything was recorded for the region
    fn text(
        &mut self,
        overlay: &mut PageOverlay,
        region: &RegionDescriptor,
        x: Px,
        y: Px,
        page_height: Pt,
    ) -> crate::Result<bool> {
        let options = self.options;
        let text = Value::lookup(self.values, &region.name).to_text();
        if text.is_empty() {
            self.report.note(&region.name, DiagnosticKind::EmptyValue);
            return Ok(false);
        }

        let c = convert(x, y, region.width, region.height, options.scale);
        let budget = width_budget(c.width, options.padding_x);
        let fitted = fit_text(
            &options.font,
            &text,
            budget,
            options.font_size,
            options.min_font_size,
        );
        if fitted.truncated {
            log::debug!("truncated value of region '{}'", region.name);
        }

        let rect_height = c
            .height
            .unwrap_or(fitted.size * DEFAULT_LINE_HEIGHT_FACTOR);
        let y_baseline = baseline(
            region.vertical_align,
            page_height,
            c.y_top,
            rect_height,
            options.padding_y,
            &options.font,
            fitted.size,
        );

        overlay.add_span(SpanLayout {
            text: fitted.text,
            size: fitted.size,
            colour: options.font_colour,
            coords: (c.x + options.padding_x, y_baseline),
        })?;
        Ok(true)
    }

    /// Returns whether anything was recorded for the region
    fn checkbox(
        &mut self,
        overlay: &mut PageOverlay,
        region: &RegionDescriptor,
        x: Px,
        y: Px,
        page_height: Pt,
    ) -> crate::Result<bool> {
        if !Value::lookup(self.values, &region.name).is_true() {
            return Ok(false);
        }
        let Some(image) = self.stamp(&region.name) else {
            return Ok(false);
        };

        let position = normalize(
            page_height,
            x,
            y,
            region.width,
            region.height,
            self.options.scale,
            DEFAULT_STAMP_SIZE,
        );

        overlay.add_image(ImageLayout { image, position })?;
        Ok(true)
    }

    /// The embedded stamp image, loading and embedding it on first use. A failure is
    /// reported against the region that first needed the image and not again.
    fn stamp(&mut self, region: &str) -> Option<ImageHandle> {
        match self.stamp {
            Stamp::Ready(handle) => return Some(handle),
            Stamp::Unavailable => return None,
            Stamp::NotLoaded => {}
        }

        let options = self.options;
        let loaded = match &options.checkbox_image {
            Some(locator) => StampImage::load(locator, &options.resource_dir)
                .and_then(|image| self.doc.embed_image(&image))
                .map_err(|e| format!("{locator}: {e}")),
            None => Err("no checkbox image configured".to_string()),
        };

        match loaded {
            Ok(handle) => {
                self.stamp = Stamp::Ready(handle);
                Some(handle)
            }
            Err(reason) => {
                log::warn!("checkbox image unavailable, checkboxes will be left blank: {}", reason);
                self.report
                    .note(region, DiagnosticKind::ImageUnavailable(reason));
                self.stamp = Stamp::Unavailable;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OverlayError, Result};
    use crate::font::Font;
    use crate::page::OverlayContents;
    use crate::region::VerticalAlign;
    use image::{DynamicImage, RgbImage};

    /// Records what the compositor asks of a document
    struct Recorder {
        heights: Vec<Pt>,
        overlays: Vec<(usize, PageOverlay)>,
        embedded: usize,
        fail_append: bool,
    }

    impl Recorder {
        fn new(pages: usize) -> Recorder {
            Recorder {
                heights: vec![Pt(842.0); pages],
                overlays: Vec::default(),
                embedded: 0,
                fail_append: false,
            }
        }

        fn spans(&self) -> Vec<(usize, SpanLayout)> {
            self.overlays
                .iter()
                .flat_map(|(page, overlay)| {
                    overlay.contents.iter().filter_map(move |c| match c {
                        OverlayContents::Text(span) => Some((*page, span.clone())),
                        OverlayContents::Image(_) => None,
                    })
                })
                .collect()
        }

        fn images(&self) -> Vec<(usize, ImageLayout)> {
            self.overlays
                .iter()
                .flat_map(|(page, overlay)| {
                    overlay.contents.iter().filter_map(move |c| match c {
                        OverlayContents::Image(image) => Some((*page, image.clone())),
                        OverlayContents::Text(_) => None,
                    })
                })
                .collect()
        }
    }

    impl OverlayTarget for Recorder {
        fn page_count(&self) -> usize {
            self.heights.len()
        }

        fn page_height(&self, page_index: usize) -> Result<Pt> {
            self.heights
                .get(page_index)
                .copied()
                .ok_or(OverlayError::PageMissing(page_index))
        }

        fn embed_image(&mut self, _image: &StampImage) -> Result<ImageHandle> {
            self.embedded += 1;
            Ok(ImageHandle(self.embedded - 1))
        }

        fn append_overlay(&mut self, page_index: usize, overlay: &PageOverlay, _font: &Font) -> Result<()> {
            if self.fail_append {
                return Err(OverlayError::InvalidGeometry("refused".into()));
            }
            self.overlays.push((page_index, overlay.clone()));
            Ok(())
        }
    }

    fn values(pairs: &[(&str, Value)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn close(a: Pt, b: Pt) -> bool {
        (a.0 - b.0).abs() < 1e-3
    }

    /// A stamp image on disk, removed when dropped
    struct TempStamp(std::path::PathBuf);

    impl TempStamp {
        fn new(tag: &str) -> TempStamp {
            let path = std::env::temp_dir().join(format!(
                "pdf-overlay-{tag}-{}.png",
                std::process::id()
            ));
            DynamicImage::ImageRgb8(RgbImage::new(2, 2)).save(&path).unwrap();
            TempStamp(path)
        }

        fn locator(&self) -> String {
            self.0.to_string_lossy().into_owned()
        }
    }

    impl Drop for TempStamp {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).ok();
        }
    }

    #[test]
    fn no_regions_is_a_no_op() {
        let mut doc = Recorder::new(1);
        let report = render(&mut doc, &[], &ValueMap::new(), &RenderOptions::default());
        assert_eq!(report, RenderReport::default());
        assert!(doc.overlays.is_empty());
    }

    #[test]
    fn draws_text_without_width_at_default_size() {
        let mut doc = Recorder::new(1);
        let regions = [RegionDescriptor::text("name").at(100.0, 200.0).on_page(1)];
        let report = render(
            &mut doc,
            &regions,
            &values(&[("name", "test".into())]),
            &RenderOptions::default(),
        );

        assert!(report.is_clean());
        assert_eq!(report.texts_drawn, 1);
        let spans = doc.spans();
        assert_eq!(spans.len(), 1);
        let (page, span) = &spans[0];
        assert_eq!(*page, 0);
        assert_eq!(span.text, "test");
        assert_eq!(span.size, Pt(12.0));
        assert_eq!(span.coords.0, Pt(103.0));

        // middle of a 14.4pt line whose top is 200pt below the top of the page
        let font = Font::helvetica();
        let centre = Pt(842.0 - 200.0 - 7.2);
        let expected = centre - (font.ascent(Pt(12.0)) + font.descent(Pt(12.0))) / 2.0;
        assert!(close(span.coords.1, expected));
    }

    #[test]
    fn narrow_regions_truncate() {
        let mut doc = Recorder::new(1);
        let regions = [RegionDescriptor::text("name")
            .at(10.0, 10.0)
            .width(30.0)
            .on_page(1)];
        let long = "A very long value that cannot possibly fit";
        render(
            &mut doc,
            &regions,
            &values(&[("name", long.into())]),
            &RenderOptions::default(),
        );

        let (_, span) = &doc.spans()[0];
        assert_eq!(span.size, Pt(6.0));
        assert!(span.text.ends_with("..."));
        assert!(span.text.len() < long.len());
    }

    #[test]
    fn wide_characters_are_replaced() {
        let mut doc = Recorder::new(1);
        let regions = [RegionDescriptor::text("name").at(10.0, 10.0).on_page(1)];
        render(
            &mut doc,
            &regions,
            &values(&[("name", "名前 Zoë".into())]),
            &RenderOptions::default(),
        );
        assert_eq!(doc.spans()[0].1.text, "?? Zoë");
    }

    #[test]
    fn skips_and_reports() {
        let mut doc = Recorder::new(1);
        let regions = [
            RegionDescriptor::text("no-page").at(1.0, 1.0),
            RegionDescriptor::text("").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("far").at(1.0, 1.0).on_page(3),
            RegionDescriptor::text("empty").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("absent").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("ok").at(1.0, 1.0).on_page(1),
        ];
        let report = render(
            &mut doc,
            &regions,
            &values(&[("empty", "".into()), ("far", "x".into()), ("ok", "x".into())]),
            &RenderOptions::default(),
        );

        let kinds: Vec<(&str, &DiagnosticKind)> = report
            .diagnostics
            .iter()
            .map(|d| (d.region.as_str(), &d.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("no-page", &DiagnosticKind::MissingFields),
                ("", &DiagnosticKind::MissingFields),
                ("empty", &DiagnosticKind::EmptyValue),
                ("absent", &DiagnosticKind::EmptyValue),
                (
                    "far",
                    &DiagnosticKind::PageOutOfRange {
                        page: 3,
                        page_count: 1
                    }
                ),
            ]
        );
        assert_eq!(report.texts_drawn, 1);
        assert_eq!(doc.overlays.len(), 1);
    }

    #[test]
    fn pages_ascend_and_regions_keep_their_order() {
        let mut doc = Recorder::new(2);
        let regions = [
            RegionDescriptor::text("c").at(1.0, 1.0).on_page(2),
            RegionDescriptor::text("b").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("a").at(1.0, 1.0).on_page(1),
        ];
        render(
            &mut doc,
            &regions,
            &values(&[("a", "A".into()), ("b", "B".into()), ("c", "C".into())]),
            &RenderOptions::default(),
        );
        let order: Vec<(usize, String)> = doc
            .spans()
            .into_iter()
            .map(|(page, span)| (page, span.text))
            .collect();
        assert_eq!(
            order,
            vec![(0, "B".into()), (0, "A".into()), (1, "C".into())]
        );
        assert_eq!(doc.overlays.len(), 2);
    }

    #[test]
    fn numbers_and_booleans_in_text_regions() {
        let mut doc = Recorder::new(1);
        let regions = [
            RegionDescriptor::text("n").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("b").at(1.0, 1.0).on_page(1),
        ];
        render(
            &mut doc,
            &regions,
            &values(&[("n", Value::Number(123.0)), ("b", Value::Boolean(true))]),
            &RenderOptions::default(),
        );
        let texts: Vec<String> = doc.spans().into_iter().map(|(_, s)| s.text).collect();
        assert_eq!(texts, vec!["123".to_string(), "true".to_string()]);
    }

    #[test]
    fn top_alignment_hangs_from_the_region_top() {
        let mut doc = Recorder::new(1);
        let mut options = RenderOptions::default();
        options.padding(Pt(3.0), Pt(2.0));
        let regions = [RegionDescriptor::text("t")
            .at(0.0, 100.0)
            .size(200.0, 60.0)
            .align(VerticalAlign::Top)
            .on_page(1)];
        render(&mut doc, &regions, &values(&[("t", "x".into())]), &options);

        let expected = Pt(842.0 - 102.0) - Font::helvetica().ascent(Pt(12.0));
        assert!(close(doc.spans()[0].1.coords.1, expected));
    }

    #[test]
    fn scale_converts_input_units() {
        let mut doc = Recorder::new(1);
        let mut options = RenderOptions::default();
        options.scale(Some(2.0)).padding(Pt(0.0), Pt(0.0));
        let regions = [RegionDescriptor::checkbox("c")
            .at(200.0, 100.0)
            .size(40.0, 20.0)
            .on_page(1)];
        let stamp = TempStamp::new("scale");
        options.checkbox_image(stamp.locator());
        render(&mut doc, &regions, &values(&[("c", true.into())]), &options);

        let (_, image) = &doc.images()[0];
        assert_eq!(image.position.x1, Pt(100.0));
        assert_eq!(image.position.width(), Pt(20.0));
        assert_eq!(image.position.height(), Pt(10.0));
        assert_eq!(image.position.y1, Pt(842.0 - 50.0 - 10.0));
    }

    #[test]
    fn checkboxes_stamp_only_when_true() {
        let stamp = TempStamp::new("checkbox");
        let mut options = RenderOptions::default();
        options.checkbox_image(stamp.locator());

        let mut doc = Recorder::new(1);
        let regions = [
            RegionDescriptor::checkbox("yes").at(10.0, 10.0).on_page(1),
            RegionDescriptor::checkbox("no").at(10.0, 40.0).on_page(1),
            RegionDescriptor::checkbox("text").at(10.0, 70.0).on_page(1),
            RegionDescriptor::checkbox("also").at(10.0, 100.0).size(0.0, -5.0).on_page(1),
        ];
        let report = render(
            &mut doc,
            &regions,
            &values(&[
                ("yes", true.into()),
                ("no", false.into()),
                ("text", "true".into()),
                ("also", true.into()),
            ]),
            &options,
        );

        assert!(report.is_clean());
        assert_eq!(report.images_drawn, 2);
        assert_eq!(report.texts_drawn, 0);
        assert_eq!(doc.embedded, 1);
        let images = doc.images();
        assert_eq!(images.len(), 2);
        // no usable size: 16 x 16
        assert_eq!(images[0].1.position.width(), Pt(16.0));
        assert_eq!(images[1].1.position.height(), Pt(16.0));
        assert_eq!(images[0].1.position.y1, Pt(842.0 - 10.0 - 16.0));
    }

    #[test]
    fn unavailable_stamp_is_reported_once() {
        let mut options = RenderOptions::default();
        options.checkbox_image("resource:missing-stamp.png");
        options.resource_dir("no-such-resource-dir");

        let mut doc = Recorder::new(1);
        let regions = [
            RegionDescriptor::checkbox("a").at(1.0, 1.0).on_page(1),
            RegionDescriptor::checkbox("b").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("t").at(1.0, 1.0).on_page(1),
        ];
        let report = render(
            &mut doc,
            &regions,
            &values(&[("a", true.into()), ("b", true.into()), ("t", "still drawn".into())]),
            &options,
        );

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].region, "a");
        assert!(matches!(
            report.diagnostics[0].kind,
            DiagnosticKind::ImageUnavailable(_)
        ));
        assert_eq!(report.texts_drawn, 1);
        assert_eq!(doc.embedded, 0);
    }

    #[test]
    fn unchecked_boxes_never_load_the_stamp() {
        let mut options = RenderOptions::default();
        options.checkbox_image("resource:missing-stamp.png");
        let mut doc = Recorder::new(1);
        let regions = [RegionDescriptor::checkbox("a").at(1.0, 1.0).on_page(1)];
        let report = render(&mut doc, &regions, &values(&[("a", false.into())]), &options);
        assert!(report.is_clean());
        assert!(doc.overlays.is_empty());
    }

    #[test]
    fn bad_geometry_fails_only_its_region() {
        let mut doc = Recorder::new(1);
        let regions = [
            RegionDescriptor::text("bad").at(f32::NAN, 1.0).on_page(1),
            RegionDescriptor::text("good").at(1.0, 1.0).on_page(1),
        ];
        let report = render(
            &mut doc,
            &regions,
            &values(&[("bad", "x".into()), ("good", "y".into())]),
            &RenderOptions::default(),
        );
        assert_eq!(report.texts_drawn, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(report.diagnostics[0].kind, DiagnosticKind::DrawFailed(_)));
        assert_eq!(doc.spans()[0].1.text, "y");
    }

    #[test]
    fn failed_appends_are_reported_per_region() {
        let mut doc = Recorder::new(1);
        doc.fail_append = true;
        let regions = [
            RegionDescriptor::text("a").at(1.0, 1.0).on_page(1),
            RegionDescriptor::text("b").at(1.0, 1.0).on_page(1),
        ];
        let report = render(
            &mut doc,
            &regions,
            &values(&[("a", "x".into()), ("b", "y".into())]),
            &RenderOptions::default(),
        );
        assert_eq!(report.texts_drawn, 0);
        assert_eq!(report.diagnostics.len(), 2);
    }
}
