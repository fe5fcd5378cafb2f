//! Draw field values onto an existing PDF.
//!
//! A template PDF is paired with a list of named regions (usually read from a JSON
//! definition file) and a map of values. Every value is drawn into its region as a
//! single line of text, shrunk and if need be truncated to fit, or, for checkbox
//! regions, as a stamp image. The template's own content is left untouched.
//!
//! ```no_run
//! use pdf_overlay::{fill_template, FieldsDefinition, Value, ValueMap};
//!
//! # fn main() -> pdf_overlay::Result<()> {
//! let template = std::fs::read("form.pdf")?;
//! let definition = FieldsDefinition::from_slice(&std::fs::read("form.json")?)?;
//!
//! let mut values = ValueMap::new();
//! values.insert("Surname".into(), Value::from("Smith"));
//! values.insert("Over 18".into(), Value::from(true));
//!
//! let filled = fill_template(&template, &definition, &values, Some("resource:checked-symbol.png"))?;
//! std::fs::write("filled.pdf", &filled.bytes)?;
//! # Ok(())
//! # }
//! ```

mod colour;
pub use colour::*;

mod content;

mod definition;
pub use definition::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to fit and place text in regions
pub mod layout;

pub mod mock;

pub mod normalize;

mod options;
pub use options::*;

mod overlay;
pub use overlay::*;

mod page;
pub use page::*;

mod rect;
pub use rect::*;

mod region;
pub use region::*;

mod units;
pub use units::*;

mod value;
pub use value::*;

mod error;
pub use error::*;

/// Re-export lopdf, for callers that want to work on [TemplateDocument::into_inner]
pub use lopdf;

/// A template with values drawn onto it
#[derive(Debug, Clone, PartialEq)]
pub struct FilledDocument {
    /// The saved PDF
    pub bytes: Vec<u8>,
    /// Number of pages in the template
    pub template_pages: usize,
    /// Number of fields in the definition
    pub definition_fields: usize,
    pub report: RenderReport,
}

/// Load a template, draw `values` into the fields of `definition` and save the result.
///
/// Render options come from the definition, with `default_checkbox_image` used when the
/// definition names no checkbox image. Only an unusable template is an error: fields that
/// cannot be drawn are skipped and listed in [FilledDocument::report].
pub fn fill_template(
    template: &[u8],
    definition: &FieldsDefinition,
    values: &ValueMap,
    default_checkbox_image: Option<&str>,
) -> Result<FilledDocument> {
    let options = RenderOptions::from_definition(definition, default_checkbox_image);
    fill_template_with(template, definition, values, &options)
}

/// Like [fill_template], with the render options given by the caller. Unless the
/// `flatten_form` option is off, the template's interactive form is flattened
/// first; a failure to flatten is logged and the values are drawn anyway.
pub fn fill_template_with(
    template: &[u8],
    definition: &FieldsDefinition,
    values: &ValueMap,
    options: &RenderOptions,
) -> Result<FilledDocument> {
    let mut doc = TemplateDocument::load(template)?;
    if options.flatten_form {
        if let Err(e) = doc.flatten_form() {
            log::warn!("could not flatten the template's form, drawing over it anyway: {}", e);
        }
    }

    let regions = definition.regions();
    let report = render(&mut doc, &regions, values, options);
    if !report.is_clean() {
        log::debug!(
            "{} of {} field(s) were not drawn",
            report.diagnostics.len(),
            regions.len()
        );
    }

    Ok(FilledDocument {
        bytes: doc.save()?,
        template_pages: doc.page_count(),
        definition_fields: regions.len(),
        report,
    })
}
