use crate::colour::{colours, Colour};
use crate::definition::FieldsDefinition;
use crate::font::Font;
use crate::normalize::Scale;
use crate::units::Pt;
use std::path::PathBuf;

/// Font size used when neither the caller nor the definition sets one
pub const DEFAULT_FONT_SIZE: Pt = Pt(12.0);
/// Smallest size shrink-to-fit will go to before truncating
pub const DEFAULT_MIN_FONT_SIZE: Pt = Pt(6.0);
/// Largest font size a definition may ask for; bigger sizes are clamped to it
pub const MAX_FONT_SIZE: Pt = Pt(1000.0);
pub const DEFAULT_PADDING_X: Pt = Pt(3.0);
pub const DEFAULT_PADDING_Y: Pt = Pt(0.0);
/// Height of a text region without an explicit height, as a multiple of the font size
pub const DEFAULT_LINE_HEIGHT_FACTOR: f32 = 1.2;
/// Width and height of a checkbox stamp when the region gives none
pub const DEFAULT_STAMP_SIZE: Pt = Pt(16.0);
/// Directory `resource:` image locators are resolved against
pub const DEFAULT_RESOURCE_DIR: &str = "resources";

/// Everything that controls how values are drawn, resolved once per render call
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Converts region geometry from input units into points
    pub scale: Scale,
    /// Locator of the image stamped into checked checkboxes; [None] disables stamping
    pub checkbox_image: Option<String>,
    pub font: Font,
    pub font_size: Pt,
    pub min_font_size: Pt,
    pub font_colour: Colour,
    pub padding_x: Pt,
    pub padding_y: Pt,
    pub resource_dir: PathBuf,
    /// Draw the template's form widgets into the page and drop the interactive form
    /// before filling, so widget backgrounds cannot hide the drawn values
    pub flatten_form: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            scale: Scale::IDENTITY,
            checkbox_image: None,
            font: Font::helvetica(),
            font_size: DEFAULT_FONT_SIZE,
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            font_colour: colours::BLACK,
            padding_x: DEFAULT_PADDING_X,
            padding_y: DEFAULT_PADDING_Y,
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            flatten_form: true,
        }
    }
}

impl RenderOptions {
    /// Create options with every value set to its default
    pub fn new() -> RenderOptions {
        RenderOptions::default()
    }

    /// Resolve options from a definition file. Values the definition leaves out, or sets
    /// to something unusable (a non-positive scale or font size, a negative padding, an
    /// unparseable colour), fall back to the defaults. Font sizes above [MAX_FONT_SIZE]
    /// are clamped to it. A blank checkbox image falls back
    /// to `default_checkbox_image`.
    pub fn from_definition(
        def: &FieldsDefinition,
        default_checkbox_image: Option<&str>,
    ) -> RenderOptions {
        let checkbox_image = def
            .checkbox_checked_image
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or(default_checkbox_image)
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string);

        RenderOptions {
            scale: Scale::resolve(def.scale),
            checkbox_image,
            font_size: def
                .font_size
                .filter(|s| *s > 0.0 && s.is_finite())
                .map(|s| Pt(s.min(f64::from(MAX_FONT_SIZE.0)) as f32))
                .unwrap_or(DEFAULT_FONT_SIZE),
            font_colour: Colour::from_hex_or_black(def.font_color.as_deref()),
            padding_x: def
                .padding_x
                .filter(|p| *p >= 0.0)
                .map(|p| Pt(p as f32))
                .unwrap_or(DEFAULT_PADDING_X),
            padding_y: def
                .padding_y
                .filter(|p| *p >= 0.0)
                .map(|p| Pt(p as f32))
                .unwrap_or(DEFAULT_PADDING_Y),
            ..Default::default()
        }
    }

    /// Set the input scale, modifying `self`
    pub fn scale(&mut self, scale: Option<f64>) -> &mut Self {
        self.scale = Scale::resolve(scale);
        self
    }

    /// Set the checkbox stamp image locator, modifying `self`
    pub fn checkbox_image<S: ToString>(&mut self, locator: S) -> &mut Self {
        self.checkbox_image = Some(locator.to_string());
        self
    }

    /// Set the font, modifying `self`
    pub fn font(&mut self, font: Font) -> &mut Self {
        self.font = font;
        self
    }

    /// Set the default and minimum font sizes, modifying `self`
    pub fn font_sizes(&mut self, size: Pt, min_size: Pt) -> &mut Self {
        self.font_size = size;
        self.min_font_size = min_size;
        self
    }

    /// Set the text colour, modifying `self`
    pub fn font_colour(&mut self, colour: Colour) -> &mut Self {
        self.font_colour = colour;
        self
    }

    /// Set the horizontal and vertical padding, modifying `self`
    pub fn padding(&mut self, padding_x: Pt, padding_y: Pt) -> &mut Self {
        self.padding_x = padding_x;
        self.padding_y = padding_y;
        self
    }

    /// Set whether the template's form is flattened before filling, modifying `self`
    pub fn flatten_form(&mut self, flatten: bool) -> &mut Self {
        self.flatten_form = flatten;
        self
    }

    /// Set the directory `resource:` locators resolve against, modifying `self`
    pub fn resource_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.resource_dir = dir.into();
        self
    }
}
