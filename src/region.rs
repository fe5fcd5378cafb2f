use crate::units::Px;

/// What a region represents, which decides how its value is drawn
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum RegionKind {
    /// The value is stringified and drawn as a single line of text
    #[default]
    Text,
    /// A `true` value is drawn as a stamp image, anything else draws nothing
    Checkbox,
}

impl RegionKind {
    /// Parse a kind name case-insensitively. `checkbox` and `boolean` are checkboxes,
    /// everything else (including no name at all) is text.
    pub fn parse(kind: Option<&str>) -> RegionKind {
        match kind.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("checkbox") | Some("boolean") => RegionKind::Checkbox,
            _ => RegionKind::Text,
        }
    }
}

/// Where a line of text sits vertically inside its region
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum VerticalAlign {
    /// The top of the text is placed `padding_y` below the top edge of the region
    Top,
    /// The visual centre of the text is placed at the centre of the region
    #[default]
    Middle,
}

impl VerticalAlign {
    /// Parse an alignment name case-insensitively; anything but `top` is [VerticalAlign::Middle]
    pub fn parse(align: Option<&str>) -> VerticalAlign {
        match align.map(|a| a.trim().to_ascii_lowercase()).as_deref() {
            Some("top") => VerticalAlign::Top,
            _ => VerticalAlign::Middle,
        }
    }
}

/// A named rectangle on a page that a value is placed into.
///
/// Coordinates are in input space: origin at the top-left of the page, y growing
/// downwards. A region without a name, `x`, `y` or `page` cannot be placed and is
/// skipped when rendering.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RegionDescriptor {
    /// Key into the value map
    pub name: String,
    pub kind: RegionKind,
    pub x: Option<Px>,
    pub y: Option<Px>,
    pub width: Option<Px>,
    pub height: Option<Px>,
    /// 1-based page number
    pub page: Option<u32>,
    pub vertical_align: VerticalAlign,
}

impl RegionDescriptor {
    /// Create a text region with no geometry
    pub fn text<S: ToString>(name: S) -> RegionDescriptor {
        RegionDescriptor {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Create a checkbox region with no geometry
    pub fn checkbox<S: ToString>(name: S) -> RegionDescriptor {
        RegionDescriptor {
            name: name.to_string(),
            kind: RegionKind::Checkbox,
            ..Default::default()
        }
    }

    /// Set the top-left corner of the region, modifying `self`
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = Some(Px(x));
        self.y = Some(Px(y));
        self
    }

    /// Set the size of the region, modifying `self`
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(Px(width));
        self.height = Some(Px(height));
        self
    }

    /// Set only the width of the region, modifying `self`
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(Px(width));
        self
    }

    /// Set the 1-based page number of the region, modifying `self`
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the vertical alignment of the region's text, modifying `self`
    pub fn align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }

    /// The region's anchor and page, or [None] if any of the required fields is missing
    pub(crate) fn placement(&self) -> Option<(Px, Px, u32)> {
        if self.name.is_empty() {
            return None;
        }
        match (self.x, self.y, self.page) {
            (Some(x), Some(y), Some(page)) if page >= 1 => Some((x, y, page)),
            _ => None,
        }
    }
}
