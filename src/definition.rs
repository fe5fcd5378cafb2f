//! The definition file: a JSON document describing the regions of a template and,
//! optionally, how to draw into them.
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "Surname", "type": "string", "x": 100, "y": 200,
//!       "width": 120, "height": 22, "page": 1 }
//!   ],
//!   "scale": 1.5,
//!   "checkboxCheckedImage": "resource:checked-symbol.png",
//!   "fontSize": 10,
//!   "fontColor": "#1a1a1a",
//!   "paddingX": 2
//! }
//! ```
//!
//! Coordinates may be written as integers or fractions; they are always read as
//! floating point.

use crate::error::Result;
use crate::region::{RegionDescriptor, RegionKind, VerticalAlign};
use crate::units::Px;
use serde::Deserialize;

/// One entry in the `fields` list of a definition file
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: Option<String>,
    /// Field type: `string`, `number`, `date`, `checkbox`, `boolean`, ...
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// 1-based page number
    pub page: Option<i64>,
    pub vertical_align: Option<String>,
}

impl FieldDefinition {
    /// Convert into a region. Missing or out of range values stay absent so the renderer
    /// can skip the region instead of failing.
    pub fn to_region(&self) -> RegionDescriptor {
        RegionDescriptor {
            name: self.name.clone().unwrap_or_default(),
            kind: RegionKind::parse(self.kind.as_deref()),
            x: self.x.map(Px::from),
            y: self.y.map(Px::from),
            width: self.width.map(Px::from),
            height: self.height.map(Px::from),
            page: self
                .page
                .and_then(|p| u32::try_from(p).ok())
                .filter(|p| *p >= 1),
            vertical_align: VerticalAlign::parse(self.vertical_align.as_deref()),
        }
    }
}

/// Root of a definition file
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsDefinition {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Input pixels per PDF point, for definitions authored against a scaled preview
    pub scale: Option<f64>,
    /// Locator of the image stamped into checked checkboxes
    #[serde(alias = "checkboxSymbol")]
    pub checkbox_checked_image: Option<String>,
    pub font_size: Option<f64>,
    /// `#RRGGBB` or `#RGB`
    pub font_color: Option<String>,
    pub padding_x: Option<f64>,
    pub padding_y: Option<f64>,
}

impl FieldsDefinition {
    /// A definition with only fields, leaving every render option to its default
    pub fn new(fields: Vec<FieldDefinition>) -> FieldsDefinition {
        FieldsDefinition {
            fields,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<FieldsDefinition> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_slice(json: &[u8]) -> Result<FieldsDefinition> {
        Ok(serde_json::from_slice(json)?)
    }

    /// All fields converted into regions, in definition order
    pub fn regions(&self) -> Vec<RegionDescriptor> {
        self.fields.iter().map(FieldDefinition::to_region).collect()
    }
}
