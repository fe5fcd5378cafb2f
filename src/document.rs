use crate::content::ResourceNames;
use crate::error::{OverlayError, Result};
use crate::font::Font;
use crate::image::StampImage;
use crate::info::Info;
use crate::page::{OverlayContents, PageOverlay};
use crate::units::Pt;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Content, Name};
use std::collections::HashMap;

/// Height of a page whose MediaBox is missing or unusable (US Letter)
pub const FALLBACK_PAGE_HEIGHT: Pt = Pt(792.0);

// Bound on Parent links followed when looking up inherited page attributes, so a
// cyclic page tree cannot hang the lookup
const MAX_INHERITANCE_DEPTH: usize = 32;

// annotation flag bit 2
const ANNOT_FLAG_HIDDEN: i64 = 1 << 1;

/// Refers to an image embedded with [OverlayTarget::embed_image]. Valid on every page
/// of the document that issued it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub usize);

/// A document overlays can be drawn onto. Pages are addressed by 0-based index.
pub trait OverlayTarget {
    fn page_count(&self) -> usize;

    /// Height of the page in points
    fn page_height(&self, page_index: usize) -> Result<Pt>;

    /// Add an image to the document once, returning a handle any page can draw it with
    fn embed_image(&mut self, image: &StampImage) -> Result<ImageHandle>;

    /// Append the recorded paint commands to a page, on top of its existing content
    fn append_overlay(&mut self, page_index: usize, overlay: &PageOverlay, font: &Font) -> Result<()>;
}

/// An existing PDF, loaded into memory, that overlays are drawn onto
pub struct TemplateDocument {
    doc: Document,
    pages: Vec<ObjectId>,
    images: Vec<ObjectId>,
    fonts: HashMap<String, ObjectId>,
    info: Info,
}

impl std::fmt::Debug for TemplateDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateDocument")
            .field("pages", &self.pages.len())
            .field("images", &self.images.len())
            .field("info", &self.info)
            .finish()
    }
}

impl TemplateDocument {
    /// Parse a template. Fails if the bytes are not a PDF, the PDF is encrypted or it
    /// has no pages.
    pub fn load(bytes: &[u8]) -> Result<TemplateDocument> {
        let doc = Document::load_mem(bytes).map_err(|e| OverlayError::DocumentFormat(e.to_string()))?;
        TemplateDocument::from_document(doc)
    }

    /// Wrap an already parsed document
    pub fn from_document(doc: Document) -> Result<TemplateDocument> {
        if doc.trailer.has(b"Encrypt") {
            return Err(OverlayError::Encrypted);
        }
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(OverlayError::NoPages);
        }
        log::debug!("loaded template with {} page(s)", pages.len());

        Ok(TemplateDocument {
            doc,
            pages,
            images: Vec::default(),
            fonts: HashMap::default(),
            info: Info::default(),
        })
    }

    /// Sets the metadata written when saving. `/Producer` and `/ModDate` are always written
    pub fn set_info(&mut self, info: Info) {
        self.info = info;
    }

    pub fn inner(&self) -> &Document {
        &self.doc
    }

    pub fn into_inner(self) -> Document {
        self.doc
    }

    /// Serialise the document, including every overlay appended so far
    pub fn save(&mut self) -> Result<Vec<u8>> {
        self.info.stamp(&mut self.doc)?;
        let mut out: Vec<u8> = Vec::default();
        self.doc.save_to(&mut out)?;
        Ok(out)
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.pages
            .get(page_index)
            .copied()
            .ok_or(OverlayError::PageMissing(page_index))
    }

    /// Follow a reference, if `obj` is one
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Look up a page attribute, walking up the page tree for inheritable ones
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(self.resolve(value));
            }
            let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        self.numbers(self.inherited(page_id, b"MediaBox")?)
    }

    /// Read an array of exactly `N` numbers, such as a rectangle or a matrix
    fn numbers<const N: usize>(&self, obj: &Object) -> Option<[f32; N]> {
        let arr = self.resolve(obj).as_array().ok()?;
        if arr.len() != N {
            return None;
        }
        let mut values = [0f32; N];
        for (value, obj) in values.iter_mut().zip(arr.iter()) {
            *value = self.resolve(obj).as_float().ok()?;
        }
        Some(values)
    }

    /// The page's resource dictionary, resolved and copied so it can be extended and
    /// written back onto the page itself
    fn page_resources(&self, page_id: ObjectId) -> Dictionary {
        self.inherited(page_id, b"Resources")
            .and_then(|r| r.as_dict().ok())
            .cloned()
            .unwrap_or_default()
    }

    fn sub_dictionary(&self, resources: &Dictionary, key: &[u8]) -> Dictionary {
        resources
            .get(key)
            .ok()
            .and_then(|d| self.resolve(d).as_dict().ok())
            .cloned()
            .unwrap_or_default()
    }

    /// Append a Flate-compressed content stream to a page and replace its resources.
    /// Whatever the page drew before is wrapped in `q .. Q` first, so graphics state it
    /// leaves behind does not apply to the new content.
    fn append_content(&mut self, page_id: ObjectId, resources: Dictionary, content: Vec<u8>) -> Result<()> {
        let existing = self.doc.get_dictionary(page_id)?.get(b"Contents").ok().cloned();
        let mut contents: Vec<Object> = match existing {
            Some(Object::Reference(id)) => match self.doc.get_object(id) {
                Ok(Object::Array(arr)) => arr.clone(),
                _ => vec![Object::Reference(id)],
            },
            Some(Object::Array(arr)) => arr,
            _ => Vec::default(),
        };

        let mut rendered: Vec<u8> = Vec::default();
        if !contents.is_empty() {
            let save_id = self
                .doc
                .add_object(Object::Stream(Stream::new(Dictionary::new(), b"q\n".to_vec())));
            contents.insert(0, Object::Reference(save_id));
            rendered.extend_from_slice(b"\nQ\n");
        }
        rendered.extend(content);

        let compressed = compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
        let content_id = self.doc.add_object(Object::Stream(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            compressed,
        )));
        contents.push(Object::Reference(content_id));

        let page = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Array(contents));
        Ok(())
    }

    fn catalog_id(&self) -> Result<ObjectId> {
        Ok(self.doc.trailer.get(b"Root").and_then(Object::as_reference)?)
    }

    /// Draw the normal appearance of every form widget into its page and remove the
    /// interactive form, leaving other annotations alone. Hidden widgets and widgets
    /// without an appearance are removed without drawing anything. Templates without
    /// an `/AcroForm` are not touched. Returns the number of widgets drawn.
    pub fn flatten_form(&mut self) -> Result<usize> {
        let catalog_id = self.catalog_id()?;
        if !self.doc.get_dictionary(catalog_id)?.has(b"AcroForm") {
            return Ok(0);
        }

        let mut drawn = 0;
        for page_id in self.pages.clone() {
            drawn += self.flatten_page(page_id)?;
        }

        self.doc
            .get_object_mut(catalog_id)?
            .as_dict_mut()?
            .remove(b"AcroForm");
        Ok(drawn)
    }

    fn flatten_page(&mut self, page_id: ObjectId) -> Result<usize> {
        let annots: Vec<Object> = match self.doc.get_dictionary(page_id)?.get(b"Annots") {
            Ok(annots) => self.resolve(annots).as_array().cloned().unwrap_or_default(),
            Err(_) => return Ok(0),
        };

        let mut kept: Vec<Object> = Vec::default();
        let mut widgets: Vec<(ObjectId, [f32; 6])> = Vec::default();
        for annot in annots.iter() {
            let appearance = match self.resolve(annot).as_dict() {
                Ok(dict) if is_widget(dict) => Some(self.widget_appearance(dict)),
                _ => None,
            };
            match appearance {
                None => kept.push(annot.clone()),
                Some(Some(placed)) => widgets.push(placed),
                Some(None) => {}
            }
        }
        if kept.len() == annots.len() {
            return Ok(0);
        }

        for (id, _) in widgets.iter() {
            if let Ok(stream) = self.doc.get_object_mut(*id).and_then(|o| o.as_stream_mut()) {
                stream.dict.set("Type", "XObject");
                stream.dict.set("Subtype", "Form");
            }
        }

        let page = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
        if kept.is_empty() {
            page.remove(b"Annots");
        } else {
            page.set("Annots", Object::Array(kept));
        }
        if widgets.is_empty() {
            return Ok(0);
        }

        let mut resources = self.page_resources(page_id);
        let mut xobjects = self.sub_dictionary(&resources, b"XObject");
        let mut content = Content::new();
        for (id, matrix) in widgets.iter() {
            let name = unique_name(&xobjects, "OvFm");
            xobjects.set(name.clone(), Object::Reference(*id));
            content.save_state();
            content.transform(*matrix);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();
        }
        resources.set("XObject", Object::Dictionary(xobjects));
        self.append_content(page_id, resources, content.finish())?;

        log::debug!("flattened {} form widget(s)", widgets.len());
        Ok(widgets.len())
    }

    /// The normal appearance stream of a visible widget, and the matrix that maps its
    /// bounding box onto the widget's `/Rect`
    fn widget_appearance(&self, annot: &Dictionary) -> Option<(ObjectId, [f32; 6])> {
        let flags = annot.get(b"F").and_then(Object::as_i64).unwrap_or(0);
        if flags & ANNOT_FLAG_HIDDEN != 0 {
            return None;
        }

        let ap = self.resolve(annot.get(b"AP").ok()?).as_dict().ok()?;
        let normal = ap.get(b"N").ok()?;
        let id = match normal {
            Object::Reference(id) => match self.doc.get_object(*id).ok()? {
                Object::Stream(_) => *id,
                Object::Dictionary(states) => appearance_state(annot, states)?,
                _ => return None,
            },
            Object::Dictionary(states) => appearance_state(annot, states)?,
            _ => return None,
        };

        let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
        let [bx1, by1, bx2, by2] = self.numbers::<4>(stream.dict.get(b"BBox").ok()?)?;
        let [a, b, c, d, e, f] = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| self.numbers::<6>(m))
            .unwrap_or([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let [rx1, ry1, rx2, ry2] = self.numbers::<4>(annot.get(b"Rect").ok()?)?;

        // bounding box of the appearance after its own matrix
        let corners = [(bx1, by1), (bx2, by1), (bx1, by2), (bx2, by2)]
            .map(|(x, y)| (a * x + c * y + e, b * x + d * y + f));
        let (mut tx1, mut ty1) = corners[0];
        let (mut tx2, mut ty2) = corners[0];
        for (x, y) in corners.iter().copied() {
            tx1 = tx1.min(x);
            ty1 = ty1.min(y);
            tx2 = tx2.max(x);
            ty2 = ty2.max(y);
        }
        if tx2 - tx1 <= 0.0 || ty2 - ty1 <= 0.0 {
            return None;
        }

        let (left, bottom) = (rx1.min(rx2), ry1.min(ry2));
        let sx = (rx2 - rx1).abs() / (tx2 - tx1);
        let sy = (ry2 - ry1).abs() / (ty2 - ty1);
        Some((id, [sx, 0.0, 0.0, sy, left - tx1 * sx, bottom - ty1 * sy]))
    }

    fn font_id(&mut self, font: &Font) -> ObjectId {
        if let Some(id) = self.fonts.get(font.base_font()) {
            return *id;
        }
        let id = self.doc.add_object(Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }));
        self.fonts.insert(font.base_font().to_string(), id);
        id
    }
}

fn is_widget(annot: &Dictionary) -> bool {
    annot
        .get(b"Subtype")
        .and_then(Object::as_name)
        .map(|name| name == b"Widget")
        .unwrap_or(false)
}

/// Pick the appearance for the widget's current state (`/AS`) out of a state dictionary
fn appearance_state(annot: &Dictionary, states: &Dictionary) -> Option<ObjectId> {
    let state = annot.get(b"AS").and_then(Object::as_name).ok()?;
    states.get(state).and_then(Object::as_reference).ok()
}

/// First name `<prefix><n>` not already used in a resource sub-dictionary
fn unique_name(dict: &Dictionary, prefix: &str) -> String {
    let mut i = 1usize;
    loop {
        let name = format!("{prefix}{i}");
        if !dict.has(name.as_bytes()) {
            return name;
        }
        i += 1;
    }
}

impl OverlayTarget for TemplateDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_height(&self, page_index: usize) -> Result<Pt> {
        let page_id = self.page_id(page_index)?;
        let height = self
            .media_box(page_id)
            .map(|b| Pt((b[3] - b[1]).abs()))
            .filter(|h| h.0 > 0.0 && h.0.is_finite());
        if height.is_none() {
            log::debug!("page {} has no usable MediaBox, assuming Letter", page_index + 1);
        }
        Ok(height.unwrap_or(FALLBACK_PAGE_HEIGHT))
    }

    fn embed_image(&mut self, image: &StampImage) -> Result<ImageHandle> {
        let encoded = image.encode();
        let width = i64::from(image.width());
        let height = i64::from(image.height());

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
            "Filter" => encoded.filter.name(),
        };

        // add a transparency mask if we have one
        if let Some(mask) = encoded.mask {
            let s_mask = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
                "Filter" => "FlateDecode",
            };
            let mask_id = self.doc.add_object(Object::Stream(Stream::new(s_mask, mask)));
            dict.set("SMask", Object::Reference(mask_id));
        }

        let id = self
            .doc
            .add_object(Object::Stream(Stream::new(dict, encoded.bytes)));
        self.images.push(id);
        Ok(ImageHandle(self.images.len() - 1))
    }

    fn append_overlay(&mut self, page_index: usize, overlay: &PageOverlay, font: &Font) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        if overlay.is_empty() {
            return Ok(());
        }

        let mut resources = self.page_resources(page_id);
        let mut fonts = self.sub_dictionary(&resources, b"Font");
        let mut xobjects = self.sub_dictionary(&resources, b"XObject");

        let mut names = ResourceNames {
            font: unique_name(&fonts, "OvF"),
            images: HashMap::default(),
        };
        let font_id = self.font_id(font);
        fonts.set(names.font.clone(), Object::Reference(font_id));

        for contents in overlay.contents.iter() {
            let OverlayContents::Image(layout) = contents else {
                continue;
            };
            if names.images.contains_key(&layout.image) {
                continue;
            }
            let image_id = *self.images.get(layout.image.0).ok_or_else(|| {
                OverlayError::ResourceNotFound(format!("image handle {}", layout.image.0))
            })?;
            let name = unique_name(&xobjects, "OvIm");
            xobjects.set(name.clone(), Object::Reference(image_id));
            names.images.insert(layout.image, name);
        }

        resources.set("Font", Object::Dictionary(fonts));
        if !names.images.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        self.append_content(page_id, resources, overlay.render(font, &names))?;

        log::debug!(
            "appended {} paint command(s) to page {}",
            overlay.contents.len(),
            page_index + 1
        );
        Ok(())
    }
}
