use crate::error::Result;
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Text written as the `/Producer` of every filled document
pub const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// Document metadata written into the output's Info dictionary. Entries the template
/// already has are kept unless they are set here.
#[derive(Default, Debug, Clone)]
pub struct Info {
    /// The title of the document.
    pub title: Option<String>,
    /// The author(s) of the document. No prescribed format.
    pub author: Option<String>,
    /// The subject of the document.
    pub subject: Option<String>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    /// Set the title of the info block, modifying `self`
    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the author of the info block, modifying `self`
    pub fn author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    /// Set the subject of the info block, modifying `self`
    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Write the metadata, plus `/Producer` and a `/ModDate` of now, into the document's
    /// Info dictionary, creating one if the document has none
    pub(crate) fn stamp(&self, doc: &mut Document) -> Result<()> {
        let existing = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .ok()
            .filter(|id| matches!(doc.get_object(*id), Ok(Object::Dictionary(_))));

        let info_id = match existing {
            Some(id) => id,
            None => {
                let id = doc.add_object(Object::Dictionary(Dictionary::new()));
                doc.trailer.set("Info", Object::Reference(id));
                id
            }
        };

        let info = doc.get_object_mut(info_id)?.as_dict_mut()?;
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        if let Some(author) = &self.author {
            info.set("Author", text_string(author));
        }
        if let Some(subject) = &self.subject {
            info.set("Subject", text_string(subject));
        }
        info.set("Producer", text_string(PRODUCER));
        info.set("ModDate", Object::string_literal(pdf_date_now()));
        Ok(())
    }
}

/// A PDF text string: plain bytes for ASCII, UTF-16BE with a byte order mark otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xfe, 0xff];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// The current local time as a PDF date, `D:YYYYMMDDHHmmSS+HH'mm'`
fn pdf_date_now() -> String {
    use chrono::prelude::*;
    let now = Local::now();
    let offset = now.offset().fix().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset_hours = offset.abs() / (60 * 60);
    let offset_minutes = (offset.abs() - offset_hours * (60 * 60)) / 60;
    format!(
        "D:{}{sign}{offset_hours:02}'{offset_minutes:02}'",
        now.format("%Y%m%d%H%M%S")
    )
}
