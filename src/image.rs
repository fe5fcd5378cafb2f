use crate::error::{OverlayError, Result};
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use std::path::{Path, PathBuf};

/// Prefix of locators that name a bundled resource rather than a filesystem path
pub const RESOURCE_PREFIX: &str = "resource:";

enum ImageSource {
    /// Baseline RGB JPEG data, which PDF readers can decode themselves
    DirectlyEmbeddableJpeg(Vec<u8>),
    Decoded(DynamicImage),
}

/// The image stamped into checked checkbox regions
pub struct StampImage {
    source: ImageSource,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for StampImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.source {
            ImageSource::DirectlyEmbeddableJpeg(_) => "jpeg",
            ImageSource::Decoded(_) => "decoded",
        };
        f.debug_struct("StampImage")
            .field("source", &kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Filter the encoded image data has to be read back with
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ImageFilter {
    Flate,
    Dct,
}

impl ImageFilter {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ImageFilter::Flate => "FlateDecode",
            ImageFilter::Dct => "DCTDecode",
        }
    }
}

/// Image data ready to be written as an image XObject
pub(crate) struct EncodedImage {
    pub filter: ImageFilter,
    /// 8 bit DeviceRGB samples
    pub bytes: Vec<u8>,
    /// Flate compressed 8 bit DeviceGray alpha samples, if the image has transparency
    pub mask: Option<Vec<u8>>,
}

/// Resolve an image locator to a path. `resource:<name>` is looked up in
/// `resource_dir`; anything else is taken as a path as is.
pub fn resolve_locator<P: AsRef<Path>>(locator: &str, resource_dir: P) -> PathBuf {
    match locator.strip_prefix(RESOURCE_PREFIX) {
        Some(name) => resource_dir.as_ref().join(name.trim_start_matches('/')),
        None => PathBuf::from(locator),
    }
}

impl StampImage {
    /// Load and decode the image a locator points at. Fails with
    /// [OverlayError::ResourceNotFound] if there is no file there.
    pub fn load<P: AsRef<Path>>(locator: &str, resource_dir: P) -> Result<StampImage> {
        let path = resolve_locator(locator, resource_dir);
        if !path.is_file() {
            return Err(OverlayError::ResourceNotFound(locator.to_string()));
        }
        let data = std::fs::read(&path)?;
        StampImage::from_bytes(data)
    }

    /// Decode an image from its file contents, guessing the format
    pub fn from_bytes(data: Vec<u8>) -> Result<StampImage> {
        let format = image::guess_format(&data)?;
        let image = image::load_from_memory_with_format(&data, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Ok(StampImage {
                width: image.width(),
                height: image.height(),
                source: ImageSource::DirectlyEmbeddableJpeg(data),
            }),
            _ => Ok(StampImage::new(image)),
        }
    }

    pub fn new(image: DynamicImage) -> StampImage {
        StampImage {
            width: image.width(),
            height: image.height(),
            source: ImageSource::Decoded(image),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn encode(&self) -> EncodedImage {
        match &self.source {
            ImageSource::DirectlyEmbeddableJpeg(data) => EncodedImage {
                filter: ImageFilter::Dct,
                bytes: data.clone(),
                mask: None,
            },
            ImageSource::Decoded(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.pixels().map(|p| (p.2).0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodedImage {
                    filter: ImageFilter::Flate,
                    bytes,
                    mask,
                }
            }
        }
    }
}
