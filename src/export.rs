// Turns the raster into a portable image: PNG bytes, then a base64 data URI.
// PNG is lossless and deterministic, so identical ink gives identical bytes.

use crate::error::{Error, Result};
use crate::raster::Raster;
use base64::{Engine, prelude::BASE64_STANDARD};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub const PNG_MIME: &str = "image/png";

/// Encode the whole raster as PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    encode_rgba_png(&raster.to_rgba_image())
}

pub fn encode_rgba_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| Error::Encode(format!("png: {e}")))?;
    Ok(bytes.into_inner())
}

pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// PNG-encode the raster and wrap it as `data:image/png;base64,...`.
pub fn png_data_uri(raster: &Raster) -> Result<String> {
    Ok(to_data_uri(&encode_png(raster)?, PNG_MIME))
}

/// A parsed `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parse `data:<mime>;base64,<payload>`. Only base64 payloads are accepted.
pub fn decode_data_uri(uri: &str) -> Result<DataUri> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::Decode("missing data: prefix".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Decode("missing ',' separator".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Decode(format!("not a base64 data URI ({header})")))?;
    let bytes = BASE64_STANDARD
        .decode(payload)
        .map_err(|e| Error::Decode(format!("base64: {e}")))?;
    Ok(DataUri { mime: mime.to_string(), bytes })
}

/// Decode a PNG data URI back into pixels.
pub fn decode_png_data_uri(uri: &str) -> Result<RgbaImage> {
    let data = decode_data_uri(uri)?;
    if data.mime != PNG_MIME {
        return Err(Error::Decode(format!("expected {PNG_MIME}, got {}", data.mime)));
    }
    let img = image::load_from_memory_with_format(&data.bytes, ImageFormat::Png)
        .map_err(|e| Error::Decode(format!("png: {e}")))?;
    Ok(img.to_rgba8())
}

/// The value a surface reports to its host: a PNG data URI, or "" for no signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureImage(String);

impl SignatureImage {
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// The host's only test for presence: a non-blank reported value.
    pub fn is_present(&self) -> bool {
        !self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Pixels of the reported image; None for the empty marker.
    pub fn decode(&self) -> Result<Option<RgbaImage>> {
        if !self.is_present() {
            return Ok(None);
        }
        decode_png_data_uri(&self.0).map(Some)
    }
}

impl From<String> for SignatureImage {
    fn from(s: String) -> Self {
        Self(s)
    }
}
