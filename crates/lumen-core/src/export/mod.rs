//! Export encoding.
//!
//! Turns a finished [`PixelBuffer`] into JPEG or PNG bytes. This is the last
//! step of an export request and either yields the whole file or an error;
//! partial output is never returned.
//!
//! # Examples
//!
//! ```ignore
//! use lumen_core::export::{encode, ExportOptions};
//!
//! let encoded = encode(&buffer, &ExportOptions::default())?;
//! assert_eq!(encoded.format.mime_type(), "image/jpeg");
//! ```

mod jpeg;
mod png;

use crate::buffer::PixelBuffer;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Quality used when none is given, matching the browser canvas default.
pub const DEFAULT_QUALITY: f32 = 0.92;

/// Errors that can occur during export encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The underlying encoder rejected the image
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ExportFormat,
        message: String,
    },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    #[serde(alias = "jpg", alias = "image/jpeg")]
    Jpeg,
    #[serde(alias = "image/png")]
    Png,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Jpeg => f.write_str("JPEG"),
            ExportFormat::Png => f.write_str("PNG"),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Lossy quality in [0, 1]; ignored for PNG
    pub quality: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ExportOptions {
    pub fn jpeg(quality: f32) -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality,
        }
    }

    pub fn png() -> Self {
        Self {
            format: ExportFormat::Png,
            ..Self::default()
        }
    }

    /// Encoder quality on the 1-100 scale.
    ///
    /// Non-finite values fall back to [`DEFAULT_QUALITY`].
    pub fn jpeg_quality(&self) -> u8 {
        let q = if self.quality.is_finite() {
            self.quality
        } else {
            DEFAULT_QUALITY
        };
        (q * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Encoded file bytes and their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `data:` URL embedding the file as base64, as `canvas.toDataURL` returns.
    pub fn to_data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type(), b64)
    }
}

/// Encode `buffer` according to `options`.
pub fn encode(buffer: &PixelBuffer, options: &ExportOptions) -> Result<EncodedImage, EncodeError> {
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        format = %options.format,
        quality = options.quality,
        "Encoding export"
    );

    let bytes = match options.format {
        ExportFormat::Jpeg => jpeg::encode_jpeg(buffer, options.jpeg_quality())?,
        ExportFormat::Png => png::encode_png(buffer)?,
    };

    debug!(bytes = bytes.len(), "Encoded export");
    Ok(EncodedImage {
        bytes,
        format: options.format,
    })
}
