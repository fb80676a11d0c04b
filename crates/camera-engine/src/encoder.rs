//! Still-frame encoding for transport.
//!
//! Snapshots a live frame into a lossy-compressed JPEG at native
//! resolution and exposes it as base64 text for the analysis endpoint.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use boardlens_common::{BoardlensError, BoardlensResult};

use crate::frame::RawFrame;

/// Fixed JPEG quality factor (out of 100).
pub const JPEG_QUALITY: u8 = 90;

/// Header prefix carried by data URLs, stripped before transport.
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// A compressed still image produced from one live frame.
///
/// Has no independent lifecycle: produced and consumed within a single
/// capture cycle, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl EncodedFrame {
    /// Raw JPEG bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Source frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Source frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full data URL, suitable for local preview surfaces.
    pub fn data_url(&self) -> String {
        format!("{DATA_URL_PREFIX}{}", BASE64.encode(&self.data))
    }

    /// Bare base64 payload with no format header, as sent to the
    /// analysis endpoint.
    pub fn transport_payload(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// Strip a data-URL format header from a payload, if present.
pub fn strip_data_url_header(payload: &str) -> &str {
    match payload.split_once("base64,") {
        Some((prefix, body)) if prefix.starts_with("data:") => body,
        _ => payload,
    }
}

/// Encode one raw frame as JPEG at its native dimensions.
pub fn encode_frame(frame: &RawFrame, quality: u8) -> BoardlensResult<EncodedFrame> {
    let mut data = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut data, quality);
    encoder
        .encode(
            frame.pixels(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BoardlensError::encoding(format!("JPEG encode failed: {e}")))?;

    Ok(EncodedFrame {
        data,
        width: frame.width(),
        height: frame.height(),
    })
}
