//! Raw frames pulled from a live device.

use boardlens_common::{BoardlensError, BoardlensResult};

/// One uncompressed RGB8 frame at the device's native dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl RawFrame {
    /// Wrap a pixel buffer, validating that it holds `width * height` RGB
    /// triplets.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> BoardlensResult<Self> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 {
            return Err(BoardlensError::encoding(format!(
                "empty frame dimensions {width}x{height}"
            )));
        }
        if pixels.len() != expected {
            return Err(BoardlensError::encoding(format!(
                "frame buffer holds {} bytes, expected {expected} for {width}x{height} RGB",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
