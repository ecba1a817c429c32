//! QR decoding of captured frames

use crate::error::DecodeError;
use image::{DynamicImage, GrayImage};
use tracing::trace;

/// Extracts a QR payload from a frame
pub trait FrameDecoder<F> {
    /// `Ok(None)` when the frame holds no code
    fn decode(&self, frame: &F) -> Result<Option<String>, DecodeError>;
}

/// Pure-Rust decoder built on `rqrr`
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl FrameDecoder<GrayImage> for RqrrDecoder {
    fn decode(&self, frame: &GrayImage) -> Result<Option<String>, DecodeError> {
        let (w, h) = frame.dimensions();
        if w == 0 || h == 0 {
            return Err(DecodeError::Frame("empty frame".to_string()));
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| frame.get_pixel(x as u32, y as u32)[0],
        );
        let grids = prepared.detect_grids();
        trace!(grids = grids.len(), width = w, height = h, "Frame scanned");

        let mut last_err = None;
        for grid in grids {
            match grid.decode() {
                Ok((_, content)) => return Ok(Some(content)),
                Err(e) => last_err = Some(e.to_string()),
            }
        }
        match last_err {
            Some(e) => Err(DecodeError::Decode(e)),
            None => Ok(None),
        }
    }
}

impl FrameDecoder<DynamicImage> for RqrrDecoder {
    fn decode(&self, frame: &DynamicImage) -> Result<Option<String>, DecodeError> {
        FrameDecoder::<GrayImage>::decode(self, &frame.to_luma8())
    }
}
