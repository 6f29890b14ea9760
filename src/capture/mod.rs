mod webcam;

pub use webcam::{list_devices, WebcamCapture};

use anyhow::Result;
use image::RgbImage;

/// Trait for camera capture sources
///
/// Dropping a source releases the underlying device.
pub trait CaptureSource {
    /// Capture a single frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Get the resolution of captured frames
    fn resolution(&self) -> (u32, u32);
}

impl<T: CaptureSource + ?Sized> CaptureSource for Box<T> {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        (**self).capture_frame()
    }

    fn resolution(&self) -> (u32, u32) {
        (**self).resolution()
    }
}
