use super::CaptureSource;
use crate::error::CloakError;
use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::Camera;

pub struct WebcamCapture {
    camera: Camera,
    width: u32,
    height: u32,
}

impl WebcamCapture {
    /// Open webcam `device_index` asking for the format closest to `width`x`height`
    pub fn new(device_index: u32, width: u32, height: u32) -> Result<Self, CloakError> {
        tracing::info!(
            "Initializing webcam {} at {}x{}",
            device_index,
            width,
            height
        );

        let unavailable = |err: nokhwa::NokhwaError| CloakError::DeviceUnavailable {
            index: device_index,
            reason: err.to_string(),
        };

        let index = CameraIndex::Index(device_index);
        let wanted = CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(wanted));

        let mut camera = Camera::new(index, requested).map_err(unavailable)?;
        camera.open_stream().map_err(unavailable)?;

        let actual = camera.resolution();
        if (actual.width(), actual.height()) != (width, height) {
            tracing::warn!(
                "Camera ignored requested {}x{}, delivering {}x{}",
                width,
                height,
                actual.width(),
                actual.height()
            );
        }

        tracing::info!("Webcam initialized successfully");

        Ok(Self {
            camera,
            width: actual.width(),
            height: actual.height(),
        })
    }
}

impl CaptureSource for WebcamCapture {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        let frame = self
            .camera
            .frame()
            .context("Failed to capture frame")?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .context("Failed to decode frame")?;

        Ok(decoded)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for WebcamCapture {
    fn drop(&mut self) {
        match self.camera.stop_stream() {
            Ok(()) => tracing::info!("Webcam released"),
            Err(err) => tracing::warn!("Failed to stop webcam stream: {}", err),
        }
    }
}

/// Print every camera the platform backend can enumerate
pub fn list_devices() -> Result<()> {
    let cameras = nokhwa::query(ApiBackend::Auto).context("Failed to enumerate cameras")?;
    if cameras.is_empty() {
        println!("No cameras found");
        return Ok(());
    }

    println!("{:<6} | {}", "Index", "Name");
    println!("{}", "-".repeat(40));
    for cam in cameras {
        println!("{:<6} | {}", cam.index().to_string(), cam.human_name());
    }
    Ok(())
}
