use super::{DisplaySink, FrameViews, SinkControl};
use anyhow::{Context, Result};
use image::RgbImage;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use v4l::video::Output;
use v4l::{Device, Format, FourCC};

/// Writes the composited stream to a v4l2loopback device as YUYV,
/// so other applications can pick the cloak up as a webcam.
pub struct LoopbackOutput {
    _device: Device,
    file: File,
    width: u32,
    height: u32,
}

impl LoopbackOutput {
    pub fn new<P: AsRef<Path>>(device_path: P, width: u32, height: u32) -> Result<Self> {
        let path = device_path.as_ref();
        tracing::info!(
            "Opening v4l2loopback device at {} ({}x{})",
            path.display(),
            width,
            height
        );

        let device = Device::with_path(path)
            .with_context(|| format!("Failed to open v4l2 device at {}", path.display()))?;
        let format = Output::set_format(&device, &Format::new(width, height, FourCC::new(b"YUYV")))
            .context("Failed to negotiate YUYV output format")?;
        if (format.width, format.height) != (width, height) {
            tracing::warn!(
                "Loopback device accepted {}x{} instead of {}x{}",
                format.width,
                format.height,
                width,
                height
            );
        }

        // v4l2loopback accepts raw frame data written to the device file
        let file = File::options()
            .write(true)
            .open(path)
            .with_context(|| format!("Failed to open v4l2loopback device at {}", path.display()))?;

        Ok(Self {
            _device: device,
            file,
            width: format.width,
            height: format.height,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Pack RGB into YUYV 4:2:2, averaging chroma over each horizontal pixel pair
pub(crate) fn rgb_to_yuyv(rgb_image: &RgbImage) -> Vec<u8> {
    let (width, height) = rgb_image.dimensions();
    let mut yuyv = Vec::with_capacity((width.div_ceil(2) * 4 * height) as usize);

    for y in 0..height {
        for x in (0..width).step_by(2) {
            let p1 = rgb_image.get_pixel(x, y);
            let p2 = if x + 1 < width {
                rgb_image.get_pixel(x + 1, y)
            } else {
                p1
            };

            let (y1, u1, v1) = rgb_to_yuv(p1[0], p1[1], p1[2]);
            let (y2, u2, v2) = rgb_to_yuv(p2[0], p2[1], p2[2]);

            let u = ((u16::from(u1) + u16::from(u2)) / 2) as u8;
            let v = ((u16::from(v1) + u16::from(v2)) / 2) as u8;

            yuyv.extend_from_slice(&[y1, u, y2, v]);
        }
    }

    yuyv
}

fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = f32::from(r);
    let g = f32::from(g);
    let b = f32::from(b);

    let y = (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8;
    let u = ((-0.147 * r - 0.289 * g + 0.436 * b) + 128.0).round().clamp(0.0, 255.0) as u8;
    let v = ((0.615 * r - 0.515 * g - 0.100 * b) + 128.0).round().clamp(0.0, 255.0) as u8;

    (y, u, v)
}

impl DisplaySink for LoopbackOutput {
    fn show(&mut self, views: &FrameViews<'_>) -> Result<SinkControl> {
        let resized;
        let frame = if views.composite.dimensions() != (self.width, self.height) {
            resized = image::imageops::resize(
                views.composite,
                self.width,
                self.height,
                image::imageops::FilterType::Triangle,
            );
            &resized
        } else {
            views.composite
        };

        self.file
            .write_all(&rgb_to_yuyv(frame))
            .context("Failed to write frame to v4l2loopback device")?;

        Ok(SinkControl::Continue)
    }
}
