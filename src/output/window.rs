use super::{DisplaySink, FrameViews, SinkControl};
use crate::mask::mask_to_rgb;
use anyhow::{anyhow, Result};
use image::RgbImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

const ORIGINAL_TITLE: &str = "Original";
const MASK_TITLE: &str = "Mask";
const COMPOSITE_TITLE: &str = "Invisibility Cloak";

/// Pack an RGB image into the 0RGB `u32` layout minifb expects
pub fn to_argb_buffer(image: &RgbImage) -> Vec<u32> {
    image
        .pixels()
        .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
        .collect()
}

struct Preview {
    window: Window,
    width: usize,
    height: usize,
}

impl Preview {
    fn open(title: &str, width: u32, height: u32) -> Result<Self> {
        let window = Window::new(title, width as usize, height as usize, WindowOptions::default())
            .map_err(|e| anyhow!("Failed to open window {:?}: {}", title, e))?;
        Ok(Self {
            window,
            width: width as usize,
            height: height as usize,
        })
    }

    fn present(&mut self, image: &RgbImage) -> Result<()> {
        let buffer = to_argb_buffer(image);
        self.window
            .update_with_buffer(&buffer, self.width, self.height)
            .map_err(|e| anyhow!("Failed to update window: {}", e))
    }

    fn wants_quit(&self) -> bool {
        !self.window.is_open() || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
    }
}

/// Three preview windows: raw frame, mask and composited result.
///
/// Windows are created on the first frame so they match the camera's
/// delivered size. Pressing `q` in any of them, or closing one, asks to quit.
#[derive(Default)]
pub struct WindowDisplay {
    windows: Option<[Preview; 3]>,
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for WindowDisplay {
    fn show(&mut self, views: &FrameViews<'_>) -> Result<SinkControl> {
        let (width, height) = views.original.dimensions();

        if self.windows.is_none() {
            tracing::debug!("Opening preview windows at {}x{}", width, height);
            self.windows = Some([
                Preview::open(ORIGINAL_TITLE, width, height)?,
                Preview::open(MASK_TITLE, width, height)?,
                Preview::open(COMPOSITE_TITLE, width, height)?,
            ]);
        }
        let Some([original, mask, composite]) = self.windows.as_mut() else {
            return Ok(SinkControl::Continue);
        };

        original.present(views.original)?;
        mask.present(&mask_to_rgb(views.mask))?;
        composite.present(views.composite)?;

        if original.wants_quit() || mask.wants_quit() || composite.wants_quit() {
            tracing::info!("Quit requested from preview window");
            return Ok(SinkControl::Quit);
        }
        Ok(SinkControl::Continue)
    }
}
