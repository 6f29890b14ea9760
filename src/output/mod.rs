mod loopback;
mod window;

pub use loopback::LoopbackOutput;
pub use window::{to_argb_buffer, WindowDisplay};

use crate::mask::Mask;
use anyhow::Result;
use image::RgbImage;

/// The three images produced for each processed frame
pub struct FrameViews<'a> {
    pub original: &'a RgbImage,
    pub mask: &'a Mask,
    pub composite: &'a RgbImage,
}

/// What the display wants the loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Quit,
}

/// Trait for display destinations
pub trait DisplaySink {
    /// Present one processed frame
    fn show(&mut self, views: &FrameViews<'_>) -> Result<SinkControl>;
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn show(&mut self, views: &FrameViews<'_>) -> Result<SinkControl> {
        (**self).show(views)
    }
}

/// Forwards every frame to several sinks; a quit from any of them wins
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn DisplaySink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn DisplaySink>) {
        self.sinks.push(sink);
    }
}

impl DisplaySink for FanoutSink {
    fn show(&mut self, views: &FrameViews<'_>) -> Result<SinkControl> {
        let mut control = SinkControl::Continue;
        for sink in &mut self.sinks {
            if sink.show(views)? == SinkControl::Quit {
                control = SinkControl::Quit;
            }
        }
        Ok(control)
    }
}
