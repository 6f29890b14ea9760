/// Runtime settings for one capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Webcam device index
    pub device_index: u32,
    /// Requested capture width
    pub width: u32,
    /// Requested capture height
    pub height: u32,
    /// Frames discarded while auto-exposure settles
    pub warmup_frames: u32,
    /// Seconds to wait before the camera is opened
    pub countdown_secs: u32,
    /// Log averaged stage timings every this many frames (0 disables)
    pub stats_interval: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            warmup_frames: 30,
            countdown_secs: 5,
            stats_interval: 30,
        }
    }
}

impl SessionConfig {
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
