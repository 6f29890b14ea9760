use crate::session::Phase;
use thiserror::Error;

/// Failures that end a cloaking session
#[derive(Debug, Error)]
pub enum CloakError {
    /// The camera could not be opened or its stream could not be started
    #[error("could not open camera {index}: {reason}")]
    DeviceUnavailable { index: u32, reason: String },

    /// A frame read returned no data
    #[error("failed to read frame while {phase}: {reason}")]
    ReadFailure { phase: Phase, reason: String },

    /// The camera started delivering frames of a different size than the background
    #[error("camera frame size changed from {expected:?} to {actual:?}")]
    FrameSizeChanged {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Frame, background and mask handed to the compositor disagree in size
    #[error("dimension mismatch: frame {frame:?}, background {background:?}, mask {mask:?}")]
    DimensionMismatch {
        frame: (u32, u32),
        background: (u32, u32),
        mask: (u32, u32),
    },

    /// The display sink failed to present a frame
    #[error("display error: {0}")]
    Display(String),
}
