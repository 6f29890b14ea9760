//! Webcam "invisibility cloak": capture a background, then replace every
//! pixel matching the cloak color with the background behind it.

pub mod capture;
pub mod color;
pub mod composite;
pub mod config;
pub mod error;
pub mod mask;
pub mod output;
pub mod panel;
pub mod session;

pub use config::SessionConfig;
pub use error::CloakError;
