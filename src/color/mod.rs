mod hsv;
mod profile;

pub use hsv::{rgb_to_hsv, Hsv, HsvRange};
pub use profile::{resolve, CloakColor, ColorProfile, ResolvedProfile};
