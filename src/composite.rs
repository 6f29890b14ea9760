use crate::error::CloakError;
use crate::mask::{Mask, MASK_OFF};
use image::RgbImage;

/// Replace masked pixels of `frame` with the co-located `background` pixels.
///
/// A hard per-pixel switch: any non-zero mask value selects the background.
/// All three inputs must have the same dimensions.
pub fn compose(frame: &RgbImage, background: &RgbImage, mask: &Mask) -> Result<RgbImage, CloakError> {
    let _span = tracing::debug_span!("compose").entered();

    let dims = frame.dimensions();
    if background.dimensions() != dims || mask.dimensions() != dims {
        return Err(CloakError::DimensionMismatch {
            frame: dims,
            background: background.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let mut output = frame.clone();
    for ((out, bg), m) in output.pixels_mut().zip(background.pixels()).zip(mask.pixels()) {
        if m[0] != MASK_OFF {
            *out = *bg;
        }
    }

    Ok(output)
}
