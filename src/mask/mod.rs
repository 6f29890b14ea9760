use crate::color::{rgb_to_hsv, ColorProfile};
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, open};

/// Single-channel cloak mask: 255 where the pixel matched, 0 elsewhere
pub type Mask = GrayImage;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

// Under the L-infinity norm a radius of k is k passes of a 3x3 square
const OPEN_RADIUS: u8 = 2;
const DILATE_RADIUS: u8 = 1;

/// Threshold a frame against every range of the profile, unioning the results
pub fn threshold(frame: &RgbImage, profile: &ColorProfile) -> Mask {
    let (width, height) = frame.dimensions();
    let mut mask = GrayImage::new(width, height);

    for (dst, src) in mask.pixels_mut().zip(frame.pixels()) {
        let hsv = rgb_to_hsv(src);
        let hit = if profile.wraps_hue {
            profile.matches(hsv)
        } else {
            profile.ranges.first().is_some_and(|range| range.contains(hsv))
        };
        *dst = Luma([if hit { MASK_ON } else { MASK_OFF }]);
    }

    mask
}

/// Remove specks with an opening, then grow what survives by one pixel
pub fn clean(mask: &Mask) -> Mask {
    dilate(&open(mask, Norm::LInf, OPEN_RADIUS), Norm::LInf, DILATE_RADIUS)
}

/// Build the cleaned cloak mask for a frame
pub fn build_mask(frame: &RgbImage, profile: &ColorProfile) -> Mask {
    let _span = tracing::debug_span!("build_mask").entered();
    clean(&threshold(frame, profile))
}

/// Expand a mask into an RGB image for previewing
pub fn mask_to_rgb(mask: &Mask) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let v = mask.get_pixel(x, y)[0];
        image::Rgb([v, v, v])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CloakColor;
    use image::Rgb;

    #[test]
    fn black_frame_gives_empty_mask() {
        let frame = RgbImage::new(8, 6);
        for color in CloakColor::ALL {
            let mask = build_mask(&frame, &color.profile());
            assert_eq!(mask.dimensions(), (8, 6));
            assert!(mask.pixels().all(|p| p[0] == MASK_OFF));
        }
    }

    #[test]
    fn threshold_unions_red_ranges() {
        let mut frame = RgbImage::from_pixel(2, 1, Rgb([255, 0, 0]));
        frame.put_pixel(1, 0, Rgb([200, 0, 40]));
        let mask = threshold(&frame, &CloakColor::Red.profile());
        assert_eq!(mask.get_pixel(0, 0)[0], MASK_ON);
        assert_eq!(mask.get_pixel(1, 0)[0], MASK_ON);
    }

    #[test]
    fn threshold_single_range_ignores_other_colors() {
        let mut frame = RgbImage::from_pixel(3, 1, Rgb([0, 0, 255]));
        frame.put_pixel(1, 0, Rgb([0, 255, 0]));
        frame.put_pixel(2, 0, Rgb([255, 0, 0]));
        let mask = threshold(&frame, &CloakColor::Blue.profile());
        let values: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![MASK_ON, MASK_OFF, MASK_OFF]);
    }

    #[test]
    fn mask_size_follows_frame() {
        let profile = CloakColor::Green.profile();
        assert_eq!(build_mask(&RgbImage::new(5, 3), &profile).dimensions(), (5, 3));
        assert_eq!(build_mask(&RgbImage::new(2, 9), &profile).dimensions(), (2, 9));
    }

    #[test]
    fn second_cleanup_adds_no_new_regions() {
        let mut raw = GrayImage::new(20, 20);
        for y in 4..12 {
            for x in 3..11 {
                raw.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
        raw.put_pixel(17, 17, Luma([MASK_ON]));
        raw.put_pixel(15, 2, Luma([MASK_ON]));

        let once = clean(&raw);
        let twice = clean(&once);
        let bound = dilate(&once, Norm::LInf, 1);
        for (t, b) in twice.pixels().zip(bound.pixels()) {
            assert!(t[0] <= b[0]);
        }
        assert_eq!(once.get_pixel(17, 17)[0], MASK_OFF);
        assert_eq!(twice.get_pixel(15, 2)[0], MASK_OFF);
    }

    fn square(size: u32, x0: u32, y0: u32, side: u32) -> Mask {
        GrayImage::from_fn(size, size, |x, y| {
            let inside = (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y);
            Luma([if inside { MASK_ON } else { MASK_OFF }])
        })
    }

    #[test]
    fn cleanup_keeps_full_frame_match() {
        let full = GrayImage::from_pixel(4, 4, Luma([MASK_ON]));
        assert_eq!(clean(&full), full);
    }

    #[test]
    fn cleanup_drops_specks_and_grows_blobs_by_one() {
        let mut raw = square(16, 4, 4, 7);
        raw.put_pixel(14, 1, Luma([MASK_ON]));
        raw.put_pixel(1, 14, Luma([MASK_ON]));
        assert_eq!(clean(&raw), square(16, 3, 3, 9));
    }

    #[test]
    fn cleanup_removes_blobs_narrower_than_five() {
        assert!(clean(&square(16, 5, 5, 4)).pixels().all(|p| p[0] == MASK_OFF));
        assert_eq!(clean(&square(16, 5, 5, 5)), square(16, 4, 4, 7));
    }

    #[test]
    fn blob_touching_border_is_not_eroded_by_it() {
        // 6x6 block in the corner survives the opening untouched
        assert_eq!(clean(&square(12, 6, 6, 6)), square(12, 5, 5, 7));
    }
}
