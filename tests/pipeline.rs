use cloak::color::{resolve, CloakColor};
use cloak::composite::compose;
use cloak::mask::{build_mask, MASK_OFF, MASK_ON};
use image::{Rgb, RgbImage};

const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const RED: Rgb<u8> = Rgb([220, 10, 10]);
const DEEP_RED: Rgb<u8> = Rgb([200, 0, 40]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GREY: Rgb<u8> = Rgb([90, 90, 90]);

fn with_square(size: u32, x0: u32, y0: u32, side: u32, fill: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        if (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y) {
            fill
        } else {
            WHITE
        }
    })
}

fn run(frame: &RgbImage, background: &RgbImage, color: &str) -> RgbImage {
    let profile = resolve(color).profile;
    let mask = build_mask(frame, &profile);
    compose(frame, background, &mask).unwrap()
}

#[test]
fn solid_blue_frame_becomes_background() {
    let frame = RgbImage::from_pixel(4, 4, BLUE);
    let background = RgbImage::from_pixel(4, 4, GREY);
    assert_eq!(run(&frame, &background, "blue"), background);
}

#[test]
fn blue_frame_is_untouched_by_other_profiles() {
    let frame = RgbImage::from_pixel(4, 4, BLUE);
    let background = RgbImage::from_pixel(4, 4, GREY);
    assert_eq!(run(&frame, &background, "green"), frame);
    assert_eq!(run(&frame, &background, "red"), frame);
}

#[test]
fn tiny_red_square_is_treated_as_noise() {
    let frame = with_square(16, 6, 6, 3, RED);
    let background = RgbImage::from_pixel(16, 16, GREY);

    let mask = build_mask(&frame, &CloakColor::Red.profile());
    assert!(mask.pixels().all(|p| p[0] == MASK_OFF));
    assert_eq!(run(&frame, &background, "red"), frame);
}

#[test]
fn red_square_is_replaced_with_one_pixel_margin() {
    let frame = with_square(16, 4, 4, 7, RED);
    let background = RgbImage::from_pixel(16, 16, GREY);
    let output = run(&frame, &background, "red");

    // 7x7 survives the opening, then the final dilation adds a one pixel ring
    let cloaked = |x: u32, y: u32| (3..12).contains(&x) && (3..12).contains(&y);
    for (x, y, px) in output.enumerate_pixels() {
        if cloaked(x, y) {
            assert_eq!(*px, GREY, "({x}, {y}) should show background");
        } else {
            assert_eq!(px, frame.get_pixel(x, y), "({x}, {y}) should pass through");
        }
    }
}

#[test]
fn red_on_both_sides_of_hue_seam_is_cloaked() {
    let mut frame = RgbImage::from_pixel(12, 6, WHITE);
    for y in 0..6 {
        for x in 0..12 {
            frame.put_pixel(x, y, if x < 6 { RED } else { DEEP_RED });
        }
    }
    let mask = build_mask(&frame, &CloakColor::Red.profile());
    assert!(mask.pixels().all(|p| p[0] == MASK_ON));
}

#[test]
fn unknown_color_behaves_like_red() {
    let frame = with_square(16, 4, 4, 7, RED);
    let background = RgbImage::from_pixel(16, 16, GREY);
    assert_eq!(run(&frame, &background, "purple"), run(&frame, &background, "red"));
    assert_eq!(run(&frame, &background, "RED"), run(&frame, &background, "red"));
}

#[test]
fn black_frame_passes_through() {
    let frame = RgbImage::new(8, 8);
    let background = RgbImage::from_pixel(8, 8, GREY);
    for color in ["red", "blue", "green"] {
        assert_eq!(run(&frame, &background, color), frame);
    }
}
