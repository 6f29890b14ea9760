use image::Rgb;

/// A pixel in 8-bit HSV space
///
/// Hue is stored as degrees / 2 (0..=180) so it fits in a byte; saturation
/// and value span the full 0..=255 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive lower/upper HSV bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// True when every channel of `px` lies within the bounds
    pub fn contains(&self, px: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&px.h)
            && (self.lower.s..=self.upper.s).contains(&px.s)
            && (self.lower.v..=self.upper.v).contains(&px.v)
    }
}

/// Round-half-up integer division for a positive divisor
fn div_round(num: i32, den: i32) -> i32 {
    (2 * num + den).div_euclid(2 * den)
}

/// Convert one RGB pixel to 8-bit HSV
pub fn rgb_to_hsv(px: &Rgb<u8>) -> Hsv {
    let [r, g, b] = px.0.map(i32::from);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0 { 0 } else { div_round(255 * delta, max) };

    let h = if delta == 0 {
        0
    } else {
        let k = if max == r {
            g - b
        } else if max == g {
            b - r + 2 * delta
        } else {
            r - g + 4 * delta
        };
        let h = div_round(30 * k, delta);
        if h < 0 {
            h + 180
        } else {
            h
        }
    };

    Hsv::new(h as u8, s as u8, max as u8)
}
