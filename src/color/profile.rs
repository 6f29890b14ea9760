use super::hsv::{Hsv, HsvRange};
use std::fmt;

const RED_LOW: HsvRange = HsvRange::new(Hsv::new(0, 120, 70), Hsv::new(10, 255, 255));
const RED_HIGH: HsvRange = HsvRange::new(Hsv::new(160, 120, 70), Hsv::new(180, 255, 255));
const BLUE: HsvRange = HsvRange::new(Hsv::new(100, 120, 70), Hsv::new(140, 255, 255));
const GREEN: HsvRange = HsvRange::new(Hsv::new(40, 120, 70), Hsv::new(80, 255, 255));

/// The cloak colors with a built-in profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloakColor {
    #[default]
    Red,
    Blue,
    Green,
}

impl CloakColor {
    pub const ALL: [CloakColor; 3] = [CloakColor::Red, CloakColor::Blue, CloakColor::Green];

    pub fn name(self) -> &'static str {
        match self {
            CloakColor::Red => "red",
            CloakColor::Blue => "blue",
            CloakColor::Green => "green",
        }
    }

    /// Label shown on the control panel
    pub fn label(self) -> &'static str {
        match self {
            CloakColor::Red => "Gryffindor Red",
            CloakColor::Blue => "Ravenclaw Blue",
            CloakColor::Green => "Slytherin Green",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }

    pub fn profile(self) -> ColorProfile {
        match self {
            CloakColor::Red => ColorProfile {
                color: self,
                ranges: vec![RED_LOW, RED_HIGH],
                wraps_hue: true,
            },
            CloakColor::Blue => ColorProfile {
                color: self,
                ranges: vec![BLUE],
                wraps_hue: false,
            },
            CloakColor::Green => ColorProfile {
                color: self,
                ranges: vec![GREEN],
                wraps_hue: false,
            },
        }
    }
}

impl fmt::Display for CloakColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HSV ranges that make up one cloak color
///
/// When `wraps_hue` is set the ranges straddle the 0/180 hue seam and a pixel
/// matches if it falls in any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProfile {
    pub color: CloakColor,
    pub ranges: Vec<HsvRange>,
    pub wraps_hue: bool,
}

impl ColorProfile {
    pub fn matches(&self, px: Hsv) -> bool {
        self.ranges.iter().any(|range| range.contains(px))
    }
}

/// Result of resolving a requested color name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub profile: ColorProfile,
    /// The requested name, when it was not recognised and red was substituted
    pub fallback_from: Option<String>,
}

impl ResolvedProfile {
    pub fn is_fallback(&self) -> bool {
        self.fallback_from.is_some()
    }
}

/// Map a color name to its profile. Never fails: unknown names get red.
pub fn resolve(name: &str) -> ResolvedProfile {
    match CloakColor::from_name(name) {
        Some(color) => ResolvedProfile {
            profile: color.profile(),
            fallback_from: None,
        },
        None => {
            tracing::warn!("Color {:?} not supported, using default red", name);
            ResolvedProfile {
                profile: CloakColor::default().profile(),
                fallback_from: Some(name.to_string()),
            }
        }
    }
}
