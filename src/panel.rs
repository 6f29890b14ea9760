//! Layout and drawing for the desktop control panel.
//!
//! The panel is a plain framebuffer: three color swatches, a Start and a
//! Stop button, and a status strip whose color follows the session phase.
//! Status text goes to the window title.

use crate::color::CloakColor;
use crate::session::Phase;

pub const PANEL_WIDTH: usize = 480;
pub const PANEL_HEIGHT: usize = 240;

const BACKGROUND: u32 = 0x0020_2428;
const OUTLINE: u32 = 0x00ff_ffff;
const DISABLED: u32 = 0x0050_5050;
const START_ENABLED: u32 = 0x0030_a050;
const STOP_ENABLED: u32 = 0x00c0_3030;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x..self.x + self.w).contains(&x) && (self.y..self.y + self.h).contains(&y)
    }
}

const SWATCHES: [Rect; 3] = [
    Rect::new(30, 40, 120, 60),
    Rect::new(180, 40, 120, 60),
    Rect::new(330, 40, 120, 60),
];
const START_BUTTON: Rect = Rect::new(90, 140, 120, 50);
const STOP_BUTTON: Rect = Rect::new(270, 140, 120, 50);
const STATUS_STRIP: Rect = Rect::new(0, 220, PANEL_WIDTH, 20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    SelectColor(CloakColor),
    Start,
    Stop,
}

fn swatch_rgb(color: CloakColor) -> u32 {
    match color {
        CloakColor::Red => 0x00b0_1818,
        CloakColor::Blue => 0x0018_40b0,
        CloakColor::Green => 0x0018_8030,
    }
}

fn phase_rgb(phase: Phase) -> u32 {
    match phase {
        Phase::Idle | Phase::Stopped => 0x0060_6060,
        Phase::Countdown { .. } | Phase::WarmingUp | Phase::CapturingBackground => 0x00d0_9020,
        Phase::Running => 0x0030_c060,
    }
}

#[derive(Debug, Default)]
pub struct Panel {
    selected: CloakColor,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> CloakColor {
        self.selected
    }

    pub fn select(&mut self, color: CloakColor) {
        self.selected = color;
    }

    /// Map a click to an action. Color choice is locked while a session runs,
    /// Start only works when idle and Stop only while active.
    pub fn hit(&self, x: usize, y: usize, active: bool) -> Option<PanelAction> {
        if !active {
            if let Some(i) = SWATCHES.iter().position(|r| r.contains(x, y)) {
                return Some(PanelAction::SelectColor(CloakColor::ALL[i]));
            }
            if START_BUTTON.contains(x, y) {
                return Some(PanelAction::Start);
            }
        } else if STOP_BUTTON.contains(x, y) {
            return Some(PanelAction::Stop);
        }
        None
    }

    pub fn render(&self, buffer: &mut [u32], active: bool, phase: Phase) {
        buffer.fill(BACKGROUND);

        for (rect, color) in SWATCHES.iter().zip(CloakColor::ALL) {
            if color == self.selected {
                let ring = Rect::new(rect.x - 4, rect.y - 4, rect.w + 8, rect.h + 8);
                fill(buffer, ring, OUTLINE);
            }
            let shade = if active && color != self.selected {
                DISABLED
            } else {
                swatch_rgb(color)
            };
            fill(buffer, *rect, shade);
        }

        fill(buffer, START_BUTTON, if active { DISABLED } else { START_ENABLED });
        fill(buffer, STOP_BUTTON, if active { STOP_ENABLED } else { DISABLED });
        fill(buffer, STATUS_STRIP, phase_rgb(phase));
    }
}

fn fill(buffer: &mut [u32], rect: Rect, color: u32) {
    for y in rect.y..(rect.y + rect.h).min(PANEL_HEIGHT) {
        let row = y * PANEL_WIDTH;
        let end = (rect.x + rect.w).min(PANEL_WIDTH);
        if rect.x < end {
            buffer[row + rect.x..row + end].fill(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatches_select_colors_when_idle() {
        let panel = Panel::new();
        assert_eq!(panel.hit(40, 50, false), Some(PanelAction::SelectColor(CloakColor::Red)));
        assert_eq!(panel.hit(200, 70, false), Some(PanelAction::SelectColor(CloakColor::Blue)));
        assert_eq!(panel.hit(449, 99, false), Some(PanelAction::SelectColor(CloakColor::Green)));
        assert_eq!(panel.hit(200, 70, true), None);
    }

    #[test]
    fn buttons_follow_session_state() {
        let panel = Panel::new();
        assert_eq!(panel.hit(100, 150, false), Some(PanelAction::Start));
        assert_eq!(panel.hit(100, 150, true), None);
        assert_eq!(panel.hit(300, 150, true), Some(PanelAction::Stop));
        assert_eq!(panel.hit(300, 150, false), None);
        assert_eq!(panel.hit(5, 5, false), None);
    }

    #[test]
    fn render_marks_selection_and_phase() {
        let mut panel = Panel::new();
        panel.select(CloakColor::Blue);
        let mut buffer = vec![0; PANEL_WIDTH * PANEL_HEIGHT];
        panel.render(&mut buffer, false, Phase::Running);

        let at = |x: usize, y: usize| buffer[y * PANEL_WIDTH + x];
        assert_eq!(at(178, 38), OUTLINE);
        assert_eq!(at(28, 38), BACKGROUND);
        assert_eq!(at(200, 60), swatch_rgb(CloakColor::Blue));
        assert_eq!(at(100, 150), START_ENABLED);
        assert_eq!(at(300, 150), DISABLED);
        assert_eq!(at(10, 230), phase_rgb(Phase::Running));
    }
}
