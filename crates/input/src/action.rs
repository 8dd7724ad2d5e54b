use crate::pad::{AxisDir, Buttons, PadReport};
use serde::{Deserialize, Serialize};

/// Per-tick intent derived from one ready pad report.
///
/// The kernel consumes intents, never raw reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Positive moves forward along the look direction.
    pub forward: AxisDir,
    /// Positive strafes right.
    pub strafe: AxisDir,
    /// Positive pitches the view down.
    pub look_pitch: AxisDir,
    /// Positive turns the view left.
    pub look_yaw: AxisDir,
    pub jump: bool,
    pub reset: bool,
    /// Rising edge of the spin toggle button.
    pub toggle_spin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Stick travel around the centre treated as neutral.
    pub dead_zone: u8,
    pub jump: u16,
    pub reset: u16,
    pub toggle_spin: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dead_zone: 24,
            jump: Buttons::CROSS,
            reset: Buttons::SELECT,
            toggle_spin: Buttons::START,
        }
    }
}

/// Maps pad reports to intents, latching the toggle button across ticks.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    config: InputConfig,
    toggle_held: bool,
}

impl InputMapper {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            toggle_held: false,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// `None` when the report is not ready; the latch is left untouched.
    pub fn map(&mut self, report: &PadReport) -> Option<Intent> {
        if !report.is_ready() {
            tracing::trace!(status = report.status, "pad not ready");
            return None;
        }

        let dz = self.config.dead_zone;
        let (lx, ly) = report.left.direction(dz);
        let (rx, ry) = report.right.direction(dz);

        let toggle_down = report.buttons.held(self.config.toggle_spin);
        let toggle_spin = toggle_down && !self.toggle_held;
        self.toggle_held = toggle_down;

        Some(Intent {
            forward: ly.flipped(),
            strafe: lx,
            look_pitch: ry,
            look_yaw: rx.flipped(),
            jump: report.buttons.held(self.config.jump),
            reset: report.buttons.held(self.config.reset),
            toggle_spin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_up_moves_forward() {
        let mut mapper = InputMapper::default();
        let intent = mapper.map(&PadReport::idle().with_left(127, 0)).unwrap();
        assert_eq!(intent.forward, AxisDir::Positive);
        assert_eq!(intent.strafe, AxisDir::Neutral);
    }

    #[test]
    fn right_stick_left_turns_left() {
        let mut mapper = InputMapper::default();
        let intent = mapper.map(&PadReport::idle().with_right(0, 200)).unwrap();
        assert_eq!(intent.look_yaw, AxisDir::Positive);
        assert_eq!(intent.look_pitch, AxisDir::Positive);
    }

    #[test]
    fn not_ready_yields_nothing() {
        let mut mapper = InputMapper::default();
        assert!(mapper.map(&PadReport::not_ready().with_buttons(Buttons::CROSS)).is_none());
    }

    #[test]
    fn toggle_fires_once_per_press() {
        let mut mapper = InputMapper::default();
        let held = PadReport::idle().with_buttons(Buttons::START);
        assert!(mapper.map(&held).unwrap().toggle_spin);
        assert!(!mapper.map(&held).unwrap().toggle_spin);
        assert!(!mapper.map(&PadReport::idle()).unwrap().toggle_spin);
        assert!(mapper.map(&held).unwrap().toggle_spin);
    }

    #[test]
    fn buttons_map_to_actions() {
        let mut mapper = InputMapper::default();
        let intent = mapper
            .map(&PadReport::idle().with_buttons(Buttons::CROSS | Buttons::SELECT))
            .unwrap();
        assert!(intent.jump);
        assert!(intent.reset);
        assert!(!intent.toggle_spin);
    }
}
