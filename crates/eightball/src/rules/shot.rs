//! Aiming and shooting: orbit the camera around the cue ball while idle,
//! pull back to charge, press again to strike.

use glam::Vec3;

use crate::api::config::ShotConfig;
use crate::input::queue::InputFrame;
use crate::rules::camera::CameraRig;

/// Where the cue is in its stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotState {
    Idle,
    /// Pulling back. `draw` is the accumulated vertical delta, always in
    /// `[-max_draw, 0]`.
    Charging { draw: f32 },
}

/// A released shot, ready to hand to physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Unit direction on the table plane (zero if the camera looked straight down).
    pub direction: Vec3,
    pub impulse: Vec3,
    pub draw: f32,
    pub power_percent: u32,
}

pub struct ShotController {
    state: ShotState,
    config: ShotConfig,
    power_percent: u32,
}

impl ShotController {
    pub fn new(config: ShotConfig) -> Self {
        Self {
            state: ShotState::Idle,
            config,
            power_percent: 0,
        }
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.state, ShotState::Charging { .. })
    }

    /// Displayed power, 0..=100.
    pub fn power_percent(&self) -> u32 {
        self.power_percent
    }

    /// Impulse the cue would deliver if released now.
    pub fn pending_impulse(&self, camera: &CameraRig) -> Option<Vec3> {
        match self.state {
            ShotState::Charging { draw } if camera.is_aiming() => {
                Some(camera.horizontal_forward() * self.config.power * draw.abs())
            }
            _ => None,
        }
    }

    /// Ready for a new turn.
    pub fn rearm(&mut self) {
        self.state = ShotState::Idle;
        self.power_percent = 0;
    }

    /// One tick of aiming. Inert unless the aiming view is live.
    /// Returns the shot on the tick it is released.
    pub fn update(
        &mut self,
        frame: &InputFrame,
        dt: f32,
        camera: &mut CameraRig,
        cue_ball: Vec3,
    ) -> Option<Shot> {
        if !camera.is_aiming() {
            return None;
        }

        // Presses are handled in arrival order: the first one out of Idle
        // starts the stroke, the next one strikes.
        let mut presses = frame.primary_presses;
        let draw = match self.state {
            ShotState::Idle => {
                camera.orbit(cue_ball, frame.dx * self.config.rotation_speed * dt);
                if presses == 0 {
                    return None;
                }
                presses -= 1;
                log::debug!("Charging shot");
                0.0
            }
            ShotState::Charging { draw } => {
                // Only pulling back counts; pushing past the rest point is ignored.
                if draw + frame.dy <= 0.0 {
                    (draw + frame.dy).max(-self.config.max_draw)
                } else {
                    draw
                }
            }
        };
        self.power_percent = self.percent_for(draw);

        if presses > 0 {
            let shot = self.release(draw, camera);
            self.state = ShotState::Idle;
            Some(shot)
        } else {
            self.state = ShotState::Charging { draw };
            None
        }
    }

    fn release(&self, draw: f32, camera: &mut CameraRig) -> Shot {
        let direction = camera.horizontal_forward();
        let impulse = direction * self.config.power * draw.abs();
        camera.cue_stick_visible = false;
        log::info!(
            "Shot released: power {}%, impulse {:?}",
            self.power_percent,
            impulse
        );
        Shot {
            direction,
            impulse,
            draw,
            power_percent: self.power_percent,
        }
    }

    fn percent_for(&self, draw: f32) -> u32 {
        let fraction = (draw.abs() / self.config.max_draw).clamp(0.0, 1.0);
        (fraction * 100.0).round() as u32
    }
}
