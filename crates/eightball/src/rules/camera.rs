use glam::{Quat, Vec3};

use crate::api::config::CameraConfig;

/// Which view is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Behind the cue ball, aiming.
    CueStick,
    /// Above the table while a shot plays out.
    Overhead,
}

/// The aiming camera. Orientation is yaw about +Y (0 = looking down +Z)
/// and a downward pitch, both in degrees.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub mode: CameraMode,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Whether the cue stick is drawn.
    pub cue_stick_visible: bool,
    config: CameraConfig,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            mode: CameraMode::CueStick,
            position: config.offset,
            yaw: 0.0,
            pitch: config.down_angle,
            cue_stick_visible: true,
            config,
        }
    }

    pub fn is_aiming(&self) -> bool {
        self.mode == CameraMode::CueStick
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.sin() * pitch.cos(), -pitch.sin(), yaw.cos() * pitch.cos())
    }

    /// View direction flattened onto the table, or zero when looking
    /// straight down.
    pub fn horizontal_forward(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    }

    /// Swing the camera `degrees` around the vertical axis through `pivot`,
    /// turning it by the same amount so the pivot stays in view.
    pub fn orbit(&mut self, pivot: Vec3, degrees: f32) {
        if degrees == 0.0 {
            return;
        }
        let rotation = Quat::from_rotation_y(degrees.to_radians());
        self.position = pivot + rotation * (self.position - pivot);
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
    }

    /// Back behind the cue ball at the configured offset, looking at it with
    /// the configured down angle, cue stick shown.
    pub fn reset(&mut self, cue_ball: Vec3) {
        self.cue_stick_visible = true;
        self.position = cue_ball + self.config.offset;
        let to_ball = cue_ball - self.position;
        if to_ball.x != 0.0 || to_ball.z != 0.0 {
            self.yaw = to_ball.x.atan2(to_ball.z).to_degrees().rem_euclid(360.0);
        }
        self.pitch = self.config.down_angle;
    }

    /// Hand the view to the overhead camera for the duration of a shot.
    pub fn watch_shot(&mut self) {
        self.cue_stick_visible = false;
        self.mode = CameraMode::Overhead;
    }

    /// Back to aiming for the next shot.
    pub fn resume_aiming(&mut self, cue_ball: Vec3) {
        self.mode = CameraMode::CueStick;
        self.reset(cue_ball);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn reset_looks_at_the_cue_ball() {
        let mut rig = CameraRig::new(CameraConfig::default());
        let cue = Vec3::new(10.0, 0.0, 250.0);
        rig.reset(cue);
        assert!(approx(rig.position, cue + CameraConfig::default().offset));
        // Offset is behind the ball on +Z, so the shot points down -Z.
        assert!(approx(rig.horizontal_forward(), Vec3::NEG_Z));
        assert!(rig.cue_stick_visible);
    }

    #[test]
    fn orbit_keeps_distance_and_facing() {
        let mut rig = CameraRig::new(CameraConfig::default());
        let cue = Vec3::new(0.0, 0.0, 250.0);
        rig.reset(cue);
        let before = (rig.position - cue).length();

        rig.orbit(cue, 90.0);

        assert!(((rig.position - cue).length() - before).abs() < 1e-3);
        let to_ball = (cue - rig.position) * Vec3::new(1.0, 0.0, 1.0);
        assert!(approx(rig.horizontal_forward(), to_ball.normalize()));
    }

    #[test]
    fn horizontal_forward_ignores_pitch() {
        let mut rig = CameraRig::new(CameraConfig::default());
        rig.yaw = 90.0;
        rig.pitch = 60.0;
        assert!(approx(rig.horizontal_forward(), Vec3::X));
    }

    #[test]
    fn watch_and_resume_toggle_modes() {
        let mut rig = CameraRig::new(CameraConfig::default());
        rig.watch_shot();
        assert_eq!(rig.mode, CameraMode::Overhead);
        assert!(!rig.cue_stick_visible);
        rig.resume_aiming(Vec3::ZERO);
        assert!(rig.is_aiming());
        assert!(rig.cue_stick_visible);
    }
}
