use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::error::SetupError;

/// Table geometry and ball material. Units are table units with the table
/// centred on the origin: X across the width, Z along the length, Y up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Playing surface length along Z (cushion face to cushion face).
    pub length: f32,
    /// Playing surface width along X.
    pub width: f32,
    /// Cushion thickness outside the playing surface.
    pub cushion: f32,
    /// Gap left in the cushions at every pocket mouth.
    pub pocket_gap: f32,
    /// Capture radius around each pocket centre.
    pub pocket_radius: f32,
    pub ball_radius: f32,
    /// Where the cue ball is placed at setup.
    pub cue_spot: Vec3,
    /// Apex of the rack; rows grow toward -Z from here.
    pub rack_apex: Vec3,
    /// Where a scratched cue ball is put back.
    pub head_position: Vec3,
    /// Felt friction (higher = stops faster).
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    pub cushion_restitution: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            length: 1000.0,
            width: 500.0,
            cushion: 35.0,
            pocket_gap: 40.0,
            pocket_radius: 22.0,
            ball_radius: 12.0,
            cue_spot: Vec3::new(0.0, 0.0, 250.0),
            rack_apex: Vec3::new(0.0, 0.0, -250.0),
            head_position: Vec3::new(0.0, 0.0, 250.0),
            linear_damping: 1.75,
            angular_damping: 1.0,
            restitution: 0.95,
            friction: 0.2,
            density: 0.01,
            cushion_restitution: 0.95,
        }
    }
}

/// Aiming and shot power.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    /// Orbit speed in degrees per second per unit of horizontal pointer delta.
    pub rotation_speed: f32,
    /// Largest draw-back magnitude, in pointer units.
    pub max_draw: f32,
    /// Impulse per unit of draw.
    pub power: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 200.0,
            max_draw: 10.0,
            power: 250.0,
        }
    }
}

/// The aiming camera's rest pose relative to the cue ball.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub offset: Vec3,
    /// Downward pitch in degrees applied on reset.
    pub down_angle: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 120.0, 300.0),
            down_angle: 20.0,
        }
    }
}

/// When a shot counts as finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    /// Seconds to wait after the shot before checking for rest.
    pub delay: f32,
    /// A ball slower than this is at rest.
    pub movement_threshold: f32,
    /// Physics steps per tick once the delay has elapsed.
    pub speedup: u32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            delay: 3.0,
            movement_threshold: 5.0,
            speedup: 3,
        }
    }
}

/// Everything a match needs, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub table: TableConfig,
    pub shot: ShotConfig,
    pub camera: CameraConfig,
    pub settle: SettleConfig,
    /// Fixed timestep in seconds.
    pub fixed_dt: f32,
    /// Rack shuffle seed. `None` lets the host pick one.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            shot: ShotConfig::default(),
            camera: CameraConfig::default(),
            settle: SettleConfig::default(),
            fixed_dt: 1.0 / 60.0,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry and timing that cannot produce a playable table.
    pub fn validate(&self) -> Result<(), SetupError> {
        let table = &self.table;
        if !(table.ball_radius > 0.0) {
            return Err(SetupError::BallRadius(table.ball_radius));
        }
        if !(self.shot.max_draw > 0.0) {
            return Err(SetupError::MaxDraw(self.shot.max_draw));
        }
        if !(self.settle.delay > 0.0) {
            return Err(SetupError::SettleDelay(self.settle.delay));
        }
        if !(self.settle.movement_threshold.is_finite() && self.settle.movement_threshold > 0.0) {
            return Err(SetupError::MovementThreshold(self.settle.movement_threshold));
        }
        if !self.shot.power.is_finite() {
            return Err(SetupError::ShotPower(self.shot.power));
        }
        if !self.shot.rotation_speed.is_finite() {
            return Err(SetupError::RotationSpeed(self.shot.rotation_speed));
        }
        if self.settle.speedup == 0 {
            return Err(SetupError::SettleSpeedup);
        }
        if !(self.fixed_dt > 0.0) {
            return Err(SetupError::FixedDt(self.fixed_dt));
        }
        let min_side = 2.0 * (table.pocket_gap + table.ball_radius * 2.0);
        if table.length <= min_side || table.width <= min_side {
            return Err(SetupError::TableSize {
                length: table.length,
                width: table.width,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MatchConfig::from_json(r#"{ "settle": { "delay": 1.5 }, "seed": 9 }"#)
            .expect("config should parse");
        assert!((config.settle.delay - 1.5).abs() < 1e-6);
        assert_eq!(config.settle.speedup, 3);
        assert_eq!(config.seed, Some(9));
        assert!((config.fixed_dt - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let err = MatchConfig::from_json(r#"{ "table": { "ball_radius": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SetupError::BallRadius(_)));
    }

    #[test]
    fn movement_threshold_must_be_finite_and_positive() {
        for threshold in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut config = MatchConfig::default();
            config.settle.movement_threshold = threshold;
            assert!(
                matches!(config.validate(), Err(SetupError::MovementThreshold(_))),
                "threshold {} accepted",
                threshold
            );
        }
    }

    #[test]
    fn shot_tuning_must_be_finite() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let mut config = MatchConfig::default();
            config.shot.power = bad;
            assert!(matches!(config.validate(), Err(SetupError::ShotPower(_))));

            let mut config = MatchConfig::default();
            config.shot.rotation_speed = bad;
            assert!(matches!(config.validate(), Err(SetupError::RotationSpeed(_))));
        }
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = MatchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }
}
