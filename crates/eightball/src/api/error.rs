use thiserror::Error;

/// Failures that abort match setup. Rule outcomes (fouls, wins, losses)
/// are state transitions and never surface here.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("ball radius must be positive (got {0})")]
    BallRadius(f32),
    #[error("max draw distance must be positive (got {0})")]
    MaxDraw(f32),
    #[error("settle delay must be positive (got {0})")]
    SettleDelay(f32),
    #[error("movement threshold must be finite and positive (got {0})")]
    MovementThreshold(f32),
    #[error("shot power must be finite (got {0})")]
    ShotPower(f32),
    #[error("rotation speed must be finite (got {0})")]
    RotationSpeed(f32),
    #[error("settle speedup must be at least 1")]
    SettleSpeedup,
    #[error("fixed timestep must be positive (got {0})")]
    FixedDt(f32),
    #[error("table is too small for its cushions ({length} x {width})")]
    TableSize { length: f32, width: f32 },
    #[error("no cue ball on the table")]
    MissingCueBall,
    #[error("bad config: {0}")]
    Config(#[from] serde_json::Error),
}
