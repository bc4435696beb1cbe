pub mod api;
pub mod core;
pub mod rules;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{CameraConfig, MatchConfig, SettleConfig, ShotConfig, TableConfig};
pub use api::error::SetupError;
pub use api::game::{PoolMatch, DEFAULT_SEED};
pub use api::types::{BallId, BallRole, GameEvent, Group, PerPlayer, Player};
pub use bridge::hud::Hud;
pub use bridge::protocol::{BallInstance, FrameBuffer, ProtocolLayout};
pub use crate::core::registry::{Ball, BallRegistry};
pub use crate::core::table::{TableGeometry, TablePhysics};
pub use crate::core::time::{FixedTimestep, SettleStatus, SettleTimer};
pub use input::queue::{InputEvent, InputFrame, InputQueue};
pub use rules::camera::{CameraMode, CameraRig};
pub use rules::rack::{Placement, RackLayout};
pub use rules::shot::{Shot, ShotController, ShotState};
pub use rules::turn::{
    MatchState, Outcome, OutcomeReason, PocketDisposition, TurnChange, TurnManager, TurnPhase,
};

#[cfg(feature = "physics")]
pub use crate::core::ghost::GhostTable;
#[cfg(feature = "physics")]
pub use crate::core::physics::TableWorld;
