//! Text surfaces shown to the players.
//!
//! The host reads the HUD either as a JSON snapshot or as a stream of
//! compact [`GameEvent`] records emitted whenever a surface changes.

use serde::Serialize;

use crate::api::types::{GameEvent, PerPlayer, Player};
use crate::rules::camera::CameraMode;
use crate::rules::turn::{Outcome, OutcomeReason};

/// Event kinds sent to the host.
pub mod kinds {
    /// a = player number, b = balls remaining.
    pub const BALLS_REMAINING: f32 = 1.0;
    /// a = player number now at the table.
    pub const TURN: f32 = 2.0;
    /// a = power percent, or -1 when the cue is not charging.
    pub const POWER: f32 = 3.0;
    /// a = winner, b = loser, c = reason code.
    pub const GAME_OVER: f32 = 4.0;
    /// a = 0 aiming view, 1 overhead view.
    pub const CAMERA: f32 = 5.0;
}

fn reason_code(reason: OutcomeReason) -> f32 {
    match reason {
        OutcomeReason::PocketedEightBall => 0.0,
        OutcomeReason::ScratchOnFinalShot => 1.0,
        OutcomeReason::EarlyEightBall => 2.0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub balls_remaining: PerPlayer<String>,
    pub turn: String,
    /// Shown only while charging.
    pub power: Option<String>,
    /// End-of-match banner.
    pub message: Option<String>,
    pub restart_visible: bool,
    pub cue_stick_visible: bool,
    pub overhead_view: bool,
    #[serde(skip)]
    events: Vec<GameEvent>,
    #[serde(skip)]
    power_percent: Option<u32>,
}

impl Hud {
    pub fn new(start_count: u32) -> Self {
        let mut hud = Self {
            balls_remaining: PerPlayer::default(),
            turn: String::new(),
            power: None,
            message: None,
            restart_visible: false,
            cue_stick_visible: true,
            overhead_view: false,
            events: Vec::with_capacity(8),
            power_percent: None,
        };
        for player in Player::ALL {
            hud.set_balls_remaining(player, start_count);
        }
        hud.set_turn(Player::P1);
        hud
    }

    pub fn set_balls_remaining(&mut self, player: Player, count: u32) {
        let text = format!("{} Balls Remaining: {}", player, count);
        if self.balls_remaining[player] != text {
            self.balls_remaining[player] = text;
            self.events.push(GameEvent::new(
                kinds::BALLS_REMAINING,
                player.number() as f32,
                count as f32,
                0.0,
            ));
        }
    }

    pub fn set_turn(&mut self, player: Player) {
        let text = format!("Current Turn: {}", player);
        if self.turn != text {
            self.turn = text;
            self.events
                .push(GameEvent::new(kinds::TURN, player.number() as f32, 0.0, 0.0));
        }
    }

    /// `Some(percent)` while charging, `None` to hide the readout.
    pub fn set_power(&mut self, percent: Option<u32>) {
        if self.power_percent == percent {
            return;
        }
        self.power_percent = percent;
        self.power = percent.map(|p| format!("Power: {}%", p));
        let a = percent.map_or(-1.0, |p| p as f32);
        self.events.push(GameEvent::new(kinds::POWER, a, 0.0, 0.0));
    }

    pub fn set_camera(&mut self, mode: CameraMode, cue_stick_visible: bool) {
        let overhead = mode == CameraMode::Overhead;
        self.cue_stick_visible = cue_stick_visible;
        if self.overhead_view != overhead {
            self.overhead_view = overhead;
            self.events.push(GameEvent::new(
                kinds::CAMERA,
                if overhead { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ));
        }
    }

    /// Banner plus restart affordance.
    pub fn show_outcome(&mut self, outcome: &Outcome) {
        if self.restart_visible {
            return;
        }
        self.message = Some(outcome.message());
        self.restart_visible = true;
        self.power = None;
        self.power_percent = None;
        self.events.push(GameEvent::new(
            kinds::GAME_OVER,
            outcome.winner.number() as f32,
            outcome.loser.number() as f32,
            reason_code(outcome.reason),
        ));
    }

    /// Events emitted since the last [`Hud::clear_events`].
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
