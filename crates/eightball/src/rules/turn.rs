//! Turn and rule state machine.
//!
//! Pocket events mutate the per-player tallies as they happen; the turn
//! itself only changes hands once the table has settled. A finished match
//! is the [`TurnPhase::Over`] variant, which owns no timer and accepts no
//! further transitions.

use crate::api::config::SettleConfig;
use crate::api::types::{BallId, BallRole, PerPlayer, Player};
use crate::core::time::{SettleStatus, SettleTimer};
use crate::rules::rack::BALLS_PER_GROUP;

/// Tallies that survive across turns.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub current: Player,
    pub balls_remaining: PerPlayer<u32>,
    /// Set once a player's group is cleared; never unset.
    pub winning_shot: PerPlayer<bool>,
    pub pending_swap: bool,
    pub pocketed_this_turn: bool,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            current: Player::P1,
            balls_remaining: PerPlayer::splat(BALLS_PER_GROUP),
            winning_shot: PerPlayer::splat(false),
            pending_swap: false,
            pocketed_this_turn: false,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeReason {
    /// Eight ball sunk after clearing the group.
    PocketedEightBall,
    /// Cue ball sunk while on the eight.
    ScratchOnFinalShot,
    /// Eight ball sunk before clearing the group.
    EarlyEightBall,
}

/// Terminal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Player,
    pub loser: Player,
    pub reason: OutcomeReason,
}

impl Outcome {
    fn won_by(player: Player) -> Self {
        Self {
            winner: player,
            loser: player.other(),
            reason: OutcomeReason::PocketedEightBall,
        }
    }

    fn lost_by(player: Player, reason: OutcomeReason) -> Self {
        Self {
            winner: player.other(),
            loser: player,
            reason,
        }
    }

    /// End-of-match banner text.
    pub fn message(&self) -> String {
        match self.reason {
            OutcomeReason::PocketedEightBall => format!("{} HAS WON!", self.winner),
            OutcomeReason::ScratchOnFinalShot => {
                format!("{} Scratched on their final shot and has lost!", self.loser)
            }
            OutcomeReason::EarlyEightBall => {
                format!("{} Hit in the Eight Ball Too Early and Has Lost!", self.loser)
            }
        }
    }
}

/// What happens to a pocketed ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketDisposition {
    /// Out of play.
    Remove,
    /// Cue ball back to the head position, at rest.
    Respawn,
}

/// How a settled shot hands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnChange {
    /// Same player shoots again.
    Continue(Player),
    /// The opponent is up.
    Swap(Player),
}

impl TurnChange {
    pub fn player(self) -> Player {
        match self {
            TurnChange::Continue(p) | TurnChange::Swap(p) => p,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnPhase {
    /// Waiting for the active player to shoot.
    Aiming,
    /// A shot is rolling; resolves once the table is at rest.
    Settling(SettleTimer),
    /// Terminal.
    Over(Outcome),
}

pub struct TurnManager {
    state: MatchState,
    phase: TurnPhase,
    settle: SettleConfig,
}

impl TurnManager {
    pub fn new(settle: SettleConfig) -> Self {
        Self {
            state: MatchState::new(),
            phase: TurnPhase::Aiming,
            settle,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn current_player(&self) -> Player {
        self.state.current
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            TurnPhase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::Over(_))
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.phase, TurnPhase::Settling(_))
    }

    /// The active player struck the cue ball.
    pub fn shot_taken(&mut self) {
        match self.phase {
            TurnPhase::Aiming => {
                log::debug!("{} shot, waiting for the table to settle", self.state.current);
                self.phase = TurnPhase::Settling(SettleTimer::new(self.settle.delay));
            }
            TurnPhase::Settling(_) | TurnPhase::Over(_) => {}
        }
    }

    /// Apply the rules for one ball dropping. `None` once the match is over.
    pub fn on_pocket(&mut self, role: BallRole) -> Option<PocketDisposition> {
        if self.is_over() {
            return None;
        }

        let current = self.state.current;
        self.state.pocketed_this_turn = true;

        let disposition = match role {
            BallRole::Cue => {
                if self.state.winning_shot[current] {
                    self.finish(Outcome::lost_by(current, OutcomeReason::ScratchOnFinalShot));
                    PocketDisposition::Remove
                } else {
                    log::info!("{} scratched, turn passes", current);
                    self.state.pending_swap = true;
                    PocketDisposition::Respawn
                }
            }
            BallRole::Eight => {
                if self.state.winning_shot[current] {
                    self.finish(Outcome::won_by(current));
                } else {
                    self.finish(Outcome::lost_by(current, OutcomeReason::EarlyEightBall));
                }
                PocketDisposition::Remove
            }
            BallRole::Object(group) => {
                let owner = group.owner();
                let remaining = &mut self.state.balls_remaining[owner];
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 && !self.state.winning_shot[owner] {
                    self.state.winning_shot[owner] = true;
                    log::info!("{} cleared their group and is on the eight", owner);
                }
                if group != current.group() {
                    self.state.pending_swap = true;
                }
                PocketDisposition::Remove
            }
        };
        Some(disposition)
    }

    /// Apply one physics step's worth of pocket events. Group balls are
    /// resolved first, then the cue ball, then the eight, so clearing the
    /// group and sinking the eight on the same step counts as a win.
    /// Events after the match ends come back with no disposition.
    pub fn on_pocket_batch(
        &mut self,
        mut batch: Vec<(BallId, BallRole)>,
    ) -> Vec<(BallId, Option<PocketDisposition>)> {
        batch.sort_by_key(|&(_, role)| {
            if role.is_eight() {
                2
            } else if role.is_cue() {
                1
            } else {
                0
            }
        });
        batch
            .into_iter()
            .map(|(id, role)| (id, self.on_pocket(role)))
            .collect()
    }

    /// Physics steps per tick: accelerated while checking for rest.
    pub fn physics_speedup(&self) -> u32 {
        match &self.phase {
            TurnPhase::Settling(timer) if timer.status() == SettleStatus::Checking => {
                self.settle.speedup
            }
            _ => 1,
        }
    }

    /// Advance the settle wait. Once the delay has run out, `at_rest` is
    /// polled every tick; when it reports true the turn resolves.
    pub fn tick_settle(&mut self, dt: f32, at_rest: impl FnOnce() -> bool) -> Option<TurnChange> {
        let TurnPhase::Settling(timer) = &mut self.phase else {
            return None;
        };
        if timer.advance(dt) == SettleStatus::Waiting || !at_rest() {
            return None;
        }

        let change = if self.state.pending_swap || !self.state.pocketed_this_turn {
            self.state.current = self.state.current.other();
            self.state.pending_swap = false;
            log::info!("Turn passes to {}", self.state.current);
            TurnChange::Swap(self.state.current)
        } else {
            log::info!("{} shoots again", self.state.current);
            TurnChange::Continue(self.state.current)
        };
        self.state.pocketed_this_turn = false;
        self.phase = TurnPhase::Aiming;
        Some(change)
    }

    fn finish(&mut self, outcome: Outcome) {
        log::info!("Match over: {}", outcome.message());
        self.phase = TurnPhase::Over(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Group;

    const RED: BallRole = BallRole::Object(Group::Group1);
    const BLUE: BallRole = BallRole::Object(Group::Group2);

    fn turns() -> TurnManager {
        TurnManager::new(SettleConfig {
            delay: 0.1,
            movement_threshold: 1.0,
            speedup: 3,
        })
    }

    /// Shoot, run whatever pockets happen, then let the table settle.
    fn play(tm: &mut TurnManager, pockets: &[BallRole]) -> Option<TurnChange> {
        tm.shot_taken();
        for &role in pockets {
            tm.on_pocket(role);
        }
        let mut change = None;
        for _ in 0..20 {
            change = change.or(tm.tick_settle(0.05, || true));
        }
        change
    }

    fn clear_group(tm: &mut TurnManager, role: BallRole) {
        for _ in 0..BALLS_PER_GROUP {
            tm.on_pocket(role);
        }
    }

    #[test]
    fn starts_with_player_one_and_full_racks() {
        let tm = turns();
        assert_eq!(tm.current_player(), Player::P1);
        assert_eq!(tm.state().balls_remaining, PerPlayer([7, 7]));
        assert_eq!(tm.state().winning_shot, PerPlayer([false, false]));
        assert_eq!(tm.phase(), &TurnPhase::Aiming);
    }

    #[test]
    fn own_ball_keeps_the_table_opponent_ball_passes_it() {
        let mut tm = turns();
        assert_eq!(play(&mut tm, &[RED]), Some(TurnChange::Continue(Player::P1)));
        assert_eq!(tm.state().balls_remaining[Player::P1], 6);

        assert_eq!(play(&mut tm, &[BLUE]), Some(TurnChange::Swap(Player::P2)));
        assert_eq!(tm.state().balls_remaining[Player::P2], 6);
        assert!(!tm.state().pending_swap);
    }

    #[test]
    fn empty_shot_passes_the_turn() {
        let mut tm = turns();
        assert_eq!(play(&mut tm, &[]), Some(TurnChange::Swap(Player::P2)));
        assert_eq!(play(&mut tm, &[]), Some(TurnChange::Swap(Player::P1)));
    }

    #[test]
    fn settle_waits_for_delay_and_rest() {
        let mut tm = turns();
        tm.shot_taken();
        assert_eq!(tm.physics_speedup(), 1);
        assert_eq!(tm.tick_settle(0.05, || true), None);
        assert_eq!(tm.tick_settle(0.06, || false), None);
        assert_eq!(tm.physics_speedup(), 3);
        assert!(tm.is_settling());
        assert!(tm.tick_settle(0.05, || true).is_some());
        assert_eq!(tm.phase(), &TurnPhase::Aiming);
        assert_eq!(tm.physics_speedup(), 1);
    }

    #[test]
    fn settle_is_a_no_op_without_a_shot() {
        let mut tm = turns();
        assert_eq!(tm.tick_settle(10.0, || true), None);
    }

    #[test]
    fn eligibility_flips_once() {
        let mut tm = turns();
        clear_group(&mut tm, RED);
        assert!(tm.state().winning_shot[Player::P1]);
        assert_eq!(tm.state().balls_remaining[Player::P1], 0);

        // Stray extra pockets neither underflow nor unset the flag.
        tm.on_pocket(RED);
        assert_eq!(tm.state().balls_remaining[Player::P1], 0);
        assert!(tm.state().winning_shot[Player::P1]);
        assert!(!tm.state().winning_shot[Player::P2]);
    }

    #[test]
    fn opponent_clearing_makes_them_eligible() {
        let mut tm = turns();
        clear_group(&mut tm, BLUE);
        assert!(tm.state().winning_shot[Player::P2]);
        assert!(!tm.state().winning_shot[Player::P1]);
        assert!(tm.state().pending_swap);
    }

    #[test]
    fn scratch_before_eligibility_is_only_a_foul() {
        let mut tm = turns();
        tm.shot_taken();
        assert_eq!(tm.on_pocket(BallRole::Cue), Some(PocketDisposition::Respawn));
        assert!(!tm.is_over());
        assert!(tm.state().pending_swap);
        assert_eq!(
            tm.tick_settle(1.0, || true).or_else(|| tm.tick_settle(1.0, || true)),
            Some(TurnChange::Swap(Player::P2))
        );
    }

    #[test]
    fn scratch_on_final_shot_loses() {
        let mut tm = turns();
        clear_group(&mut tm, RED);
        tm.shot_taken();
        assert_eq!(tm.on_pocket(BallRole::Cue), Some(PocketDisposition::Remove));

        let outcome = tm.outcome().expect("match should be over");
        assert_eq!(outcome.loser, Player::P1);
        assert_eq!(outcome.winner, Player::P2);
        assert_eq!(outcome.reason, OutcomeReason::ScratchOnFinalShot);
        assert_eq!(
            outcome.message(),
            "Player 1 Scratched on their final shot and has lost!"
        );
    }

    #[test]
    fn early_eight_loses() {
        let mut tm = turns();
        tm.shot_taken();
        tm.on_pocket(BallRole::Eight);
        let outcome = tm.outcome().expect("match should be over");
        assert_eq!(outcome.loser, Player::P1);
        assert_eq!(outcome.reason, OutcomeReason::EarlyEightBall);
        assert_eq!(
            outcome.message(),
            "Player 1 Hit in the Eight Ball Too Early and Has Lost!"
        );
    }

    #[test]
    fn eight_after_clearing_wins() {
        let mut tm = turns();
        // P1 misses, P2 clears and sinks the eight.
        play(&mut tm, &[]);
        clear_group(&mut tm, BLUE);
        tm.shot_taken();
        tm.on_pocket(BallRole::Eight);
        let outcome = tm.outcome().expect("match should be over");
        assert_eq!(outcome.winner, Player::P2);
        assert_eq!(outcome.message(), "Player 2 HAS WON!");
    }

    #[test]
    fn eight_while_only_the_opponent_is_eligible_still_loses() {
        let mut tm = turns();
        clear_group(&mut tm, BLUE);
        tm.on_pocket(BallRole::Eight);
        assert_eq!(tm.outcome().map(|o| o.loser), Some(Player::P1));
    }

    #[test]
    fn over_is_terminal() {
        let mut tm = turns();
        tm.shot_taken();
        tm.on_pocket(BallRole::Eight);
        let outcome = tm.outcome();

        assert_eq!(tm.on_pocket(RED), None);
        assert_eq!(tm.on_pocket(BallRole::Cue), None);
        tm.shot_taken();
        assert_eq!(tm.tick_settle(10.0, || true), None);
        assert_eq!(tm.physics_speedup(), 1);
        assert_eq!(tm.outcome(), outcome);
        assert_eq!(tm.state().balls_remaining[Player::P1], 7);
    }

    #[test]
    fn batch_resolves_group_before_eight() {
        let mut tm = turns();
        for _ in 0..BALLS_PER_GROUP - 1 {
            tm.on_pocket(RED);
        }
        tm.shot_taken();
        let results = tm.on_pocket_batch(vec![(BallId(8), BallRole::Eight), (BallId(3), RED)]);

        assert_eq!(results[0], (BallId(3), Some(PocketDisposition::Remove)));
        assert_eq!(results[1], (BallId(8), Some(PocketDisposition::Remove)));
        assert_eq!(tm.outcome().map(|o| o.winner), Some(Player::P1));
    }

    #[test]
    fn batch_after_the_end_has_no_dispositions() {
        let mut tm = turns();
        tm.shot_taken();
        let results = tm.on_pocket_batch(vec![
            (BallId(1), BallRole::Cue),
            (BallId(8), BallRole::Eight),
            (BallId(2), BLUE),
        ]);
        // Blue, then cue (foul), then the eight ends it.
        assert_eq!(results[0], (BallId(2), Some(PocketDisposition::Remove)));
        assert_eq!(results[1], (BallId(1), Some(PocketDisposition::Respawn)));
        assert_eq!(results[2], (BallId(8), Some(PocketDisposition::Remove)));
        assert!(tm.is_over());
        assert_eq!(tm.on_pocket_batch(vec![(BallId(4), RED)]), vec![(BallId(4), None)]);
    }
}
