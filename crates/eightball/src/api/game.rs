//! The match orchestrator.
//!
//! `PoolMatch` owns the table, the rules, the camera and the HUD, and
//! advances all of them by one fixed tick per [`PoolMatch::update`]. It is
//! generic over [`TablePhysics`] so the rules can run against the rapier
//! table world or against a scripted table in tests.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::api::config::MatchConfig;
use crate::api::error::SetupError;
use crate::api::types::{BallId, BallRole, Player};
use crate::bridge::hud::Hud;
use crate::core::registry::BallRegistry;
use crate::core::table::{TableGeometry, TablePhysics};
use crate::input::queue::{InputFrame, InputQueue};
use crate::rules::camera::CameraRig;
use crate::rules::rack::{RackLayout, BALLS_PER_GROUP};
use crate::rules::shot::ShotController;
use crate::rules::turn::{PocketDisposition, TurnChange, TurnManager};

/// Rack seed used when the config leaves it open.
pub const DEFAULT_SEED: u64 = 0x8BA11;

pub struct PoolMatch<P: TablePhysics> {
    config: MatchConfig,
    physics: P,
    balls: BallRegistry,
    geometry: TableGeometry,
    rack: RackLayout,
    camera: CameraRig,
    shot: ShotController,
    turns: TurnManager,
    hud: Hud,
    rng: SmallRng,
}

impl<P: TablePhysics> PoolMatch<P> {
    /// Validate the config, rack the balls into `physics` and hand the
    /// table to player 1.
    pub fn new(config: MatchConfig, physics: P) -> Result<Self, SetupError> {
        config.validate()?;
        let table = &config.table;
        let rack = RackLayout::new(table.cue_spot, table.rack_apex, table.ball_radius)?;
        let geometry = TableGeometry::new(table);
        let rng = SmallRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));

        let mut game = Self {
            camera: CameraRig::new(config.camera.clone()),
            shot: ShotController::new(config.shot.clone()),
            turns: TurnManager::new(config.settle.clone()),
            hud: Hud::new(BALLS_PER_GROUP),
            balls: BallRegistry::new(),
            geometry,
            rack,
            rng,
            physics,
            config,
        };
        game.setup()?;
        Ok(game)
    }

    /// Throw the current match away and rack a new one.
    pub fn restart(&mut self) -> Result<(), SetupError> {
        log::info!("Restarting match");
        self.setup()
    }

    fn setup(&mut self) -> Result<(), SetupError> {
        self.physics.clear_balls();
        self.balls.clear();

        let balls = &mut self.balls;
        let physics = &mut self.physics;
        self.rack.rack(&mut self.rng, |role, pos| {
            let id = balls.spawn(role, pos);
            physics.add_ball(id, pos);
            id
        });

        let cue = self
            .balls
            .cue_ball()
            .map(|b| b.pos)
            .ok_or(SetupError::MissingCueBall)?;

        self.turns = TurnManager::new(self.config.settle.clone());
        self.shot = ShotController::new(self.config.shot.clone());
        self.camera = CameraRig::new(self.config.camera.clone());
        self.camera.reset(cue);
        self.hud = Hud::new(BALLS_PER_GROUP);
        self.sync_view();

        log::info!("Racked {} balls, {} to break", self.balls.len(), Player::P1);
        Ok(())
    }

    /// One fixed tick: input, physics (accelerated while checking for
    /// rest), pockets, then the settle check.
    pub fn update(&mut self, dt: f32, input: &InputQueue) -> Result<(), SetupError> {
        let frame = input.frame();
        if frame.restart {
            return self.restart();
        }

        if !self.turns.is_over() {
            self.aim(&frame, dt);
        }

        for _ in 0..self.turns.physics_speedup() {
            self.physics.step(dt);
            let pocketed = self.sync_positions();
            if !pocketed.is_empty() {
                self.resolve_pockets(pocketed);
            }
        }

        if let Some(outcome) = self.turns.outcome() {
            self.hud.show_outcome(&outcome);
        } else {
            let threshold = self.config.settle.movement_threshold;
            let (physics, balls) = (&self.physics, &self.balls);
            let change = self.turns.tick_settle(dt, || {
                match balls
                    .iter()
                    .find(|b| physics.velocity(b.id).length() >= threshold)
                {
                    Some(moving) => {
                        log::debug!(
                            "Ball {:?} still rolling at {:.1}",
                            moving.id,
                            physics.velocity(moving.id).length()
                        );
                        false
                    }
                    None => true,
                }
            });
            if let Some(change) = change {
                self.begin_turn(change);
            }
        }

        self.sync_view();
        Ok(())
    }

    fn aim(&mut self, frame: &InputFrame, dt: f32) {
        let Some((cue_id, cue_pos)) = self.balls.cue_ball().map(|b| (b.id, b.pos)) else {
            return;
        };
        if let Some(shot) = self.shot.update(frame, dt, &mut self.camera, cue_pos) {
            self.physics.apply_impulse(cue_id, shot.impulse);
            self.camera.watch_shot();
            self.turns.shot_taken();
        }
    }

    /// Copy positions back from physics, collecting every ball whose path
    /// this step crossed a pocket.
    fn sync_positions(&mut self) -> Vec<(BallId, BallRole)> {
        let mut pocketed = Vec::new();
        for ball in self.balls.iter_mut() {
            let Some(current) = self.physics.position(ball.id) else {
                continue;
            };
            if let Some(pocket) = self.geometry.pocket_crossed(ball.pos, current) {
                log::debug!("{:?} ball {:?} dropped in pocket {}", ball.role, ball.id, pocket);
                pocketed.push((ball.id, ball.role));
            }
            ball.pos = current;
        }
        pocketed
    }

    fn resolve_pockets(&mut self, pocketed: Vec<(BallId, BallRole)>) {
        let head = self.config.table.head_position;
        for (id, disposition) in self.turns.on_pocket_batch(pocketed) {
            match disposition {
                Some(PocketDisposition::Respawn) => {
                    self.physics.place(id, head);
                    if let Some(ball) = self.balls.get_mut(id) {
                        ball.pos = head;
                    }
                }
                // After the match is decided balls just leave the table.
                Some(PocketDisposition::Remove) | None => {
                    self.physics.remove_ball(id);
                    if self.balls.despawn(id).is_none() {
                        log::warn!("Pocket event for unknown ball {:?}", id);
                    }
                }
            }
        }
        for player in Player::ALL {
            self.hud
                .set_balls_remaining(player, self.turns.state().balls_remaining[player]);
        }
    }

    fn begin_turn(&mut self, change: TurnChange) {
        self.shot.rearm();
        match self.balls.cue_ball() {
            Some(cue) => self.camera.resume_aiming(cue.pos),
            None => log::warn!("No cue ball on the table at the start of a turn"),
        }
        self.hud.set_turn(change.player());
    }

    fn sync_view(&mut self) {
        self.hud
            .set_camera(self.camera.mode, self.camera.cue_stick_visible);
        let power = self
            .shot
            .is_charging()
            .then(|| self.shot.power_percent());
        self.hud.set_power(power);
    }

    // ---- Accessors ----

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn balls(&self) -> &BallRegistry {
        &self.balls
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    pub fn turns(&self) -> &TurnManager {
        &self.turns
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Drop HUD events already delivered to the host.
    pub fn clear_events(&mut self) {
        self.hud.clear_events();
    }

    pub fn cue_ball_position(&self) -> Option<Vec3> {
        self.balls.cue_ball().map(|b| b.pos)
    }
}
