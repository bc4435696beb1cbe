//! Shot preview: a private copy of the table that is stepped ahead of time
//! to trace where the cue ball would go. Nothing here touches the live
//! world.

use glam::Vec3;

use crate::api::game::PoolMatch;
use crate::api::types::BallId;
use crate::core::physics::TableWorld;
use crate::core::registry::BallRegistry;
use crate::core::table::{TableGeometry, TablePhysics};

/// A throwaway world holding a snapshot of every ball and cushion.
pub struct GhostTable {
    world: TableWorld,
    geometry: TableGeometry,
    cue: BallId,
}

impl GhostTable {
    /// Snapshot `live`. `None` when there is no cue ball to follow.
    pub fn mirror(live: &TableWorld, balls: &BallRegistry) -> Option<Self> {
        let cue = balls.cue_ball()?.id;
        let mut world = TableWorld::new(live.table());
        for ball in balls.iter() {
            let Some(pos) = live.position(ball.id) else {
                continue;
            };
            world.add_ball(ball.id, pos);
            world.set_velocity(ball.id, live.velocity(ball.id));
        }
        Some(Self {
            geometry: TableGeometry::new(live.table()),
            world,
            cue,
        })
    }

    /// Strike the ghost cue ball and record its position after each of up
    /// to `steps` steps. The trace ends early once the ball stops or drops.
    pub fn trace(mut self, impulse: Vec3, steps: usize, dt: f32, rest_speed: f32) -> Vec<Vec3> {
        let mut path = Vec::with_capacity(steps + 1);
        let Some(mut prev) = self.world.position(self.cue) else {
            return path;
        };
        path.push(prev);

        self.world.apply_impulse(self.cue, impulse);
        for _ in 0..steps {
            self.world.step(dt);
            let Some(pos) = self.world.position(self.cue) else {
                break;
            };
            path.push(pos);
            if self.geometry.pocket_crossed(prev, pos).is_some()
                || self.world.velocity(self.cue).length() < rest_speed
            {
                break;
            }
            prev = pos;
        }
        path
    }
}

impl PoolMatch<TableWorld> {
    /// Predicted cue-ball path for the shot being charged, or empty when
    /// nothing is charging.
    pub fn preview_shot(&self, steps: usize) -> Vec<Vec3> {
        let Some(impulse) = self.shot().pending_impulse(self.camera()) else {
            return Vec::new();
        };
        match GhostTable::mirror(self.physics(), self.balls()) {
            Some(ghost) => ghost.trace(
                impulse,
                steps,
                self.config().fixed_dt,
                self.config().settle.movement_threshold,
            ),
            None => Vec::new(),
        }
    }
}
