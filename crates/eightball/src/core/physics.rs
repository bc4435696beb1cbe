use std::collections::HashMap;

use glam::{Vec2, Vec3};
use rapier2d::prelude::*;

use crate::api::config::TableConfig;
use crate::api::types::BallId;
use crate::core::table::{from_plane, to_plane, TableGeometry, TablePhysics};

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Handle pair for one body, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
struct PhysicsBody {
    body_handle: RigidBodyHandle,
    collider_handle: ColliderHandle,
}

// ---------------------------------------------------------------------------
// TableWorld
// ---------------------------------------------------------------------------

/// Top-down Rapier2D world for one table: table X/Z map to physics X/Y,
/// zero gravity, cushions fixed, balls dynamic with felt damping.
pub struct TableWorld {
    table: TableConfig,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    balls: HashMap<BallId, PhysicsBody>,
    cushions: Vec<PhysicsBody>,
}

impl TableWorld {
    /// Build an empty table with its cushions in place.
    pub fn new(table: &TableConfig) -> Self {
        let mut world = Self {
            table: table.clone(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            balls: HashMap::with_capacity(16),
            cushions: Vec::with_capacity(6),
        };
        world.build_cushions();
        world
    }

    pub fn table(&self) -> &TableConfig {
        &self.table
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn cushion_count(&self) -> usize {
        self.cushions.len()
    }

    /// Number of rigid bodies in the simulation (balls + cushions).
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Overwrite a ball's linear velocity.
    pub fn set_velocity(&mut self, id: BallId, vel: Vec3) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.set_linvel(vec2_to_na(to_plane(vel)), true);
        }
    }

    /// Radius the collider was actually built with.
    pub fn ball_radius(&self, id: BallId) -> Option<f32> {
        let body = self.balls.get(&id)?;
        let collider = self.colliders.get(body.collider_handle)?;
        collider.shape().as_ball().map(|ball| ball.radius)
    }

    fn build_cushions(&mut self) {
        let geometry = TableGeometry::new(&self.table);
        for cushion in &geometry.cushions {
            let rb = RigidBodyBuilder::fixed()
                .translation(vec2_to_na(cushion.center))
                .build();
            let body_handle = self.bodies.insert(rb);
            let collider = ColliderBuilder::cuboid(cushion.half_extents.x, cushion.half_extents.y)
                .restitution(self.table.cushion_restitution)
                .friction(self.table.friction)
                .build();
            let collider_handle =
                self.colliders
                    .insert_with_parent(collider, body_handle, &mut self.bodies);
            self.cushions.push(PhysicsBody {
                body_handle,
                collider_handle,
            });
        }
        log::debug!("Table built with {} cushions", self.cushions.len());
    }

    fn rigid_body(&self, id: BallId) -> Option<&RigidBody> {
        self.balls
            .get(&id)
            .and_then(|body| self.bodies.get(body.body_handle))
    }

    fn rigid_body_mut(&mut self, id: BallId) -> Option<&mut RigidBody> {
        let handle = self.balls.get(&id)?.body_handle;
        self.bodies.get_mut(handle)
    }
}

impl TablePhysics for TableWorld {
    fn add_ball(&mut self, id: BallId, pos: Vec3) {
        self.remove_ball(id);

        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(to_plane(pos)))
            .ccd_enabled(true)
            .linear_damping(self.table.linear_damping)
            .angular_damping(self.table.angular_damping)
            .build();
        let body_handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(self.table.ball_radius)
            .restitution(self.table.restitution)
            .friction(self.table.friction)
            .density(self.table.density)
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.balls.insert(
            id,
            PhysicsBody {
                body_handle,
                collider_handle,
            },
        );
    }

    fn remove_ball(&mut self, id: BallId) {
        if let Some(body) = self.balls.remove(&id) {
            self.bodies.remove(
                body.body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn clear_balls(&mut self) {
        let ids: Vec<BallId> = self.balls.keys().copied().collect();
        for id in ids {
            self.remove_ball(id);
        }
    }

    fn apply_impulse(&mut self, id: BallId, impulse: Vec3) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.apply_impulse(vec2_to_na(to_plane(impulse)), true);
        }
    }

    fn velocity(&self, id: BallId) -> Vec3 {
        self.rigid_body(id)
            .map(|rb| from_plane(na_to_vec2(rb.linvel())))
            .unwrap_or(Vec3::ZERO)
    }

    fn position(&self, id: BallId) -> Option<Vec3> {
        self.rigid_body(id)
            .map(|rb| from_plane(na_to_vec2(&rb.position().translation.vector)))
    }

    fn place(&mut self, id: BallId, pos: Vec3) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.set_translation(vec2_to_na(to_plane(pos)), true);
            rb.set_linvel(nalgebra::Vector2::zeros(), true);
            rb.set_angvel(0.0, true);
        }
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &nalgebra::Vector2::zeros(),
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> TableWorld {
        TableWorld::new(&TableConfig::default())
    }

    #[test]
    fn cushions_are_built_up_front() {
        let world = world();
        assert_eq!(world.cushion_count(), 6);
        assert_eq!(world.ball_count(), 0);
        assert_eq!(world.body_count(), 6);
    }

    #[test]
    fn add_and_remove_ball() {
        let mut world = world();
        world.add_ball(BallId(1), Vec3::new(10.0, 0.0, 20.0));
        assert_eq!(world.ball_count(), 1);
        let pos = world.position(BallId(1)).unwrap();
        assert!((pos - Vec3::new(10.0, 0.0, 20.0)).length() < 1e-4);
        assert_eq!(world.ball_radius(BallId(1)), Some(12.0));

        world.remove_ball(BallId(1));
        assert_eq!(world.ball_count(), 0);
        assert_eq!(world.body_count(), 6);
        assert!(world.position(BallId(1)).is_none());
    }

    #[test]
    fn impulse_moves_ball_along_the_table_plane() {
        let mut world = world();
        world.add_ball(BallId(1), Vec3::ZERO);
        world.apply_impulse(BallId(1), Vec3::new(0.0, 0.0, -500.0));
        world.step(DT);

        let vel = world.velocity(BallId(1));
        assert!(vel.z < 0.0, "ball should head down -Z: {:?}", vel);
        assert_eq!(vel.y, 0.0);
        assert!(vel.x.abs() < 1e-3);
    }

    #[test]
    fn felt_brings_ball_to_rest() {
        let mut world = world();
        world.add_ball(BallId(1), Vec3::ZERO);
        world.set_velocity(BallId(1), Vec3::new(100.0, 0.0, 0.0));
        for _ in 0..600 {
            world.step(DT);
        }
        assert!(world.velocity(BallId(1)).length() < 5.0);
    }

    #[test]
    fn cushion_turns_ball_back() {
        let mut world = world();
        world.add_ball(BallId(1), Vec3::new(150.0, 0.0, 200.0));
        world.set_velocity(BallId(1), Vec3::new(400.0, 0.0, 0.0));
        for _ in 0..120 {
            world.step(DT);
        }
        let pos = world.position(BallId(1)).unwrap();
        assert!(pos.x < 250.0, "ball went through the rail: {:?}", pos);
    }

    #[test]
    fn place_stops_the_ball() {
        let mut world = world();
        world.add_ball(BallId(1), Vec3::ZERO);
        world.set_velocity(BallId(1), Vec3::new(300.0, 0.0, 300.0));
        world.place(BallId(1), Vec3::new(0.0, 0.0, 250.0));
        assert_eq!(world.velocity(BallId(1)), Vec3::ZERO);
        let pos = world.position(BallId(1)).unwrap();
        assert!((pos - Vec3::new(0.0, 0.0, 250.0)).length() < 1e-4);
    }

    #[test]
    fn clear_balls_keeps_cushions() {
        let mut world = world();
        for i in 0..4 {
            world.add_ball(BallId(i), Vec3::new(i as f32 * 30.0, 0.0, 0.0));
        }
        world.clear_balls();
        assert_eq!(world.ball_count(), 0);
        assert_eq!(world.cushion_count(), 6);
        assert_eq!(world.body_count(), 6);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut world = world();
        world.apply_impulse(BallId(9), Vec3::X);
        world.place(BallId(9), Vec3::ZERO);
        world.remove_ball(BallId(9));
        assert_eq!(world.velocity(BallId(9)), Vec3::ZERO);
    }
}
