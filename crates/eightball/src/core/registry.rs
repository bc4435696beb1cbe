use glam::Vec3;

use crate::api::types::{BallId, BallRole, Group};

/// A ball in play. Velocity lives with the physics side; the registry only
/// mirrors the last synced position.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: BallId,
    pub role: BallRole,
    pub pos: Vec3,
}

/// Owned collection of the balls currently on the table.
/// Flat Vec storage; a rack never holds more than 16 entries.
#[derive(Debug, Clone)]
pub struct BallRegistry {
    balls: Vec<Ball>,
    next_id: u32,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(16),
            next_id: 1,
        }
    }

    /// Add a ball and hand back its freshly minted id.
    pub fn spawn(&mut self, role: BallRole, pos: Vec3) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        self.balls.push(Ball { id, role, pos });
        id
    }

    /// Remove a ball by id. Returns the removed ball if found.
    pub fn despawn(&mut self, id: BallId) -> Option<Ball> {
        let idx = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.swap_remove(idx))
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut()
    }

    /// The first ball with the given role.
    pub fn find_role(&self, role: BallRole) -> Option<&Ball> {
        self.balls.iter().find(|b| b.role == role)
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.role.is_cue())
    }

    /// Number of balls of a group still on the table.
    pub fn count_group(&self, group: Group) -> usize {
        self.balls
            .iter()
            .filter(|b| b.role.group() == Some(group))
            .count()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Drop every ball. Ids keep counting so stale handles never alias.
    pub fn clear(&mut self) {
        self.balls.clear();
    }
}

impl Default for BallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
