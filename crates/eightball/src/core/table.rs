use glam::{Vec2, Vec3};

use crate::api::config::TableConfig;
use crate::api::types::BallId;

/// The physics collaborator the match drives. Implementations own ball
/// velocities and integrate motion; the match only pushes impulses and
/// reads back positions and speeds.
pub trait TablePhysics {
    /// Put a dynamic ball body on the table.
    fn add_ball(&mut self, id: BallId, pos: Vec3);

    /// Take a ball body off the table. Unknown ids are ignored.
    fn remove_ball(&mut self, id: BallId);

    /// Remove every ball body, leaving cushions in place.
    fn clear_balls(&mut self);

    /// Instantaneous impulse on a ball.
    fn apply_impulse(&mut self, id: BallId, impulse: Vec3);

    /// Current linear velocity, zero for unknown ids.
    fn velocity(&self, id: BallId) -> Vec3;

    fn position(&self, id: BallId) -> Option<Vec3>;

    /// Teleport a ball and bring it to a dead stop.
    fn place(&mut self, id: BallId, pos: Vec3);

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);
}

/// Project a table point onto the 2D plane physics runs in (X, Z).
pub fn to_plane(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a plane point back onto the table surface.
pub fn from_plane(v: Vec2) -> Vec3 {
    Vec3::new(v.x, 0.0, v.y)
}

/// An axis-aligned cushion block on the table plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cushion {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Where the pockets and cushions sit for a given table size.
#[derive(Debug, Clone)]
pub struct TableGeometry {
    pub pockets: [Vec2; 6],
    pub cushions: Vec<Cushion>,
    capture_radius: f32,
}

impl TableGeometry {
    pub fn new(table: &TableConfig) -> Self {
        let hw = table.width / 2.0;
        let hl = table.length / 2.0;
        let c = table.cushion;
        let gap = table.pocket_gap;

        let pockets = [
            // Corner pockets
            Vec2::new(-hw, -hl),
            Vec2::new(hw, -hl),
            Vec2::new(-hw, hl),
            Vec2::new(hw, hl),
            // Side pockets on the long rails
            Vec2::new(-hw, 0.0),
            Vec2::new(hw, 0.0),
        ];

        let mut cushions = Vec::with_capacity(6);

        // Long rails, split at the side pockets
        let long_seg = hl - gap - gap / 2.0;
        if long_seg > 0.0 {
            let mid = gap / 2.0 + long_seg / 2.0;
            for x in [-(hw + c / 2.0), hw + c / 2.0] {
                for z in [-mid, mid] {
                    cushions.push(Cushion {
                        center: Vec2::new(x, z),
                        half_extents: Vec2::new(c / 2.0, long_seg / 2.0),
                    });
                }
            }
        }

        // Short rails, one piece between the corner gaps
        let short_seg = table.width - 2.0 * gap;
        if short_seg > 0.0 {
            for z in [-(hl + c / 2.0), hl + c / 2.0] {
                cushions.push(Cushion {
                    center: Vec2::new(0.0, z),
                    half_extents: Vec2::new(short_seg / 2.0, c / 2.0),
                });
            }
        }

        Self {
            pockets,
            cushions,
            capture_radius: table.pocket_radius + table.ball_radius * 0.5,
        }
    }

    /// Index of the pocket a ball fell into while travelling from `prev` to
    /// `current`. Checks the swept segment so fast balls are not missed.
    pub fn pocket_crossed(&self, prev: Vec3, current: Vec3) -> Option<usize> {
        let (p1, p2) = (to_plane(prev), to_plane(current));
        self.pockets
            .iter()
            .position(|&pocket| segment_point_distance(p1, p2, pocket) < self.capture_radius)
    }
}

/// Distance from `point` to the segment `p1`-`p2`.
fn segment_point_distance(p1: Vec2, p2: Vec2, point: Vec2) -> f32 {
    let line = p2 - p1;
    let len_sq = line.length_squared();
    if len_sq < 0.0001 {
        return p1.distance(point);
    }
    let t = ((point - p1).dot(line) / len_sq).clamp(0.0, 1.0);
    (p1 + line * t).distance(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_pockets_and_six_cushions() {
        let geometry = TableGeometry::new(&TableConfig::default());
        assert_eq!(geometry.pockets.len(), 6);
        assert_eq!(geometry.cushions.len(), 6);
    }

    #[test]
    fn cushions_leave_pocket_mouths_open() {
        let table = TableConfig::default();
        let geometry = TableGeometry::new(&table);
        for cushion in &geometry.cushions {
            for pocket in &geometry.pockets {
                let d = (*pocket - cushion.center).abs() - cushion.half_extents;
                assert!(
                    d.x > 0.0 || d.y > 0.0,
                    "cushion {:?} covers pocket {:?}",
                    cushion,
                    pocket
                );
            }
        }
    }

    #[test]
    fn swept_ball_is_captured() {
        let geometry = TableGeometry::new(&TableConfig::default());
        // Passes straight over the (250, 0) side pocket between two samples.
        let prev = Vec3::new(200.0, 0.0, -60.0);
        let current = Vec3::new(300.0, 0.0, 60.0);
        assert_eq!(geometry.pocket_crossed(prev, current), Some(5));
    }

    #[test]
    fn centre_table_is_not_a_pocket() {
        let geometry = TableGeometry::new(&TableConfig::default());
        assert_eq!(geometry.pocket_crossed(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)), None);
    }

    #[test]
    fn segment_distance_clamps_to_ends() {
        let d = segment_point_distance(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0));
        assert!((d - 10.0).abs() < 1e-5);
    }
}
