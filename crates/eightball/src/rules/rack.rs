//! Initial table layout: the cue ball on its spot and a five-row triangle
//! of object balls with the eight fixed in the middle of the third row.

use glam::Vec3;
use rand::Rng;

use crate::api::error::SetupError;
use crate::api::types::{BallRole, Group};

/// Object balls per group in a full rack.
pub const BALLS_PER_GROUP: u32 = 7;

/// Rows in the triangle (row `i` holds `i + 1` balls).
pub const RACK_ROWS: usize = 5;

/// Row and slot of the eight ball.
pub const EIGHT_SLOT: (usize, usize) = (2, 1);

/// One ball to create at setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub role: BallRole,
    pub pos: Vec3,
    /// `(row, slot)` inside the triangle, `None` for the cue ball.
    pub rack_slot: Option<(usize, usize)>,
}

/// Computes where every ball starts.
#[derive(Debug, Clone, Copy)]
pub struct RackLayout {
    pub cue_spot: Vec3,
    pub apex: Vec3,
    pub ball_radius: f32,
}

impl RackLayout {
    pub fn new(cue_spot: Vec3, apex: Vec3, ball_radius: f32) -> Result<Self, SetupError> {
        if !(ball_radius > 0.0) {
            return Err(SetupError::BallRadius(ball_radius));
        }
        Ok(Self {
            cue_spot,
            apex,
            ball_radius,
        })
    }

    /// All sixteen placements: cue ball first, then the rack row by row.
    /// Group for each non-eight slot is a coin flip while both groups have
    /// balls left, otherwise whichever group still has some.
    pub fn plan(&self, rng: &mut impl Rng) -> Vec<Placement> {
        let r = self.ball_radius;
        let diameter = r * 2.0;
        let row_step = Vec3::NEG_Z * (3.0f32.sqrt() * r) + Vec3::NEG_X * r;

        let mut placements = Vec::with_capacity(16);
        placements.push(Placement {
            role: BallRole::Cue,
            pos: self.cue_spot,
            rack_slot: None,
        });

        let mut remaining = [BALLS_PER_GROUP, BALLS_PER_GROUP];
        let mut row_origin = self.apex;

        for row in 0..RACK_ROWS {
            let mut pos = row_origin;
            for slot in 0..=row {
                let role = if (row, slot) == EIGHT_SLOT {
                    BallRole::Eight
                } else {
                    assert!(
                        remaining[0] + remaining[1] > 0,
                        "rack ran out of object balls at row {} slot {}",
                        row,
                        slot
                    );
                    let group = match (remaining[0] > 0, remaining[1] > 0) {
                        (true, true) => {
                            if rng.random_bool(0.5) {
                                Group::Group1
                            } else {
                                Group::Group2
                            }
                        }
                        (true, false) => Group::Group1,
                        _ => Group::Group2,
                    };
                    match group {
                        Group::Group1 => remaining[0] -= 1,
                        Group::Group2 => remaining[1] -= 1,
                    }
                    BallRole::Object(group)
                };

                placements.push(Placement {
                    role,
                    pos,
                    rack_slot: Some((row, slot)),
                });
                pos += Vec3::X * diameter;
            }
            row_origin += row_step;
        }

        placements
    }

    /// Run the plan through a ball factory, returning whatever it hands back.
    pub fn rack<T>(
        &self,
        rng: &mut impl Rng,
        mut factory: impl FnMut(BallRole, Vec3) -> T,
    ) -> Vec<T> {
        self.plan(rng)
            .into_iter()
            .map(|p| factory(p.role, p.pos))
            .collect()
    }
}
