use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a ball on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// One of the two players at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::P1, Player::P2];

    /// The opponent.
    pub fn other(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    /// 1-based seat number used in HUD text and events.
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// The object-ball group this player must clear.
    pub fn group(self) -> Group {
        match self {
            Player::P1 => Group::Group1,
            Player::P2 => Group::Group2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// The two object-ball groups (red/blue on the reference table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Group1,
    Group2,
}

impl Group {
    /// The player who owns this group.
    pub fn owner(self) -> Player {
        match self {
            Group::Group1 => Player::P1,
            Group::Group2 => Player::P2,
        }
    }
}

/// What a ball means to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallRole {
    Cue,
    Eight,
    Object(Group),
}

impl BallRole {
    pub fn is_cue(self) -> bool {
        self == BallRole::Cue
    }

    pub fn is_eight(self) -> bool {
        self == BallRole::Eight
    }

    pub fn group(self) -> Option<Group> {
        match self {
            BallRole::Object(group) => Some(group),
            _ => None,
        }
    }
}

/// Fixed-size per-player storage indexed by [`Player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerPlayer<T>(pub [T; 2]);

impl<T: Copy> PerPlayer<T> {
    pub fn splat(value: T) -> Self {
        Self([value; 2])
    }
}

impl<T> std::ops::Index<Player> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        &self.0[player.index()]
    }
}

impl<T> std::ops::IndexMut<Player> for PerPlayer<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        &mut self.0[player.index()]
    }
}

/// A HUD event communicated from Rust to the host page.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_own_their_groups() {
        for player in Player::ALL {
            assert_eq!(player.group().owner(), player);
            assert_eq!(player.other().other(), player);
        }
        assert_eq!(Player::P2.to_string(), "Player 2");
    }

    #[test]
    fn role_queries() {
        assert!(BallRole::Cue.is_cue());
        assert!(!BallRole::Eight.is_cue());
        assert!(BallRole::Eight.is_eight());
        assert_eq!(BallRole::Object(Group::Group2).group(), Some(Group::Group2));
        assert_eq!(BallRole::Cue.group(), None);
    }

    #[test]
    fn per_player_indexing() {
        let mut counts = PerPlayer::splat(7u32);
        counts[Player::P2] -= 1;
        assert_eq!(counts[Player::P1], 7);
        assert_eq!(counts[Player::P2], 6);
    }

    #[test]
    fn game_event_is_four_floats() {
        let events = [GameEvent::new(1.0, 2.0, 3.0, 4.0)];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats.len(), GameEvent::FLOATS);
        assert_eq!(floats[3], 4.0);
    }
}
