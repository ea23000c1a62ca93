//! Actor state for the player and the enemy registry.

use scavenger_core::{EnemyId, Facing, GridPos, PLAYER_STARTING_HEALTH};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Player {
    pub(crate) position: GridPos,
    pub(crate) health: i32,
    pub(crate) score: u32,
    pub(crate) facing: Facing,
}

impl Player {
    /// Player state at the start of a fresh run: entry corner, full health.
    pub(crate) fn fresh() -> Self {
        Self {
            position: GridPos::new(0, 0),
            health: PLAYER_STARTING_HEALTH,
            score: 0,
            facing: Facing::Right,
        }
    }

    pub(crate) fn face_along(&mut self, dx: i32) {
        if let Some(facing) = Facing::from_dx(dx) {
            self.facing = facing;
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: GridPos,
    pub(crate) health: i32,
    pub(crate) damage: i32,
    pub(crate) facing: Facing,
}

impl Enemy {
    pub(crate) fn spawned(id: EnemyId, position: GridPos, health: i32, damage: i32) -> Self {
        Self {
            id,
            position,
            health,
            damage,
            facing: Facing::Left,
        }
    }

    pub(crate) fn face_along(&mut self, dx: i32) {
        if let Some(facing) = Facing::from_dx(dx) {
            self.facing = facing;
        }
    }
}
