#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy pursuit system.
//!
//! Enemies act only when the world announces the end of the player's turn.
//! Each enemy takes one greedy step along the axis with the larger distance
//! to the player, perturbed by a single random draw per enemy: a quarter of
//! the time the step flips to the other axis, and a tenth of the time it
//! reverses away from the player entirely.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scavenger_core::{Command, EnemySnapshot, Event, GridPos, Step};

const WRONG_AXIS_CHANCE: f32 = 0.25;
const RETREAT_CHANCE: f32 = 0.10;

/// Configuration parameters required to construct the enemy AI system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits one pursuit step per enemy per player turn.
#[derive(Debug)]
pub struct EnemyAi {
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates a new enemy AI system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable snapshots to emit move commands.
    ///
    /// Enemies are iterated in snapshot order, so identical seeds and event
    /// streams reproduce the identical command sequence.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: GridPos,
        enemies: &[EnemySnapshot],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if !matches!(event, Event::PlayerTurnEnded) {
                continue;
            }
            for enemy in enemies {
                let draw = self.rng.gen::<f32>();
                out.push(Command::MoveEnemy {
                    enemy: enemy.id,
                    step: decide_step(draw, enemy.position, player),
                });
            }
        }
    }
}

/// Picks the step for one enemy from a single uniform draw in `[0, 1)`.
///
/// The base step follows the axis with the larger absolute distance to the
/// player, ties going vertical. Draws above the wrong-axis threshold flip to
/// the other axis (still toward the player); draws below the retreat
/// threshold reverse the base step instead.
fn decide_step(draw: f32, from: GridPos, target: GridPos) -> Step {
    let dx = target.x() - from.x();
    let dy = target.y() - from.y();
    let horizontal = dx.abs() > dy.abs();

    let toward_x = if dx > 0 { Step::RIGHT } else { Step::LEFT };
    let toward_y = if dy > 0 { Step::UP } else { Step::DOWN };

    let mut step = if horizontal { toward_x } else { toward_y };
    if draw > 1.0 - WRONG_AXIS_CHANCE {
        step = if horizontal { toward_y } else { toward_x };
    }
    if draw < RETREAT_CHANCE {
        step = step.reversed();
    }
    step
}
