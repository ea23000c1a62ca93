#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scavenger engine.
//!
//! Everything that crosses a crate boundary lives here: the [`Command`]
//! values adapters submit, the [`Event`] values the world broadcasts after
//! executing them, the coordinate and identifier newtypes both sides speak,
//! and the tuning constants the dungeon is balanced around. Systems stay
//! pure by consuming event batches plus read-only snapshots and answering
//! with fresh command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Banner printed when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to the caverns, scavenger.";

/// Upper bound the player's health is clamped to after any heal.
pub const PLAYER_MAX_HEALTH: i32 = 100;

/// Health assigned to the player when a fresh game starts.
pub const PLAYER_STARTING_HEALTH: i32 = 100;

/// Health restored when the player walks over a food tile.
pub const FOOD_HEAL: i32 = 10;

/// Score awarded when the player walks over a treasure tile.
pub const TREASURE_SCORE: u32 = 1;

/// Damage dealt by a resolved whip swing.
pub const WHIP_DAMAGE: i32 = 2;

/// Radius, in cell units, of the whip's hit sweep around the player.
pub const WHIP_RADIUS: f32 = 1.0;

/// Delay between arming the whip and resolving its hit sweep.
pub const WHIP_WINDUP: Duration = Duration::from_millis(300);

/// Delay between reaching the exit and loading the next level.
pub const LEVEL_TRANSITION_DELAY: Duration = Duration::from_secs(1);

/// Time reserved for the player's death sequence before the run ends.
pub const DEATH_SEQUENCE_DELAY: Duration = Duration::from_millis(2500);

/// Time the adapter lingers on the game-over screen before quitting.
pub const GAME_OVER_EXIT_DELAY: Duration = Duration::from_secs(2);

/// One-based dungeon depth that drives board and difficulty scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u32);

impl Level {
    /// Creates a new level index. Zero is promoted to the first level.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(if value == 0 { 1 } else { value })
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Location of a single board cell expressed as signed coordinates.
///
/// The playable interior spans non-negative coordinates; the outer wall ring
/// sits one cell outside it on every side, so `-1` is a legal coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell reached by taking the provided step from this cell.
    #[must_use]
    pub const fn stepped(self, step: Step) -> Self {
        Self {
            x: self.x + step.dx(),
            y: self.y + step.dy(),
        }
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Single-axis unit move taken by an actor during its turn.
///
/// Construction asserts the movement contract: each component lies in
/// `{-1, 0, 1}` and exactly one axis is non-zero. Violations are programming
/// errors in the input mapping, so they fail fast instead of being clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    dx: i32,
    dy: i32,
}

impl Step {
    /// Step toward decreasing x.
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    /// Step toward increasing x.
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };
    /// Step toward increasing y.
    pub const UP: Self = Self { dx: 0, dy: 1 };
    /// Step toward decreasing y.
    pub const DOWN: Self = Self { dx: 0, dy: -1 };

    /// Creates a unit step along a single axis.
    ///
    /// # Panics
    ///
    /// Panics when either component falls outside `{-1, 0, 1}` or when both
    /// axes (or neither) are non-zero.
    #[must_use]
    pub fn new(dx: i32, dy: i32) -> Self {
        assert!(
            (-1..=1).contains(&dx) && (-1..=1).contains(&dy),
            "step components must be unit-valued, got ({dx}, {dy})"
        );
        assert!(
            (dx == 0) != (dy == 0),
            "step must move along exactly one axis, got ({dx}, {dy})"
        );
        Self { dx, dy }
    }

    /// Horizontal component of the step.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component of the step.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Step with both components negated.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

/// Horizontal orientation of an actor's sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Actor faces toward decreasing x.
    Left,
    /// Actor faces toward increasing x.
    Right,
}

impl Facing {
    /// Orientation implied by a horizontal movement component, if any.
    #[must_use]
    pub const fn from_dx(dx: i32) -> Option<Self> {
        if dx > 0 {
            Some(Self::Right)
        } else if dx < 0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reference to one of the actors inhabiting the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorRef {
    /// The player character.
    Player,
    /// An enemy identified by its registry id.
    Enemy(EnemyId),
}

/// Kind tag carried by every placed board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable background tile.
    Floor,
    /// Indestructible tile forming the border ring.
    OuterWall,
    /// Interior wall carved by the maze generator.
    Wall,
    /// Pickup that restores player health.
    Food,
    /// Pickup that increases the player's score.
    Treasure,
    /// Tile that advances the run to the next level.
    Exit,
}

impl TileKind {
    /// Reports whether actors are barred from entering a cell of this kind.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::OuterWall)
    }
}

/// Blocker kind an actor expects to interact with when its move is denied.
///
/// The occupant's kind is compared against this tag; a mismatch blocks the
/// move silently with no side effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockerKind {
    /// Interior wall tiles, expected by the player.
    Wall,
    /// The player character, expected by enemies.
    Player,
}

/// Placement constraints applied to enemy spawns during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnRules {
    /// Enemies must spawn outside the player's entry corner.
    Standard,
    /// Safe-zone filter disabled; fallback after an exhausted attempt.
    Relaxed,
}

/// Inclusive range used when drawing random object counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Smallest count that may be drawn.
    pub minimum: u32,
    /// Largest count that may be drawn.
    pub maximum: u32,
}

impl CountRange {
    /// Creates a new inclusive count range.
    #[must_use]
    pub const fn new(minimum: u32, maximum: u32) -> Self {
        Self { minimum, maximum }
    }
}

/// Tuning knobs consumed by the board generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Cells added per level to each board dimension.
    pub level_scale: u32,
    /// Wall count range used by the random-scatter maze pattern.
    pub wall_count: CountRange,
    /// Count range shared by food and treasure placement.
    pub food_count: CountRange,
    /// Health assigned to each spawned enemy.
    pub enemy_health: i32,
    /// Damage an enemy deals when bumping into the player.
    pub enemy_damage: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            level_scale: 2,
            wall_count: CountRange::new(5, 9),
            food_count: CountRange::new(1, 3),
            enemy_health: 4,
            enemy_damage: 10,
        }
    }
}

/// Failure raised when generation cannot satisfy placement constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Rejection sampling for enemy spawns ran out of its retry budget.
    #[error("no eligible free cell for an enemy spawn after {attempts} draws")]
    Exhausted {
        /// Number of rejected draws before the budget was exhausted.
        attempts: u32,
    },
}

/// Animation intents forwarded, fire-and-forget, to the presentation host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    /// Actor stepped to a new cell.
    Walk,
    /// Enemy struck the player.
    Attack,
    /// Player swung the whip.
    Whip,
    /// Player crouched in place.
    Crouch,
    /// Player absorbed damage.
    Damage,
    /// Player's death sequence.
    Death,
}

/// Audio intents forwarded, fire-and-forget, to the audio host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Whip swing swoosh.
    WhipSwing,
}

impl AudioCue {
    /// Clip pair the audio host picks from at random.
    #[must_use]
    pub const fn clips(self) -> [&'static str; 2] {
        match self {
            Self::WhipSwing => ["whip_0", "whip_1"],
        }
    }
}

/// Mutations the world accepts, one variant per permissible operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the persisted run state and generates the first level.
    NewGame {
        /// Seed that drives every random draw for the run's first board.
        seed: u64,
    },
    /// Generates a board for the provided level, preserving run state.
    StartLevel {
        /// Level the board is generated for.
        level: Level,
        /// Seed that drives every random draw for this board.
        seed: u64,
        /// Spawn constraints applied to enemy placement.
        rules: SpawnRules,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player advance a single step.
    MovePlayer {
        /// Direction of travel for the attempted step.
        step: Step,
    },
    /// Requests that an enemy advance a single step toward its quarry.
    MoveEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Direction of travel for the attempted step.
        step: Step,
    },
    /// Arms the player's whip; resolution follows after the windup delay.
    ArmWhip,
    /// Resolves an armed whip swing against nearby enemies.
    ResolveWhip,
    /// Plays the crouch animation without consuming the player's turn.
    Crouch,
}

/// Facts the world broadcasts after a command resolves.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a freshly generated board is ready to play.
    LevelStarted {
        /// Level the board was generated for.
        level: Level,
        /// Interior width of the generated board.
        columns: i32,
        /// Interior height of the generated board.
        rows: i32,
    },
    /// Reports that board generation failed and the previous board remains.
    GenerationFailed {
        /// Level the failed generation attempt targeted.
        level: Level,
        /// Specific reason generation gave up.
        error: GenerationError,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: GridPos,
        /// Cell the player occupies after the move.
        to: GridPos,
    },
    /// Reports that the player's move was denied by an interior wall.
    PlayerBlocked {
        /// Cell holding the wall that denied the move.
        wall: GridPos,
    },
    /// Marks the end of the player's turn; enemies move next.
    PlayerTurnEnded,
    /// Reports that the player absorbed damage.
    PlayerDamaged {
        /// Amount of damage applied before clamping.
        amount: i32,
        /// Player health after clamping.
        health: i32,
    },
    /// Reports that the player recovered health from food.
    PlayerHealed {
        /// Amount of healing applied before clamping.
        amount: i32,
        /// Player health after clamping.
        health: i32,
    },
    /// Reports that the player collected a treasure tile.
    TreasureCollected {
        /// Run score after the pickup.
        score: u32,
    },
    /// Announces that the player reached the exit tile.
    ExitReached {
        /// Level that was just completed.
        completed: Level,
    },
    /// Announces the one-shot transition into the terminal game-over state.
    GameOver,
    /// Confirms that an enemy moved between two cells.
    EnemyMoved {
        /// Identifier of the enemy that advanced.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: GridPos,
        /// Cell the enemy occupies after the move.
        to: GridPos,
    },
    /// Reports that an enemy struck the player instead of moving.
    EnemyAttacked {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Contact damage dealt to the player.
        damage: i32,
    },
    /// Reports that an enemy absorbed whip damage.
    EnemyDamaged {
        /// Identifier of the wounded enemy.
        enemy: EnemyId,
        /// Enemy health after the hit; may be negative.
        health: i32,
    },
    /// Confirms that an enemy died and left the registry.
    EnemyDied {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Confirms that the whip was armed and awaits its windup.
    WhipArmed,
    /// Forwards an animation intent to the presentation host.
    AnimationTriggered {
        /// Actor the animation applies to.
        target: ActorRef,
        /// Animation the host should play.
        trigger: AnimationTrigger,
    },
    /// Forwards an audio intent to the audio host.
    AudioCueRequested {
        /// Cue whose clip pair the host picks from at random.
        cue: AudioCue,
    },
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub position: GridPos,
    /// Current health, clamped to `[0, PLAYER_MAX_HEALTH]`.
    pub health: i32,
    /// Score accumulated across the run.
    pub score: u32,
    /// Sprite orientation implied by the last horizontal move.
    pub facing: Facing,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned at spawn, in registration order.
    pub id: EnemyId,
    /// Cell currently occupied by the enemy.
    pub position: GridPos,
    /// Current health; unclamped, so it may dip negative before death.
    pub health: i32,
    /// Sprite orientation implied by the last horizontal move.
    pub facing: Facing,
}
