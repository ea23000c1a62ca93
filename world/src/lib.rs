#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Scavenger dungeon crawler.
//!
//! The world owns the board, the player, and the enemy registry. Adapters and
//! systems mutate it exclusively through [`apply`], which resolves each
//! command deterministically and broadcasts [`Event`] values describing what
//! changed. Turn order is strict: the player's command resolves fully,
//! including combat side effects and the game-over check, before
//! `PlayerTurnEnded` invites the enemy sweep.

mod actors;
mod board;
mod combat;
mod generation;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scavenger_core::{
    ActorRef, AnimationTrigger, AudioCue, BlockerKind, Command, EnemyId, Event, GenerationConfig,
    GridPos, Level, SpawnRules, Step, TileKind, TREASURE_SCORE, WHIP_DAMAGE, WHIP_RADIUS,
};

use crate::{
    actors::{Enemy, Player},
    board::Board,
};

const DEFAULT_SEED: u64 = 0x5ca7_e4a6_0b0a_4d01;

/// Represents the authoritative Scavenger world state.
#[derive(Clone, Debug)]
pub struct World {
    config: GenerationConfig,
    level: Level,
    board: Board,
    player: Player,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    game_over: bool,
}

impl World {
    /// Creates a new world with default tuning and a generated first level.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GenerationConfig::default())
    }

    /// Creates a new world using the provided generation tuning.
    #[must_use]
    pub fn with_config(config: GenerationConfig) -> Self {
        let mut world = Self {
            config,
            level: Level::new(1),
            board: Board::new(1, 1),
            player: Player::fresh(),
            enemies: Vec::new(),
            next_enemy_id: 0,
            game_over: false,
        };
        apply(
            &mut world,
            Command::NewGame { seed: DEFAULT_SEED },
            &mut Vec::new(),
        );
        world
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame { seed } => {
            world.player = Player::fresh();
            world.game_over = false;
            start_level(world, Level::new(1), seed, SpawnRules::Standard, out_events);
        }
        Command::StartLevel { level, seed, rules } => {
            if world.game_over {
                return;
            }
            start_level(world, level, seed, rules, out_events);
        }
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
        Command::MovePlayer { step } => move_player(world, step, out_events),
        Command::MoveEnemy { enemy, step } => move_enemy(world, enemy, step, out_events),
        Command::ArmWhip => arm_whip(world, out_events),
        Command::ResolveWhip => resolve_whip(world, out_events),
        Command::Crouch => {
            if world.game_over {
                return;
            }
            out_events.push(Event::AnimationTriggered {
                target: ActorRef::Player,
                trigger: AnimationTrigger::Crouch,
            });
        }
    }
}

fn start_level(
    world: &mut World,
    level: Level,
    seed: u64,
    rules: SpawnRules,
    out_events: &mut Vec<Event>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match generation::generate(level, &world.config, rules, &mut rng) {
        Ok(generated) => {
            world.level = level;
            world.board = generated.board;
            world.player.position = GridPos::new(0, 0);
            world.enemies.clear();
            world.next_enemy_id = 0;
            for spawn in generated.enemy_spawns {
                let id = EnemyId::new(world.next_enemy_id);
                world.next_enemy_id += 1;
                world.enemies.push(Enemy::spawned(
                    id,
                    spawn,
                    world.config.enemy_health,
                    world.config.enemy_damage,
                ));
            }
            out_events.push(Event::LevelStarted {
                level,
                columns: world.board.columns(),
                rows: world.board.rows(),
            });
        }
        Err(error) => out_events.push(Event::GenerationFailed { level, error }),
    }
}

/// Occupant of a probed destination cell, resolved actors-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Occupant {
    PlayerActor,
    Enemy(EnemyId),
    Tile(TileKind),
}

impl Occupant {
    /// Blocker tag an actor's move request is matched against. Occupants that
    /// block without a recognized tag deny the move silently.
    fn blocker_kind(self) -> Option<BlockerKind> {
        match self {
            Self::PlayerActor => Some(BlockerKind::Player),
            Self::Tile(TileKind::Wall) => Some(BlockerKind::Wall),
            Self::Enemy(_) | Self::Tile(_) => None,
        }
    }
}

fn occupant_at(world: &World, cell: GridPos) -> Occupant {
    if world.player.position == cell {
        return Occupant::PlayerActor;
    }
    if let Some(enemy) = world
        .enemies
        .iter()
        .find(|enemy| enemy.position == cell)
    {
        return Occupant::Enemy(enemy.id);
    }
    Occupant::Tile(world.board.tile(cell))
}

fn move_player(world: &mut World, step: Step, out_events: &mut Vec<Event>) {
    if world.game_over {
        return;
    }

    world.player.face_along(step.dx());
    let from = world.player.position;
    let destination = from.stepped(step);
    let mut level_complete = false;

    match occupant_at(world, destination) {
        Occupant::Tile(tile) if !tile.blocks_movement() => {
            world.player.position = destination;
            out_events.push(Event::PlayerMoved {
                from,
                to: destination,
            });
            out_events.push(Event::AnimationTriggered {
                target: ActorRef::Player,
                trigger: AnimationTrigger::Walk,
            });
            level_complete = resolve_pickup(world, tile, destination, out_events);
        }
        blocked => match blocked.blocker_kind() {
            // Expected blocker. The attack-on-wall reaction is intentionally
            // inert, so the event is the only side effect.
            Some(BlockerKind::Wall) => {
                out_events.push(Event::PlayerBlocked { wall: destination });
            }
            // Outer walls, enemies, and anything else mismatch the expected
            // blocker and deny the move silently.
            _ => {}
        },
    }

    if !level_complete {
        out_events.push(Event::PlayerTurnEnded);
    }
}

/// Resolves the pickup sitting under the player's new cell, if any. Returns
/// `true` when the exit was reached and the turn should not pass to enemies.
fn resolve_pickup(
    world: &mut World,
    tile: TileKind,
    cell: GridPos,
    out_events: &mut Vec<Event>,
) -> bool {
    match tile {
        TileKind::Food => {
            let health = combat::heal_player(&mut world.player);
            world.board.set_tile(cell, TileKind::Floor);
            out_events.push(Event::PlayerHealed {
                amount: scavenger_core::FOOD_HEAL,
                health,
            });
        }
        TileKind::Treasure => {
            world.player.score += TREASURE_SCORE;
            world.board.set_tile(cell, TileKind::Floor);
            out_events.push(Event::TreasureCollected {
                score: world.player.score,
            });
        }
        TileKind::Exit => {
            out_events.push(Event::ExitReached {
                completed: world.level,
            });
            return true;
        }
        TileKind::Floor | TileKind::Wall | TileKind::OuterWall => {}
    }
    false
}

fn move_enemy(world: &mut World, enemy: EnemyId, step: Step, out_events: &mut Vec<Event>) {
    if world.game_over {
        return;
    }
    let Some(index) = world.enemy_index(enemy) else {
        return;
    };

    let from = world.enemies[index].position;
    let destination = from.stepped(step);

    match occupant_at(world, destination) {
        Occupant::Tile(tile) if !tile.blocks_movement() => {
            world.enemies[index].face_along(step.dx());
            world.enemies[index].position = destination;
            out_events.push(Event::EnemyMoved {
                enemy,
                from,
                to: destination,
            });
            out_events.push(Event::AnimationTriggered {
                target: ActorRef::Enemy(enemy),
                trigger: AnimationTrigger::Walk,
            });
        }
        blocked => match blocked.blocker_kind() {
            Some(BlockerKind::Player) => {
                world.enemies[index].face_along(step.dx());
                let damage = world.enemies[index].damage;
                let health = combat::damage_player(&mut world.player, damage);
                out_events.push(Event::EnemyAttacked { enemy, damage });
                out_events.push(Event::AnimationTriggered {
                    target: ActorRef::Enemy(enemy),
                    trigger: AnimationTrigger::Attack,
                });
                out_events.push(Event::PlayerDamaged {
                    amount: damage,
                    health,
                });
                out_events.push(Event::AnimationTriggered {
                    target: ActorRef::Player,
                    trigger: AnimationTrigger::Damage,
                });
                check_game_over(world, out_events);
            }
            // Walls and other enemies mismatch the expected blocker: silent.
            _ => {}
        },
    }
}

fn check_game_over(world: &mut World, out_events: &mut Vec<Event>) {
    if world.player.health == 0 && !world.game_over {
        world.game_over = true;
        out_events.push(Event::AnimationTriggered {
            target: ActorRef::Player,
            trigger: AnimationTrigger::Death,
        });
        out_events.push(Event::GameOver);
    }
}

fn arm_whip(world: &mut World, out_events: &mut Vec<Event>) {
    if world.game_over {
        return;
    }
    out_events.push(Event::WhipArmed);
    out_events.push(Event::AnimationTriggered {
        target: ActorRef::Player,
        trigger: AnimationTrigger::Whip,
    });
    out_events.push(Event::AudioCueRequested {
        cue: AudioCue::WhipSwing,
    });
}

fn resolve_whip(world: &mut World, out_events: &mut Vec<Event>) {
    if world.game_over {
        return;
    }

    let origin = world.player.position;
    let radius_squared = f64::from(WHIP_RADIUS * WHIP_RADIUS);

    // Nearest-then-first-registered is the single-target pick; only one enemy
    // is ever hit per swing.
    let mut target: Option<(i64, usize)> = None;
    for (index, enemy) in world.enemies.iter().enumerate() {
        let distance = origin.distance_squared(enemy.position);
        if distance as f64 > radius_squared {
            continue;
        }
        let closer = match target {
            None => true,
            Some((best, _)) => distance < best,
        };
        if closer {
            target = Some((distance, index));
        }
    }

    if let Some((_, index)) = target {
        let enemy = world.enemies[index].id;
        let died = combat::damage_enemy(&mut world.enemies[index], WHIP_DAMAGE);
        out_events.push(Event::EnemyDamaged {
            enemy,
            health: world.enemies[index].health,
        });
        if died {
            let _ = world.enemies.remove(index);
            out_events.push(Event::EnemyDied { enemy });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scavenger_core::{
        ActorRef, EnemySnapshot, GridPos, Level, PlayerSnapshot, TileKind,
    };

    use super::{Occupant, World};

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            health: world.player.health,
            score: world.player.score,
            facing: world.player.facing,
        }
    }

    /// Captures snapshots of all living enemies in registration order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                position: enemy.position,
                health: enemy.health,
                facing: enemy.facing,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Tile stored at the provided cell; cells beyond the board read as
    /// [`TileKind::OuterWall`].
    #[must_use]
    pub fn tile(world: &World, cell: GridPos) -> TileKind {
        world.board.tile(cell)
    }

    /// Interior dimensions of the current board as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (i32, i32) {
        (world.board.columns(), world.board.rows())
    }

    /// Level the current board was generated for.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Reports whether the terminal game-over state has been entered.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Actor occupying the provided cell, if any.
    #[must_use]
    pub fn actor_at(world: &World, cell: GridPos) -> Option<ActorRef> {
        match super::occupant_at(world, cell) {
            Occupant::PlayerActor => Some(ActorRef::Player),
            Occupant::Enemy(id) => Some(ActorRef::Enemy(id)),
            Occupant::Tile(_) => None,
        }
    }
}

/// Helpers for assembling bespoke board scenarios in tests.
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding {
    use scavenger_core::{EnemyId, GenerationConfig, GridPos, Level, TileKind};

    use super::{actors::Enemy, board::Board, World};

    /// Creates a world with an empty bordered board and no enemies. The
    /// player starts at the entry corner with full health.
    #[must_use]
    pub fn scenario_world(columns: i32, rows: i32) -> World {
        World {
            config: GenerationConfig::default(),
            level: Level::new(1),
            board: Board::new(columns, rows),
            player: super::Player::fresh(),
            enemies: Vec::new(),
            next_enemy_id: 0,
            game_over: false,
        }
    }

    /// Overwrites the tile at the provided cell.
    pub fn set_tile(world: &mut World, cell: GridPos, kind: TileKind) {
        world.board.set_tile(cell, kind);
    }

    /// Teleports the player to the provided cell.
    pub fn place_player(world: &mut World, cell: GridPos) {
        world.player.position = cell;
    }

    /// Overwrites the player's health without clamping.
    pub fn set_player_health(world: &mut World, health: i32) {
        world.player.health = health;
    }

    /// Spawns an enemy with the world's configured stats.
    pub fn spawn_enemy(world: &mut World, cell: GridPos) -> EnemyId {
        let health = world.config.enemy_health;
        let damage = world.config.enemy_damage;
        spawn_enemy_with(world, cell, health, damage)
    }

    /// Spawns an enemy with explicit health and contact damage.
    pub fn spawn_enemy_with(world: &mut World, cell: GridPos, health: i32, damage: i32) -> EnemyId {
        let id = EnemyId::new(world.next_enemy_id);
        world.next_enemy_id += 1;
        world.enemies.push(Enemy::spawned(id, cell, health, damage));
        id
    }
}
