//! Procedural board generation: maze carving plus object scatter.

use rand::Rng;
use scavenger_core::{
    CountRange, GenerationConfig, GenerationError, GridPos, Level, SpawnRules, TileKind,
};

use crate::board::{Board, FreeCellSet};

const BASE_DIMENSION: i32 = 5;
const ENEMY_SAFE_ZONE: i32 = 2;
const ENEMY_RETRY_FACTOR: u32 = 10;

/// Board produced by a generation pass together with its enemy spawn cells.
#[derive(Clone, Debug)]
pub(crate) struct GeneratedBoard {
    pub(crate) board: Board,
    pub(crate) enemy_spawns: Vec<GridPos>,
}

/// Interior width and height of the board generated for a level.
pub(crate) fn board_dimension(level: Level, config: &GenerationConfig) -> i32 {
    BASE_DIMENSION + (level.get() * config.level_scale) as i32
}

/// Number of enemies scattered on a level's board.
pub(crate) fn enemy_count(level: Level) -> u32 {
    level.get().ilog2()
}

/// Generates a complete level board.
///
/// The sequence of draws taken from `rng` is fixed, so a given seed, level,
/// and rule set always reproduce the same board.
pub(crate) fn generate<R: Rng>(
    level: Level,
    config: &GenerationConfig,
    rules: SpawnRules,
    rng: &mut R,
) -> Result<GeneratedBoard, GenerationError> {
    let size = board_dimension(level, config);
    let mut board = Board::new(size, size);
    let mut free = FreeCellSet::interior_of(size, size);

    match MazePattern::select(rng.gen::<f32>()) {
        MazePattern::Corner => carve_corner_maze(&mut board, &mut free, rng),
        MazePattern::Vertical => carve_vertical_maze(&mut board, &mut free, rng),
        MazePattern::Horizontal => carve_horizontal_maze(&mut board, &mut free, rng),
        MazePattern::Scatter => {
            let count = draw_count(rng, config.wall_count, level.get(), config.level_scale);
            scatter(&mut board, &mut free, rng, TileKind::Wall, count);
        }
    }

    let food = draw_count(rng, config.food_count, 0, config.level_scale);
    scatter(&mut board, &mut free, rng, TileKind::Food, food);

    // Treasure deliberately reuses the food range as a shared tuning knob.
    let treasure = draw_count(rng, config.food_count, level.get() * 2, config.level_scale);
    scatter(&mut board, &mut free, rng, TileKind::Treasure, treasure);

    let enemy_spawns = place_enemies(&mut free, rng, enemy_count(level), rules)?;

    // The exit is written unconditionally and overlays whatever the maze put
    // at the far corner.
    board.set_tile(GridPos::new(size - 1, size - 1), TileKind::Exit);

    Ok(GeneratedBoard {
        board,
        enemy_spawns,
    })
}

/// Maze pattern selected for a board, drawn once per generation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MazePattern {
    Corner,
    Vertical,
    Horizontal,
    Scatter,
}

impl MazePattern {
    /// Maps a uniform draw from `[0, 1)` onto four disjoint quarter bands.
    pub(crate) fn select(draw: f32) -> Self {
        if draw < 0.25 {
            Self::Corner
        } else if draw < 0.5 {
            Self::Vertical
        } else if draw < 0.75 {
            Self::Horizontal
        } else {
            Self::Scatter
        }
    }
}

fn draw_count<R: Rng>(rng: &mut R, range: CountRange, level_term: u32, level_scale: u32) -> u32 {
    let base = if range.minimum <= range.maximum {
        rng.gen_range(range.minimum..=range.maximum)
    } else {
        range.minimum
    };
    base + level_term * level_scale / 2
}

fn place_wall(board: &mut Board, free: &mut FreeCellSet, cell: GridPos) {
    board.set_tile(cell, TileKind::Wall);
    let _ = free.remove(cell);
}

fn in_opening(position: i32, open: i32) -> bool {
    (open - 1..=open + 1).contains(&position)
}

/// Diagonal walk from one of the two opposite corners, laying a wall per
/// row/column step and skipping a three-cell opening band so a traversable
/// path survives. The walk advances inward by a gap of three or four cells
/// drawn once per board.
fn carve_corner_maze<R: Rng>(board: &mut Board, free: &mut FreeCellSet, rng: &mut R) {
    let size = board.columns();
    let gap = rng.gen_range(3..5);

    if rng.gen::<f32>() < 0.5 {
        let mut start = 2;
        while start < size - 1 {
            let open = rng.gen_range(start + 1..size);
            let space_in_row = rng.gen::<f32>() < 0.5;

            for y in start..size {
                if space_in_row && in_opening(y, open) {
                    continue;
                }
                place_wall(board, free, GridPos::new(start, y));
            }
            for x in start + 1..size {
                if !space_in_row && in_opening(x, open) {
                    continue;
                }
                place_wall(board, free, GridPos::new(x, start));
            }
            start += gap;
        }
    } else {
        let mut start = size - 2;
        while start > 1 {
            let open = rng.gen_range(1..start);
            let space_in_row = rng.gen::<f32>() < 0.5;

            for y in (0..=start).rev() {
                if space_in_row && in_opening(y, open) {
                    continue;
                }
                place_wall(board, free, GridPos::new(start, y));
            }
            for x in (0..start).rev() {
                if !space_in_row && in_opening(x, open) {
                    continue;
                }
                place_wall(board, free, GridPos::new(x, start));
            }
            start -= gap;
        }
    }
}

/// Every third interior column filled except for a three-cell band at a
/// random row.
fn carve_vertical_maze<R: Rng>(board: &mut Board, free: &mut FreeCellSet, rng: &mut R) {
    let size = board.columns();
    let mut column = 1;
    while column < size - 1 {
        let open = rng.gen_range(1..size - 1);
        for y in 0..size {
            if in_opening(y, open) {
                continue;
            }
            place_wall(board, free, GridPos::new(column, y));
        }
        column += 3;
    }
}

/// Transpose of [`carve_vertical_maze`]: every third interior row filled
/// except for a three-cell band at a random column.
fn carve_horizontal_maze<R: Rng>(board: &mut Board, free: &mut FreeCellSet, rng: &mut R) {
    let size = board.rows();
    let mut row = 2;
    while row < size - 1 {
        let open = rng.gen_range(1..size - 1);
        for x in 0..size {
            if in_opening(x, open) {
                continue;
            }
            place_wall(board, free, GridPos::new(x, row));
        }
        row += 3;
    }
}

fn scatter<R: Rng>(
    board: &mut Board,
    free: &mut FreeCellSet,
    rng: &mut R,
    kind: TileKind,
    count: u32,
) {
    for _ in 0..count {
        let Some(cell) = free.take_random(rng) else {
            break;
        };
        board.set_tile(cell, kind);
    }
}

/// Draws enemy spawn cells by rejection sampling against the safe zone,
/// consuming each accepted cell from the free pool. The retry budget bounds
/// the loop on boards where eligible cells have been starved out.
fn place_enemies<R: Rng>(
    free: &mut FreeCellSet,
    rng: &mut R,
    count: u32,
    rules: SpawnRules,
) -> Result<Vec<GridPos>, GenerationError> {
    let mut spawns = Vec::with_capacity(count as usize);
    let budget = ENEMY_RETRY_FACTOR.saturating_mul(free.len() as u32);
    let mut attempts = 0u32;

    for _ in 0..count {
        loop {
            let Some((index, cell)) = free.pick(rng) else {
                return Err(GenerationError::Exhausted { attempts });
            };
            if spawn_eligible(cell, rules) {
                spawns.push(free.remove_at(index));
                break;
            }
            attempts += 1;
            if attempts > budget {
                return Err(GenerationError::Exhausted { attempts });
            }
        }
    }

    Ok(spawns)
}

const fn spawn_eligible(cell: GridPos, rules: SpawnRules) -> bool {
    match rules {
        SpawnRules::Relaxed => true,
        SpawnRules::Standard => cell.x() >= ENEMY_SAFE_ZONE && cell.y() >= ENEMY_SAFE_ZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pattern_bands_partition_the_unit_interval() {
        assert_eq!(MazePattern::select(0.0), MazePattern::Corner);
        assert_eq!(MazePattern::select(0.249), MazePattern::Corner);
        assert_eq!(MazePattern::select(0.25), MazePattern::Vertical);
        assert_eq!(MazePattern::select(0.499), MazePattern::Vertical);
        assert_eq!(MazePattern::select(0.5), MazePattern::Horizontal);
        assert_eq!(MazePattern::select(0.749), MazePattern::Horizontal);
        assert_eq!(MazePattern::select(0.75), MazePattern::Scatter);
        assert_eq!(MazePattern::select(0.999), MazePattern::Scatter);
    }

    #[test]
    fn board_dimension_scales_linearly_with_level() {
        let config = GenerationConfig::default();
        assert_eq!(board_dimension(Level::new(1), &config), 7);
        assert_eq!(board_dimension(Level::new(2), &config), 9);
        assert_eq!(board_dimension(Level::new(5), &config), 15);
    }

    #[test]
    fn enemy_count_grows_logarithmically() {
        assert_eq!(enemy_count(Level::new(1)), 0);
        assert_eq!(enemy_count(Level::new(2)), 1);
        assert_eq!(enemy_count(Level::new(3)), 1);
        assert_eq!(enemy_count(Level::new(4)), 2);
        assert_eq!(enemy_count(Level::new(8)), 3);
    }

    #[test]
    fn enemy_placement_fails_when_safe_cells_are_starved() {
        // A 3x3 interior leaves (1, 1) as the only free cell, which sits
        // inside the player's entry corner.
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut free = FreeCellSet::interior_of(3, 3);
        let result = place_enemies(&mut free, &mut rng, 1, SpawnRules::Standard);
        assert!(matches!(result, Err(GenerationError::Exhausted { .. })));
    }

    #[test]
    fn relaxed_rules_accept_the_entry_corner() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut free = FreeCellSet::interior_of(3, 3);
        let spawns =
            place_enemies(&mut free, &mut rng, 1, SpawnRules::Relaxed).expect("relaxed spawn");
        assert_eq!(spawns, vec![GridPos::new(1, 1)]);
        assert_eq!(free.len(), 0);
    }

    #[test]
    fn enemy_spawns_honor_the_safe_zone() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut free = FreeCellSet::interior_of(13, 13);
            let spawns =
                place_enemies(&mut free, &mut rng, 2, SpawnRules::Standard).expect("spawns");
            for spawn in spawns {
                assert!(spawn.x() >= 2 && spawn.y() >= 2, "spawn {spawn:?} in safe zone");
            }
        }
    }

    #[test]
    fn generation_is_deterministic_for_identical_seeds() {
        let config = GenerationConfig::default();
        let mut first_rng = ChaCha8Rng::seed_from_u64(0xDEAD_BEEF);
        let mut second_rng = ChaCha8Rng::seed_from_u64(0xDEAD_BEEF);

        let first = generate(Level::new(4), &config, SpawnRules::Standard, &mut first_rng)
            .expect("generation");
        let second = generate(Level::new(4), &config, SpawnRules::Standard, &mut second_rng)
            .expect("generation");

        assert_eq!(first.enemy_spawns, second.enemy_spawns);
        let size = board_dimension(Level::new(4), &config);
        for x in -1..=size {
            for y in -1..=size {
                let cell = GridPos::new(x, y);
                assert_eq!(first.board.tile(cell), second.board.tile(cell));
            }
        }
    }

    #[test]
    fn exit_sits_at_the_far_corner_for_every_pattern_draw() {
        let config = GenerationConfig::default();
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let generated = generate(Level::new(3), &config, SpawnRules::Standard, &mut rng)
                .expect("generation");
            let size = board_dimension(Level::new(3), &config);
            assert_eq!(
                generated.board.tile(GridPos::new(size - 1, size - 1)),
                TileKind::Exit
            );
        }
    }

    #[test]
    fn placements_never_land_on_the_same_cell() {
        // Pin both count ranges so the expected number of each tile kind is
        // known exactly; a colliding placement would overwrite an earlier
        // tile in the dense grid and make one of the counts come up short.
        let mut config = GenerationConfig::default();
        config.wall_count = CountRange::new(6, 6);
        config.food_count = CountRange::new(3, 3);
        let level = Level::new(4);

        for seed in 0..16 {
            let mut pattern_rng = ChaCha8Rng::seed_from_u64(seed);
            let pattern = MazePattern::select(pattern_rng.gen::<f32>());

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let generated =
                generate(level, &config, SpawnRules::Standard, &mut rng).expect("generation");
            let size = board_dimension(level, &config);

            let mut food = 0;
            let mut treasure = 0;
            let mut walls = 0;
            for x in 0..size {
                for y in 0..size {
                    match generated.board.tile(GridPos::new(x, y)) {
                        TileKind::Food => food += 1,
                        TileKind::Treasure => treasure += 1,
                        TileKind::Wall => walls += 1,
                        _ => {}
                    }
                }
            }

            assert_eq!(food, 3, "seed {seed}");
            assert_eq!(treasure, 3 + level.get() * 2 * 2 / 2, "seed {seed}");
            if pattern == MazePattern::Scatter {
                assert_eq!(walls, 6 + level.get() * 2 / 2, "seed {seed}");
            }

            let spawns = &generated.enemy_spawns;
            for (index, spawn) in spawns.iter().enumerate() {
                assert!(
                    !spawns[index + 1..].contains(spawn),
                    "seed {seed} duplicated enemy spawn {spawn:?}"
                );
            }
        }
    }

    #[test]
    fn enemies_never_spawn_on_placed_objects() {
        let config = GenerationConfig::default();
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let generated = generate(Level::new(4), &config, SpawnRules::Standard, &mut rng)
                .expect("generation");
            for spawn in &generated.enemy_spawns {
                assert_eq!(generated.board.tile(*spawn), TileKind::Floor);
            }
        }
    }
}
