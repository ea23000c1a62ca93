//! Tile storage for the bordered game board and the generation free-cell pool.

use rand::Rng;
use scavenger_core::{GridPos, TileKind};

/// Dense tile grid covering the playable interior plus the border ring.
///
/// The interior spans `x ∈ [0, columns)`, `y ∈ [0, rows)`; the ring one cell
/// outside that range is stored as well so border probes resolve without
/// special cases. Coordinates beyond the ring read back as [`TileKind::OuterWall`].
#[derive(Clone, Debug)]
pub(crate) struct Board {
    columns: i32,
    rows: i32,
    tiles: Vec<TileKind>,
}

impl Board {
    pub(crate) fn new(columns: i32, rows: i32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let width = (columns + 2) as usize;
        let height = (rows + 2) as usize;
        let mut tiles = vec![TileKind::Floor; width * height];
        for (index, tile) in tiles.iter_mut().enumerate() {
            let x = (index % width) as i32 - 1;
            let y = (index / width) as i32 - 1;
            if x == -1 || x == columns || y == -1 || y == rows {
                *tile = TileKind::OuterWall;
            }
        }
        Self {
            columns,
            rows,
            tiles,
        }
    }

    pub(crate) const fn columns(&self) -> i32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> i32 {
        self.rows
    }

    pub(crate) fn tile(&self, cell: GridPos) -> TileKind {
        self.index(cell)
            .map_or(TileKind::OuterWall, |index| self.tiles[index])
    }

    pub(crate) fn set_tile(&mut self, cell: GridPos, kind: TileKind) {
        if let Some(index) = self.index(cell) {
            self.tiles[index] = kind;
        }
    }

    fn index(&self, cell: GridPos) -> Option<usize> {
        if cell.x() < -1 || cell.x() > self.columns || cell.y() < -1 || cell.y() > self.rows {
            return None;
        }
        let width = (self.columns + 2) as usize;
        let column = (cell.x() + 1) as usize;
        let row = (cell.y() + 1) as usize;
        Some(row * width + column)
    }
}

/// Pool of interior cells still free for object placement during generation.
///
/// A cell is removed exactly once when an object lands on it and is never
/// re-added, which guarantees generation-phase placements cannot overlap.
#[derive(Clone, Debug)]
pub(crate) struct FreeCellSet {
    cells: Vec<GridPos>,
}

impl FreeCellSet {
    /// Initializes the pool with the interior cells one step inside the edge,
    /// `x ∈ [1, columns-2]`, `y ∈ [1, rows-2]`.
    pub(crate) fn interior_of(columns: i32, rows: i32) -> Self {
        let mut cells = Vec::new();
        for x in 1..columns - 1 {
            for y in 1..rows - 1 {
                cells.push(GridPos::new(x, y));
            }
        }
        Self { cells }
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Draws a uniformly random surviving cell and consumes it.
    pub(crate) fn take_random<R: Rng>(&mut self, rng: &mut R) -> Option<GridPos> {
        let (index, _) = self.pick(rng)?;
        Some(self.remove_at(index))
    }

    /// Draws a uniformly random surviving cell without consuming it.
    pub(crate) fn pick<R: Rng>(&self, rng: &mut R) -> Option<(usize, GridPos)> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        Some((index, self.cells[index]))
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> GridPos {
        self.cells.swap_remove(index)
    }

    /// Consumes the given cell if it is still free. Cells outside the pool,
    /// such as the interior edge rows maze patterns may touch, are a no-op.
    pub(crate) fn remove(&mut self, cell: GridPos) -> bool {
        match self.cells.iter().position(|candidate| *candidate == cell) {
            Some(index) => {
                let _ = self.cells.swap_remove(index);
                true
            }
            None => false,
        }
    }
}
