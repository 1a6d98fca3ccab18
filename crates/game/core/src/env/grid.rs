use sha2::{Digest, Sha256};

use super::{CollisionProbe, TileKind};
use crate::geometry::Vec2;

/// Row-major tile classification plus the spawn and goal landmarks.
///
/// Built once before the first tick and shared read-only afterwards. The
/// navigability mask is derived from the kinds and never persisted; every
/// constructor (including deserialization) rebuilds it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "TileGridData", into = "TileGridData")
)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    tile_size: f32,
    tiles: Vec<TileKind>,
    navigable: Vec<bool>,
    spawn: Vec2,
    goal: Vec2,
}

/// Persisted form of [`TileGrid`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGridData {
    pub cols: u32,
    pub rows: u32,
    pub tile_size: f32,
    pub tiles: Vec<TileKind>,
    pub spawn: Vec2,
    pub goal: Vec2,
}

impl TileGrid {
    /// All-ground grid.
    pub fn new(cols: u32, rows: u32, tile_size: f32, spawn: Vec2, goal: Vec2) -> Self {
        let len = cols as usize * rows as usize;
        Self {
            cols,
            rows,
            tile_size,
            tiles: vec![TileKind::Ground; len],
            navigable: vec![true; len],
            spawn,
            goal,
        }
    }

    /// Builds a grid from an explicit row-major kind matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when the dimensions are empty, the tile size is not
    /// positive, or `tiles` does not hold exactly `cols * rows` entries.
    pub fn from_tiles(
        cols: u32,
        rows: u32,
        tile_size: f32,
        tiles: Vec<TileKind>,
        spawn: Vec2,
        goal: Vec2,
    ) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::Empty { cols, rows });
        }
        if !(tile_size > 0.0) {
            return Err(GridError::TileSize(tile_size));
        }
        let expected = cols as usize * rows as usize;
        if tiles.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        let navigable = tiles.iter().map(|kind| kind.is_navigable()).collect();
        Ok(Self {
            cols,
            rows,
            tile_size,
            tiles,
            navigable,
            spawn,
            goal,
        })
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    pub fn contains_cell(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as u32) < self.cols && (row as u32) < self.rows
    }

    /// Cell holding a world point; coordinates outside the grid come back out of range.
    pub fn cell_of(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }

    pub fn cell_center(&self, col: u32, row: u32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    /// Kind of the cell at `(col, row)`; anything out of bounds is [`TileKind::Solid`].
    pub fn tile(&self, col: i32, row: i32) -> TileKind {
        match self.index(col, row) {
            Some(index) => self.tiles[index],
            None => TileKind::Solid,
        }
    }

    /// Kind of the cell containing a world point.
    pub fn tile_at(&self, point: Vec2) -> TileKind {
        let (col, row) = self.cell_of(point);
        self.tile(col, row)
    }

    pub fn is_navigable(&self, col: i32, row: i32) -> bool {
        self.index(col, row)
            .is_some_and(|index| self.navigable[index])
    }

    /// Overwrites one cell. Returns `false` (and changes nothing) when out of bounds.
    ///
    /// Only meant for use while a layout is being built.
    pub fn set(&mut self, col: i32, row: i32, kind: TileKind) -> bool {
        match self.index(col, row) {
            Some(index) => {
                self.tiles[index] = kind;
                self.navigable[index] = kind.is_navigable();
                true
            }
            None => false,
        }
    }

    /// Four-corner collision queries against this grid.
    pub fn probe(&self) -> CollisionProbe<'_> {
        CollisionProbe::new(self)
    }

    /// Iterates `(col, row, kind)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, TileKind)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, kind)| (index as u32 % cols, index as u32 / cols, *kind))
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Row `row` rendered with [`TileKind::glyph`].
    pub fn row_glyphs(&self, row: u32) -> String {
        let start = row as usize * self.cols as usize;
        self.tiles
            .get(start..start + self.cols as usize)
            .map(|slice| slice.iter().map(|kind| kind.glyph()).collect())
            .unwrap_or_default()
    }

    /// SHA-256 over dimensions, tile size, kinds and landmarks.
    ///
    /// Two grids with equal digests behave identically for every query.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.cols.to_le_bytes());
        hasher.update(self.rows.to_le_bytes());
        hasher.update(self.tile_size.to_le_bytes());
        for kind in &self.tiles {
            hasher.update([*kind as u8]);
        }
        for value in [self.spawn.x, self.spawn.y, self.goal.x, self.goal.y] {
            hasher.update(value.to_le_bytes());
        }
        hasher.finalize().into()
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.contains_cell(col, row)
            .then(|| row as usize * self.cols as usize + col as usize)
    }
}

impl From<TileGrid> for TileGridData {
    fn from(grid: TileGrid) -> Self {
        Self {
            cols: grid.cols,
            rows: grid.rows,
            tile_size: grid.tile_size,
            tiles: grid.tiles,
            spawn: grid.spawn,
            goal: grid.goal,
        }
    }
}

impl TryFrom<TileGridData> for TileGrid {
    type Error = GridError;

    fn try_from(data: TileGridData) -> Result<Self, Self::Error> {
        TileGrid::from_tiles(
            data.cols,
            data.rows,
            data.tile_size,
            data.tiles,
            data.spawn,
            data.goal,
        )
    }
}

/// Malformed grid layouts.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid must have at least one cell (got {cols}x{rows})")]
    Empty { cols: u32, rows: u32 },

    #[error("tile size must be positive (got {0})")]
    TileSize(f32),

    #[error("expected {expected} tiles, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
