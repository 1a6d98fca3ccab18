//! Map layout loader.
//!
//! Layouts are RON files holding one string per tile row, one glyph per tile:
//!
//! ```text
//! (
//!     tile_size: 64.0,
//!     spawn: (x: 96.0, y: 96.0),
//!     goal: (x: 416.0, y: 288.0),
//!     rows: [
//!         "........",
//!         ".##..+..",
//!         ".##..~~.",
//!         "......o.",
//!     ],
//! )
//! ```
//!
//! `.` ground, `#` solid, `+` jumpable, `~` water, `o` burrow.

use std::path::Path;

use game_core::{TileGrid, TileKind, Vec2};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, write_file};

/// On-disk form of a [`TileGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    pub tile_size: f32,
    pub spawn: Vec2,
    pub goal: Vec2,
    pub rows: Vec<String>,
}

impl MapLayout {
    pub fn from_grid(grid: &TileGrid) -> Self {
        Self {
            tile_size: grid.tile_size(),
            spawn: grid.spawn(),
            goal: grid.goal(),
            rows: (0..grid.rows()).map(|row| grid.row_glyphs(row)).collect(),
        }
    }

    pub fn into_grid(self) -> LoadResult<TileGrid> {
        let cols = self.rows.first().map(|row| row.chars().count()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(cols * self.rows.len());
        for (row_index, row) in self.rows.iter().enumerate() {
            let width = row.chars().count();
            if width != cols {
                anyhow::bail!(
                    "Row {} has {} tiles, expected {}",
                    row_index,
                    width,
                    cols
                );
            }
            for (col_index, glyph) in row.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown tile glyph '{}' at row {}, column {}",
                        glyph,
                        row_index,
                        col_index
                    )
                })?;
                tiles.push(kind);
            }
        }

        TileGrid::from_tiles(
            cols as u32,
            self.rows.len() as u32,
            self.tile_size,
            tiles,
            self.spawn,
            self.goal,
        )
        .map_err(|e| anyhow::anyhow!("Invalid map layout: {}", e))
    }
}

/// Loader for map layouts from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a layout file into a grid.
    pub fn load(path: &Path) -> LoadResult<TileGrid> {
        let content = read_file(path)?;
        let grid = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        tracing::debug!(
            path = %path.display(),
            cols = grid.cols(),
            rows = grid.rows(),
            "loaded map layout"
        );
        Ok(grid)
    }

    pub fn parse(content: &str) -> LoadResult<TileGrid> {
        let layout: MapLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;
        layout.into_grid()
    }

    /// Render a grid as layout RON.
    pub fn to_ron(grid: &TileGrid) -> LoadResult<String> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        ron::ser::to_string_pretty(&MapLayout::from_grid(grid), pretty)
            .map_err(|e| anyhow::anyhow!("Failed to serialize map RON: {}", e))
    }

    /// Save a grid (for example a generated one) as a layout file.
    pub fn save(path: &Path, grid: &TileGrid) -> LoadResult<()> {
        write_file(path, &Self::to_ron(grid)?)?;
        tracing::debug!(path = %path.display(), "saved map layout");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameConfig, MapGenerator, PcgRng};

    const ARENA: &str = r#"
    (
        tile_size: 64.0,
        spawn: (x: 96.0, y: 96.0),
        goal: (x: 416.0, y: 224.0),
        rows: [
            "........",
            ".##..+..",
            ".##..~~.",
            "......o.",
        ],
    )
    "#;

    #[test]
    fn parses_glyph_rows() {
        let grid = MapLoader::parse(ARENA).expect("arena parses");
        assert_eq!((grid.cols(), grid.rows()), (8, 4));
        assert_eq!(grid.tile(1, 1), TileKind::Solid);
        assert_eq!(grid.tile(5, 1), TileKind::Jumpable);
        assert_eq!(grid.tile(6, 2), TileKind::Water);
        assert_eq!(grid.tile(6, 3), TileKind::Burrow);
        assert_eq!(grid.tile(8, 0), TileKind::Solid);
        assert_eq!(grid.spawn(), Vec2::new(96.0, 96.0));
        assert!(grid.is_navigable(6, 2));
        assert!(!grid.is_navigable(2, 2));
    }

    #[test]
    fn rejects_ragged_rows_and_unknown_glyphs() {
        let ragged = ARENA.replace("\"........\"", "\".......\"");
        let error = MapLoader::parse(&ragged).expect_err("ragged rows fail");
        assert!(error.to_string().contains("Row 1"));

        let unknown = ARENA.replace(".##..+..", ".##..?..");
        let error = MapLoader::parse(&unknown).expect_err("unknown glyph fails");
        assert!(error.to_string().contains("'?'"));
    }

    #[test]
    fn generated_maps_survive_save_and_load() {
        let config = GameConfig::default();
        let (grid, _) = MapGenerator::new(&config).generate(&mut PcgRng::new(31));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("maps").join("farm.ron");
        MapLoader::save(&path, &grid).expect("save layout");
        let loaded = MapLoader::load(&path).expect("load layout");

        assert_eq!(loaded, grid);
        assert_eq!(loaded.digest(), grid.digest());
    }
}
