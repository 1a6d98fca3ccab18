//! Procedural farm layout.
//!
//! Stages run in a fixed order and each later stage sees the tiles written by
//! the earlier ones: barns, ponds, fences, then the forced clearing around the
//! spawn and goal landmarks. Placement near spawn is only discouraged: after
//! the attempt cap runs out the last candidate is used anyway.
use super::{RngSource, TileGrid, TileKind};
use crate::config::{CountRange, GameConfig};
use crate::geometry::Vec2;

/// Outcome of one placement stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageReport {
    pub requested: u32,
    pub placed: u32,
    /// Placed inside the spawn exclusion radius after exhausting attempts.
    pub forced_near_spawn: u32,
    /// Dropped because the target cell was unsuitable (fences only).
    pub skipped: u32,
}

/// Summary of a generated layout, logged by the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    pub barns: StageReport,
    pub ponds: StageReport,
    pub fences: StageReport,
    /// Obstacle cells overwritten by the spawn and goal clearing.
    pub cleared_cells: u32,
}

impl GenerationReport {
    pub fn forced_near_spawn(&self) -> u32 {
        self.barns.forced_near_spawn + self.ponds.forced_near_spawn + self.fences.forced_near_spawn
    }
}

/// Builds a [`TileGrid`] from a [`GameConfig`] and an injected random source.
#[derive(Clone, Copy, Debug)]
pub struct MapGenerator<'a> {
    config: &'a GameConfig,
}

struct Rect {
    col: u32,
    row: u32,
    width: u32,
    height: u32,
}

impl<'a> MapGenerator<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    pub fn generate<R: RngSource + ?Sized>(&self, rng: &mut R) -> (TileGrid, GenerationReport) {
        let map = &self.config.map;
        let mut grid = TileGrid::new(map.cols(), map.rows(), map.tile_size, map.spawn, map.goal);
        let mut report = GenerationReport {
            barns: self.place_barns(&mut grid, rng),
            ponds: self.place_ponds(&mut grid, rng),
            fences: self.place_fences(&mut grid, rng),
            cleared_cells: 0,
        };
        report.cleared_cells += self.clear_around(&mut grid, map.spawn);
        report.cleared_cells += self.clear_around(&mut grid, map.goal);
        let (goal_col, goal_row) = grid.cell_of(map.goal);
        grid.set(goal_col, goal_row, TileKind::Burrow);
        (grid, report)
    }

    fn place_barns<R: RngSource + ?Sized>(&self, grid: &mut TileGrid, rng: &mut R) -> StageReport {
        let generation = &self.config.generation;
        let mut report = StageReport {
            requested: draw(rng, generation.barns),
            ..StageReport::default()
        };
        for _ in 0..report.requested {
            let width = draw(rng, generation.barn_width);
            let height = draw(rng, generation.barn_height);
            let (col, row, forced) = self.pick_cell(
                rng,
                generation.barn_attempts,
                generation.barn_spawn_radius,
                |rng| {
                    (
                        rng.below(grid.cols().saturating_sub(width + 4)) + 2,
                        rng.below(grid.rows().saturating_sub(height + 4)) + 2,
                    )
                },
            );
            fill(
                grid,
                Rect {
                    col,
                    row,
                    width,
                    height,
                },
                TileKind::Solid,
            );
            report.placed += 1;
            report.forced_near_spawn += u32::from(forced);
        }
        report
    }

    fn place_ponds<R: RngSource + ?Sized>(&self, grid: &mut TileGrid, rng: &mut R) -> StageReport {
        let generation = &self.config.generation;
        let mut report = StageReport {
            requested: draw(rng, generation.ponds),
            ..StageReport::default()
        };
        for _ in 0..report.requested {
            let size = draw(rng, generation.pond_size);
            let (col, row, forced) = self.pick_cell(
                rng,
                generation.pond_attempts,
                generation.pond_spawn_radius,
                |rng| {
                    (
                        rng.below(grid.cols().saturating_sub(size + 2)) + 1,
                        rng.below(grid.rows().saturating_sub(size + 2)) + 1,
                    )
                },
            );
            fill(
                grid,
                Rect {
                    col,
                    row,
                    width: size,
                    height: size,
                },
                TileKind::Water,
            );
            report.placed += 1;
            report.forced_near_spawn += u32::from(forced);
        }
        report
    }

    fn place_fences<R: RngSource + ?Sized>(&self, grid: &mut TileGrid, rng: &mut R) -> StageReport {
        let generation = &self.config.generation;
        let mut report = StageReport {
            requested: draw(rng, generation.fences),
            ..StageReport::default()
        };
        for _ in 0..report.requested {
            let (col, row, forced) = self.pick_cell(
                rng,
                generation.fence_attempts,
                generation.fence_spawn_radius,
                |rng| {
                    (
                        rng.below(grid.cols().saturating_sub(2)) + 1,
                        rng.below(grid.rows().saturating_sub(2)) + 1,
                    )
                },
            );
            let (col, row) = (col as i32, row as i32);
            if grid.tile(col, row) != TileKind::Ground || touches_solid(grid, col, row) {
                report.skipped += 1;
                continue;
            }
            grid.set(col, row, TileKind::Jumpable);
            report.placed += 1;
            report.forced_near_spawn += u32::from(forced);
        }
        report
    }

    /// Draws candidates until one lies outside `radius` tiles of spawn or the
    /// attempts run out. The flag is true when the returned cell is still near spawn.
    fn pick_cell<R, F>(
        &self,
        rng: &mut R,
        attempts: u32,
        radius: f32,
        mut candidate: F,
    ) -> (u32, u32, bool)
    where
        R: RngSource + ?Sized,
        F: FnMut(&mut R) -> (u32, u32),
    {
        let mut tries = 0;
        loop {
            let (col, row) = candidate(&mut *rng);
            tries += 1;
            let near = self.is_near_spawn(col, row, radius);
            if !near || tries >= attempts {
                return (col, row, near);
            }
        }
    }

    fn is_near_spawn(&self, col: u32, row: u32, radius: f32) -> bool {
        let tile_size = self.config.map.tile_size;
        let anchor = self.config.generation.exclusion_center;
        let dx = col as f32 - (anchor.x / tile_size).floor();
        let dy = row as f32 - (anchor.y / tile_size).floor();
        (dx * dx + dy * dy).sqrt() < radius
    }

    /// Forces the square around `point` back to ground; returns the cells that changed.
    fn clear_around(&self, grid: &mut TileGrid, point: Vec2) -> u32 {
        let radius = self.config.generation.clear_radius as i32;
        let (center_col, center_row) = grid.cell_of(point);
        let mut cleared = 0;
        for row in center_row - radius..=center_row + radius {
            for col in center_col - radius..=center_col + radius {
                if grid.contains_cell(col, row) && grid.tile(col, row) != TileKind::Ground {
                    grid.set(col, row, TileKind::Ground);
                    cleared += 1;
                }
            }
        }
        cleared
    }
}

fn draw<R: RngSource + ?Sized>(rng: &mut R, range: CountRange) -> u32 {
    rng.range_inclusive(range.min, range.max)
}

fn fill(grid: &mut TileGrid, rect: Rect, kind: TileKind) {
    for row in rect.row..rect.row + rect.height {
        for col in rect.col..rect.col + rect.width {
            grid.set(col as i32, row as i32, kind);
        }
    }
}

fn touches_solid(grid: &TileGrid, col: i32, row: i32) -> bool {
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| {
            (dx, dy) != (0, 0)
                && grid.contains_cell(col + dx, row + dy)
                && grid.tile(col + dx, row + dy) == TileKind::Solid
        })
    })
}
