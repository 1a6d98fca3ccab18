use super::TileGrid;
use crate::geometry::Vec2;

/// Four-corner box test against a [`TileGrid`].
///
/// A box is blocked when any of its corners lies in a blocking tile. Edges are
/// not swept, so a box narrower than a tile can straddle a blocking cell as long
/// as no corner falls inside it. Both agents rely on this exact behaviour.
#[derive(Clone, Copy, Debug)]
pub struct CollisionProbe<'a> {
    grid: &'a TileGrid,
}

impl<'a> CollisionProbe<'a> {
    pub fn new(grid: &'a TileGrid) -> Self {
        Self { grid }
    }

    /// Corners of the axis-aligned box centred on `center`.
    pub fn corners(center: Vec2, half_size: f32) -> [Vec2; 4] {
        [
            Vec2::new(center.x - half_size, center.y - half_size),
            Vec2::new(center.x + half_size, center.y - half_size),
            Vec2::new(center.x - half_size, center.y + half_size),
            Vec2::new(center.x + half_size, center.y + half_size),
        ]
    }

    /// True when the box at `center` touches a blocking tile at any corner.
    pub fn check(&self, center: Vec2, half_size: f32, include_jumpable: bool) -> bool {
        Self::corners(center, half_size)
            .into_iter()
            .any(|corner| self.grid.tile_at(corner).is_blocking(include_jumpable))
    }

    /// Axis-separated move: each axis is applied only if the box stays clear.
    pub fn slide(
        &self,
        position: Vec2,
        delta: Vec2,
        half_size: f32,
        include_jumpable: bool,
    ) -> Vec2 {
        let mut next = position;
        let candidate_x = Vec2::new(position.x + delta.x, next.y);
        if !self.check(candidate_x, half_size, include_jumpable) {
            next.x = candidate_x.x;
        }
        let candidate_y = Vec2::new(next.x, position.y + delta.y);
        if !self.check(candidate_y, half_size, include_jumpable) {
            next.y = candidate_y.y;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TileKind;

    const TILE: f32 = 64.0;

    fn grid_with(cells: &[(i32, i32, TileKind)]) -> TileGrid {
        let mut grid = TileGrid::new(12, 12, TILE, Vec2::ZERO, Vec2::ZERO);
        for (col, row, kind) in cells {
            grid.set(*col, *row, *kind);
        }
        grid
    }

    #[test]
    fn any_corner_in_solid_blocks() {
        let grid = grid_with(&[(3, 3, TileKind::Solid)]);
        let probe = grid.probe();
        // bottom-right corner at (193, 193) lands in cell (3, 3)
        assert!(probe.check(Vec2::new(178.0, 178.0), 15.0, false));
        assert!(!probe.check(Vec2::new(100.0, 100.0), 15.0, false));
    }

    #[test]
    fn edges_may_straddle_a_blocking_tile() {
        let grid = grid_with(&[(3, 3, TileKind::Solid)]);
        // box wider than the tile: corners at cols 2 and 4, edge crosses col 3
        let center = Vec2::new(3.5 * TILE, 2.5 * TILE + 20.0);
        assert!(!grid.probe().check(center, 40.0, false));
    }

    #[test]
    fn jumpable_only_blocks_when_included() {
        let grid = grid_with(&[(2, 2, TileKind::Jumpable)]);
        let center = Vec2::new(2.5 * TILE, 2.5 * TILE);
        assert!(grid.probe().check(center, 10.0, true));
        assert!(!grid.probe().check(center, 10.0, false));
    }

    #[test]
    fn leaving_the_grid_is_blocked() {
        let grid = grid_with(&[]);
        assert!(grid.probe().check(Vec2::new(5.0, 100.0), 15.0, false));
        assert!(!grid.probe().check(Vec2::new(20.0, 100.0), 15.0, false));
    }

    #[test]
    fn translation_by_whole_tiles_preserves_verdicts() {
        let pattern = [
            (3, 3, TileKind::Solid),
            (4, 3, TileKind::Water),
            (5, 5, TileKind::Jumpable),
        ];
        let (dc, dr) = (2, 3);
        let shifted: Vec<_> = pattern
            .iter()
            .map(|(c, r, k)| (c + dc, r + dr, *k))
            .collect();
        let a = grid_with(&pattern);
        let b = grid_with(&shifted);
        let offset = Vec2::new(dc as f32 * TILE, dr as f32 * TILE);

        let mut y = 96.0;
        while y < 400.0 {
            let mut x = 96.0;
            while x < 420.0 {
                let center = Vec2::new(x, y);
                for include in [false, true] {
                    assert_eq!(
                        a.probe().check(center, 15.0, include),
                        b.probe().check(center + offset, 15.0, include),
                        "mismatch at ({x}, {y}) include_jumpable={include}"
                    );
                }
                x += 7.0;
            }
            y += 7.0;
        }
    }

    #[test]
    fn slide_moves_along_a_wall() {
        let grid = grid_with(&[(4, 2, TileKind::Solid), (4, 3, TileKind::Solid)]);
        let start = Vec2::new(4.0 * TILE - 20.0, 2.5 * TILE);
        let next = grid.probe().slide(start, Vec2::new(10.0, 10.0), 15.0, false);
        assert_eq!(next.x, start.x);
        assert_eq!(next.y, start.y + 10.0);
    }
}
