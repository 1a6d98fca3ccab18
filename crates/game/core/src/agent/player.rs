use core::f32::consts::FRAC_1_SQRT_2;

use super::InputState;
use crate::config::PlayerConfig;
use crate::env::{TileGrid, TileKind};
use crate::geometry::Vec2;

/// Horizontal facing, tracked from the last horizontal key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Ability transitions that happened during one player update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub leap_started: bool,
    pub hide_started: bool,
    pub hide_ended: bool,
}

/// Movement controller with the leap and hide abilities.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerAgent {
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    /// Seconds of leap left; `None` when grounded.
    leap: Option<f32>,
    /// Seconds of hiding left; `None` when visible.
    hide: Option<f32>,
    config: PlayerConfig,
}

impl PlayerAgent {
    pub fn new(config: &PlayerConfig, spawn: Vec2) -> Self {
        Self {
            position: spawn,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            leap: None,
            hide: None,
            config: config.clone(),
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.config.speed
    }

    pub fn size(&self) -> f32 {
        self.config.size
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_leaping(&self) -> bool {
        self.leap.is_some()
    }

    pub fn is_hidden(&self) -> bool {
        self.hide.is_some()
    }

    pub fn leap_remaining(&self) -> f32 {
        self.leap.unwrap_or(0.0)
    }

    pub fn hide_remaining(&self) -> f32 {
        self.hide.unwrap_or(0.0)
    }

    /// True when the player centre is strictly closer than `radius` to `point`.
    pub fn is_within(&self, point: Vec2, radius: f32) -> bool {
        self.position.distance_to(point) < radius
    }

    /// Advances the player by `dt` seconds under the held `input`.
    pub fn update(&mut self, dt: f32, input: InputState, grid: &TileGrid) -> PlayerStep {
        let mut step = PlayerStep::default();

        if let Some(remaining) = self.hide.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.hide = None;
                step.hide_ended = true;
            }
            return step;
        }

        if let Some(remaining) = self.leap.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.leap = None;
            }
        }

        let mut velocity = self.input_velocity(input);
        let standing_on = grid.tile_at(self.position);

        if input.contains(InputState::LEAP)
            && !self.is_leaping()
            && standing_on != TileKind::Jumpable
        {
            self.leap = Some(self.config.leap_duration);
            step.leap_started = true;
        }

        if input.contains(InputState::HIDE) && !self.is_leaping() && standing_on == TileKind::Ground {
            self.hide = Some(self.config.hide_duration);
            velocity = Vec2::ZERO;
            step.hide_started = true;
        }

        if velocity.x != 0.0 && velocity.y != 0.0 {
            velocity = velocity * FRAC_1_SQRT_2;
        }
        self.velocity = velocity;

        self.position = grid.probe().slide(
            self.position,
            velocity * dt,
            self.config.collision_half_size(),
            !self.is_leaping(),
        );
        step
    }

    fn input_velocity(&mut self, input: InputState) -> Vec2 {
        let speed = self.config.speed;
        let mut velocity = Vec2::ZERO;
        if input.contains(InputState::UP) {
            velocity.y = -speed;
        }
        if input.contains(InputState::DOWN) {
            velocity.y = speed;
        }
        if input.contains(InputState::LEFT) {
            velocity.x = -speed;
            self.facing = Facing::Left;
        }
        if input.contains(InputState::RIGHT) {
            velocity.x = speed;
            self.facing = Facing::Right;
        }
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 64.0;

    fn open_grid() -> TileGrid {
        TileGrid::new(10, 10, TILE, Vec2::new(160.0, 160.0), Vec2::new(500.0, 500.0))
    }

    fn player_at(col: u32, row: u32) -> PlayerAgent {
        let grid = open_grid();
        PlayerAgent::new(&PlayerConfig::default(), Vec2::ZERO).with_position(grid.cell_center(col, row))
    }

    #[test]
    fn diagonal_speed_is_normalised() {
        let grid = open_grid();
        let mut player = player_at(4, 4);
        player.update(0.1, InputState::DOWN | InputState::RIGHT, &grid);
        let velocity = player.velocity();
        assert!((velocity.length() - 300.0).abs() < 1e-3);
        assert!((velocity.x - velocity.y).abs() < 1e-6);
    }

    #[test]
    fn opposing_keys_resolve_to_down_and_right() {
        let grid = open_grid();
        let mut player = player_at(4, 4);
        player.update(0.0, InputState::MOVEMENT, &grid);
        assert!(player.velocity().x > 0.0 && player.velocity().y > 0.0);
        assert_eq!(player.facing(), Facing::Right);

        player.update(0.0, InputState::LEFT, &grid);
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn leap_is_rejected_on_a_jumpable_tile() {
        let mut grid = open_grid();
        grid.set(4, 4, TileKind::Jumpable);
        let mut player = player_at(4, 4);
        let step = player.update(0.016, InputState::LEAP, &grid);
        assert!(!step.leap_started);
        assert!(!player.is_leaping());
    }

    #[test]
    fn leap_crosses_fences_but_not_barns() {
        let mut grid = open_grid();
        grid.set(5, 4, TileKind::Jumpable);
        let start = grid.cell_center(4, 4);

        let mut grounded = player_at(4, 4);
        for _ in 0..10 {
            grounded.update(0.02, InputState::RIGHT, &grid);
        }
        assert!(grounded.position().x < 5.0 * TILE - 15.0 + 0.01);

        let mut leaper = player_at(4, 4);
        let step = leaper.update(0.02, InputState::RIGHT | InputState::LEAP, &grid);
        assert!(step.leap_started);
        for _ in 0..9 {
            leaper.update(0.02, InputState::RIGHT, &grid);
        }
        assert!(leaper.position().x > start.x + 50.0);

        grid.set(5, 4, TileKind::Solid);
        let mut blocked = player_at(4, 4);
        blocked.update(0.02, InputState::RIGHT | InputState::LEAP, &grid);
        for _ in 0..9 {
            blocked.update(0.02, InputState::RIGHT, &grid);
        }
        assert!(blocked.position().x <= 5.0 * TILE - 15.0);
    }

    #[test]
    fn leap_expires_after_its_duration() {
        let grid = open_grid();
        let mut player = player_at(4, 4);
        player.update(0.1, InputState::LEAP, &grid);
        assert!(player.is_leaping());
        for _ in 0..5 {
            player.update(0.1, InputState::empty(), &grid);
        }
        assert!(!player.is_leaping());
    }

    #[test]
    fn hide_freezes_and_expires() {
        let grid = open_grid();
        let mut player = player_at(4, 4);
        let step = player.update(0.1, InputState::HIDE | InputState::RIGHT, &grid);
        assert!(step.hide_started);
        assert!(player.is_hidden());
        assert_eq!(player.velocity(), Vec2::ZERO);
        let hidden_at = player.position();

        let mut ended = false;
        for _ in 0..29 {
            ended |= player.update(0.1, InputState::RIGHT, &grid).hide_ended;
            assert_eq!(player.position(), hidden_at);
        }
        assert!(!ended);
        assert!(player.update(0.11, InputState::RIGHT, &grid).hide_ended);
        assert!(!player.is_hidden());
    }

    #[test]
    fn hide_requires_ground() {
        let mut grid = open_grid();
        grid.set(4, 4, TileKind::Burrow);
        let mut player = player_at(4, 4);
        assert!(!player.update(0.1, InputState::HIDE, &grid).hide_started);
    }

    #[test]
    fn hide_is_blocked_while_leaping() {
        let grid = open_grid();
        let mut player = player_at(4, 4);
        let step = player.update(0.05, InputState::LEAP | InputState::HIDE, &grid);
        assert!(step.leap_started);
        assert!(!step.hide_started);
    }
}
