//! Game configuration constants and tunable parameters.
//!
//! Every number the chase depends on lives here, grouped by the component that
//! reads it. Defaults reproduce the shipped tuning; TOML files loaded by
//! `game-content` only need to name the values they override.
use crate::geometry::Vec2;

/// Top-level configuration consumed by the map generator and the simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub map: MapConfig,
    pub player: PlayerConfig,
    pub pursuer: PursuerConfig,
    pub items: ItemConfig,
    pub generation: GenerationConfig,
    /// Upper bound applied to every tick's delta time, in seconds.
    ///
    /// Keeps integration stable when the driving clock stalls.
    pub max_frame_delta: f32,
}

impl GameConfig {
    pub const DEFAULT_MAX_FRAME_DELTA: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            map: MapConfig::default(),
            player: PlayerConfig::default(),
            pursuer: PursuerConfig::default(),
            items: ItemConfig::default(),
            generation: GenerationConfig::default(),
            max_frame_delta: Self::DEFAULT_MAX_FRAME_DELTA,
        }
    }

    /// Clamps a raw frame delta to `[0, max_frame_delta]`.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        dt.clamp(0.0, self.max_frame_delta)
    }

    /// Checks the configuration for values the generator or agents cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_frame_delta", self.max_frame_delta)?;
        self.map.validate()?;
        self.player.validate()?;
        self.pursuer.validate()?;
        self.items.validate()?;
        self.generation.validate(self.map.cols(), self.map.rows())?;
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// World extent, tile size and the two fixed landmarks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// World width in units. The grid covers `ceil(width / tile_size)` columns.
    pub width: f32,
    pub height: f32,
    pub tile_size: f32,
    /// Player spawn, near the top-left corner.
    pub spawn: Vec2,
    /// Home burrow, near the bottom-right corner.
    pub goal: Vec2,
}

impl MapConfig {
    pub const DEFAULT_WIDTH: f32 = 2000.0;
    pub const DEFAULT_HEIGHT: f32 = 1500.0;
    pub const DEFAULT_TILE_SIZE: f32 = 64.0;
    pub const CORNER_INSET: f32 = 150.0;

    pub fn cols(&self) -> u32 {
        (self.width / self.tile_size).ceil() as u32
    }

    pub fn rows(&self) -> u32 {
        (self.height / self.tile_size).ceil() as u32
    }

    /// Centre of the world, where the pursuer starts.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("map.width", self.width)?;
        positive("map.height", self.height)?;
        positive("map.tile_size", self.tile_size)?;
        inside("map.spawn", self.spawn, self.width, self.height)?;
        inside("map.goal", self.goal, self.width, self.height)?;
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            tile_size: Self::DEFAULT_TILE_SIZE,
            spawn: Vec2::new(Self::CORNER_INSET, Self::CORNER_INSET),
            goal: Vec2::new(
                Self::DEFAULT_WIDTH - Self::CORNER_INSET,
                Self::DEFAULT_HEIGHT - Self::CORNER_INSET,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub size: f32,
    /// Units per second along each held axis.
    pub speed: f32,
    pub leap_duration: f32,
    pub hide_duration: f32,
    /// Shrinks the collision box inside the visual size so corners do not snag.
    pub collision_inset: f32,
    /// Distance to the goal point below which an unlocked goal is reached.
    pub goal_radius: f32,
}

impl PlayerConfig {
    /// Half extent of the box handed to the collision probe.
    pub fn collision_half_size(&self) -> f32 {
        self.size / 2.0 - self.collision_inset
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("player.size", self.size)?;
        positive("player.speed", self.speed)?;
        positive("player.leap_duration", self.leap_duration)?;
        positive("player.hide_duration", self.hide_duration)?;
        positive("player.collision_half_size", self.collision_half_size())?;
        positive("player.goal_radius", self.goal_radius)?;
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            speed: 300.0,
            leap_duration: 0.4,
            hide_duration: 3.0,
            collision_inset: 5.0,
            goal_radius: 40.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PursuerConfig {
    pub size: f32,
    pub base_speed: f32,
    /// Ceiling shared by the time ramp and the item bonus.
    pub max_speed: f32,
    /// Full width of the vision cone in degrees; half of it on each side of the facing.
    pub vision_angle: f32,
    pub vision_distance: f32,
    pub hearing_radius: f32,
    /// Seconds between time-based speed increments.
    pub speed_interval: f32,
    pub speed_increment: f32,
    /// Collected items per item-based speed increment.
    pub items_per_bump: u32,
    pub item_speed_increment: f32,
}

impl PursuerConfig {
    pub fn half_vision_angle_radians(&self) -> f32 {
        (self.vision_angle / 2.0).to_radians()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("pursuer.size", self.size)?;
        positive("pursuer.base_speed", self.base_speed)?;
        positive("pursuer.vision_angle", self.vision_angle)?;
        positive("pursuer.vision_distance", self.vision_distance)?;
        positive("pursuer.hearing_radius", self.hearing_radius)?;
        positive("pursuer.speed_interval", self.speed_interval)?;
        if self.max_speed < self.base_speed {
            return Err(ConfigError::SpeedCeilingBelowBase {
                base: self.base_speed,
                max: self.max_speed,
            });
        }
        if self.items_per_bump == 0 {
            return Err(ConfigError::Zero {
                field: "pursuer.items_per_bump",
            });
        }
        Ok(())
    }
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            base_speed: 180.0,
            max_speed: 450.0,
            vision_angle: 80.0,
            vision_distance: 350.0,
            hearing_radius: 200.0,
            speed_interval: 8.0,
            speed_increment: 10.0,
            items_per_bump: 10,
            item_speed_increment: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemConfig {
    /// Items to scatter; collecting all of them unlocks the goal.
    pub total: u32,
    pub size: f32,
    /// Margin kept free along every world edge.
    pub padding: f32,
    /// Minimum distance from the player spawn.
    pub spawn_clearance: f32,
    /// Minimum distance between two items.
    pub min_spacing: f32,
    /// Candidate positions tried per requested item before giving up.
    pub attempts_per_item: u32,
}

impl ItemConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("items.size", self.size)?;
        if self.attempts_per_item == 0 {
            return Err(ConfigError::Zero {
                field: "items.attempts_per_item",
            });
        }
        Ok(())
    }
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            total: 100,
            size: 30.0,
            padding: 100.0,
            spawn_clearance: 150.0,
            min_spacing: 60.0,
            attempts_per_item: 1000,
        }
    }
}

/// Inclusive integer range drawn uniformly by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        if self.min == 0 && field.ends_with("_size") {
            return Err(ConfigError::Zero { field });
        }
        Ok(())
    }
}

/// Obstacle counts, sizes, spawn exclusion radii and attempt caps.
///
/// Radii are measured in tiles between an obstacle's top-left cell and the
/// cell of `exclusion_center`. Attempt caps are soft: once exhausted the last
/// candidate is used.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationConfig {
    pub barns: CountRange,
    pub barn_width: CountRange,
    pub barn_height: CountRange,
    pub barn_spawn_radius: f32,
    pub barn_attempts: u32,

    pub ponds: CountRange,
    pub pond_size: CountRange,
    pub pond_spawn_radius: f32,
    pub pond_attempts: u32,

    pub fences: CountRange,
    pub fence_spawn_radius: f32,
    pub fence_attempts: u32,

    /// World point the spawn radii are measured from. Obstacles are placed
    /// before the spawn is fixed, so this sits slightly inward of `map.spawn`.
    pub exclusion_center: Vec2,

    /// Half extent (in tiles) of the square force-cleared around spawn and goal.
    pub clear_radius: u32,
}

impl GenerationConfig {
    /// Smallest grid the placement windows fit in for this configuration.
    pub fn min_dimensions(&self) -> (u32, u32) {
        let cols = (self.barn_width.max + 5).max(self.pond_size.max + 3).max(3);
        let rows = (self.barn_height.max + 5).max(self.pond_size.max + 3).max(3);
        (cols, rows)
    }

    fn validate(&self, cols: u32, rows: u32) -> Result<(), ConfigError> {
        self.barns.validate("generation.barns")?;
        self.barn_width.validate("generation.barn_width")?;
        self.barn_height.validate("generation.barn_height")?;
        self.ponds.validate("generation.ponds")?;
        self.pond_size.validate("generation.pond_size")?;
        self.fences.validate("generation.fences")?;
        for (field, attempts) in [
            ("generation.barn_attempts", self.barn_attempts),
            ("generation.pond_attempts", self.pond_attempts),
            ("generation.fence_attempts", self.fence_attempts),
        ] {
            if attempts == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        let (min_cols, min_rows) = self.min_dimensions();
        if cols < min_cols || rows < min_rows {
            return Err(ConfigError::MapTooSmall {
                cols,
                rows,
                min_cols,
                min_rows,
            });
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            barns: CountRange::new(8, 12),
            barn_width: CountRange::new(3, 5),
            barn_height: CountRange::new(2, 3),
            barn_spawn_radius: 8.0,
            barn_attempts: 50,
            ponds: CountRange::new(3, 5),
            pond_size: CountRange::new(2, 4),
            pond_spawn_radius: 6.0,
            pond_attempts: 30,
            fences: CountRange::new(15, 24),
            fence_spawn_radius: 4.0,
            fence_attempts: 20,
            exclusion_center: Vec2::new(200.0, 200.0),
            clear_radius: 2,
        }
    }
}

/// Invalid configuration values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be zero")]
    Zero { field: &'static str },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("pursuer max speed {max} is below base speed {base}")]
    SpeedCeilingBelowBase { base: f32, max: f32 },

    #[error("map of {cols}x{rows} tiles is smaller than the generator needs ({min_cols}x{min_rows})")]
    MapTooSmall {
        cols: u32,
        rows: u32,
        min_cols: u32,
        min_rows: u32,
    },

    #[error("{field} ({x}, {y}) lies outside the map")]
    PointOutsideMap { field: &'static str, x: f32, y: f32 },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn inside(field: &'static str, point: Vec2, width: f32, height: f32) -> Result<(), ConfigError> {
    if point.x >= 0.0 && point.y >= 0.0 && point.x < width && point.y < height {
        Ok(())
    } else {
        Err(ConfigError::PointOutsideMap {
            field,
            x: point.x,
            y: point.y,
        })
    }
}
