//! Deterministic pursuit simulation shared by the runtime and offline tools.
//!
//! `game-core` defines the canonical rules of the chase: the tile grid and its
//! blocking semantics, the four-corner collision probe both agents query, the
//! procedural map generator, the player's movement/leap/hide controller and
//! the pursuer's perception-driven state machine. All per-tick mutation flows
//! through [`simulation::Simulation::tick`]; supporting crates depend on the
//! types re-exported here.
//!
//! Randomness is always injected through [`env::RngSource`], so a session is
//! fully reproducible from its seed and its input sequence.
pub mod agent;
pub mod config;
pub mod env;
pub mod geometry;
pub mod items;
pub mod simulation;

pub use agent::{
    Facing, InputState, ModeChange, Perception, PlayerAgent, PlayerStep, PursuerAgent,
    PursuerMode, PursuerState, SpeedModel,
};
pub use config::{
    ConfigError, CountRange, GameConfig, GenerationConfig, ItemConfig, MapConfig, PlayerConfig,
    PursuerConfig,
};
pub use env::{
    CollisionProbe, GenerationReport, GridError, MapGenerator, PcgRng, RngSource, SeedStream,
    StageReport, TileGrid, TileGridData, TileKind, derive_seed,
};
pub use geometry::{Vec2, normalize_angle};
pub use items::{Item, ItemField, ItemKind, PlacementReport};
pub use simulation::{
    PlayerView, PursuerView, SessionStatus, Simulation, TickEvent, TickReport, WorldSnapshot,
};
