//! Static world data and the deterministic sources that build it.
//!
//! The tile grid is produced once by [`MapGenerator`] (or loaded from disk),
//! then shared read-only with both agents through an `Arc`. Randomness enters
//! only through [`RngSource`], so every layout is reproducible from its seed.
mod collision;
mod generator;
mod grid;
mod rng;
mod tile;

pub use collision::CollisionProbe;
pub use generator::{GenerationReport, MapGenerator, StageReport};
pub use grid::{GridError, TileGrid, TileGridData};
pub use rng::{PcgRng, RngSource, SeedStream, derive_seed};
pub use tile::TileKind;
