//! Data-driven content for the pursuit simulation.
//!
//! Loaders turn files into `game-core` values:
//! - Game configuration (TOML, every field optional)
//! - Hand-authored or saved map layouts (RON, one glyph per tile)
//!
//! Nothing here takes part in a tick; the runtime resolves content once at
//! session start.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, MapLayout, MapLoader};
