//! Repository layer for recorded sessions.
//!
//! Static content (configs, map layouts) is loaded by `game-content`;
//! repositories only hold what a session produces.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileReplayRepository;
pub use memory::InMemoryReplayRepository;
pub use traits::ReplayRepository;
