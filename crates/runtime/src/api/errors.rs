//! Unified error types surfaced by the runtime API.
//!
//! Wraps configuration, map and repository failures so clients can bubble
//! them up with consistent context.
use std::fmt;

use game_core::{ConfigError, SessionStatus};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid game config: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "map is {cols}x{rows} tiles of {tile_size}, config expects {expected_cols}x{expected_rows} tiles of {expected_tile_size}"
    )]
    MapMismatch {
        cols: u32,
        rows: u32,
        tile_size: f32,
        expected_cols: u32,
        expected_rows: u32,
        expected_tile_size: f32,
    },

    #[error("{kind} provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("session already finished ({status})")]
    SessionFinished { status: SessionStatus },

    #[error("timestep must be positive, got {0}")]
    InvalidTimestep(f32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Copy, Clone)]
pub enum ProviderKind {
    Input,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Input => "input",
        };
        write!(f, "{}", label)
    }
}
