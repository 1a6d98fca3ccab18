//! Event payloads that do not come straight from the simulation.

use game_core::SessionStatus;
use serde::{Deserialize, Serialize};

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The session was built and is about to run its first tick.
    Started {
        seed: u64,
        cols: u32,
        rows: u32,
        /// Hex-encoded map digest.
        map_digest: String,
        items_total: u32,
    },

    /// The simulation reached a terminal status.
    Finished {
        status: SessionStatus,
        ticks: u64,
        elapsed: f32,
        score: u32,
    },

    /// The driver was stopped before the session ended.
    Cancelled { ticks: u64, elapsed: f32 },
}
