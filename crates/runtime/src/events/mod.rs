//! Topic-based event bus for runtime events.
//!
//! The simulation returns its events from each tick; the runtime stamps them
//! and publishes them here so renderers, audio and UI collaborators can
//! subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::SessionEvent;
