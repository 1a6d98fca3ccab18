//! In-memory repository implementations for tests and local runs.

mod replay;

pub use replay::InMemoryReplayRepository;
