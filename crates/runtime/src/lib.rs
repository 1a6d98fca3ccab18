//! Runtime orchestration for the pursuit simulation.
//!
//! This crate wires the pure [`game_core::Simulation`] to the outside world:
//! input providers, a fixed-timestep driver, the event bus and replay
//! persistence. Consumers embed [`Runtime`] to run sessions headless or paced
//! against the wall clock.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the driver and its builder
//! - [`api`] exposes the error and input-provider types clients implement against
//! - [`events`] provides the topic-based event bus
//! - [`replay`] records sessions and re-runs them
//! - [`repository`] persists replay logs
pub mod api;
pub mod events;
pub mod replay;
pub mod repository;
pub mod runtime;

pub use api::{
    IdleInput, InputProvider, ProviderKind, Result, RuntimeError, ScriptedInput, WanderingInput,
};
pub use events::{Event, EventBus, SessionEvent, Topic};
pub use replay::{REPLAY_VERSION, ReplayFrame, ReplayLog, Trajectory, TrajectoryPoint, replay};
pub use repository::{
    FileReplayRepository, InMemoryReplayRepository, ReplayRepository, RepositoryError,
};
pub use runtime::{RunOptions, Runtime, RuntimeBuilder, RuntimeConfig, SessionSummary};
