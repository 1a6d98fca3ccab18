//! High-level session driver.
//!
//! The runtime owns one [`Simulation`], pulls player input from an
//! [`InputProvider`] once per tick, publishes the tick's events on the
//! [`EventBus`] and optionally records a [`ReplayLog`]. It exposes a
//! builder-based API for clients to configure sessions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use game_core::{
    GameConfig, GenerationReport, PlacementReport, SessionStatus, Simulation, TickEvent,
    TickReport, TileGrid, WorldSnapshot,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::{InputProvider, ProviderKind, Result, RuntimeError};
use crate::events::{Event, EventBus, SessionEvent, Topic};
use crate::replay::ReplayLog;

/// Runtime configuration shared across the driver and its collaborators.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Session seed; drawn at random when absent.
    pub seed: Option<u64>,
    /// Fixed delta for [`Runtime::step`], in seconds.
    pub timestep: f32,
    pub event_buffer_size: usize,
    pub record_replay: bool,
    /// Publish a [`WorldSnapshot`] on [`Topic::Frame`] after every tick.
    pub publish_frames: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            seed: None,
            timestep: 1.0 / 60.0,
            event_buffer_size: 100,
            record_replay: true,
            publish_frames: false,
        }
    }
}

/// How long [`Runtime::run`] drives the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after this many ticks even if the session is still running.
    pub max_ticks: Option<u64>,
    /// Pace ticks against the wall clock and feed the measured delta.
    pub realtime: bool,
}

impl RunOptions {
    pub fn headless(max_ticks: u64) -> Self {
        Self {
            max_ticks: Some(max_ticks),
            realtime: false,
        }
    }

    pub fn realtime() -> Self {
        Self {
            max_ticks: None,
            realtime: true,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub ticks: u64,
    pub elapsed: f32,
    pub status: SessionStatus,
    pub score: u32,
    pub items_collected: u32,
    pub items_total: u32,
    /// The driver was stopped by the shutdown signal.
    pub cancelled: bool,
}

/// Main runtime that drives one pursuit session.
pub struct Runtime {
    config: RuntimeConfig,
    seed: u64,
    simulation: Simulation,
    input: Box<dyn InputProvider>,
    events: EventBus,
    recorder: Option<ReplayLog>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.simulation.snapshot()
    }

    pub fn status(&self) -> SessionStatus {
        self.simulation.status()
    }

    /// Get a cloneable handle to the event bus
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    /// Replace the input provider mid-session.
    pub fn set_input_provider(&mut self, provider: impl InputProvider + 'static) {
        self.input = Box::new(provider);
    }

    /// Execute one tick with the configured fixed timestep.
    pub fn step(&mut self) -> Result<TickReport> {
        self.step_with(self.config.timestep)
    }

    /// Execute one tick with an externally measured delta.
    ///
    /// The simulation clamps the delta; the replay records it unclamped.
    pub fn step_with(&mut self, dt: f32) -> Result<TickReport> {
        let status = self.simulation.status();
        if status.is_terminal() {
            return Err(RuntimeError::SessionFinished { status });
        }

        let input = self.input.next_input(&self.simulation.snapshot());
        let report = self.simulation.tick(dt, input);
        if let Some(log) = self.recorder.as_mut() {
            log.record(dt, input, report.status);
        }

        tracing::trace!(tick = report.tick, dt = report.dt, ?input, "tick");
        for event in &report.events {
            self.log_event(report.tick, event);
            self.events.publish(Event::Tick {
                tick: report.tick,
                event: event.clone(),
            });
        }
        if self.config.publish_frames {
            self.events.publish(Event::Frame(self.simulation.snapshot()));
        }

        if report.status.is_terminal() {
            let summary = self.summary(false);
            tracing::info!(
                status = %summary.status,
                ticks = summary.ticks,
                elapsed = summary.elapsed,
                score = summary.score,
                items = summary.items_collected,
                "session finished"
            );
            self.events.publish(Event::Session(SessionEvent::Finished {
                status: summary.status,
                ticks: summary.ticks,
                elapsed: summary.elapsed,
                score: summary.score,
            }));
        }

        Ok(report)
    }

    /// Drive the session until it ends, `options.max_ticks` more ticks have
    /// run, or `shutdown` resolves.
    ///
    /// Headless runs step with the fixed timestep and yield to the scheduler
    /// between ticks; realtime runs pace ticks with a tokio interval.
    pub async fn run<F>(&mut self, options: RunOptions, shutdown: F) -> Result<SessionSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let first_tick = self.simulation.tick_count();
        let mut pacer = if options.realtime {
            let mut interval = tokio::time::interval(Duration::from_secs_f32(self.config.timestep));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(interval)
        } else {
            None
        };
        let mut last = Instant::now();
        let mut cancelled = false;

        while !self.simulation.status().is_terminal() {
            if let Some(limit) = options.max_ticks
                && self.simulation.tick_count() - first_tick >= limit
            {
                tracing::debug!(limit, "tick limit reached");
                break;
            }

            match pacer.as_mut() {
                Some(interval) => {
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            cancelled = true;
                            break;
                        }
                        _ = interval.tick() => {}
                    }
                    let now = Instant::now();
                    let dt = now.duration_since(last).as_secs_f32();
                    last = now;
                    self.step_with(dt)?;
                }
                None => {
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            cancelled = true;
                            break;
                        }
                        _ = tokio::task::yield_now() => {}
                    }
                    self.step()?;
                }
            }
        }

        let summary = self.summary(cancelled);
        if cancelled {
            tracing::info!(ticks = summary.ticks, "session cancelled");
            self.events.publish(Event::Session(SessionEvent::Cancelled {
                ticks: summary.ticks,
                elapsed: summary.elapsed,
            }));
        }
        Ok(summary)
    }

    pub fn summary(&self, cancelled: bool) -> SessionSummary {
        let snapshot = self.simulation.snapshot();
        SessionSummary {
            seed: self.seed,
            ticks: snapshot.tick,
            elapsed: snapshot.elapsed,
            status: snapshot.status,
            score: snapshot.score,
            items_collected: snapshot.items_collected,
            items_total: snapshot.items_total,
            cancelled,
        }
    }

    pub fn replay_log(&self) -> Option<&ReplayLog> {
        self.recorder.as_ref()
    }

    /// Consume the runtime, keeping only the recording.
    pub fn into_replay(self) -> Option<ReplayLog> {
        self.recorder
    }

    fn log_event(&self, tick: u64, event: &TickEvent) {
        match event {
            TickEvent::PursuerModeChanged(change) => {
                tracing::debug!(tick, from = %change.from, to = %change.to, "pursuer mode changed");
            }
            TickEvent::ItemCollected {
                kind,
                points,
                total_collected,
                ..
            } => {
                tracing::debug!(tick, %kind, points, total_collected, "item collected");
            }
            TickEvent::GoalUnlocked => tracing::info!(tick, "goal unlocked"),
            other => tracing::trace!(tick, event = ?other, "player event"),
        }
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    grid: Option<Arc<TileGrid>>,
    input: Option<Box<dyn InputProvider>>,
    events: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            grid: None,
            input: None,
            events: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Use an existing map (for example one loaded from disk) instead of
    /// generating one. Its dimensions must match the game config.
    pub fn grid(mut self, grid: impl Into<Arc<TileGrid>>) -> Self {
        self.grid = Some(grid.into());
        self
    }

    /// Set the player input provider (required)
    pub fn input_provider(mut self, provider: impl InputProvider + 'static) -> Self {
        self.input = Some(Box::new(provider));
        self
    }

    /// Publish on an existing bus instead of creating one.
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn record_replay(mut self, enable: bool) -> Self {
        self.config.record_replay = enable;
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<Runtime> {
        let input = self.input.ok_or(RuntimeError::ProviderNotSet {
            kind: ProviderKind::Input,
        })?;
        let timestep = self.config.timestep;
        if !(timestep.is_finite() && timestep > 0.0) {
            return Err(RuntimeError::InvalidTimestep(timestep));
        }
        let game_config = self.config.game_config.clone();
        game_config.validate()?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let (simulation, placement) = match self.grid {
            Some(grid) => {
                check_dimensions(&game_config, &grid)?;
                tracing::info!(
                    cols = grid.cols(),
                    rows = grid.rows(),
                    digest = %hex::encode(grid.digest()),
                    "using supplied map"
                );
                Simulation::with_grid(game_config.clone(), grid, seed)
            }
            None => {
                let (simulation, generation, placement) =
                    Simulation::generate(game_config.clone(), seed);
                log_generation(seed, simulation.grid(), &generation);
                (simulation, placement)
            }
        };
        log_placement(&placement);

        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let recorder = self
            .config
            .record_replay
            .then(|| ReplayLog::new(seed, game_config, simulation.grid()));

        let grid = simulation.grid();
        events.publish(Event::Session(SessionEvent::Started {
            seed,
            cols: grid.cols(),
            rows: grid.rows(),
            map_digest: hex::encode(grid.digest()),
            items_total: placement.placed,
        }));
        tracing::info!(seed, items = placement.placed, "session ready");

        Ok(Runtime {
            config: self.config,
            seed,
            simulation,
            input,
            events,
            recorder,
        })
    }
}

fn check_dimensions(config: &GameConfig, grid: &TileGrid) -> Result<()> {
    let map = &config.map;
    if grid.cols() != map.cols() || grid.rows() != map.rows() || grid.tile_size() != map.tile_size
    {
        return Err(RuntimeError::MapMismatch {
            cols: grid.cols(),
            rows: grid.rows(),
            tile_size: grid.tile_size(),
            expected_cols: map.cols(),
            expected_rows: map.rows(),
            expected_tile_size: map.tile_size,
        });
    }
    Ok(())
}

fn log_generation(seed: u64, grid: &TileGrid, report: &GenerationReport) {
    tracing::info!(
        seed,
        cols = grid.cols(),
        rows = grid.rows(),
        barns = report.barns.placed,
        ponds = report.ponds.placed,
        fences = report.fences.placed,
        digest = %hex::encode(grid.digest()),
        "map generated"
    );
    if report.forced_near_spawn() > 0 {
        tracing::debug!(
            barns = report.barns.forced_near_spawn,
            ponds = report.ponds.forced_near_spawn,
            fences = report.fences.forced_near_spawn,
            "obstacles placed inside the spawn exclusion after exhausting attempts"
        );
    }
    if report.fences.skipped > 0 {
        tracing::debug!(skipped = report.fences.skipped, "fence placements skipped");
    }
    if report.cleared_cells > 0 {
        tracing::debug!(cells = report.cleared_cells, "cleared obstacles around spawn and goal");
    }
}

fn log_placement(report: &PlacementReport) {
    if report.shortfall() > 0 {
        tracing::warn!(
            requested = report.requested,
            placed = report.placed,
            attempts = report.attempts,
            "item placement ran out of attempts"
        );
    } else {
        tracing::debug!(placed = report.placed, attempts = report.attempts, "items placed");
    }
}
