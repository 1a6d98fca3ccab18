//! Session recording and deterministic re-execution.
//!
//! A session is fully determined by its seed, config, grid and the sequence
//! of `(dt, input)` pairs fed to [`Simulation::tick`]. [`ReplayLog`] stores
//! exactly that; [`replay`] rebuilds the session from it and re-runs every
//! frame.
use std::sync::Arc;

use game_core::{
    GameConfig, InputState, PursuerMode, SessionStatus, Simulation, TileGrid, Vec2, WorldSnapshot,
};
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryError;

/// Bumped whenever the stored layout changes.
pub const REPLAY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Delta as handed to the tick, before clamping.
    pub dt: f32,
    pub input: InputState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub version: u32,
    pub seed: u64,
    pub config: GameConfig,
    pub grid: TileGrid,
    pub grid_digest: [u8; 32],
    pub frames: Vec<ReplayFrame>,
    /// Status after the last recorded frame.
    pub outcome: SessionStatus,
}

impl ReplayLog {
    pub fn new(seed: u64, config: GameConfig, grid: &TileGrid) -> Self {
        Self {
            version: REPLAY_VERSION,
            seed,
            config,
            grid: grid.clone(),
            grid_digest: grid.digest(),
            frames: Vec::new(),
            outcome: SessionStatus::Running,
        }
    }

    pub fn record(&mut self, dt: f32, input: InputState, status: SessionStatus) {
        self.frames.push(ReplayFrame { dt, input });
        self.outcome = status;
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.grid_digest)
    }

    /// Checks the layout version and that the stored grid still hashes to
    /// the recorded digest.
    pub fn verify(&self) -> Result<(), RepositoryError> {
        if self.version != REPLAY_VERSION {
            return Err(RepositoryError::UnsupportedVersion {
                found: self.version,
                expected: REPLAY_VERSION,
            });
        }
        let actual = self.grid.digest();
        if actual != self.grid_digest {
            return Err(RepositoryError::DigestMismatch {
                expected: hex::encode(self.grid_digest),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub tick: u64,
    pub player: Vec2,
    pub pursuer: Vec2,
    pub mode: PursuerMode,
}

impl From<&WorldSnapshot> for TrajectoryPoint {
    fn from(snapshot: &WorldSnapshot) -> Self {
        Self {
            tick: snapshot.tick,
            player: snapshot.player.position,
            pursuer: snapshot.pursuer.position,
            mode: snapshot.pursuer.mode,
        }
    }
}

/// Positions after every tick of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub status: SessionStatus,
    pub score: u32,
}

impl Trajectory {
    pub fn push(&mut self, snapshot: &WorldSnapshot) {
        self.points.push(TrajectoryPoint::from(snapshot));
        self.status = snapshot.status;
        self.score = snapshot.score;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Re-runs a recorded session and returns its trajectory.
pub fn replay(log: &ReplayLog) -> crate::Result<Trajectory> {
    log.verify()?;
    log.config.validate()?;

    let grid = Arc::new(log.grid.clone());
    let (mut simulation, _) = Simulation::with_grid(log.config.clone(), grid, log.seed);
    let mut trajectory = Trajectory::default();
    for frame in &log.frames {
        simulation.tick(frame.dt, frame.input);
        trajectory.push(&simulation.snapshot());
    }

    if trajectory.status != log.outcome {
        tracing::warn!(
            recorded = %log.outcome,
            replayed = %trajectory.status,
            "replay outcome differs from recording"
        );
    }
    Ok(trajectory)
}
