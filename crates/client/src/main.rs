//! Pursuit client binary.
//!
//! Headless composition root: reads configuration from the environment,
//! sets up logging, builds a [`Runtime`] and drives it until the session ends,
//! the time limit runs out, or Ctrl-C is pressed. The recorded session is
//! saved as a replay that can be re-run later with `PURSUIT_REPLAY=<id>`.
//!
//! ```bash
//! PURSUIT_SEED=7 PURSUIT_REALTIME=1 cargo run -p pursuit-client
//! PURSUIT_REPLAY=session_1700000000 cargo run -p pursuit-client
//! ```
mod config;
mod console;
mod dirs;
mod logging;

use anyhow::{Context, Result};
use game_content::{ConfigLoader, MapLoader};
use game_core::{GameConfig, SeedStream, derive_seed};
use runtime::{
    FileReplayRepository, IdleInput, ReplayRepository, RunOptions, Runtime, RuntimeConfig,
    SessionSummary, WanderingInput,
};

use crate::config::{ClientConfig, InputMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let session_id = config.resolved_session_id();
    let _log_guard = logging::setup_logging(&session_id)?;
    for var in &config.ignored {
        tracing::warn!("Ignoring unparsable environment variable {}", var);
    }

    match config.replay_id.clone() {
        Some(replay_id) => replay_session(&config, &replay_id),
        None => run_session(&config, &session_id).await,
    }
}

async fn run_session(config: &ClientConfig, session_id: &str) -> Result<()> {
    let game_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => GameConfig::default(),
    };
    let runtime_config = RuntimeConfig {
        game_config,
        seed: config.seed,
        record_replay: config.record_replay,
        ..RuntimeConfig::default()
    };
    let timestep = runtime_config.timestep;

    let mut builder = Runtime::builder()
        .config(runtime_config)
        .input_provider(IdleInput);
    if let Some(path) = &config.map_path {
        builder = builder.grid(MapLoader::load(path)?);
    }
    let mut runtime = builder.build()?;

    if config.input == InputMode::Wander {
        let input_seed = derive_seed(runtime.seed(), SeedStream::Input);
        runtime.set_input_provider(WanderingInput::new(input_seed));
    }
    tracing::info!(session = session_id, seed = runtime.seed(), input = ?config.input, "starting session");

    if let Some(path) = &config.save_map_path {
        MapLoader::save(path, runtime.simulation().grid())?;
        tracing::info!("Map layout saved to {}", path.display());
    }

    let printers = console::spawn_printers(&runtime.events());

    let max_ticks = config
        .max_seconds
        .map(|seconds| (seconds / timestep).ceil() as u64);
    let options = RunOptions {
        max_ticks,
        realtime: config.realtime,
    };
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available; never cancel.
            std::future::pending::<()>().await;
        }
    };
    let summary = runtime.run(options, shutdown).await?;

    if let Some(log) = runtime.into_replay() {
        let replay_dir = config.replay_dir.clone().unwrap_or_else(dirs::replay_dir);
        let repo = FileReplayRepository::new(&replay_dir)?;
        repo.save(session_id, &log)
            .with_context(|| format!("Failed to save replay {}", session_id))?;
        tracing::info!(
            "Replay saved to {}",
            repo.replay_path(session_id).display()
        );
    }

    // Runtime is gone, so the printers drain and stop.
    console::join_printers(printers).await;

    print_summary(config, &summary)
}

fn replay_session(config: &ClientConfig, replay_id: &str) -> Result<()> {
    let replay_dir = config.replay_dir.clone().unwrap_or_else(dirs::replay_dir);
    let repo = FileReplayRepository::new(&replay_dir)?;
    let log = repo
        .load(replay_id)?
        .with_context(|| format!("No replay {} in {}", replay_id, replay_dir.display()))?;

    tracing::info!(
        replay = replay_id,
        seed = log.seed,
        frames = log.frames.len(),
        digest = %log.digest_hex(),
        "replaying session"
    );
    let trajectory = runtime::replay(&log)?;

    if let Some(last) = trajectory.points.last() {
        println!(
            "replayed {} ticks: {} with score {} (player at {:.1},{:.1}, pursuer at {:.1},{:.1})",
            trajectory.len(),
            trajectory.status,
            trajectory.score,
            last.player.x,
            last.player.y,
            last.pursuer.x,
            last.pursuer.y
        );
    } else {
        println!("replay {} has no frames", replay_id);
    }
    if trajectory.status != log.outcome {
        anyhow::bail!(
            "Replay diverged: recorded {}, replayed {}",
            log.outcome,
            trajectory.status
        );
    }
    Ok(())
}

fn print_summary(config: &ClientConfig, summary: &SessionSummary) -> Result<()> {
    if config.json_summary {
        println!("{}", serde_json::to_string(summary)?);
    } else {
        println!(
            "{} after {:.1}s ({} ticks): score {}, items {}/{}{}",
            summary.status,
            summary.elapsed,
            summary.ticks,
            summary.score,
            summary.items_collected,
            summary.items_total,
            if summary.cancelled { " [cancelled]" } else { "" }
        );
    }
    Ok(())
}
