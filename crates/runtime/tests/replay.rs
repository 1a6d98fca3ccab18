use game_core::InputState;
use runtime::{
    FileReplayRepository, InMemoryReplayRepository, ReplayRepository, RunOptions, Runtime,
    ScriptedInput, Trajectory, WanderingInput, replay,
};

/// Records a live trajectory while stepping the runtime by hand.
fn record_live(seed: u64, ticks: usize) -> (Trajectory, runtime::ReplayLog) {
    let mut runtime = Runtime::builder()
        .seed(seed)
        .input_provider(WanderingInput::new(seed ^ 0x5eed))
        .build()
        .expect("runtime builds");

    let mut live = Trajectory::default();
    for _ in 0..ticks {
        if runtime.status().is_terminal() {
            break;
        }
        runtime.step().expect("step");
        live.push(&runtime.snapshot());
    }
    let log = runtime.into_replay().expect("recording enabled by default");
    (live, log)
}

/// A session saved to disk and replayed from the file follows the exact same
/// trajectory as the live run.
#[test]
fn test_replay_from_disk_matches_live_session() {
    let (live, log) = record_live(2024, 900);
    assert_eq!(log.frames.len(), live.len());

    let dir = tempfile::tempdir().expect("tempdir");
    let repo = FileReplayRepository::new(dir.path()).expect("repository");
    repo.save("session-2024", &log).expect("save replay");

    let loaded = repo
        .load("session-2024")
        .expect("load replay")
        .expect("replay exists");
    assert_eq!(loaded, log);

    let replayed = replay(&loaded).expect("replay runs");
    assert_eq!(replayed, live);
}

#[test]
fn test_different_seeds_produce_different_sessions() {
    let (a, _) = record_live(1, 300);
    let (b, _) = record_live(2, 300);
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_headless_run_replays_identically() {
    let script = ScriptedInput::from_segments(&[
        (InputState::RIGHT, 90),
        (InputState::DOWN | InputState::LEAP, 30),
        (InputState::DOWN, 120),
        (InputState::LEFT | InputState::UP, 60),
        (InputState::HIDE, 10),
        (InputState::RIGHT | InputState::DOWN, 300),
    ]);
    let mut runtime = Runtime::builder()
        .seed(99)
        .input_provider(script)
        .build()
        .expect("runtime builds");
    let summary = runtime
        .run(RunOptions::headless(610), std::future::pending())
        .await
        .expect("run completes");
    let final_snapshot = runtime.snapshot();

    let log = runtime.into_replay().expect("recording");
    assert_eq!(log.frames.len() as u64, summary.ticks);
    assert_eq!(log.outcome, summary.status);

    let repo = InMemoryReplayRepository::new();
    repo.save("scripted", &log).expect("save");
    assert_eq!(repo.list_ids().expect("list"), vec!["scripted".to_string()]);

    let stored = repo.load("scripted").expect("load").expect("stored");
    let replayed = replay(&stored).expect("replay runs");
    let last = replayed.points.last().expect("at least one tick");
    assert_eq!(last.player, final_snapshot.player.position);
    assert_eq!(last.pursuer, final_snapshot.pursuer.position);
    assert_eq!(replayed.status, summary.status);
    assert_eq!(replayed.score, summary.score);
}
