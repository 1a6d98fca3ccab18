use std::sync::Arc;

use game_core::{GameConfig, InputState, SessionStatus, TickEvent, TileGrid, Vec2, WorldSnapshot};
use runtime::{
    Event, EventBus, IdleInput, RunOptions, Runtime, RuntimeConfig, RuntimeError, SessionEvent,
    Topic, WanderingInput,
};

fn open_farm(goal: Vec2) -> Arc<TileGrid> {
    Arc::new(TileGrid::new(32, 24, 64.0, Vec2::new(150.0, 150.0), goal))
}

/// Steers the player straight at `target` each tick.
fn steer_toward(from: Vec2, to: Vec2) -> InputState {
    let mut input = InputState::empty();
    if to.x > from.x + 2.0 {
        input |= InputState::RIGHT;
    } else if to.x < from.x - 2.0 {
        input |= InputState::LEFT;
    }
    if to.y > from.y + 2.0 {
        input |= InputState::DOWN;
    } else if to.y < from.y - 2.0 {
        input |= InputState::UP;
    }
    input
}

/// Player walks into the pursuer on an open field and is caught.
#[tokio::test]
async fn test_walking_into_the_pursuer_ends_in_a_catch() {
    let bus = EventBus::with_capacity(1024);
    let mut player_events = bus.subscribe(Topic::Player);
    let mut session_events = bus.subscribe(Topic::Session);

    let mut runtime = Runtime::builder()
        .seed(21)
        .grid(open_farm(Vec2::new(1850.0, 1350.0)))
        .event_bus(bus)
        .input_provider(|snapshot: &WorldSnapshot| {
            steer_toward(snapshot.player.position, snapshot.pursuer.position)
        })
        .build()
        .expect("runtime builds");

    let summary = runtime
        .run(RunOptions::headless(3_000), std::future::pending())
        .await
        .expect("run completes");

    assert_eq!(summary.status, SessionStatus::Caught);
    assert!(!summary.cancelled);
    assert!(summary.ticks < 3_000);

    // ================================================================
    // Events: start, catch, finish
    // ================================================================
    assert!(matches!(
        session_events.try_recv(),
        Ok(Event::Session(SessionEvent::Started { seed: 21, .. }))
    ));
    let mut caught = false;
    while let Ok(event) = player_events.try_recv() {
        if let Event::Tick {
            tick,
            event: TickEvent::PlayerCaught,
        } = event
        {
            assert_eq!(tick, summary.ticks);
            caught = true;
        }
    }
    assert!(caught, "catch must be published on the player topic");
    assert!(matches!(
        session_events.try_recv(),
        Ok(Event::Session(SessionEvent::Finished {
            status: SessionStatus::Caught,
            ..
        }))
    ));

    // Terminal sessions refuse further steps.
    assert!(matches!(
        runtime.step(),
        Err(RuntimeError::SessionFinished {
            status: SessionStatus::Caught
        })
    ));
}

/// With no items to collect the goal unlocks on the first tick; walking onto it escapes.
#[tokio::test]
async fn test_reaching_an_unlocked_goal_escapes() {
    let mut game_config = GameConfig::default();
    game_config.items.total = 0;
    game_config.map.goal = Vec2::new(450.0, 150.0);

    let mut runtime = Runtime::builder()
        .game_config(game_config)
        .seed(3)
        .grid(open_farm(Vec2::new(450.0, 150.0)))
        .input_provider(|snapshot: &WorldSnapshot| {
            steer_toward(snapshot.player.position, snapshot.goal)
        })
        .build()
        .expect("runtime builds");

    assert!(!runtime.snapshot().goal_unlocked);
    let mut items = runtime.subscribe(Topic::Items);
    let summary = runtime
        .run(RunOptions::headless(600), std::future::pending())
        .await
        .expect("run completes");

    assert_eq!(summary.status, SessionStatus::Escaped);
    assert_eq!(summary.items_total, 0);
    match items.try_recv().expect("unlock event") {
        Event::Tick { tick, event } => {
            assert_eq!(tick, 1);
            assert_eq!(event, TickEvent::GoalUnlocked);
        }
        other => panic!("unexpected event {:?}", other),
    }
    let log = runtime.replay_log().expect("recording");
    assert_eq!(log.outcome, SessionStatus::Escaped);
    assert_eq!(log.frames.len() as u64, summary.ticks);
}

#[tokio::test]
async fn test_tick_limit_stops_a_running_session() {
    let mut runtime = Runtime::builder()
        .seed(5)
        .input_provider(IdleInput)
        .build()
        .expect("runtime builds");

    let summary = runtime
        .run(RunOptions::headless(50), std::future::pending())
        .await
        .expect("run completes");
    assert_eq!(summary.ticks, 50);
    assert_eq!(summary.status, SessionStatus::Running);

    // A second run continues from where the first stopped.
    let summary = runtime
        .run(RunOptions::headless(25), std::future::pending())
        .await
        .expect("second run completes");
    assert_eq!(summary.ticks, 75);
    assert!((summary.elapsed - 75.0 / 60.0).abs() < 1e-3);
}

#[tokio::test]
async fn test_shutdown_signal_cancels_the_run() {
    let mut runtime = Runtime::builder()
        .seed(8)
        .input_provider(WanderingInput::new(8))
        .build()
        .expect("runtime builds");
    let mut session_events = runtime.subscribe(Topic::Session);

    let summary = runtime
        .run(RunOptions::default(), std::future::ready(()))
        .await
        .expect("run returns");

    assert!(summary.cancelled);
    assert_eq!(summary.ticks, 0);
    assert!(matches!(
        session_events.try_recv(),
        Ok(Event::Session(SessionEvent::Cancelled { ticks: 0, .. }))
    ));
}

#[tokio::test]
async fn test_realtime_run_feeds_measured_deltas() {
    let config = RuntimeConfig {
        seed: Some(13),
        publish_frames: true,
        ..RuntimeConfig::default()
    };
    let mut runtime = Runtime::builder()
        .config(config)
        .input_provider(IdleInput)
        .build()
        .expect("runtime builds");
    let mut frames = runtime.subscribe(Topic::Frame);

    let summary = runtime
        .run(
            RunOptions::realtime().with_max_ticks(Some(5)),
            std::future::pending(),
        )
        .await
        .expect("run completes");
    assert_eq!(summary.ticks, 5);

    let mut seen = 0;
    while let Ok(Event::Frame(snapshot)) = frames.try_recv() {
        seen += 1;
        assert_eq!(snapshot.tick, seen);
    }
    assert_eq!(seen, 5);

    let log = runtime.replay_log().expect("recording");
    assert!(log.frames.iter().all(|frame| frame.dt >= 0.0));
}
