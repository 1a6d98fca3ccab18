//! Prints gameplay events to stdout as they are published.
use game_core::TickEvent;
use runtime::{Event, EventBus, SessionEvent, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawns one printer task per topic worth showing.
///
/// Tasks end once the runtime (and with it every sender) is dropped.
pub fn spawn_printers(bus: &EventBus) -> Vec<JoinHandle<()>> {
    [Topic::Session, Topic::Player, Topic::Items, Topic::Pursuer]
        .into_iter()
        .map(|topic| {
            let mut rx = bus.subscribe(topic);
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => {
                            if let Some(line) = describe(&event) {
                                println!("{}", line);
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(?topic, skipped, "console fell behind");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

/// Waits for every printer, logging any that panicked. Returns how many failed.
pub async fn join_printers(printers: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for printer in printers {
        if let Err(err) = printer.await {
            tracing::warn!("Console printer stopped abnormally: {}", err);
            failed += 1;
        }
    }
    failed
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::Session(SessionEvent::Started {
            seed,
            cols,
            rows,
            items_total,
            ..
        }) => format!(
            "farm {}x{} (seed {}), {} items to collect",
            cols, rows, seed, items_total
        ),
        Event::Session(SessionEvent::Finished { status, score, .. }) => {
            format!("session {} with score {}", status, score)
        }
        Event::Session(SessionEvent::Cancelled { ticks, .. }) => {
            format!("stopped after {} ticks", ticks)
        }
        Event::Tick { tick, event } => match event {
            TickEvent::PursuerModeChanged(change) => {
                format!("[{:>6}] pursuer {} -> {}", tick, change.from, change.to)
            }
            TickEvent::ItemCollected {
                kind,
                points,
                total_collected,
                ..
            } => format!(
                "[{:>6}] picked up {} (+{}), {} collected",
                tick, kind, points, total_collected
            ),
            TickEvent::GoalUnlocked => format!("[{:>6}] the gate is open", tick),
            TickEvent::LeapStarted => format!("[{:>6}] leap", tick),
            TickEvent::HideStarted => format!("[{:>6}] hiding", tick),
            TickEvent::HideEnded => format!("[{:>6}] out of hiding", tick),
            TickEvent::PlayerCaught => format!("[{:>6}] caught!", tick),
            TickEvent::PlayerEscaped => format!("[{:>6}] escaped!", tick),
        },
        Event::Frame(_) => return None,
    };
    Some(line)
}
