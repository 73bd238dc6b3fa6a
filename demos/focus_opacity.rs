//! Dim every window except the focused one.
//!
//! Subscribes to window focus changes and, on each, resets all tiling
//! windows to 75% opacity before making the newly focused one opaque.

use anyhow::Result;
use sway_ipc::criteria::Criteria;
use sway_ipc::{handler, Connection, Dispatcher, Event, EventType, HandlerOutcome};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut dispatcher = Dispatcher::new();
    dispatcher.on_change(
        EventType::Window,
        "focus",
        handler(|event| {
            let Event::Window(window) = event else {
                return HandlerOutcome::Continue;
            };

            let dim = format!("{} opacity 0.75", Criteria::new().tiling());
            let raise = format!(
                "{} opacity 1.0",
                Criteria::new().con_id(window.container.id())
            );
            // One command per connection; each call opens its own session.
            match Connection::connect().and_then(|mut c| c.run_command(&format!("{dim}; {raise}"))) {
                Ok(results) => {
                    for result in results.iter().filter(|r| !r.success) {
                        eprintln!("command failed: {:?}", result.error);
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
            HandlerOutcome::Continue
        }),
    );

    let stream = Connection::connect()?.subscribe(&[EventType::Window])?;
    dispatcher.run(stream)?;
    Ok(())
}
