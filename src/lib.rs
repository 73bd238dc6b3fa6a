//! Synchronous client library for the sway compositor's IPC protocol
//!
//! Talks to sway (or i3) over its Unix domain socket: query window, output
//! and workspace state, run layout commands, and react to compositor-pushed
//! events. The protocol is the length-prefixed binary framing documented in
//! `sway-ipc(7)`, with JSON payloads.
//!
//! Everything is blocking and single-threaded. A [`Connection`]
//! serves request/response calls; [`Connection::subscribe`] turns it into a
//! pull-driven [`EventStream`], and a [`Dispatcher`] routes decoded events
//! to handlers by category and change subtype.
//!
//! ```ignore
//! use sway_ipc::{Connection, Dispatcher, EventType, HandlerOutcome, handler};
//!
//! let mut conn = Connection::connect()?;
//! for ws in conn.get_workspaces()? {
//!     println!("{} on {}", ws.name, ws.output);
//! }
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.on_change(EventType::Window, "focus", handler(|event| {
//!     println!("{event:?}");
//!     HandlerOutcome::Continue
//! }));
//! let stream = Connection::connect()?.subscribe(&[EventType::Window])?;
//! dispatcher.run(stream)?;
//! ```

mod client;
pub mod criteria;
mod decode;
mod dispatch;
mod error;
pub mod event;
pub mod frame;
pub mod model;
mod socket;

pub use dispatch::{handler, Dispatcher, Handler, HandlerKey, HandlerOutcome};
pub use error::Error;
pub use event::{Event, EventStream, EventType};
pub use model::Node;
pub use socket::{find_socket_path, Connection};
