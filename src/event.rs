//! Event subscription channel
//!
//! One connection can be turned into a long-lived event stream: a single
//! SUBSCRIBE handshake, after which the compositor pushes one frame per
//! event until either side closes the socket. [`EventStream`] is a pull
//! iterator over those frames; the consumer controls pacing and nothing is
//! buffered beyond the raw bytes already read from the socket.
//!
//! A closed stream cannot be resumed. Reacting to events again requires a
//! fresh connection and a fresh subscribe handshake.

use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::decode;
use crate::error::Error;
use crate::frame::{self, MessageType, Parsed, EVENT_OFFSET};
use crate::model::{BarConfig, Input, Node};
use crate::socket::Connection;

const READ_CHUNK: usize = 8 * 1024;

/// Event categories that can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Workspace,
    Mode,
    Window,
    Barconfig,
    Binding,
    Shutdown,
    Tick,
    BarState,
    Input,
}

impl EventType {
    /// Every category, for catch-all subscriptions
    pub const ALL: [EventType; 9] = [
        EventType::Workspace,
        EventType::Mode,
        EventType::Window,
        EventType::Barconfig,
        EventType::Binding,
        EventType::Shutdown,
        EventType::Tick,
        EventType::BarState,
        EventType::Input,
    ];

    /// Category name as used in the SUBSCRIBE payload
    pub fn name(self) -> &'static str {
        match self {
            EventType::Workspace => "workspace",
            EventType::Mode => "mode",
            EventType::Window => "window",
            EventType::Barconfig => "barconfig",
            EventType::Binding => "binding",
            EventType::Shutdown => "shutdown",
            EventType::Tick => "tick",
            EventType::BarState => "bar_state",
            EventType::Input => "input",
        }
    }

    /// The message type carried by event frames of this category
    pub fn tag(self) -> u32 {
        let offset = match self {
            EventType::Workspace => 0x0,
            EventType::Mode => 0x2,
            EventType::Window => 0x3,
            EventType::Barconfig => 0x4,
            EventType::Binding => 0x5,
            EventType::Shutdown => 0x6,
            EventType::Tick => 0x7,
            EventType::BarState => 0x14,
            EventType::Input => 0x15,
        };
        EVENT_OFFSET | offset
    }

    /// Map an event frame's message type back to its category
    pub fn from_tag(tag: u32) -> Option<Self> {
        EventType::ALL.into_iter().find(|ty| ty.tag() == tag)
    }
}

/// What happened to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowChange {
    New,
    Close,
    Focus,
    Title,
    FullscreenMode,
    Move,
    Floating,
    Urgent,
    Mark,
}

impl WindowChange {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowChange::New => "new",
            WindowChange::Close => "close",
            WindowChange::Focus => "focus",
            WindowChange::Title => "title",
            WindowChange::FullscreenMode => "fullscreen_mode",
            WindowChange::Move => "move",
            WindowChange::Floating => "floating",
            WindowChange::Urgent => "urgent",
            WindowChange::Mark => "mark",
        }
    }
}

/// What happened to a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceChange {
    Init,
    Empty,
    Focus,
    Move,
    Rename,
    Urgent,
    Reload,
}

impl WorkspaceChange {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceChange::Init => "init",
            WorkspaceChange::Empty => "empty",
            WorkspaceChange::Focus => "focus",
            WorkspaceChange::Move => "move",
            WorkspaceChange::Rename => "rename",
            WorkspaceChange::Urgent => "urgent",
            WorkspaceChange::Reload => "reload",
        }
    }
}

/// Payload of a workspace event
///
/// `current` and `old` are full workspace nodes; both can be absent, e.g.
/// on a `reload` change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkspaceEvent {
    pub change: WorkspaceChange,
    #[serde(default)]
    pub current: Option<Node>,
    #[serde(default)]
    pub old: Option<Node>,
}

/// Payload of a binding-mode change event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModeEvent {
    pub change: String,
    #[serde(default)]
    pub pango_markup: bool,
}

/// Payload of a window event; `container` is the affected view's subtree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowEvent {
    pub change: WindowChange,
    pub container: Node,
}

/// The binding that fired, nested inside a [`BindingEvent`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Binding {
    pub command: String,
    #[serde(default)]
    pub event_state_mask: Vec<String>,
    pub input_code: i32,
    /// Absent for bindings without a keysym, e.g. mouse buttons
    #[serde(default)]
    pub symbol: Option<String>,
    pub input_type: String,
}

/// Payload of a keybinding event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BindingEvent {
    pub change: String,
    pub binding: Binding,
}

/// Payload of the shutdown event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShutdownEvent {
    pub change: String,
}

/// Payload of a tick event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickEvent {
    /// True for the synthetic tick delivered on subscription
    pub first: bool,
    #[serde(default)]
    pub payload: String,
}

/// Payload of a bar visibility change event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BarStateUpdateEvent {
    pub id: String,
    pub visible_by_modifier: bool,
}

/// Payload of an input device change event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputEvent {
    pub change: String,
    pub input: Input,
}

/// One compositor-pushed event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Workspace(WorkspaceEvent),
    Mode(ModeEvent),
    Window(WindowEvent),
    /// The affected bar's full new configuration
    BarconfigUpdate(BarConfig),
    Binding(BindingEvent),
    Shutdown(ShutdownEvent),
    Tick(TickEvent),
    BarStateUpdate(BarStateUpdateEvent),
    Input(InputEvent),
}

impl Event {
    /// Decode one event frame by its message type
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEventType`] for a frame whose type has no
    /// event mapping, and [`Error::Decode`] if the payload does not match
    /// the category's shape.
    pub(crate) fn from_frame(tag: u32, payload: &[u8]) -> Result<Self, Error> {
        let event_type = EventType::from_tag(tag).ok_or(Error::UnknownEventType { tag })?;
        let event = match event_type {
            EventType::Workspace => Event::Workspace(decode::from_payload(payload)?),
            EventType::Mode => Event::Mode(decode::from_payload(payload)?),
            EventType::Window => Event::Window(decode::from_payload(payload)?),
            EventType::Barconfig => Event::BarconfigUpdate(decode::from_payload(payload)?),
            EventType::Binding => Event::Binding(decode::from_payload(payload)?),
            EventType::Shutdown => Event::Shutdown(decode::from_payload(payload)?),
            EventType::Tick => Event::Tick(decode::from_payload(payload)?),
            EventType::BarState => Event::BarStateUpdate(decode::from_payload(payload)?),
            EventType::Input => Event::Input(decode::from_payload(payload)?),
        };
        Ok(event)
    }

    /// The category this event belongs to
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Workspace(_) => EventType::Workspace,
            Event::Mode(_) => EventType::Mode,
            Event::Window(_) => EventType::Window,
            Event::BarconfigUpdate(_) => EventType::Barconfig,
            Event::Binding(_) => EventType::Binding,
            Event::Shutdown(_) => EventType::Shutdown,
            Event::Tick(_) => EventType::Tick,
            Event::BarStateUpdate(_) => EventType::BarState,
            Event::Input(_) => EventType::Input,
        }
    }

    /// The change subtype, for the categories that carry one
    pub fn change(&self) -> Option<&'static str> {
        match self {
            Event::Window(event) => Some(event.change.as_str()),
            Event::Workspace(event) => Some(event.change.as_str()),
            _ => None,
        }
    }
}

/// Acknowledgment payload of a SUBSCRIBE request
#[derive(Debug, Deserialize)]
struct SubscribeReply {
    success: bool,
}

impl Connection {
    /// Subscribe to the given event categories, consuming the connection
    ///
    /// Sends one SUBSCRIBE frame whose payload is the JSON array of category
    /// names and consumes the acknowledgment frame; any event frames already
    /// buffered behind the acknowledgment are carried over into the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubscribeRefused`] if the compositor rejects the
    /// subscription, and [`Error::ReplyTypeMismatch`] if the first frame
    /// back is not the SUBSCRIBE acknowledgment.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let stream = Connection::connect()?.subscribe(&[EventType::Window])?;
    /// for event in stream {
    ///     println!("{:?}", event?);
    /// }
    /// ```
    pub fn subscribe(self, events: &[EventType]) -> Result<EventStream, Error> {
        let names: Vec<&str> = events.iter().map(|event| event.name()).collect();
        let payload = serde_json::to_vec(&names).map_err(Error::Encode)?;

        let Connection { mut stream } = self;
        stream
            .write_all(&frame::serialize(MessageType::Subscribe.tag(), &payload))
            .map_err(Error::Send)?;

        // Read until the acknowledgment frame is complete. Unlike a plain
        // request/response exchange, bytes after the first frame are legal
        // here: events can arrive right behind the acknowledgment.
        let mut buf = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Parsed::Frame { tag, payload, rest } = frame::try_parse(&buf)? {
                if tag != MessageType::Subscribe.tag() {
                    return Err(Error::ReplyTypeMismatch {
                        sent: MessageType::Subscribe.tag(),
                        received: tag,
                    });
                }
                let reply: SubscribeReply = decode::from_payload(payload)?;
                if !reply.success {
                    return Err(Error::SubscribeRefused);
                }
                debug!(events = ?names, "event subscription established");
                let buf = rest.to_vec();
                return Ok(EventStream { stream, buf });
            }

            let n = stream.read(&mut chunk).map_err(Error::Receive)?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }
}

/// Pull-driven, unbounded sequence of compositor events
///
/// Each `next()` call blocks on the socket until a complete event frame is
/// available. A single socket read may complete zero, one, or many frames;
/// the stream drains its buffer fully before reading again. Dropping the
/// stream closes the connection.
#[derive(Debug)]
pub struct EventStream {
    stream: UnixStream,
    buf: Vec<u8>,
}

impl EventStream {
    /// A handle that can shut this stream's socket down from another thread
    ///
    /// Closing the socket unblocks a pending `next()` call, which then
    /// reports the end of the stream. This is the only way to interrupt the
    /// blocking event loop from outside.
    pub fn close_handle(&self) -> Result<CloseHandle, Error> {
        let stream = self.stream.try_clone().map_err(Error::SocketClone)?;
        Ok(CloseHandle { stream })
    }
}

impl Iterator for EventStream {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Drain one complete frame from the buffer if there is one. The
            // frame's bytes are consumed before decoding, so a payload that
            // fails to decode poisons only this one item, not the stream.
            let parsed = match frame::try_parse(&self.buf) {
                Ok(Parsed::Frame { tag, payload, rest }) => {
                    Some((tag, payload.to_vec(), self.buf.len() - rest.len()))
                }
                Ok(Parsed::Incomplete) => None,
                Err(err) => return Some(Err(err)),
            };
            if let Some((tag, payload, consumed)) = parsed {
                self.buf.drain(..consumed);
                trace!(tag, len = payload.len(), "event frame");
                return Some(Event::from_frame(tag, &payload));
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    // EOF between frames ends the stream; EOF inside a frame
                    // means the compositor went away mid-send.
                    if self.buf.is_empty() {
                        debug!("event stream closed");
                        return None;
                    }
                    return Some(Err(Error::ConnectionClosed));
                }
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(err) => return Some(Err(Error::Receive(err))),
            }
        }
    }
}

/// Remote shutdown handle for an [`EventStream`]
#[derive(Debug)]
pub struct CloseHandle {
    stream: UnixStream,
}

impl CloseHandle {
    /// Shut the stream's socket down, unblocking any pending read
    pub fn close(&self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}
