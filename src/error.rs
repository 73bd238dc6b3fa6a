//! Error types for sway IPC operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when communicating with the sway compositor
#[derive(Debug, Error)]
pub enum Error {
    /// Neither SWAYSOCK nor I3SOCK is set in the environment
    #[error("SWAYSOCK/I3SOCK environment variable not set - is sway running?")]
    SocketNotSet,

    /// The socket path does not exist
    #[error("sway socket not found at {path}")]
    SocketNotFound { path: PathBuf },

    /// Failed to connect to the sway socket
    #[error("failed to connect to sway socket at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a frame to the socket
    #[error("failed to send request to sway: {0}")]
    Send(#[source] std::io::Error),

    /// Failed to read from the socket
    #[error("failed to receive response from sway: {0}")]
    Receive(#[source] std::io::Error),

    /// Failed to duplicate the event socket for a close handle
    #[error("failed to duplicate the event socket: {0}")]
    SocketClone(#[source] std::io::Error),

    /// The socket closed before a complete frame was received
    #[error("connection to sway closed unexpectedly")]
    ConnectionClosed,

    /// Received bytes do not begin with the "i3-ipc" magic string
    #[error("received data does not begin with the i3-ipc magic string")]
    BadMagic,

    /// The reply frame carries a different message type than the request
    #[error("reply message type {received:#x} does not match request type {sent:#x}")]
    ReplyTypeMismatch { sent: u32, received: u32 },

    /// A request/response exchange yielded more than one frame
    #[error("{count} unexpected trailing byte(s) after reply frame")]
    TrailingReplyBytes { count: usize },

    /// Failed to serialize a request payload to JSON
    #[error("failed to serialize request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// A reply or event payload failed to decode into its typed shape
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// An event frame carries a message type with no known event mapping
    #[error("unknown event message type {tag:#x}")]
    UnknownEventType { tag: u32 },

    /// sway rejected the subscription request
    #[error("sway refused the event subscription")]
    SubscribeRefused,
}
