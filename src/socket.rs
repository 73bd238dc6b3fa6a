//! Socket transport for the sway IPC protocol
//!
//! [`Connection`] owns one Unix stream socket to the compositor and drives
//! single request/response exchanges over it. Subscriptions consume the
//! connection and hand the socket to [`crate::event::EventStream`].
//!
//! All I/O is blocking; a connection belongs to exactly one caller at a time
//! and the socket is closed when the value is dropped.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::Error;
use crate::frame::{self, Parsed};

/// Environment variables that carry the compositor's socket path
///
/// sway exports both; `I3SOCK` is kept for i3 compatibility.
const SOCKET_ENV_VARS: [&str; 2] = ["SWAYSOCK", "I3SOCK"];

/// Socket read chunk size
const READ_CHUNK: usize = 8 * 1024;

/// Discover the compositor's IPC socket path from the environment
///
/// Checks `$SWAYSOCK`, then `$I3SOCK`, and validates that the path exists.
///
/// # Errors
///
/// Returns [`Error::SocketNotSet`] if neither variable is set.
/// Returns [`Error::SocketNotFound`] if the path doesn't exist.
pub fn find_socket_path() -> Result<PathBuf, Error> {
    let path = SOCKET_ENV_VARS
        .iter()
        .find_map(|var| std::env::var_os(var))
        .map(PathBuf::from)
        .ok_or(Error::SocketNotSet)?;

    if !path.exists() {
        return Err(Error::SocketNotFound { path });
    }
    Ok(path)
}

/// One connection to the compositor's IPC socket
///
/// # Example
///
/// ```ignore
/// let mut conn = Connection::connect()?;
/// let version = conn.get_version()?;
/// println!("sway {}", version.human_readable);
/// ```
#[derive(Debug)]
pub struct Connection {
    pub(crate) stream: UnixStream,
}

impl Connection {
    /// Connect to the socket advertised by the environment
    ///
    /// # Errors
    ///
    /// Returns [`Error::SocketNotSet`] or [`Error::SocketNotFound`] if no
    /// endpoint can be resolved, and [`Error::ConnectionFailed`] if the
    /// connection itself fails.
    pub fn connect() -> Result<Self, Error> {
        Self::connect_to(find_socket_path()?)
    }

    /// Connect to an explicit socket path
    pub fn connect_to(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| Error::ConnectionFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "connected to sway socket");
        Ok(Self { stream })
    }

    /// Send one frame and block until exactly one reply frame arrives
    ///
    /// The reply must carry the same message type as the request, and a
    /// request/response exchange must yield exactly one frame; the compositor
    /// never pipelines replies on a connection that has not subscribed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReplyTypeMismatch`] if the reply type differs from
    /// the request type, [`Error::TrailingReplyBytes`] if bytes remain after
    /// one reply frame, and [`Error::ConnectionClosed`] on EOF mid-reply.
    pub(crate) fn raw_request(&mut self, tag: u32, payload: &[u8]) -> Result<Vec<u8>, Error> {
        self.stream
            .write_all(&frame::serialize(tag, payload))
            .map_err(Error::Send)?;
        trace!(tag, len = payload.len(), "sent request frame");

        let mut buf = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Parsed::Frame {
                tag: reply_tag,
                payload,
                rest,
            } = frame::try_parse(&buf)?
            {
                if reply_tag != tag {
                    return Err(Error::ReplyTypeMismatch {
                        sent: tag,
                        received: reply_tag,
                    });
                }
                if !rest.is_empty() {
                    return Err(Error::TrailingReplyBytes { count: rest.len() });
                }
                trace!(tag, len = payload.len(), "received reply frame");
                return Ok(payload.to_vec());
            }

            let n = self.stream.read(&mut chunk).map_err(Error::Receive)?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }
}
