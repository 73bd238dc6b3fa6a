//! Stub compositor endpoint for integration tests
//!
//! Binds a Unix socket in a temp directory and runs a scripted session on
//! the first accepted connection. The script runs on its own thread; join
//! the handle so its assertions surface in the test.

use std::io::Read;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::thread::JoinHandle;

use sway_ipc::frame::{HEADER_LEN, MAGIC};

pub struct StubServer {
    pub path: PathBuf,
    handle: JoinHandle<()>,
    // Held so the socket path outlives the test body.
    _dir: tempfile::TempDir,
}

impl StubServer {
    /// Bind a fresh socket and serve one connection with `script`
    pub fn spawn(script: impl FnOnce(UnixStream) + Send + 'static) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("sway-ipc.sock");
        let listener = UnixListener::bind(&path).expect("bind stub socket");

        let handle = std::thread::spawn(move || {
            let (stream, _addr) = listener.accept().expect("accept client connection");
            script(stream);
        });

        Self {
            path,
            handle,
            _dir: dir,
        }
    }

    /// Wait for the script to finish, propagating its panics
    pub fn join(self) {
        self.handle.join().expect("stub server script panicked");
    }
}

/// Read one complete frame off the stream, returning its type and payload
pub fn read_frame(stream: &mut UnixStream) -> (u32, Vec<u8>) {
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header).expect("read frame header");
    assert_eq!(&header[..MAGIC.len()], MAGIC, "request missing magic string");

    let length = u32::from_ne_bytes(header[6..10].try_into().unwrap()) as usize;
    let tag = u32::from_ne_bytes(header[10..14].try_into().unwrap());

    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).expect("read frame payload");
    (tag, payload)
}
