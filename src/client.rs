//! Typed request/response calls
//!
//! Thin wrappers over [`Connection::raw_request`]: each method sends one
//! frame and decodes the single reply frame into its shape from
//! [`crate::model`]. Nothing is cached; every call reflects the
//! compositor's state at the moment of the reply.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::decode;
use crate::error::Error;
use crate::frame::MessageType;
use crate::model::{
    BarConfig, CommandResult, Input, Node, Output, Seat, Version, Workspace,
};
use crate::socket::Connection;

/// Reply wrapper for `GET_CONFIG`
#[derive(Debug, Deserialize)]
struct ConfigReply {
    config: String,
}

/// Reply wrapper for `SEND_TICK` and `SYNC`
#[derive(Debug, Deserialize)]
struct SuccessReply {
    success: bool,
}

/// Reply wrapper for `GET_BINDING_STATE`
#[derive(Debug, Deserialize)]
struct BindingStateReply {
    name: String,
}

impl Connection {
    fn request<T: DeserializeOwned>(
        &mut self,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<T, Error> {
        let reply = self.raw_request(message_type.tag(), payload)?;
        decode::from_payload(&reply)
    }

    /// Run a command, or a comma/semicolon-delimited series of commands
    ///
    /// Returns one [`CommandResult`] per sub-command, in order.
    pub fn run_command(&mut self, command: &str) -> Result<Vec<CommandResult>, Error> {
        debug!(command, "running command");
        self.request(MessageType::RunCommand, command.as_bytes())
    }

    /// Run a command and report whether every sub-command succeeded
    pub fn command_succeeds(&mut self, command: &str) -> Result<bool, Error> {
        let results = self.run_command(command)?;
        Ok(results.iter().all(|result| result.success))
    }

    /// List all workspaces across all outputs
    pub fn get_workspaces(&mut self) -> Result<Vec<Workspace>, Error> {
        self.request(MessageType::GetWorkspaces, b"")
    }

    /// List all outputs, including disabled ones
    pub fn get_outputs(&mut self) -> Result<Vec<Output>, Error> {
        self.request(MessageType::GetOutputs, b"")
    }

    /// Fetch the full containment tree; the reply is the root node
    ///
    /// The tree is rebuilt from scratch on every call; nodes from two calls
    /// share no identity beyond their compositor-assigned ids.
    pub fn get_tree(&mut self) -> Result<Node, Error> {
        self.request(MessageType::GetTree, b"")
    }

    /// List the marks currently in use
    pub fn get_marks(&mut self) -> Result<Vec<String>, Error> {
        self.request(MessageType::GetMarks, b"")
    }

    /// List the configured bar ids
    pub fn get_bar_ids(&mut self) -> Result<Vec<String>, Error> {
        self.request(MessageType::GetBarConfig, b"")
    }

    /// Fetch the configuration of one bar by id
    pub fn get_bar_config(&mut self, bar_id: &str) -> Result<BarConfig, Error> {
        self.request(MessageType::GetBarConfig, bar_id.as_bytes())
    }

    /// Fetch the compositor's version information
    pub fn get_version(&mut self) -> Result<Version, Error> {
        self.request(MessageType::GetVersion, b"")
    }

    /// List the available binding modes
    pub fn get_binding_modes(&mut self) -> Result<Vec<String>, Error> {
        self.request(MessageType::GetBindingModes, b"")
    }

    /// Fetch the contents of the last loaded config file
    pub fn get_config(&mut self) -> Result<String, Error> {
        let reply: ConfigReply = self.request(MessageType::GetConfig, b"")?;
        Ok(reply.config)
    }

    /// Broadcast a tick event, with an optional payload, to subscribers
    pub fn send_tick(&mut self, payload: &str) -> Result<bool, Error> {
        let reply: SuccessReply = self.request(MessageType::SendTick, payload.as_bytes())?;
        Ok(reply.success)
    }

    /// Send a sync request; sway always replies with failure, the message
    /// exists for i3 compatibility
    pub fn sync(&mut self) -> Result<bool, Error> {
        let reply: SuccessReply = self.request(MessageType::Sync, b"")?;
        Ok(reply.success)
    }

    /// Name of the currently active binding mode
    pub fn get_binding_state(&mut self) -> Result<String, Error> {
        let reply: BindingStateReply = self.request(MessageType::GetBindingState, b"")?;
        Ok(reply.name)
    }

    /// List all input devices
    pub fn get_inputs(&mut self) -> Result<Vec<Input>, Error> {
        self.request(MessageType::GetInputs, b"")
    }

    /// List all seats and the devices attached to them
    pub fn get_seats(&mut self) -> Result<Vec<Seat>, Error> {
        self.request(MessageType::GetSeats, b"")
    }
}
