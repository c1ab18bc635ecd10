// Key Command Host Traits
//
// This module defines the seam between the registry and the UI framework
// that owns the key-command discovery query and delivers fired commands.

use std::sync::Arc;

use crate::KeyCommand;

pub mod simulated;

pub use simulated::{PressOutcome, SimulatedHost};

/// Error type for host operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Host has no hardware keyboard support
    #[error("host does not support key commands")]
    Unsupported,

    /// Host could not take over its key command query
    #[error("failed to install key command responder: {0}")]
    InstallFailed(String),
}

/// Receiver side of the interception.
///
/// The host calls [`key_commands`](KeyCommandResponder::key_commands) whenever
/// it asks the application which shortcuts it supports, and
/// [`handle_key_command`](KeyCommandResponder::handle_key_command) when one
/// of them fires. Both are called synchronously on the host's UI thread.
pub trait KeyCommandResponder: Send + Sync {
    /// Shortcuts to report, in order
    fn key_commands(&self) -> Vec<KeyCommand>;

    /// A reported shortcut was pressed
    fn handle_key_command(&self, command: &KeyCommand);
}

/// The UI framework side of the interception.
///
/// Implementations own the application-level object whose key-command
/// query is overridden: typically a subclass or delegate the framework
/// consults. `install` is called at most once per service.
pub trait KeyCommandHost: Send + Sync {
    /// Whether this environment delivers hardware keyboard shortcuts at all
    fn supports_key_commands(&self) -> bool;

    /// Route the key-command query and fired commands to `responder`.
    ///
    /// Any commands the host reported before installation must remain
    /// reachable (call-through to the original behavior).
    fn install(&self, responder: Arc<dyn KeyCommandResponder>) -> Result<(), HostError>;
}

/// Host for environments without hardware keyboard support
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedHost;

impl KeyCommandHost for UnsupportedHost {
    fn supports_key_commands(&self) -> bool {
        false
    }

    fn install(&self, _responder: Arc<dyn KeyCommandResponder>) -> Result<(), HostError> {
        Err(HostError::Unsupported)
    }
}
