// KeyCommands Dispatch Interceptor
// Binds a registry to a host exactly once and routes fired commands back

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::host::{KeyCommandHost, KeyCommandResponder};
use crate::registry::Registry;
use crate::KeyCommand;

/// Installation state of the interceptor.
///
/// `Uninstalled` is the initial state; `Installed` and `Inert` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptorState {
    Uninstalled,
    Installed,
    /// The host refused installation; registrations are kept but never fire
    Inert,
}

impl fmt::Display for InterceptorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterceptorState::Uninstalled => write!(f, "uninstalled"),
            InterceptorState::Installed => write!(f, "installed"),
            InterceptorState::Inert => write!(f, "inert"),
        }
    }
}

/// Responder handed to the host: serves and dispatches from a shared registry
pub struct RegistryResponder {
    registry: Arc<Mutex<Registry>>,
}

impl RegistryResponder {
    pub fn new(registry: Arc<Mutex<Registry>>) -> Self {
        Self { registry }
    }
}

impl KeyCommandResponder for RegistryResponder {
    fn key_commands(&self) -> Vec<KeyCommand> {
        self.registry.lock().enumerate()
    }

    fn handle_key_command(&self, command: &KeyCommand) {
        // Release the lock before running callbacks so they may re-register
        let actions = self.registry.lock().matching(command.combo());
        log::trace!(
            "key command {} fired, {} matching callback(s)",
            command.combo(),
            actions.len()
        );
        for action in actions {
            action();
        }
    }
}

/// Install-once hook between a registry and a host
pub struct Interceptor {
    state: Mutex<InterceptorState>,
}

impl Interceptor {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InterceptorState::Uninstalled),
        }
    }

    pub fn state(&self) -> InterceptorState {
        *self.state.lock()
    }

    /// Install `registry` into `host` on the first call; later calls are no-ops.
    ///
    /// A host error is logged and leaves the interceptor inert. Callers never
    /// see the failure.
    pub fn ensure_installed(
        &self,
        host: &dyn KeyCommandHost,
        registry: &Arc<Mutex<Registry>>,
    ) -> InterceptorState {
        let mut state = self.state.lock();
        if *state != InterceptorState::Uninstalled {
            return *state;
        }

        let responder = Arc::new(RegistryResponder::new(registry.clone()));
        *state = match host.install(responder) {
            Ok(()) => {
                log::debug!("key command interceptor installed");
                InterceptorState::Installed
            }
            Err(e) => {
                log::warn!("key commands disabled: {}", e);
                InterceptorState::Inert
            }
        };
        *state
    }
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new()
    }
}
