// KeyCommands Service
// The register/unregister facade, gated once on keyboard capability

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::Settings;
use crate::host::KeyCommandHost;
use crate::interceptor::{Interceptor, InterceptorState};
use crate::registry::{Registration, Registry, ReplacePolicy};
use crate::{KeyAction, KeyCombo, KeyCommand, KeyInput, ModifierFlags};

/// Whether the environment can deliver key commands at all.
///
/// Resolved once when a [`KeyCommands`] service is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Enabled,
    Unsupported,
}

impl Capability {
    /// Settings override first, then whatever the host reports
    pub fn resolve(host: &dyn KeyCommandHost, settings: &Settings) -> Self {
        let supported = settings
            .keyboard_override()
            .unwrap_or_else(|| host.supports_key_commands());
        if supported {
            Capability::Enabled
        } else {
            Capability::Unsupported
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Capability::Enabled)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Enabled => write!(f, "enabled"),
            Capability::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Errors from the process-wide service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("key command service is already initialized")]
    AlreadyInitialized,
}

enum Backend {
    Active {
        host: Arc<dyn KeyCommandHost>,
        registry: Arc<Mutex<Registry>>,
        interceptor: Interceptor,
    },
    Inert,
}

/// Keyboard shortcut service.
///
/// On a host with key command support this stores registrations and
/// installs itself into the host on the first [`register`](Self::register).
/// Otherwise every call is accepted and ignored. No operation fails.
pub struct KeyCommands {
    capability: Capability,
    backend: Backend,
}

impl KeyCommands {
    /// Build a service for `host`, resolving capability from settings and host
    pub fn new(host: Arc<dyn KeyCommandHost>, settings: &Settings) -> Self {
        let capability = Capability::resolve(host.as_ref(), settings);
        log::info!("key commands {}", capability);
        Self::with_capability(host, capability, settings.replace_policy())
    }

    /// Build a service with an already resolved capability
    pub fn with_capability(
        host: Arc<dyn KeyCommandHost>,
        capability: Capability,
        policy: ReplacePolicy,
    ) -> Self {
        let backend = match capability {
            Capability::Enabled => Backend::Active {
                host,
                registry: Arc::new(Mutex::new(Registry::with_policy(policy))),
                interceptor: Interceptor::new(),
            },
            Capability::Unsupported => Backend::Inert,
        };
        Self {
            capability,
            backend,
        }
    }

    /// Service that accepts everything and never fires
    pub fn inert() -> Self {
        Self {
            capability: Capability::Unsupported,
            backend: Backend::Inert,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Installation state; always `Uninstalled` for an unsupported service
    pub fn interceptor_state(&self) -> InterceptorState {
        match &self.backend {
            Backend::Active { interceptor, .. } => interceptor.state(),
            Backend::Inert => InterceptorState::Uninstalled,
        }
    }

    /// Register `action` for `input` with exactly `modifiers` held.
    ///
    /// Replaces any earlier registration for the same input and modifiers.
    pub fn register<F>(&self, input: impl Into<KeyInput>, modifiers: impl Into<ModifierFlags>, action: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let combo = KeyCombo::new(input, modifiers);
        self.register_command(KeyCommand::new(combo), Arc::new(action));
    }

    /// Like [`register`](Self::register), with a title for the host's shortcut overlay
    pub fn register_with_title<F>(
        &self,
        input: impl Into<KeyInput>,
        modifiers: impl Into<ModifierFlags>,
        title: impl Into<String>,
        action: F,
    ) where
        F: Fn() + Send + Sync + 'static,
    {
        let combo = KeyCombo::new(input, modifiers);
        self.register_command(KeyCommand::with_title(combo, title), Arc::new(action));
    }

    /// Register a prepared descriptor and callback
    pub fn register_command(&self, command: KeyCommand, action: KeyAction) {
        let Backend::Active {
            host,
            registry,
            interceptor,
        } = &self.backend
        else {
            log::trace!("ignoring registration of {}: key commands unsupported", command.combo());
            return;
        };

        interceptor.ensure_installed(host.as_ref(), registry);

        let combo = command.combo().clone();
        match registry.lock().register(command, action) {
            Registration::Added => log::debug!("registered key command {}", combo),
            Registration::Replaced => log::debug!("replaced key command {}", combo),
        }
    }

    /// Remove the registration for `input` with exactly `modifiers`.
    ///
    /// Unregistering something never registered does nothing.
    pub fn unregister(&self, input: impl Into<KeyInput>, modifiers: impl Into<ModifierFlags>) {
        self.unregister_combo(&KeyCombo::new(input, modifiers));
    }

    pub fn unregister_combo(&self, combo: &KeyCombo) {
        if let Backend::Active { registry, .. } = &self.backend {
            if registry.lock().unregister(combo) {
                log::debug!("unregistered key command {}", combo);
            }
        }
    }

    /// Descriptors currently registered, in the order the host sees them
    pub fn registered_commands(&self) -> Vec<KeyCommand> {
        match &self.backend {
            Backend::Active { registry, .. } => registry.lock().enumerate(),
            Backend::Inert => Vec::new(),
        }
    }
}

impl fmt::Debug for KeyCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCommands")
            .field("capability", &self.capability)
            .field("interceptor", &self.interceptor_state())
            .field("registered", &self.registered_commands().len())
            .finish()
    }
}

static GLOBAL: OnceLock<KeyCommands> = OnceLock::new();

/// Initialize the process-wide service. Only the first call succeeds.
pub fn init_global(
    host: Arc<dyn KeyCommandHost>,
    settings: &Settings,
) -> Result<&'static KeyCommands, ServiceError> {
    let mut created = false;
    let service = GLOBAL.get_or_init(|| {
        created = true;
        KeyCommands::new(host, settings)
    });
    if created {
        Ok(service)
    } else {
        Err(ServiceError::AlreadyInitialized)
    }
}

/// The process-wide service, if initialized
pub fn global() -> Option<&'static KeyCommands> {
    GLOBAL.get()
}

/// Register on the process-wide service; ignored before [`init_global`]
pub fn register<F>(input: impl Into<KeyInput>, modifiers: impl Into<ModifierFlags>, action: F)
where
    F: Fn() + Send + Sync + 'static,
{
    match global() {
        Some(service) => service.register(input, modifiers, action),
        None => log::debug!("key command service not initialized, ignoring register"),
    }
}

/// Unregister on the process-wide service; ignored before [`init_global`]
pub fn unregister(input: impl Into<KeyInput>, modifiers: impl Into<ModifierFlags>) {
    match global() {
        Some(service) => service.unregister(input, modifiers),
        None => log::debug!("key command service not initialized, ignoring unregister"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PressOutcome, SimulatedHost, UnsupportedHost};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service(host: &Arc<SimulatedHost>) -> KeyCommands {
        KeyCommands::new(host.clone(), &Settings::new())
    }

    #[test]
    fn test_capability_from_host() {
        let settings = Settings::new();
        assert_eq!(
            Capability::resolve(&SimulatedHost::new(), &settings),
            Capability::Enabled
        );
        assert_eq!(
            Capability::resolve(&UnsupportedHost, &settings),
            Capability::Unsupported
        );
    }

    #[test]
    fn test_capability_settings_override() {
        let mut settings = Settings::new();
        settings.set_keyboard_override(Some(false));
        assert_eq!(
            Capability::resolve(&SimulatedHost::new(), &settings),
            Capability::Unsupported
        );
        settings.set_keyboard_override(Some(true));
        assert_eq!(
            Capability::resolve(&UnsupportedHost, &settings),
            Capability::Enabled
        );
    }

    #[test]
    fn test_first_register_installs() {
        let host = Arc::new(SimulatedHost::new());
        let commands = service(&host);
        assert_eq!(commands.interceptor_state(), InterceptorState::Uninstalled);

        commands.unregister("r", ModifierFlags::COMMAND);
        assert_eq!(host.install_count(), 0);

        commands.register("r", ModifierFlags::COMMAND, || {});
        commands.register("s", ModifierFlags::COMMAND, || {});
        assert_eq!(commands.interceptor_state(), InterceptorState::Installed);
        assert_eq!(host.install_count(), 1);
        assert_eq!(host.key_commands().len(), 2);
    }

    /// Host that records how many commands the responder reports at install time
    struct InstallSnapshotHost {
        seen_at_install: Mutex<Option<usize>>,
    }

    impl KeyCommandHost for InstallSnapshotHost {
        fn supports_key_commands(&self) -> bool {
            true
        }

        fn install(
            &self,
            responder: Arc<dyn crate::host::KeyCommandResponder>,
        ) -> Result<(), crate::host::HostError> {
            *self.seen_at_install.lock() = Some(responder.key_commands().len());
            Ok(())
        }
    }

    #[test]
    fn test_install_happens_before_first_entry_is_stored() {
        let host = Arc::new(InstallSnapshotHost {
            seen_at_install: Mutex::new(None),
        });
        let commands = KeyCommands::new(host.clone(), &Settings::new());
        commands.register("r", ModifierFlags::COMMAND, || {});

        assert_eq!(*host.seen_at_install.lock(), Some(0));
        assert_eq!(commands.registered_commands().len(), 1);
    }

    #[test]
    fn test_register_dispatch_unregister() {
        let host = Arc::new(SimulatedHost::new());
        let commands = service(&host);
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        commands.register("x", ModifierFlags::NONE, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(host.press("x", ModifierFlags::NONE).is_handled());
        commands.unregister("x", ModifierFlags::NONE);
        assert_eq!(host.press("x", ModifierFlags::NONE), PressOutcome::Unhandled);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(commands.registered_commands().is_empty());
    }

    #[test]
    fn test_register_with_title() {
        let host = Arc::new(SimulatedHost::new());
        let commands = service(&host);
        commands.register_with_title("n", ModifierFlags::COMMAND, "New Note", || {});
        let reported = host.key_commands();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].discoverability_title(), "New Note");
    }

    #[test]
    fn test_unsupported_service_is_silent() {
        let host = Arc::new(SimulatedHost::without_keyboard());
        let commands = service(&host);
        assert_eq!(commands.capability(), Capability::Unsupported);

        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        commands.register("r", ModifierFlags::COMMAND, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        commands.unregister("z", ModifierFlags::NONE);

        assert_eq!(host.install_count(), 0);
        assert!(commands.registered_commands().is_empty());
        assert!(!host.press("r", ModifierFlags::COMMAND).is_handled());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_install_is_silent() {
        let host = Arc::new(SimulatedHost::failing_install("no shared application"));
        let commands = service(&host);
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        commands.register("r", ModifierFlags::COMMAND, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(commands.interceptor_state(), InterceptorState::Inert);
        assert!(host.key_commands().is_empty());
        assert!(!host.press("r", ModifierFlags::COMMAND).is_handled());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_inert_service() {
        let commands = KeyCommands::inert();
        commands.register("r", ModifierFlags::COMMAND, || {});
        commands.unregister("r", ModifierFlags::COMMAND);
        assert!(commands.registered_commands().is_empty());
        assert_eq!(commands.interceptor_state(), InterceptorState::Uninstalled);
    }

    #[test]
    fn test_in_place_policy_from_settings() {
        let host = Arc::new(SimulatedHost::new());
        let mut settings = Settings::new();
        settings.set_replace_policy(ReplacePolicy::InPlace);
        let commands = KeyCommands::new(host.clone(), &settings);
        commands.register("a", ModifierFlags::COMMAND, || {});
        commands.register("b", ModifierFlags::COMMAND, || {});
        commands.register("a", ModifierFlags::COMMAND, || {});

        let order: Vec<String> = host
            .key_commands()
            .iter()
            .map(|c| c.input().as_str().to_string())
            .collect();
        assert_eq!(order, vec!["a", "b"]);
    }
}
