// Simulated Key Command Host
//
// An in-process stand-in for the UI framework: it answers the key-command
// discovery query the way the framework would and turns key presses into
// fired commands.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{HostError, KeyCommandHost, KeyCommandResponder};
use crate::{KeyAction, KeyCombo, KeyCommand, ModifierFlags};

/// Which side handled a simulated key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// The installed responder received the command
    Responder(KeyCommand),
    /// A command the host reported before installation handled it
    Builtin(KeyCommand),
    /// No reported command matched, or the host has no keyboard
    Unhandled,
}

impl PressOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, PressOutcome::Unhandled)
    }
}

/// Simulated framework host.
///
/// Built-in commands model what the framework reported before the
/// responder was installed. They are reported after the responder's
/// commands and are hidden when a responder command has the same combo.
/// When several reported commands match a press, the first one wins.
pub struct SimulatedHost {
    keyboard: bool,
    install_error: Option<String>,
    responder: Mutex<Option<Arc<dyn KeyCommandResponder>>>,
    builtins: Mutex<Vec<(KeyCommand, KeyAction)>>,
    install_count: AtomicUsize,
}

impl SimulatedHost {
    /// Host with a hardware keyboard attached
    pub fn new() -> Self {
        Self {
            keyboard: true,
            install_error: None,
            responder: Mutex::new(None),
            builtins: Mutex::new(Vec::new()),
            install_count: AtomicUsize::new(0),
        }
    }

    /// Host without hardware keyboard support
    pub fn without_keyboard() -> Self {
        Self {
            keyboard: false,
            ..Self::new()
        }
    }

    /// Host that reports keyboard support but refuses installation
    pub fn failing_install(reason: impl Into<String>) -> Self {
        Self {
            install_error: Some(reason.into()),
            ..Self::new()
        }
    }

    /// Add a command the framework handles on its own
    pub fn with_builtin(self, command: KeyCommand, action: KeyAction) -> Self {
        self.builtins.lock().push((command, action));
        self
    }

    /// Number of times `install` was called
    pub fn install_count(&self) -> usize {
        self.install_count.load(Ordering::SeqCst)
    }

    pub fn is_installed(&self) -> bool {
        self.responder.lock().is_some()
    }

    /// Answer the framework's "which key commands are supported" query
    pub fn key_commands(&self) -> Vec<KeyCommand> {
        let mut commands = match self.current_responder() {
            Some(responder) => responder.key_commands(),
            None => Vec::new(),
        };
        let builtins: Vec<KeyCommand> = self
            .builtins
            .lock()
            .iter()
            .map(|(command, _)| command.clone())
            .collect();
        for builtin in builtins {
            if !commands.iter().any(|c| c.combo() == builtin.combo()) {
                commands.push(builtin);
            }
        }
        commands
    }

    /// Simulate pressing `input` while holding `modifiers`
    pub fn press(&self, input: &str, modifiers: ModifierFlags) -> PressOutcome {
        self.press_combo(&KeyCombo::new(input, modifiers))
    }

    /// Simulate pressing a combo
    pub fn press_combo(&self, combo: &KeyCombo) -> PressOutcome {
        if !self.keyboard {
            return PressOutcome::Unhandled;
        }

        if let Some(responder) = self.current_responder() {
            let hit = responder
                .key_commands()
                .into_iter()
                .find(|c| c.combo() == combo);
            if let Some(command) = hit {
                responder.handle_key_command(&command);
                return PressOutcome::Responder(command);
            }
        }

        let builtin = self
            .builtins
            .lock()
            .iter()
            .find(|(command, _)| command.combo() == combo)
            .cloned();
        match builtin {
            Some((command, action)) => {
                action();
                PressOutcome::Builtin(command)
            }
            None => PressOutcome::Unhandled,
        }
    }

    // Clone out so no lock is held while the responder runs callbacks
    fn current_responder(&self) -> Option<Arc<dyn KeyCommandResponder>> {
        self.responder.lock().clone()
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyCommandHost for SimulatedHost {
    fn supports_key_commands(&self) -> bool {
        self.keyboard
    }

    fn install(&self, responder: Arc<dyn KeyCommandResponder>) -> Result<(), HostError> {
        self.install_count.fetch_add(1, Ordering::SeqCst);
        if !self.keyboard {
            return Err(HostError::Unsupported);
        }
        if let Some(reason) = &self.install_error {
            return Err(HostError::InstallFailed(reason.clone()));
        }
        *self.responder.lock() = Some(responder);
        Ok(())
    }
}
