// KeyCommands Command Descriptor
// What the host is told about, and what the registry runs

use std::fmt;
use std::sync::Arc;

use crate::{KeyCombo, KeyInput, ModifierFlags};

/// Zero-argument callback run when a registered key command fires
pub type KeyAction = Arc<dyn Fn() + Send + Sync + 'static>;

/// Key command descriptor reported to the host.
///
/// This is the native descriptor the host's discovery query expects and
/// the value it hands back when a command fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCommand {
    combo: KeyCombo,
    /// Title the host may show in its shortcut overlay; empty hides the command there
    discoverability_title: String,
}

impl KeyCommand {
    pub fn new(combo: KeyCombo) -> Self {
        Self {
            combo,
            discoverability_title: String::new(),
        }
    }

    pub fn with_title(combo: KeyCombo, title: impl Into<String>) -> Self {
        Self {
            combo,
            discoverability_title: title.into(),
        }
    }

    pub fn combo(&self) -> &KeyCombo {
        &self.combo
    }

    pub fn input(&self) -> &KeyInput {
        self.combo.input()
    }

    pub fn modifiers(&self) -> ModifierFlags {
        self.combo.modifiers()
    }

    pub fn discoverability_title(&self) -> &str {
        &self.discoverability_title
    }

    /// Whether the host would list this command in its shortcut overlay
    pub fn is_discoverable(&self) -> bool {
        !self.discoverability_title.is_empty()
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_discoverable() {
            write!(f, "{} ({})", self.combo, self.discoverability_title)
        } else {
            write!(f, "{}", self.combo)
        }
    }
}

/// A registered shortcut: the descriptor plus the callback it owns
#[derive(Clone)]
pub struct ShortcutEntry {
    command: KeyCommand,
    action: KeyAction,
}

impl ShortcutEntry {
    pub fn new(command: KeyCommand, action: KeyAction) -> Self {
        Self { command, action }
    }

    pub fn command(&self) -> &KeyCommand {
        &self.command
    }

    pub fn combo(&self) -> &KeyCombo {
        self.command.combo()
    }

    pub fn action(&self) -> &KeyAction {
        &self.action
    }
}

impl fmt::Debug for ShortcutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutEntry")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}
