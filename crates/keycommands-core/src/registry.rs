// KeyCommands Registry
// Ordered store of registered shortcuts, one entry per combo

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::command::{KeyAction, KeyCommand, ShortcutEntry};
use crate::KeyCombo;

/// Where a re-registered combo ends up in the reported order.
///
/// Both policies keep exactly one entry per combo; they differ only in the
/// order the host sees, which matters when the host resolves overlapping
/// commands by position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Remove the old entry and append the new one (most recent last)
    #[default]
    MoveToEnd,
    /// Swap the callback but keep the old entry's position
    InPlace,
}

/// Outcome of a register call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    Replaced,
}

/// Ordered collection of shortcut entries.
///
/// Invariant: at most one entry per distinct [`KeyCombo`].
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<KeyCombo, ShortcutEntry>,
    policy: ReplacePolicy,
}

impl Registry {
    /// Create a new empty registry using [`ReplacePolicy::MoveToEnd`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReplacePolicy) -> Self {
        Self {
            entries: IndexMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> ReplacePolicy {
        self.policy
    }

    /// Get the number of registered shortcuts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, combo: &KeyCombo) -> bool {
        self.entries.contains_key(combo)
    }

    /// Insert a shortcut, replacing any entry with an equal combo
    pub fn register(&mut self, command: KeyCommand, action: KeyAction) -> Registration {
        let combo = command.combo().clone();
        let entry = ShortcutEntry::new(command, action);

        let replaced = match self.policy {
            ReplacePolicy::MoveToEnd => {
                let old = self.entries.shift_remove(&combo);
                self.entries.insert(combo, entry);
                old.is_some()
            }
            // IndexMap::insert keeps the slot of an existing key
            ReplacePolicy::InPlace => self.entries.insert(combo, entry).is_some(),
        };

        if replaced {
            Registration::Replaced
        } else {
            Registration::Added
        }
    }

    /// Remove the entry for a combo. Returns false if nothing was registered.
    pub fn unregister(&mut self, combo: &KeyCombo) -> bool {
        self.entries.shift_remove(combo).is_some()
    }

    /// Descriptors of all entries, in registration order
    pub fn enumerate(&self) -> Vec<KeyCommand> {
        self.entries.values().map(|e| e.command().clone()).collect()
    }

    /// Callbacks of every entry whose combo equals `combo`, in order
    pub fn matching(&self, combo: &KeyCombo) -> SmallVec<[KeyAction; 1]> {
        self.entries
            .values()
            .filter(|e| e.combo() == combo)
            .map(|e| e.action().clone())
            .collect()
    }

    /// Iterate over entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ShortcutEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModifierFlags;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn noop() -> KeyAction {
        Arc::new(|| {})
    }

    fn counter() -> (Arc<AtomicUsize>, KeyAction) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (
            count,
            Arc::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    fn cmd(input: &str, modifiers: ModifierFlags) -> KeyCommand {
        KeyCommand::new(KeyCombo::new(input, modifiers))
    }

    fn inputs(registry: &Registry) -> Vec<String> {
        registry
            .enumerate()
            .iter()
            .map(|c| c.input().as_str().to_string())
            .collect()
    }

    #[test]
    fn test_register_adds_entry() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        let outcome = registry.register(cmd("r", ModifierFlags::COMMAND), noop());
        assert_eq!(outcome, Registration::Added);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&KeyCombo::new("r", ModifierFlags::COMMAND)));
    }

    #[test]
    fn test_register_replaces_same_combo() {
        let mut registry = Registry::new();
        let (first, first_action) = counter();
        let (second, second_action) = counter();
        registry.register(cmd("r", ModifierFlags::COMMAND), first_action);
        let outcome = registry.register(cmd("r", ModifierFlags::COMMAND), second_action);
        assert_eq!(outcome, Registration::Replaced);
        assert_eq!(registry.len(), 1);

        let actions = registry.matching(&KeyCombo::new("r", ModifierFlags::COMMAND));
        assert_eq!(actions.len(), 1);
        for action in actions {
            action();
        }
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_move_to_end_reorders() {
        let mut registry = Registry::new();
        registry.register(cmd("a", ModifierFlags::COMMAND), noop());
        registry.register(cmd("b", ModifierFlags::COMMAND), noop());
        registry.register(cmd("c", ModifierFlags::COMMAND), noop());
        registry.register(cmd("a", ModifierFlags::COMMAND), noop());
        assert_eq!(inputs(&registry), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_in_place_keeps_order() {
        let mut registry = Registry::with_policy(ReplacePolicy::InPlace);
        registry.register(cmd("a", ModifierFlags::COMMAND), noop());
        registry.register(cmd("b", ModifierFlags::COMMAND), noop());
        registry.register(cmd("c", ModifierFlags::COMMAND), noop());
        let outcome = registry.register(cmd("a", ModifierFlags::COMMAND), noop());
        assert_eq!(outcome, Registration::Replaced);
        assert_eq!(inputs(&registry), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replace_updates_title() {
        let mut registry = Registry::new();
        let combo = KeyCombo::new("s", ModifierFlags::COMMAND);
        registry.register(KeyCommand::with_title(combo.clone(), "Save"), noop());
        registry.register(KeyCommand::with_title(combo, "Save All"), noop());
        let commands = registry.enumerate();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].discoverability_title(), "Save All");
    }

    #[test]
    fn test_unregister() {
        let mut registry = Registry::new();
        registry.register(cmd("x", ModifierFlags::NONE), noop());
        assert!(registry.unregister(&KeyCombo::bare("x")));
        assert!(registry.is_empty());
        assert!(!registry.unregister(&KeyCombo::bare("x")));
    }

    #[test]
    fn test_unregister_keeps_order_of_others() {
        let mut registry = Registry::new();
        registry.register(cmd("a", ModifierFlags::NONE), noop());
        registry.register(cmd("b", ModifierFlags::NONE), noop());
        registry.register(cmd("c", ModifierFlags::NONE), noop());
        registry.unregister(&KeyCombo::bare("b"));
        assert_eq!(inputs(&registry), vec!["a", "c"]);
    }

    #[test]
    fn test_same_key_different_modifiers_independent() {
        let mut registry = Registry::new();
        let (cmd_count, cmd_action) = counter();
        let (shift_count, shift_action) = counter();
        registry.register(cmd("a", ModifierFlags::COMMAND), cmd_action);
        registry.register(
            cmd("a", ModifierFlags::COMMAND | ModifierFlags::SHIFT),
            shift_action,
        );
        assert_eq!(registry.len(), 2);

        for action in registry.matching(&KeyCombo::new("a", ModifierFlags::COMMAND)) {
            action();
        }
        assert_eq!(cmd_count.load(Ordering::SeqCst), 1);
        assert_eq!(shift_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_matching_none() {
        let mut registry = Registry::new();
        registry.register(cmd("a", ModifierFlags::COMMAND | ModifierFlags::SHIFT), noop());
        assert!(registry
            .matching(&KeyCombo::new("a", ModifierFlags::COMMAND))
            .is_empty());
    }
}
