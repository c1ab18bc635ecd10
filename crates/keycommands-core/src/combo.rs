// KeyCommands Combo Type
// A key input together with the exact set of modifiers held

use std::fmt;
use std::str::FromStr;

use crate::config::{parse_combo_string, ComboParseError};
use crate::modifier::{Modifier, ModifierFlags};
use crate::KeyInput;

/// Identity of a registered shortcut.
///
/// Two combos are equal iff their inputs are equal and their modifier sets
/// are exactly equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    input: KeyInput,
    modifiers: ModifierFlags,
}

impl KeyCombo {
    /// Create a new KeyCombo from a key input and modifiers
    pub fn new(input: impl Into<KeyInput>, modifiers: impl Into<ModifierFlags>) -> Self {
        Self {
            input: input.into(),
            modifiers: modifiers.into(),
        }
    }

    /// Create a KeyCombo with no modifiers
    pub fn bare(input: impl Into<KeyInput>) -> Self {
        Self::new(input, ModifierFlags::NONE)
    }

    pub fn input(&self) -> &KeyInput {
        &self.input
    }

    pub fn modifiers(&self) -> ModifierFlags {
        self.modifiers
    }

    /// Check whether a host-delivered (input, modifiers) pair fires this combo
    pub fn matches(&self, input: &str, modifiers: ModifierFlags) -> bool {
        self.input.as_str() == input && self.modifiers == modifiers
    }

    /// Add a modifier to this combo
    pub fn with_modifier(&self, modifier: Modifier) -> Self {
        Self {
            input: self.input.clone(),
            modifiers: self.modifiers.with(modifier),
        }
    }
}

/// Parses the format produced by `Display`.
///
/// Single-character keys are lowercased while parsing, so a combo whose
/// input is an uppercase letter ("Cmd-R") parses back to the lowercase
/// input. The hyphen key is written as "Minus".
impl FromStr for KeyCombo {
    type Err = ComboParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_combo_string(s)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.input)
        } else {
            write!(f, "{}-{}", self.modifiers, self.input)
        }
    }
}
