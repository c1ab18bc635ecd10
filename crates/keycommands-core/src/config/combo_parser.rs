// KeyCommands Config API - Combo String Parser
// Parses combo strings like "Cmd-Shift-A" into a KeyCombo

use crate::{KeyCombo, KeyInput, Modifier, ModifierFlags};

/// Errors that can occur during combo parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComboParseError {
    /// Empty input string
    #[error("combo string cannot be empty")]
    EmptyInput,
    /// Modifier alias not recognized
    #[error("unknown modifier: '{0}'")]
    UnknownModifier(String),
    /// Input ends with hyphen (e.g., "Cmd-")
    #[error("combo string cannot end with hyphen")]
    TrailingHyphen,
    /// A component between hyphens is empty (e.g., "Cmd--A")
    #[error("empty component in combo string '{0}'")]
    EmptyComponent(String),
}

/// Parse a combo string like "Cmd-Shift-A" into a [`KeyCombo`]
///
/// The last hyphen-separated component is the key, resolved with
/// [`KeyInput::from_name`]. Everything before it must be a modifier alias.
/// Repeating a modifier is accepted and has no extra effect.
///
/// # Examples
/// ```
/// use keycommands_core::config::parse_combo_string;
/// use keycommands_core::ModifierFlags;
/// let combo = parse_combo_string("Cmd-R").unwrap();
/// assert_eq!(combo.input().as_str(), "r");
/// assert_eq!(combo.modifiers(), ModifierFlags::COMMAND);
/// ```
pub fn parse_combo_string(exp: &str) -> Result<KeyCombo, ComboParseError> {
    let trimmed = exp.trim();
    if trimmed.is_empty() {
        return Err(ComboParseError::EmptyInput);
    }

    if trimmed.ends_with('-') {
        return Err(ComboParseError::TrailingHyphen);
    }

    let parts: Vec<&str> = trimmed.split('-').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ComboParseError::EmptyComponent(trimmed.to_string()));
    }

    // split always yields at least one part for non-empty input
    let (key_str, modifier_strs) = match parts.split_last() {
        Some(split) => split,
        None => return Err(ComboParseError::EmptyInput),
    };

    let mut modifiers = ModifierFlags::NONE;
    for alias in modifier_strs {
        let modifier = Modifier::from_alias(alias)
            .ok_or_else(|| ComboParseError::UnknownModifier(alias.to_string()))?;
        modifiers = modifiers.with(modifier);
    }

    Ok(KeyCombo::new(KeyInput::from_name(key_str), modifiers))
}
