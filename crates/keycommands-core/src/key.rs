// KeyCommands Key Input
// The key identifier a key command responds to

use std::borrow::Borrow;
use std::fmt;

/// Key identifier of a key command, e.g. `"r"` or [`KeyInput::UP_ARROW`].
///
/// Matching is exact string equality: `"r"` and `"R"` are different inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyInput(String);

impl KeyInput {
    pub const UP_ARROW: &'static str = "UIKeyInputUpArrow";
    pub const DOWN_ARROW: &'static str = "UIKeyInputDownArrow";
    pub const LEFT_ARROW: &'static str = "UIKeyInputLeftArrow";
    pub const RIGHT_ARROW: &'static str = "UIKeyInputRightArrow";
    pub const ESCAPE: &'static str = "UIKeyInputEscape";
    pub const PAGE_UP: &'static str = "UIKeyInputPageUp";
    pub const PAGE_DOWN: &'static str = "UIKeyInputPageDown";
    pub const HOME: &'static str = "UIKeyInputHome";
    pub const END: &'static str = "UIKeyInputEnd";
    pub const TAB: &'static str = "\t";
    pub const RETURN: &'static str = "\r";
    pub const DELETE: &'static str = "\u{8}";
    pub const SPACE: &'static str = " ";
    pub const MINUS: &'static str = "-";

    pub fn new(input: impl Into<String>) -> Self {
        KeyInput(input.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a human-readable key name used in combo strings.
    ///
    /// Special keys are matched case-insensitively ("Up", "esc", "PageDown").
    /// A single character is lowercased, as the host reports letter inputs
    /// without shift applied. Anything else is taken verbatim.
    pub fn from_name(name: &str) -> KeyInput {
        if let Some(special) = special_input(name) {
            return KeyInput::new(special);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyInput(c.to_lowercase().collect()),
            _ => KeyInput::new(name),
        }
    }

    /// Human-readable name, the inverse of [`KeyInput::from_name`] for special keys
    pub fn display_name(&self) -> &str {
        match self.0.as_str() {
            Self::UP_ARROW => "Up",
            Self::DOWN_ARROW => "Down",
            Self::LEFT_ARROW => "Left",
            Self::RIGHT_ARROW => "Right",
            Self::ESCAPE => "Esc",
            Self::PAGE_UP => "PageUp",
            Self::PAGE_DOWN => "PageDown",
            Self::HOME => "Home",
            Self::END => "End",
            Self::TAB => "Tab",
            Self::RETURN => "Return",
            Self::DELETE => "Delete",
            Self::SPACE => "Space",
            Self::MINUS => "Minus",
            other => other,
        }
    }
}

fn special_input(name: &str) -> Option<&'static str> {
    let special = match name.to_ascii_lowercase().as_str() {
        "up" | "uparrow" => KeyInput::UP_ARROW,
        "down" | "downarrow" => KeyInput::DOWN_ARROW,
        "left" | "leftarrow" => KeyInput::LEFT_ARROW,
        "right" | "rightarrow" => KeyInput::RIGHT_ARROW,
        "esc" | "escape" => KeyInput::ESCAPE,
        "pageup" | "pgup" => KeyInput::PAGE_UP,
        "pagedown" | "pgdn" => KeyInput::PAGE_DOWN,
        "home" => KeyInput::HOME,
        "end" => KeyInput::END,
        "tab" => KeyInput::TAB,
        "return" | "enter" => KeyInput::RETURN,
        "delete" | "backspace" => KeyInput::DELETE,
        "space" => KeyInput::SPACE,
        "minus" | "hyphen" => KeyInput::MINUS,
        _ => return None,
    };
    Some(special)
}

impl From<&str> for KeyInput {
    fn from(input: &str) -> Self {
        KeyInput::new(input)
    }
}

impl From<String> for KeyInput {
    fn from(input: String) -> Self {
        KeyInput(input)
    }
}

impl Borrow<str> for KeyInput {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for KeyInput {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
