// KeyCommands Modifier System
// Represents key command modifiers (Command, Shift, Control, Alternate, ...)

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// A single modifier key as the host reports it on a key command.
///
/// Bit values follow the host framework's modifier-flag mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[repr(u32)]
pub enum Modifier {
    AlphaShift = 1 << 16,
    Shift = 1 << 17,
    Control = 1 << 18,
    Alternate = 1 << 19,
    Command = 1 << 20,
    NumericPad = 1 << 21,
}

impl Modifier {
    /// Bit of this modifier in a `ModifierFlags` mask
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Textual aliases accepted when parsing combo strings.
    /// The first alias is the one used for display.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Modifier::Command => &["Cmd", "Command", "Meta", "Super"],
            Modifier::Shift => &["Shift"],
            Modifier::Control => &["Ctrl", "Control"],
            Modifier::Alternate => &["Alt", "Opt", "Option", "Alternate"],
            Modifier::AlphaShift => &["Caps", "CapsLock", "AlphaShift"],
            Modifier::NumericPad => &["NumPad", "Keypad", "NumericPad"],
        }
    }

    /// Get the first alias (string representation)
    pub fn primary_alias(self) -> &'static str {
        self.aliases()[0]
    }

    /// Look up a modifier by alias, ignoring ASCII case
    pub fn from_alias(alias: &str) -> Option<Modifier> {
        Modifier::iter().find(|m| m.aliases().iter().any(|a| a.eq_ignore_ascii_case(alias)))
    }

    /// Display order used when printing combos: Ctrl, Alt, Shift, Cmd, then the rest
    fn display_rank(self) -> u8 {
        match self {
            Modifier::Control => 0,
            Modifier::Alternate => 1,
            Modifier::Shift => 2,
            Modifier::Command => 3,
            Modifier::AlphaShift => 4,
            Modifier::NumericPad => 5,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary_alias())
    }
}

/// An exact set of modifiers held while a key command fires.
///
/// Two sets match only when they are equal; a superset never matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ModifierFlags(u32);

impl ModifierFlags {
    /// No modifiers held
    pub const NONE: ModifierFlags = ModifierFlags(0);
    pub const COMMAND: ModifierFlags = ModifierFlags(Modifier::Command.bit());
    pub const SHIFT: ModifierFlags = ModifierFlags(Modifier::Shift.bit());
    pub const CONTROL: ModifierFlags = ModifierFlags(Modifier::Control.bit());
    pub const ALTERNATE: ModifierFlags = ModifierFlags(Modifier::Alternate.bit());
    pub const ALPHA_SHIFT: ModifierFlags = ModifierFlags(Modifier::AlphaShift.bit());
    pub const NUMERIC_PAD: ModifierFlags = ModifierFlags(Modifier::NumericPad.bit());

    const KNOWN_BITS: u32 = Modifier::AlphaShift.bit()
        | Modifier::Shift.bit()
        | Modifier::Control.bit()
        | Modifier::Alternate.bit()
        | Modifier::Command.bit()
        | Modifier::NumericPad.bit();

    /// Build from a raw host mask. Unknown bits are dropped.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        ModifierFlags(bits & Self::KNOWN_BITS)
    }

    /// Raw host mask
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub const fn with(self, modifier: Modifier) -> Self {
        ModifierFlags(self.0 | modifier.bit())
    }

    /// Number of modifiers in the set
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Modifiers in display order
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        let mut mods: Vec<Modifier> = Modifier::iter().filter(|m| self.contains(*m)).collect();
        mods.sort_by_key(|m| m.display_rank());
        mods.into_iter()
    }
}

impl From<Modifier> for ModifierFlags {
    fn from(modifier: Modifier) -> Self {
        ModifierFlags(modifier.bit())
    }
}

impl FromIterator<Modifier> for ModifierFlags {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(ModifierFlags::NONE, |acc, m| acc.with(m))
    }
}

impl BitOr for ModifierFlags {
    type Output = ModifierFlags;

    fn bitor(self, rhs: ModifierFlags) -> ModifierFlags {
        ModifierFlags(self.0 | rhs.0)
    }
}

impl BitOr<Modifier> for ModifierFlags {
    type Output = ModifierFlags;

    fn bitor(self, rhs: Modifier) -> ModifierFlags {
        self.with(rhs)
    }
}

impl BitOrAssign for ModifierFlags {
    fn bitor_assign(&mut self, rhs: ModifierFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.iter().map(|m| m.primary_alias()).collect();
        write!(f, "{}", parts.join("-"))
    }
}
