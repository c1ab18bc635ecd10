// KeyCommands Config API
// Combo string parsing and service settings

pub mod combo_parser;
pub mod settings;

pub use combo_parser::{parse_combo_string, ComboParseError};
pub use settings::{Settings, SettingsError};
