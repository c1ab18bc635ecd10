// KeyCommands Core Library
// Hardware keyboard shortcuts registered from anywhere in an application

pub mod combo;
pub mod command;
pub mod config;
pub mod host;
pub mod interceptor;
pub mod key;
pub mod modifier;
pub mod registry;
pub mod service;

pub use combo::KeyCombo;
pub use command::{KeyAction, KeyCommand, ShortcutEntry};
pub use config::{parse_combo_string, ComboParseError, Settings, SettingsError};
pub use host::{
    HostError, KeyCommandHost, KeyCommandResponder, PressOutcome, SimulatedHost, UnsupportedHost,
};
pub use interceptor::{Interceptor, InterceptorState, RegistryResponder};
pub use key::KeyInput;
pub use modifier::{Modifier, ModifierFlags};
pub use registry::{Registration, Registry, ReplacePolicy};
pub use service::{global, init_global, register, unregister, Capability, KeyCommands, ServiceError};
