// KeyCommands Simulator CLI
// Plays both the host framework and the application: registers shortcuts,
// answers the host's discovery query and presses key combos.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use serde::Deserialize;

use keycommands_core::{
    parse_combo_string, KeyCombo, KeyCommands, PressOutcome, Settings, SimulatedHost,
};

/// Register keyboard shortcuts against a simulated host and press them
#[derive(Parser, Debug)]
#[command(name = "keycommands")]
#[command(author = "keycommands contributors")]
#[command(version)]
#[command(about = "Keyboard shortcut registry simulator", long_about = None)]
struct Args {
    /// Settings TOML file (defaults to ~/.config/keycommands/settings.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Shortcut bindings TOML file
    #[arg(short, long, value_name = "BINDINGS")]
    bindings: Option<PathBuf>,

    /// Simulate a host without hardware keyboard support
    #[arg(long)]
    no_keyboard: bool,

    /// Print the key commands the host would report and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Combos to press, e.g. "Cmd-R". Read from stdin when omitted.
    #[arg(value_name = "COMBO")]
    combos: Vec<String>,
}

/// One `[[shortcut]]` table of a bindings file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct Binding {
    combo: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct BindingsFile {
    #[serde(default)]
    shortcut: Vec<Binding>,
}

impl BindingsFile {
    fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading bindings from {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing bindings in {}", path.display()))
    }

    fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The single binding the example application registers on launch
    fn example() -> Self {
        Self {
            shortcut: vec![Binding {
                combo: "Cmd-R".to_string(),
                title: None,
                message: Some("⌘+R".to_string()),
            }],
        }
    }
}

/// Main application state
struct Application {
    host: Arc<SimulatedHost>,
    commands: KeyCommands,
    /// Messages of fired shortcuts, in order
    fired: Arc<Mutex<Vec<String>>>,
}

impl Application {
    fn new(args: &Args) -> Result<Self> {
        let settings = match &args.config {
            Some(path) => Settings::from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::load_default().context("loading default settings")?,
        };

        let host = if args.no_keyboard {
            SimulatedHost::without_keyboard()
        } else {
            SimulatedHost::new()
        };
        Ok(Self::with_host(Arc::new(host), &settings))
    }

    fn with_host(host: Arc<SimulatedHost>, settings: &Settings) -> Self {
        let commands = KeyCommands::new(host.clone(), settings);
        Self {
            host,
            commands,
            fired: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn register_bindings(&self, bindings: &BindingsFile) -> Result<()> {
        for binding in &bindings.shortcut {
            let combo = parse_combo_string(&binding.combo)
                .with_context(|| format!("invalid combo '{}'", binding.combo))?;
            let message = binding.message.clone().unwrap_or_else(|| combo.to_string());
            let fired = self.fired.clone();
            let action = move || {
                println!("Key pressed: {}", message);
                fired.lock().push(message.clone());
            };

            let (input, modifiers) = (combo.input().clone(), combo.modifiers());
            match &binding.title {
                Some(title) => {
                    self.commands
                        .register_with_title(input, modifiers, title.clone(), action)
                }
                None => self.commands.register(input, modifiers, action),
            }
        }
        Ok(())
    }

    fn list(&self) {
        let reported = self.host.key_commands();
        if reported.is_empty() {
            println!("No key commands reported");
            return;
        }
        for command in reported {
            println!("{}", command);
        }
    }

    /// Press one combo; `None` when the combo string does not parse
    fn press(&self, combo_str: &str) -> Option<PressOutcome> {
        let combo: KeyCombo = match combo_str.parse() {
            Ok(combo) => combo,
            Err(e) => {
                eprintln!("Skipping '{}': {}", combo_str, e);
                return None;
            }
        };
        let outcome = self.host.press_combo(&combo);
        match &outcome {
            PressOutcome::Unhandled => println!("{}: no key command", combo),
            handled => log::debug!("{} handled: {:?}", combo, handled),
        }
        Some(outcome)
    }

    fn run(&self, args: &Args) -> Result<()> {
        if args.list {
            self.list();
            return Ok(());
        }

        if args.combos.is_empty() {
            for line in io::stdin().lock().lines() {
                let line = line.context("reading combos from stdin")?;
                let trimmed = line.trim();
                if !trimmed.is_empty() && !trimmed.starts_with('#') {
                    self.press(trimmed);
                }
            }
        } else {
            for combo in &args.combos {
                self.press(combo);
            }
        }

        log::info!(
            "{} shortcut(s) fired, capability {}, interceptor {}",
            self.fired.lock().len(),
            self.commands.capability(),
            self.commands.interceptor_state()
        );
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let bindings = match &args.bindings {
        Some(path) => BindingsFile::from_path(path)?,
        None => BindingsFile::example(),
    };

    let app = Application::new(&args)?;
    app.register_bindings(&bindings)?;
    app.run(&args)
}
