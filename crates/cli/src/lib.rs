pub mod commands;
pub mod presenter;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use vitrina_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use vitrina_core::session::CatalogSession;

use crate::commands::shell::{OutputFormat, Shell};
use crate::commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "vitrina",
    about = "Vitrina product catalog",
    long_about = "Browse and edit an in-memory product catalog from the terminal.",
    after_help = concat!(
        "Examples:\n",
        "  vitrina shell\n",
        "  vitrina render --json --currency €\n",
        "  vitrina --config ./vitrina.toml config"
    )
)]
pub struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,
    #[command(subcommand)]
    command: Command,
}

/// Command-line settings; each one wins over the file and the environment.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Read settings from this file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "SYMBOL", help = "Currency symbol shown before prices")]
    pub currency: Option<String>,
    #[arg(long, global = true, help = "Seed for predefined product picks")]
    pub seed: Option<u64>,
    #[arg(long, global = true, value_name = "LEVEL", help = "trace|debug|info|warn|error")]
    pub log_level: Option<String>,
    #[arg(long, global = true, value_name = "FORMAT", help = "compact|pretty|json")]
    pub log_format: Option<LogFormat>,
}

impl SettingsArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                currency_symbol: self.currency.clone(),
                seed: self.seed,
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive catalog session on stdin/stdout")]
    Shell {
        #[arg(long, help = "Emit one JSON object per response instead of text")]
        json: bool,
    },
    #[command(about = "Print the display state of a fresh catalog session")]
    Render {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.settings.load_options();

    let result = match cli.command {
        Command::Shell { json } => run_shell(options, json),
        Command::Render { json } => {
            if let Ok(config) = AppConfig::load(options.clone()) {
                init_logging(&config);
            }
            commands::render::run(options, json)
        }
        Command::Config => commands::config::run(options),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

fn run_shell(options: LoadOptions, json: bool) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "shell",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    init_logging(&config);

    let format = if json { OutputFormat::Json } else { OutputFormat::Text };
    let session = CatalogSession::from_config(&config.catalog);
    let mut shell = Shell::new(session, io::stdout().lock(), format);

    match shell.run(io::stdin().lock()) {
        Ok(()) => CommandResult::ok(String::new()),
        Err(error) => CommandResult::failure("shell", "io", format!("shell stopped: {error}"), 3),
    }
}

/// Logs go to stderr; stdout belongs to the catalog output.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use vitrina_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let result = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
    if let Err(error) = result {
        eprintln!("logging already initialized: {error}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use vitrina_core::config::LogFormat;

    use super::Cli;

    #[test]
    fn settings_flags_become_overrides() {
        let cli = Cli::parse_from([
            "vitrina",
            "render",
            "--config",
            "conf/vitrina.toml",
            "--currency",
            "€",
            "--seed",
            "9",
            "--log-level",
            "warn",
            "--log-format",
            "json",
        ]);

        let options = cli.settings.load_options();

        assert_eq!(options.config_path, Some(PathBuf::from("conf/vitrina.toml")));
        assert_eq!(options.overrides.currency_symbol.as_deref(), Some("€"));
        assert_eq!(options.overrides.seed, Some(9));
        assert_eq!(options.overrides.log_level.as_deref(), Some("warn"));
        assert_eq!(options.overrides.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn settings_default_to_no_overrides() {
        let cli = Cli::parse_from(["vitrina", "config"]);

        assert_eq!(cli.settings.load_options(), Default::default());
    }
}
