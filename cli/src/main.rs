//! Smart Parking — CLI
//!
//! ```sh
//! # Interactive console with default config (~/.config/smart-parking/config.toml)
//! parking
//!
//! # REST API on a custom port
//! parking serve --port 8081
//!
//! # Write a default config file
//! parking init
//!
//! # Validate config without starting
//! parking --config ./parking.toml --check
//! ```

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use smart_parking::config::AppConfig;
use smart_parking::interfaces::console;
use smart_parking::server::{build_session, init_tracing, ServerHandle, ServerOptions};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Smart Parking — slot booking and billing for a single parking lot.
#[derive(Parser, Debug)]
#[command(
    name = "parking",
    version,
    about = "Parking lot manager with an operator console and a REST API",
    long_about = "Smart Parking — park, pre-book and check out vehicles on a \
                  fixed set of numbered slots, billed per minute.\n\n\
                  Default config: ~/.config/smart-parking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive operator console (default).
    Console,
    /// Run the REST API until SIGINT / SIGTERM.
    Serve {
        /// Override the REST API listen port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write the built-in configuration to the config path.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(smart_parking::default_config_path);

    match cli.command.unwrap_or(Command::Console) {
        Command::Init { force } => write_default_config(&config_path, force)?,
        Command::Console => {
            let config = load_config(&config_path, cli.log_level.as_deref())?;
            if cli.check {
                return check_config(&config, &config_path);
            }

            let mut session = build_session(&config)?;
            // stdin is blocking; keep it off the async workers
            tokio::task::spawn_blocking(move || {
                console::run(&mut session, io::stdin().lock(), io::stdout())
            })
            .await??;
        }
        Command::Serve { port } => {
            let mut config = load_config(&config_path, cli.log_level.as_deref())?;
            if let Some(port) = port {
                info!("CLI override: api_port = {}", port);
                config.server.api_port = port;
            }
            if cli.check {
                return check_config(&config, &config_path);
            }

            let handle = ServerHandle::start(ServerOptions { config }).await?;
            handle.install_signal_handler();
            info!("🚀 Press Ctrl+C to shutdown gracefully.");

            handle.shutdown_signal().wait().await;
            handle.wait().await;
        }
    }

    Ok(())
}

/// Load the config file, or the built-in defaults when it does not exist,
/// then install tracing.
fn load_config(path: &Path, log_level: Option<&str>) -> Result<AppConfig, BoxError> {
    let exists = path.exists();
    let mut config = if exists {
        AppConfig::load(path).map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
    } else {
        AppConfig::default()
    };
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }

    init_tracing(&config);
    if exists {
        info!("Configuration loaded from {}", path.display());
    } else {
        info!("No config at {}, using built-in defaults", path.display());
    }
    Ok(config)
}

fn check_config(config: &AppConfig, path: &Path) -> Result<(), BoxError> {
    config.validate()?;
    println!("✅ Configuration is valid");
    println!("   Config file : {}", path.display());
    println!("   Slots       : {}", config.lot.num_slots);
    println!("   Rates       : {:?} {}", config.rates, config.lot.currency);
    println!("   Surcharge   : {}%", config.lot.prebook_surcharge_percent);
    println!("   Users       : {}", config.users.len());
    println!("   API address : {}", config.api_address());
    println!("   Log level   : {}", config.logging.level);
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> Result<(), BoxError> {
    if path.exists() && !force {
        return Err(format!("{} already exists, use --force to overwrite", path.display()).into());
    }
    AppConfig::default().save(path)?;
    println!("✅ Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "parking", "serve", "--port", "9000", "--config", "lot.toml", "-l", "debug",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("lot.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Command::Serve { port: Some(9000) })));
    }

    #[test]
    fn console_is_the_default_command() {
        let cli = Cli::try_parse_from(["parking", "--check"]).unwrap();
        assert!(cli.check);
        assert!(cli.command.is_none());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let path = std::env::temp_dir().join(format!("parking-init-{}.toml", std::process::id()));
        write_default_config(&path, false).unwrap();
        assert!(write_default_config(&path, false).is_err());
        write_default_config(&path, true).unwrap();
        assert!(AppConfig::load(&path).is_ok());
        std::fs::remove_file(&path).unwrap();
    }
}
