use anyhow::Result;
use clap::{Parser, Subcommand};
use fantom_ledger::{AppConfig, PolicyMode};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod utils;

use commands::*;
use utils::{ConnectionArgs, DerivationArgs};

#[derive(Parser, Debug)]
#[command(
    name = "fantom-ledger",
    version,
    about = "Talk to the Fantom application on a Ledger device or the Speculos emulator"
)]
struct Cli {
    /// Emulator connection
    #[command(flatten)]
    connection: ConnectionArgs,

    /// How to treat paths the device would deny or flag
    #[arg(long, value_enum, default_value_t = PolicyMode::Warn, global = true)]
    policy: PolicyMode,

    /// Debug level output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the application version
    Version,

    /// Derive an address and show it on the device
    Address {
        #[command(flatten)]
        derivation: DerivationArgs,

        /// Return the address without asking for confirmation on the device
        #[arg(long)]
        no_display: bool,
    },

    /// Derive a public key and chain code
    PublicKey {
        #[command(flatten)]
        derivation: DerivationArgs,
    },

    /// Encode a derivation path without talking to a device
    EncodePath {
        /// Derivation path (e.g. 44'/60'/0'/0/0)
        path: String,
    },
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig::default().with_policy(self.policy)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match &cli.command {
        Commands::Version => version_command(&cli.connection, cli.app_config()),
        Commands::Address {
            derivation,
            no_display,
        } => address_command(&cli.connection, cli.app_config(), derivation, !no_display),
        Commands::PublicKey { derivation } => {
            public_key_command(&cli.connection, cli.app_config(), derivation)
        }
        Commands::EncodePath { path } => encode_path_command(path),
    }
}

fn setup_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` style directives, falling back to INFO, or DEBUG with `-v`
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
