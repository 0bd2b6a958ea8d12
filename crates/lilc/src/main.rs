//! lilc CLI - lilToon shader container expander.
//!
//! Provides commands for:
//! - `unpack`: Assemble a shader from a `.lilcontainer`
//! - `settings`: Write the shader-setting include file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{SettingsArgs, UnpackArgs};
use output::Output;

/// lilc - lilToon shader container expander.
#[derive(Parser)]
#[command(name = "lilc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a shader from a container file.
    Unpack(UnpackArgs),
    /// Write the shader-setting include file from the configured flags.
    Settings(SettingsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Unpack(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Unpack(args) => args.execute(),
        Commands::Settings(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
