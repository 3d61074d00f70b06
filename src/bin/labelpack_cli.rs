//! LabelPack CLI - Build the Portable Label Sheet
//!
//! With no arguments: reads logo.svg, qrcode.min.js and qr-codes-all.csv
//! from the working directory and writes qr-print-portable.html.
//! `check` validates the data file and prints JSON.
//! Returns non-zero on any failure, 2 when `check` finds errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use labelpack_core::{BundleConfig, Bundler};

#[derive(Parser)]
#[command(name = "labelpack-cli")]
#[command(about = "LabelPack CLI - Portable QR Label Sheet Bundler")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the inputs and receiving the output
    #[arg(short, long, default_value = ".")]
    base_dir: PathBuf,

    /// Custom HTML template with %%QR_LIB%%, %%LOGO_SRC%% and %%CSV_DATA%% markers
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Print the build report as JSON instead of the status line
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the portable document (default)
    Build,

    /// Check the data file's shape
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BundleConfig {
        template: cli.template,
        ..BundleConfig::in_dir(&cli.base_dir)
    };

    let bundler = match Bundler::new(config) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => match bundler.build() {
            Ok(report) => {
                if cli.json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", report.status_line());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },

        Commands::Check => match bundler.check() {
            Ok(result) => {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
                if result.valid {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2) // Data unusable
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
