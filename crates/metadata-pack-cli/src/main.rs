//! pack-foodmart — entry point.

use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use metadata_pack::export;
use metadata_pack_cli::config::{build_export_config, resolve_timeout};

#[derive(Parser)]
#[command(
    name = "pack-foodmart",
    about = "Download the foodmart schema metadata from mondrian-rest and pack it as BSON",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Request timeout in seconds.
    /// Also reads from METADATA_PACK_TIMEOUT_SECS env var.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the metadata and write /data/foodmart-metadata.bson (default).
    Export,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   pack-foodmart completions bash > ~/.local/share/bash-completion/completions/pack-foodmart
    ///   pack-foodmart completions zsh > ~/.zfunc/_pack-foodmart
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Export) {
        Commands::Export => {
            let config = build_export_config(resolve_timeout(cli.timeout_secs));
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;

            match runtime.block_on(export(&config)) {
                Ok(report) => {
                    tracing::info!(
                        "Packed {} top-level keys ({} bytes) into {}",
                        report.top_level_keys,
                        report.bytes_written,
                        report.output_path.display()
                    );
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Ok(ExitCode::from(e.exit_code()));
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pack-foodmart", &mut std::io::stdout());
        }
    }

    Ok(ExitCode::SUCCESS)
}
