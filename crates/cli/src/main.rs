use clap::{Parser, Subcommand};

mod commands;

use commands::{OnceArgs, PreviewArgs, RunArgs, ShowConfigArgs};

#[derive(Parser)]
#[command(name = "fixed-sltp")]
#[command(about = "Applies fixed stop-loss / take-profit prices to open positions and pending orders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the manager against a paper book until Ctrl-C
    Run(RunArgs),
    /// Run a single enabled-or-not tick and print the report
    Once(OnceArgs),
    /// Show computed SL/TP for every item without modifying anything
    Preview(PreviewArgs),
    /// Print the effective configuration after file and environment overrides
    ShowConfig(ShowConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(RunArgs {
            log_file: Some(path),
            ..
        }) => {
            // Keep stdout free for the interactive status output
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }

    match cli.command {
        Commands::Run(args) => commands::run_manager(args).await?,
        Commands::Once(args) => commands::run_once(args).await?,
        Commands::Preview(args) => commands::run_preview(args).await?,
        Commands::ShowConfig(args) => commands::run_show_config(&args)?,
    }

    Ok(())
}
