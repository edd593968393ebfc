use anyhow::{Context, Result};
use clap::Parser;
use poker_planner::{
    run::DEFAULT_OUTPUT_FILE, Config, HttpTracker, Orchestrator, RunMode, RunOutcome, TicketKey,
};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "poker-planner")]
#[command(about = "Print poker planning commands for tickets ready to size in the next sprint")]
#[command(version)]
struct Cli {
    /// Ticket key (e.g. PROJ-123); plan that ticket's sprint instead of the default board's next one
    ticket: Option<String>,

    /// File the commands are saved to when a ticket key is given
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Increase verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Logs go to stderr so stdout carries only the rendered commands
fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,poker_planner={}", level)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    let config = Config::from_env().context("Cannot start without tracker configuration")?;
    info!(base_url = %config.base_url, board_id = config.board_id, "Configuration loaded");

    let mode = match cli.ticket.as_deref().map(str::parse::<TicketKey>) {
        None => RunMode::Board(config.board_id),
        Some(Ok(key)) => RunMode::Ticket(key),
        Some(Err(e)) => {
            error!(error = %e, "Invalid ticket key");
            return Ok(());
        }
    };

    let tracker = match HttpTracker::new(&config) {
        Ok(tracker) => tracker,
        Err(e) => {
            error!(error = %e, "Failed to create tracker client");
            return Ok(());
        }
    };

    let outcome = Orchestrator::new(&config, &tracker)
        .with_output_path(cli.output)
        .run(&mode)
        .await;

    match outcome {
        RunOutcome::NoSprintFound => info!("Done: no sprint found"),
        RunOutcome::NoIssuesFound => info!("Done: no tickets to size"),
        RunOutcome::Reported {
            sprint, written_to, ..
        } => match written_to {
            Some(path) => info!(sprint = %sprint.name, path = %path.display(), "Done"),
            None => info!(sprint = %sprint.name, "Done"),
        },
        RunOutcome::Failed(reason) => info!(%reason, "Done: run failed"),
    }

    Ok(())
}
