use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use deck_planner::config::Config;
use deck_planner::events::{EventEmitter, EventSink, JsonlEventSink, TracingEventSink};
use deck_planner::layout::hint::FixedHintProvider;
use deck_planner::layout::{LayoutCatalog, LayoutResolver};
use deck_planner::{DeckPlanner, PlannerError, PlanningRequest};

/// Plans slide structure and layouts for a teaching deck.
///
/// Reads a planning request (outline + requirements) as JSON and prints the
/// result as pretty JSON on stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "deck-planner")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Finalize the outline and resolve a layout for every slide
    Plan {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Offer this layout as the semantic hint for every slide
        #[arg(long, value_name = "LAYOUT_ID")]
        hint_layout: Option<String>,
    },
    /// Adjust, validate and auto-correct the outline only
    Validate {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },
    /// Print the layout catalog in use
    Catalog {
        /// Print the condensed summary handed to the hint service
        #[arg(long)]
        summary: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting deck-planner v{}", env!("CARGO_PKG_VERSION"));

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), "{e}");
            let body = serde_json::json!({
                "error": { "code": e.code(), "message": e.to_string() }
            });
            eprintln!("{body}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<(), PlannerError> {
    let catalog = load_catalog(config)?;

    match command {
        Command::Catalog { summary } => {
            if summary {
                print_json(&catalog.summary())
            } else {
                print_json(&catalog.iter().collect::<Vec<_>>())
            }
        }
        Command::Plan {
            request,
            hint_layout,
        } => {
            let request = read_request(&request)?;
            let mut resolver = LayoutResolver::new(catalog).with_events(build_events(config)?);
            if let Some(layout_id) = hint_layout {
                resolver = resolver.with_hint_provider(
                    Arc::new(FixedHintProvider(Some(layout_id))),
                    config.hint_timeout,
                );
            }
            let plan = DeckPlanner::new(resolver).plan(request).await?;
            print_json(&plan)
        }
        Command::Validate { request } => {
            let request = read_request(&request)?;
            request.check()?;

            let session_id = request
                .session_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let resolver = LayoutResolver::new(catalog).with_events(build_events(config)?);
            let outcome = DeckPlanner::new(resolver)
                .for_session(&session_id)
                .finalize_outline(request.outline, &request.requirements);
            print_json(&outcome)
        }
    }
}

fn load_catalog(config: &Config) -> Result<Arc<LayoutCatalog>, PlannerError> {
    match &config.layout_catalog_path {
        Some(path) => Ok(Arc::new(LayoutCatalog::from_path(path)?)),
        None => Ok(LayoutCatalog::shared()),
    }
}

/// JSONL audit log when `EVENT_LOG_DIR` is set, tracing otherwise.
fn build_events(config: &Config) -> Result<EventEmitter, PlannerError> {
    let sink: Arc<dyn EventSink> = match &config.event_log_dir {
        Some(dir) => Arc::new(JsonlEventSink::new(dir)?),
        None => Arc::new(TracingEventSink),
    };
    Ok(EventEmitter::new(sink, "cli"))
}

fn read_request(path: &Path) -> Result<PlanningRequest, PlannerError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PlannerError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
