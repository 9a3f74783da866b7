//! Command line dashboard for trading-performance metrics.
mod config;
mod logging;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{DashboardConfig, ENV_BASE_URL, parse_url};
use dotenv::dotenv;
use status::{WindowTitle, frame_label};
use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use trade_dash_data::{MetricsSource, source_for};
use trade_dash_loader::{
    DashboardState, DashboardStore, MetricsLoader, refresh_channel, spawn_interval_trigger,
};
use trade_dash_view::{OutputFormat, TreeFormatter, get_formatter, render};

#[derive(Parser)]
#[command(name = "trade-dash")]
#[command(about = "Trading performance dashboard for metrics.json snapshots", long_about = None)]
struct Cli {
    /// Metrics document: URL, absolute path, or reference relative to --base-url
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Base URL for relative endpoints
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Output format (pretty, plain, json)
    #[arg(short, long, global = true, default_value = "pretty")]
    format: OutputFormat,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard and refresh on request (default)
    Watch {
        /// Also refresh automatically every N seconds (5-300)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        every: Option<u64>,
    },
    /// Fetch once, print, and exit
    Snapshot,
}

/// Commands read from stdin while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Refresh,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" | "r" | "refresh" => Some(Self::Refresh),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let mut config = DashboardConfig::from_env().context("invalid configuration")?;
    apply_overrides(&mut config, &cli)?;

    logging::init_tracing(config.log_json);

    let source: Arc<dyn MetricsSource> = Arc::from(
        source_for(config.metrics_endpoint()?, config.request_timeout)
            .context("failed to create metrics source")?,
    );
    let formatter = get_formatter(cli.format);

    let mut loader = MetricsLoader::new(source, DashboardStore::new());
    if cli.format != OutputFormat::Json && std::io::stdout().is_terminal() {
        loader = loader.with_observer(Arc::new(WindowTitle::stdout()));
    }

    match cli.command.unwrap_or(Commands::Watch { every: None }) {
        Commands::Watch { every } => {
            let every = every.map(Duration::from_secs).or(config.auto_refresh);
            let stdin = BufReader::new(tokio::io::stdin());
            watch(
                Arc::new(loader),
                formatter.as_ref(),
                cli.format,
                every,
                stdin,
                interrupted(),
            )
            .await
        }
        Commands::Snapshot => snapshot(&loader, formatter.as_ref(), cli.format).await,
    }
}

fn apply_overrides(config: &mut DashboardConfig, cli: &Cli) -> Result<()> {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = parse_url(ENV_BASE_URL, base_url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = Some(Duration::from_secs(secs));
    }
    config.log_json |= cli.log_json;
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// One screen: the status label of the drawn snapshot followed by the body.
fn frame(formatter: &dyn TreeFormatter, format: OutputFormat, state: &DashboardState) -> String {
    let body = formatter.format(&render(state));
    match frame_label(state) {
        Some(label) if format != OutputFormat::Json => format!("{label}\n{body}"),
        _ => body,
    }
}

async fn snapshot(
    loader: &MetricsLoader,
    formatter: &dyn TreeFormatter,
    format: OutputFormat,
) -> Result<()> {
    let result = loader.reload().await;
    println!("{}", frame(formatter, format, &loader.store().current()));

    result
        .map(|_| ())
        .context("failed to load metrics snapshot")
}

/// Redraws on every state change until quit or stdin EOF.
///
/// With auto-refresh on, stdin EOF only ends manual refreshes and the
/// dashboard keeps updating until `shutdown` resolves. `shutdown` is not
/// polled while stdin is open.
async fn watch<R, F>(
    loader: Arc<MetricsLoader>,
    formatter: &dyn TreeFormatter,
    format: OutputFormat,
    every: Option<Duration>,
    input: R,
    shutdown: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut changes = loader.store().subscribe();
    let (trigger, events) = refresh_channel();
    let auto_refresh = every.map(|every| spawn_interval_trigger(trigger.clone(), every));
    let running = tokio::spawn(loader.run(events));
    tokio::pin!(shutdown);

    eprintln!("[enter] or r: refresh   q: quit");
    let initial = changes.borrow_and_update().clone();
    println!("{}", frame(formatter, format, &initial));

    let mut lines = input.lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            () = &mut shutdown, if !stdin_open => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = changes.borrow_and_update().clone();
                println!("{}", frame(formatter, format, &state));
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(line) => match Command::parse(&line) {
                        Some(Command::Refresh) => {
                            if !trigger.manual().await {
                                break;
                            }
                        }
                        Some(Command::Quit) => break,
                        None => warn!(command = line.trim(), "unknown command"),
                    },
                    None if auto_refresh.is_some() => {
                        info!("stdin closed, auto-refresh continues until interrupted");
                        stdin_open = false;
                    }
                    None => break,
                }
            }
        }
    }

    info!("shutting down");
    if let Some(handle) = auto_refresh {
        handle.abort();
    }
    // reloads have no timeout; do not wait for a hung one
    running.abort();
    Ok(())
}
