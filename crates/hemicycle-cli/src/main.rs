//! `hemicycle`: sentiment analytics over parliamentary debate, from the terminal.

mod display;

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Args, Parser, Subcommand};
use hemicycle_client::{
    ClientConfig, ClientError, SentimentService, ViewSlot, ViewState, config::DEFAULT_BASE_URL,
};
use hemicycle_core::{Bill, ListingQuery, Session, SentimentFilters, Speaker, TimeRange};
use serde::Serialize;
use tracing::Level;

#[derive(Parser)]
#[command(name = "hemicycle", version)]
#[command(about = "Sentiment analytics over parliamentary debate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL
    #[arg(long, global = true, env = "HEMICYCLE_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "HEMICYCLE_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Cache time-to-live in milliseconds
    #[arg(long, global = true, env = "HEMICYCLE_CACHE_TTL_MS", default_value_t = 30_000)]
    cache_ttl_ms: u64,

    /// Maximum cached responses (0 = unbounded)
    #[arg(long, global = true, env = "HEMICYCLE_CACHE_CAPACITY", default_value_t = 256)]
    cache_capacity: usize,

    /// Print views as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Activity counters, sentiment split, party and category ranking
    Overview {
        /// all, year, or month
        #[arg(long, default_value_t = TimeRange::All)]
        time_range: TimeRange,
    },
    /// Parties ranked by sentiment
    Parties(FilterArgs),
    /// Sentiment per category and subcategory
    Categories(FilterArgs),
    /// Sentiment summary, party split, and timeline for one bill
    Bill { id: String },
    /// List parliamentary sessions
    Sessions(ListingArgs),
    /// List bills
    Bills(ListingArgs),
    /// List speakers
    Speakers(ListingArgs),
    /// Ask the backend to re-ingest data and drop cached responses
    Refresh {
        /// Re-ingest even if data looks current
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// all, year, or month
    #[arg(long, default_value_t = TimeRange::All)]
    time_range: TimeRange,
    #[arg(long)]
    party: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    subcategory: Option<String>,
    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    date_from: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    date_to: Option<String>,
    /// Free-text search, applied by the backend
    #[arg(long)]
    search: Option<String>,
}

impl From<FilterArgs> for SentimentFilters {
    fn from(a: FilterArgs) -> Self {
        Self {
            time_range: a.time_range,
            party: a.party,
            category: a.category,
            subcategory: a.subcategory,
            bill: None,
            date_from: a.date_from,
            date_to: a.date_to,
            search: a.search,
        }
    }
}

#[derive(Args)]
struct ListingArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    date_from: Option<String>,
    #[arg(long)]
    date_to: Option<String>,
}

impl From<ListingArgs> for ListingQuery {
    fn from(a: ListingArgs) -> Self {
        Self {
            search: a.search,
            page: a.page,
            page_size: a.page_size,
            date_from: a.date_from,
            date_to: a.date_to,
        }
    }
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            cache_ttl: Duration::from_millis(self.cache_ttl_ms),
            cache_capacity: self.cache_capacity,
            ..ClientConfig::new(self.api_url.clone())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::info!("hemicycle v{}", env!("CARGO_PKG_VERSION"));

    let service =
        SentimentService::new(cli.client_config()).context("failed to set up the HTTP client")?;
    let json = cli.json;

    match cli.command {
        Command::Overview { time_range } => {
            show(
                service.fetch_overall_sentiment(time_range),
                json,
                display::print_overview,
            )
            .await
        }
        Command::Parties(args) => {
            let filters = SentimentFilters::from(args);
            show(
                service.fetch_party_sentiment(&filters),
                json,
                display::print_party_report,
            )
            .await
        }
        Command::Categories(args) => {
            let filters = SentimentFilters::from(args);
            show(
                service.fetch_category_sentiment(&filters),
                json,
                display::print_category_report,
            )
            .await
        }
        Command::Bill { id } => {
            show(service.fetch_bill_sentiment(&id), json, display::print_bill).await
        }
        Command::Sessions(args) => {
            let listing = ListingQuery::from(args);
            show(service.fetch_sessions(&listing), json, |v: &Vec<Session>| {
                display::print_sessions(v)
            })
            .await
        }
        Command::Bills(args) => {
            let listing = ListingQuery::from(args);
            show(service.fetch_bills(&listing), json, |v: &Vec<Bill>| {
                display::print_bills(v)
            })
            .await
        }
        Command::Speakers(args) => {
            let listing = ListingQuery::from(args);
            show(service.fetch_speakers(&listing), json, |v: &Vec<Speaker>| {
                display::print_speakers(v)
            })
            .await
        }
        Command::Refresh { force } => {
            show(service.trigger_refresh(force), json, display::print_refresh).await
        }
    }
}

/// Load one view and render whatever state it settles in.
async fn show<T, F>(fetch: F, json: bool, render: impl FnOnce(&T)) -> Result<()>
where
    T: Serialize,
    F: Future<Output = Result<T, ClientError>>,
{
    let slot = ViewSlot::new();
    slot.load(fetch).await;
    slot.with_state(|state| -> Result<()> {
        match state {
            ViewState::Ready(view) if json => {
                println!("{}", serde_json::to_string_pretty(view)?);
                Ok(())
            }
            ViewState::Ready(view) => {
                render(view);
                Ok(())
            }
            ViewState::Failed(error) => {
                display::print_failure(error);
                Err(anyhow!("{}", error.message))
            }
            ViewState::Idle | ViewState::Loading => Err(anyhow!("view was not loaded")),
        }
    })
}
