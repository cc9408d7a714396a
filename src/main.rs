use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use chrono::NaiveDate;
use midiaz_dashboard::api::events::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use midiaz_dashboard::api::reports::{ReportFocus, ReportType};
use midiaz_dashboard::commands::{self, reports::ReportOptions};
use midiaz_dashboard::config::AppConfig;
use midiaz_dashboard::filters::{parse_date, DashboardFilters, FilterField};
use midiaz_dashboard::state::AppState;
use midiaz_dashboard::views::dashboard::DEFAULT_EVENTS_LIMIT;

#[derive(Parser)]
#[command(version, about = "Midiaz event brand analytics dashboard")]
struct Cli {
    /// Backend base URL, overrides MIDIAZ_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// KPIs, brand chart, sport distribution, events and brand ranking
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = DEFAULT_EVENTS_LIMIT)]
        limit: u32,
    },
    /// Paginated event list
    Events {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: u32,
    },
    /// Event detail with brands and products
    Event { id: String },
    /// Generate an LLM report
    Report(ReportArgs),
    /// Report service availability
    Status,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    sport: Vec<String>,
    #[arg(long)]
    event_type: Vec<String>,
    #[arg(long)]
    location: Vec<String>,
    #[arg(long)]
    brand: Vec<String>,
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn to_filters(&self) -> midiaz_dashboard::error::Result<DashboardFilters> {
        let mut filters = DashboardFilters::new()
            .with_values(FilterField::Sport, self.sport.iter().cloned())
            .with_values(FilterField::EventType, self.event_type.iter().cloned())
            .with_values(FilterField::Location, self.location.iter().cloned())
            .with_values(FilterField::Brand, self.brand.iter().cloned());
        filters.set_date_from(self.from)?;
        filters.set_date_to(self.to)?;
        Ok(filters)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    #[value(name = "market_share")]
    MarketShare,
    #[value(name = "audience_segmentation")]
    AudienceSegmentation,
    #[value(name = "event_metrics")]
    EventMetrics,
}

impl From<ReportKind> for ReportType {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::MarketShare => ReportType::MarketShare,
            ReportKind::AudienceSegmentation => ReportType::AudienceSegmentation,
            ReportKind::EventMetrics => ReportType::EventMetrics,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum FocusArg {
    #[default]
    General,
    Brands,
    Products,
    Audience,
}

impl From<FocusArg> for ReportFocus {
    fn from(focus: FocusArg) -> Self {
        match focus {
            FocusArg::General => ReportFocus::General,
            FocusArg::Brands => ReportFocus::Brands,
            FocusArg::Products => ReportFocus::Products,
            FocusArg::Audience => ReportFocus::Audience,
        }
    }
}

#[derive(Args)]
struct ReportArgs {
    #[arg(value_enum)]
    report_type: ReportKind,
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    #[arg(long)]
    sport: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    product_type: Option<String>,
    #[arg(long)]
    brand: Vec<String>,
    #[arg(long)]
    event_id: Option<String>,
    #[arg(long, value_enum, default_value_t = FocusArg::General)]
    focus: FocusArg,
}

impl From<&ReportArgs> for ReportOptions {
    fn from(args: &ReportArgs) -> Self {
        ReportOptions {
            date_from: args.from,
            date_to: args.to,
            sport: args.sport.clone(),
            location: args.location.clone(),
            product_type: args.product_type.clone(),
            brands: args.brand.clone(),
            event_id: args.event_id.clone(),
            focus: args.focus.into(),
        }
    }
}

async fn run(cli: &Cli, state: &AppState) -> midiaz_dashboard::error::Result<String> {
    match &cli.command {
        Commands::Dashboard { filters, limit } => {
            commands::dashboard::show_dashboard(state, &filters.to_filters()?, *limit).await
        }
        Commands::Events {
            filters,
            limit,
            offset,
        } => commands::events::list_events(state, *limit, *offset, &filters.to_filters()?).await,
        Commands::Event { id } => commands::events::show_event(state, id).await,
        Commands::Report(args) => {
            let request =
                commands::reports::build_request(args.report_type.into(), &ReportOptions::from(args))?;
            commands::reports::generate_report(state, &request).await
        }
        Commands::Status => commands::reports::show_status(state).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    midiaz_dashboard::init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    let state = AppState::new(config).context("failed to initialize the API client")?;

    let outcome = run(&cli, &state).await;
    state.shutdown();

    let output = outcome?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
