use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use covid_tracker::api::{DEFAULT_BASE_URL, DEFAULT_HISTORY_DAYS};
use covid_tracker::format::{format_count, pretty_print_stat};
use covid_tracker::props::DashboardProps;
use covid_tracker::{Client, ClientConfig, Coordinator, Outcome, Scope, StatKind, StatsSource};
use covid_tracker::{storage, transform, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "covid",
    version,
    about = "Fetch, tabulate & chart COVID-19 statistics from disease.sh"
)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "COVID_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Locale for grouped numbers (en, de, fr, es, it, pt, nl)
    #[arg(long, global = true, default_value = "en")]
    locale: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print today's and total counters for worldwide or one country.
    Summary(SummaryArgs),
    /// List selector options (name and ISO2 code).
    Countries,
    /// Print (and optionally save) countries sorted by cases.
    Table(TableArgs),
    /// Render the worldwide "new per day" chart.
    Chart(ChartArgs),
    /// Print map circles for the chosen statistic.
    Map(MapArgs),
    /// Load the dashboard, optionally select a country, and print its render props as JSON.
    Dashboard(DashboardArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Cases,
    Recovered,
    Deaths,
}

impl From<Kind> for StatKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Cases => StatKind::Cases,
            Kind::Recovered => StatKind::Recovered,
            Kind::Deaths => StatKind::Deaths,
        }
    }
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Country code (e.g., US) or "worldwide"
    #[arg(short, long, default_value = "worldwide")]
    country: String,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Only print the first N rows.
    #[arg(long)]
    limit: Option<usize>,
    /// Save the full table to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[arg(short, long, value_enum, default_value_t = Kind::Cases)]
    kind: Kind,
    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Number of days to cover.
    #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
    days: u32,
    /// Width of the chart (default 800).
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Height of the chart (default 400).
    #[arg(long, default_value_t = 400)]
    height: u32,
}

#[derive(Args, Debug)]
struct MapArgs {
    #[arg(short, long, value_enum, default_value_t = Kind::Cases)]
    kind: Kind,
    /// Only print the N largest circles.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Country to select after loading.
    #[arg(short, long)]
    country: Option<String>,
    #[arg(short, long, value_enum, default_value_t = Kind::Cases)]
    kind: Kind,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let client = Client::new(ClientConfig::default().with_base_url(cli.base_url.clone()))?;
    match cli.cmd {
        Command::Summary(args) => cmd_summary(&client, args),
        Command::Countries => cmd_countries(&client),
        Command::Table(args) => cmd_table(&client, args, &cli.locale),
        Command::Chart(args) => cmd_chart(&client, args),
        Command::Map(args) => cmd_map(&client, args),
        Command::Dashboard(args) => cmd_dashboard(&client, args, &cli.locale),
    }
}

fn cmd_summary(client: &Client, args: SummaryArgs) -> Result<()> {
    let scope = Scope::parse(&args.country)?;
    let stat = client.fetch_aggregate(&scope)?;
    let label = stat.name.clone().unwrap_or_else(|| "Worldwide".to_string());
    println!("{label}");
    for kind in StatKind::ALL {
        println!(
            "  {:<18} {:>9} today   {:>9} total",
            kind.title(),
            pretty_print_stat(stat.today(kind)),
            pretty_print_stat(stat.total(kind)),
        );
    }
    Ok(())
}

fn cmd_countries(client: &Client) -> Result<()> {
    let countries = client.fetch_country_list()?;
    for opt in transform::to_option_list(&countries) {
        println!("{}\t{}", opt.value, opt.name);
    }
    Ok(())
}

fn cmd_table(client: &Client, args: TableArgs, locale: &str) -> Result<()> {
    let countries = client.fetch_country_list()?;
    let sorted = transform::to_sorted_list(&countries);

    let shown = args.limit.unwrap_or(sorted.len()).min(sorted.len());
    for c in &sorted[..shown] {
        println!("{:<32} {:>15}", c.name, format_count(c.cases, locale));
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&sorted, path)?,
            "json" => storage::save_json(&sorted, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", sorted.len(), path.display());
    }
    Ok(())
}

fn cmd_chart(client: &Client, args: ChartArgs) -> Result<()> {
    let kind = StatKind::from(args.kind);
    let timeline = client.fetch_historical(args.days)?;
    let points = transform::chart_series(&timeline, kind);
    viz::plot_series(&points, kind, &args.out, args.width, args.height)
        .with_context(|| format!("render {}", args.out.display()))?;
    eprintln!(
        "Worldwide new {}: {} days written to {}",
        kind,
        points.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_map(client: &Client, args: MapArgs) -> Result<()> {
    let kind = StatKind::from(args.kind);
    let countries = client.fetch_country_list()?;
    let mut circles = transform::map_circles(&countries, kind);
    circles.sort_by(|a, b| b.radius.total_cmp(&a.radius));
    let shown = args.limit.unwrap_or(circles.len()).min(circles.len());
    for c in &circles[..shown] {
        println!(
            "{:<32} {:>9.3} {:>10.3}  r={:.0}m  {}",
            c.name, c.center.lat, c.center.lng, c.radius, c.color
        );
    }
    Ok(())
}

fn cmd_dashboard(client: &Client, args: DashboardArgs, locale: &str) -> Result<()> {
    let mut view = Coordinator::new();
    if view.initialize(client) != Outcome::Applied {
        eprintln!("Initial load failed; showing an empty dashboard");
    }
    if let Some(code) = args.country.as_deref() {
        let scope = Scope::parse(code)?;
        if view.select_country(client, scope) != Outcome::Applied {
            eprintln!("Could not select {code}; keeping {}", view.state().selected_country);
        }
    }
    view.set_stat_kind(args.kind.into());
    let props = DashboardProps::from_state(view.state(), locale);
    println!("{}", serde_json::to_string_pretty(&props)?);
    Ok(())
}
