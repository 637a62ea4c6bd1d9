use analyzer::{Dashboard, DashboardView, TierOutcome};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use configuration::{load_config, LoggingSettings, LowerBoundPolicy, MalformedRowPolicy, Settings};
use core_types::RankField;
use dataset::{export_products, load_products, DatasetError};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the Margin Monitor application.
fn main() -> Result<()> {
    // Optional .env with MARGIN__* overrides
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut settings);

    let _guard = init_tracing(&settings.logging)?;

    run(cli, settings)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Profitability monitor for a product cost / price / margin table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: config.toml, optional).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Product table to analyze, overriding `source.path`.
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// What to do with rows whose numbers cannot be parsed.
    #[arg(long, global = true, value_enum)]
    on_malformed: Option<MalformedRowPolicy>,

    /// Default lower margin bound when --min-margin is omitted.
    #[arg(long, global = true, value_enum)]
    lower_bound: Option<LowerBoundPolicy>,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(path) = &self.source {
            settings.source.path = path.clone();
        }
        if let Some(policy) = self.on_malformed {
            settings.source.on_malformed = policy;
        }
        if let Some(policy) = self.lower_bound {
            settings.filters.lower_bound = policy;
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Lowest margin percentage to keep (inclusive).
    #[arg(long, global = true, allow_negative_numbers = true)]
    min_margin: Option<Decimal>,

    /// Highest margin percentage to keep (inclusive).
    #[arg(long, global = true, allow_negative_numbers = true)]
    max_margin: Option<Decimal>,

    /// Case-insensitive text to look for in product descriptions (e.g. "Salamin").
    #[arg(long, global = true)]
    search: Option<String>,

    /// Only products of this department; "all" disables the filter.
    #[arg(long, global = true)]
    department: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the KPI summary of the filtered products.
    Summary,
    /// List the filtered products with their margin category and price tier.
    Products(ProductsArgs),
    /// Rank the filtered products by a numeric column.
    Top(TopArgs),
    /// Show per-department statistics.
    Departments(DepartmentsArgs),
    /// Split the filtered products into price terciles.
    Tiers,
    /// Project the extra revenue of a uniform price increase.
    Simulate(SimulateArgs),
    /// Write the filtered (or critical) products to a CSV file.
    Export(ExportArgs),
    /// Print the complete dashboard view as JSON.
    Report,
}

#[derive(Parser)]
struct ProductsArgs {
    /// Maximum number of rows to print.
    #[arg(long, short)]
    limit: Option<usize>,
}

#[derive(Parser)]
struct TopArgs {
    /// Column to rank by.
    #[arg(long, value_enum, default_value_t = RankBy::Margin)]
    by: RankBy,

    /// Number of products to show (default: ranking.top_products).
    #[arg(long, short)]
    limit: Option<usize>,
}

#[derive(Parser)]
struct DepartmentsArgs {
    /// Ordering of the department table.
    #[arg(long, value_enum, default_value_t = DepartmentOrder::Median)]
    by: DepartmentOrder,

    /// Number of departments to show (default: from configuration).
    #[arg(long, short)]
    limit: Option<usize>,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Price increase in percent (default: simulator.default_pct).
    #[arg(long, allow_negative_numbers = true)]
    pct: Option<Decimal>,
}

#[derive(Parser)]
struct ExportArgs {
    /// Output file (default: export.filtered_path or export.critical_path).
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Export only products below the critical margin.
    #[arg(long)]
    critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RankBy {
    Cost,
    Price,
    Profit,
    Margin,
}

impl From<RankBy> for RankField {
    fn from(by: RankBy) -> Self {
        match by {
            RankBy::Cost => RankField::Cost,
            RankBy::Price => RankField::Price,
            RankBy::Profit => RankField::Profit,
            RankBy::Margin => RankField::Margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DepartmentOrder {
    /// Highest median margin first.
    Median,
    /// Most products first, with the margin spread of each.
    Count,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` wins over `logging.level`.
///
/// The returned guard must be held until exit so buffered file logs flush.
fn init_tracing(logging: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?;

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::never(directory, &logging.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn run(cli: Cli, settings: Settings) -> Result<()> {
    let outcome = match load_products(&settings.source.path, &settings.source) {
        Ok(outcome) => outcome,
        Err(DatasetError::SourceNotFound(path)) => {
            anyhow::bail!(
                "Cannot find the product table '{}'. Check that the file exists, \
                 or point to it with --source or `source.path` in config.toml.",
                path.display()
            );
        }
        Err(e) => return Err(e).context("Failed to load the product table"),
    };
    if !outcome.skipped.is_empty() {
        warn!(skipped = outcome.skipped.len(), "Some rows were skipped as malformed.");
    }
    let loaded = outcome.products;

    let mut dashboard = Dashboard::new(&settings);
    if let Commands::Simulate(SimulateArgs { pct: Some(pct) }) = &cli.command {
        dashboard = dashboard.with_increase_pct(*pct);
    }

    let filters = cli.filters;
    let criteria = dashboard.criteria(
        &loaded,
        filters.min_margin,
        filters.max_margin,
        filters.search,
        filters.department.as_deref(),
    )?;
    let view = dashboard.build(&loaded, &criteria);

    match cli.command {
        Commands::Summary => handle_summary(&view, &settings),
        Commands::Products(args) => handle_products(&view, &settings, args),
        Commands::Top(args) => handle_top(&view, &settings, args),
        Commands::Departments(args) => handle_departments(&view, &settings, &loaded, args),
        Commands::Tiers => handle_tiers(&view, &settings),
        Commands::Simulate(_) => handle_simulate(&view),
        Commands::Export(args) => handle_export(&view, &settings, args)?,
        Commands::Report => println!("{}", serde_json::to_string_pretty(&view)?),
    }

    Ok(())
}

fn handle_summary(view: &DashboardView, settings: &Settings) {
    if let Some(observed) = view.observed_margin {
        println!(
            "Margin range in data: {} to {}",
            render::percent(observed.lo()),
            render::percent(observed.hi())
        );
    }
    println!("{}", render::summary_table(&view.summary, &settings.labels));
}

fn handle_products(view: &DashboardView, settings: &Settings, args: ProductsArgs) {
    let limit = args.limit.unwrap_or(view.products.len());
    let shown = &view.products[..limit.min(view.products.len())];
    println!("{}", render::products_table(shown, &settings.labels));
    println!("Showing {} of {} filtered products.", shown.len(), view.products.len());
}

fn handle_top(view: &DashboardView, settings: &Settings, args: TopArgs) {
    let limit = args.limit.unwrap_or(settings.ranking.top_products);
    let ranked = analyzer::top_n(&view.filtered_products(), args.by.into(), limit);
    println!("{}", render::ranking_table(&ranked));
}

fn handle_departments(
    view: &DashboardView,
    settings: &Settings,
    loaded: &[core_types::Product],
    args: DepartmentsArgs,
) {
    if view.departments.is_empty() {
        println!(
            "No department has at least {} products in the current selection ({} of {} loaded).",
            settings.departments.min_group_size,
            view.summary.count,
            loaded.len()
        );
        return;
    }

    match args.by {
        DepartmentOrder::Median => {
            let limit = args.limit.unwrap_or(settings.departments.chart_limit);
            let shown = &view.departments[..limit.min(view.departments.len())];
            println!("{}", render::departments_table(shown));
        }
        DepartmentOrder::Count => {
            let table = analyzer::DepartmentTable::build(
                &view.filtered_products(),
                &settings.departments,
            );
            let limit = args.limit.unwrap_or(settings.departments.dispersion_limit);
            println!("{}", render::departments_table(&table.top_by_count(limit)));
            println!("{}", render::dispersion_table(&table.dispersion(limit)));
        }
    }
}

fn handle_tiers(view: &DashboardView, settings: &Settings) {
    match &view.price_tiers {
        TierOutcome::Partitioned(partition) => {
            println!("{}", render::tiers_table(partition, &settings.labels));
        }
        TierOutcome::Unavailable { reason } => {
            println!("Price tiers are not available for this selection: {reason}");
        }
    }
}

fn handle_simulate(view: &DashboardView) {
    println!("{}", render::revenue_table(&view.revenue));
    println!(
        "Assumes one unit sold per product ({} products) and unchanged demand.",
        view.summary.count
    );
}

fn handle_export(view: &DashboardView, settings: &Settings, args: ExportArgs) -> Result<()> {
    let (products, default_path) = if args.critical {
        (view.critical_products.clone(), &settings.export.critical_path)
    } else {
        (view.filtered_products(), &settings.export.filtered_path)
    };
    let path = args.output.unwrap_or_else(|| default_path.clone());

    export_products(&path, &products, &settings.source, &settings.export)
        .with_context(|| format!("Failed to export to '{}'", path.display()))?;
    info!(path = %path.display(), rows = products.len(), "Export finished.");
    println!("Wrote {} products to {}", products.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn filters_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "margin-monitor",
            "summary",
            "--min-margin",
            "-5",
            "--max-margin",
            "40.5",
            "--search",
            "queso",
            "--department",
            "all",
        ])
        .unwrap();
        assert_eq!(cli.filters.min_margin, Some(dec!(-5)));
        assert_eq!(cli.filters.max_margin, Some(dec!(40.5)));
        assert_eq!(cli.filters.search.as_deref(), Some("queso"));
        assert!(matches!(cli.command, Commands::Summary));
    }

    #[test]
    fn overrides_replace_configured_values() {
        let cli = Cli::try_parse_from([
            "margin-monitor",
            "--source",
            "other.csv",
            "--on-malformed",
            "fail",
            "--lower-bound",
            "zero",
            "report",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings.source.path, PathBuf::from("other.csv"));
        assert_eq!(settings.source.on_malformed, MalformedRowPolicy::Fail);
        assert_eq!(settings.filters.lower_bound, LowerBoundPolicy::Zero);
    }

    #[test]
    fn subcommand_arguments() {
        let cli = Cli::try_parse_from(["margin-monitor", "top", "--by", "profit", "-l", "3"]).unwrap();
        let Commands::Top(args) = cli.command else {
            panic!("expected top");
        };
        assert_eq!(RankField::from(args.by), RankField::Profit);
        assert_eq!(args.limit, Some(3));

        let cli = Cli::try_parse_from(["margin-monitor", "simulate", "--pct", "12.5"]).unwrap();
        assert!(matches!(cli.command, Commands::Simulate(SimulateArgs { pct: Some(p) }) if p == dec!(12.5)));

        let cli = Cli::try_parse_from(["margin-monitor", "export", "--critical"]).unwrap();
        assert!(matches!(cli.command, Commands::Export(ExportArgs { critical: true, output: None })));
    }
}
