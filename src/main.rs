use analytics::{
    analyze_concentration, compare_to_benchmarks, platform_distribution, return_rate,
    HealthScore, HealthScoreEngine,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{load_config, Config, ExportFormat};
use core_types::{flatten_crypto_holdings, flatten_holdings, PortfolioSnapshot};
use exporter::{default_filename, Exporter};
use risk::{RiskMonitor, ThresholdMonitor};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the AllFi portfolio analytics CLI.
fn main() -> anyhow::Result<()> {
    // Pick up ALLFI_* overrides from a .env file if one exists.
    dotenvy::dotenv().ok();

    // Logs go to stderr so `--json` output stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Score(args) => handle_score(args, &config),
        Commands::Concentration(args) => handle_concentration(args),
        Commands::Distribution(args) => handle_distribution(args, &config),
        Commands::Performance(args) => handle_performance(args),
        Commands::Alerts(args) => handle_alerts(args, &config),
        Commands::Export(args) => handle_export(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Health scoring, concentration analysis and exports for a multi-source crypto portfolio.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "allfi.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score portfolio health on cash buffer, concentration, platforms and volatility.
    Score(SnapshotArgs),
    /// Show the top assets by value and the HHI concentration index.
    Concentration(SnapshotArgs),
    /// Show how value is split across exchanges, wallets, manual assets, DeFi and NFTs.
    Distribution(SnapshotArgs),
    /// Compare the 24h change with BTC and ETH, and show the return over the value history.
    Performance(SnapshotArgs),
    /// List the risk alerts the current portfolio would trigger.
    Alerts(SnapshotArgs),
    /// Export holdings or transactions to a file.
    Export(ExportArgs),
}

#[derive(Parser)]
struct SnapshotArgs {
    /// Portfolio snapshot JSON as returned by the aggregation API.
    #[arg(long)]
    snapshot: PathBuf,

    /// Print the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ExportArgs {
    /// Portfolio snapshot JSON as returned by the aggregation API.
    #[arg(long)]
    snapshot: PathBuf,

    /// What to export. Defaults to `export.default_format` from the configuration.
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Output directory. Defaults to `export.output_dir` from the configuration.
    #[arg(long)]
    out: Option<PathBuf>,

    /// File name without extension (default: allfi-export-YYYY-MM-DD).
    #[arg(long)]
    name: Option<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn read_snapshot(path: &PathBuf) -> anyhow::Result<PortfolioSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = PortfolioSnapshot::from_json(&raw)?;
    tracing::info!(
        cex = snapshot.cex_accounts.len(),
        wallets = snapshot.wallet_addresses.len(),
        manual = snapshot.manual_assets.len(),
        "Loaded portfolio snapshot."
    );
    Ok(snapshot)
}

fn compute_health(snapshot: &PortfolioSnapshot, config: &Config) -> anyhow::Result<HealthScore> {
    let engine = HealthScoreEngine::new(config.scoring.clone())?;
    let holdings = flatten_holdings(snapshot, &config.currency_rates);
    Ok(engine.calculate(&holdings))
}

fn pct(ratio_0_to_100: Decimal) -> String {
    format!("{}%", ratio_0_to_100.round_dp(2))
}

fn handle_score(args: SnapshotArgs, config: &Config) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let score = compute_health(&snapshot, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Dimension", "Score", "Measured", "Suggestion"]);
    for d in &score.dimensions {
        let measured = match d.id {
            analytics::DimensionId::Platform => d.metric.to_string(),
            _ => pct(d.metric * Decimal::ONE_HUNDRED),
        };
        table.add_row(vec![
            d.id.label().to_string(),
            format!("{}/{}", d.score, d.max_score),
            measured,
            d.suggestion.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
    println!("Total: {}/100 ({})", score.total, score.grade);
    if let Some(weakest) = score.weakest {
        println!("Weakest dimension: {weakest}");
    }
    for line in &score.advice {
        println!("- {line}");
    }
    Ok(())
}

fn handle_concentration(args: SnapshotArgs) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let report = analyze_concentration(&flatten_crypto_holdings(&snapshot));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Asset", "Value (USD)", "Share"]);
    for entry in &report.entries {
        table.add_row(vec![
            entry.symbol.clone(),
            entry.value.round_dp(2).to_string(),
            pct(entry.percentage),
        ]);
    }

    println!("{table}");
    println!("HHI: {}", report.hhi);
    Ok(())
}

fn handle_distribution(args: SnapshotArgs, config: &Config) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let distribution = platform_distribution(&snapshot, &config.currency_rates);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&distribution)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Value (USD)", "Share"]);
    for share in &distribution.categories {
        table.add_row(vec![
            share.category.label().to_string(),
            share.value.round_dp(2).to_string(),
            pct(share.percentage),
        ]);
    }

    println!("{table}");
    println!("Total: {} USD", distribution.total.round_dp(2));
    Ok(())
}

fn handle_performance(args: SnapshotArgs) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let comparison = compare_to_benchmarks(&snapshot);
    let returns = return_rate(&snapshot.history);

    if args.json {
        let report = serde_json::json!({
            "benchmark": comparison,
            "returnRate": returns,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Benchmark", "24h Change", "Portfolio vs. Benchmark"]);
    table.add_row(vec![
        "Portfolio".to_string(),
        pct(comparison.my_change),
        String::new(),
    ]);
    for (name, delta) in [("BTC", comparison.btc), ("ETH", comparison.eth)] {
        table.add_row(vec![name.to_string(), pct(delta.change), pct(delta.diff)]);
    }

    println!("{table}");
    println!(
        "Return: {} total, {} annualized ({} history points)",
        pct(returns.total_return),
        pct(returns.annualized_return),
        snapshot.history.len()
    );
    Ok(())
}

fn handle_alerts(args: SnapshotArgs, config: &Config) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let score = compute_health(&snapshot, config)?;
    let monitor = ThresholdMonitor::new(&config.alerts)?;
    let alerts = monitor.evaluate(&score);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!(
            "No risk alerts (score {} vs threshold {}).",
            score.total,
            monitor.threshold()
        );
        return Ok(());
    }
    for alert in &alerts {
        println!("[{}] {}", alert.title, alert.message);
    }
    Ok(())
}

fn handle_export(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let format = args.format.unwrap_or(config.export.default_format);
    let stem = args
        .name
        .unwrap_or_else(|| default_filename(chrono::Utc::now().date_naive()));

    let mut exporter = Exporter::new(&config.export, config.currency_rates.clone());
    if let Some(dir) = args.out {
        exporter = exporter.with_output_dir(dir);
    }

    let path = exporter.export(&snapshot, format, &stem)?;
    println!("Exported to {}", path.display());
    Ok(())
}
