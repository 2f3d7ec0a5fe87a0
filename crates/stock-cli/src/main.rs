//! Command-line interface for stock-rs

mod output;
mod snapshot;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use snapshot::SnapshotRepository;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use stock_analysis::{AnalysisConfig, AnalysisService, CachedRepository, StrategyParams};
use stock_core::Market;
use stock_monitor::{MonitorScheduler, SchedulerConfig};
use stock_utils::AppConfig;
use tracing::info;

type Service = AnalysisService<CachedRepository<SnapshotRepository>>;

#[derive(Parser, Debug)]
#[command(name = "stock-cli")]
#[command(version, about = "Technical and fundamental stock analysis over a data snapshot", long_about = None)]
struct Cli {
    /// JSON snapshot with stocks, bars, statements and the watch-list
    #[arg(long, global = true, default_value = "snapshot.json")]
    data: PathBuf,

    /// Print JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Technical report for one symbol
    Technical { symbol: String },
    /// Fundamental report for one symbol
    Fundamental { symbol: String },
    /// Run one alert scan over the watch-list
    Alerts,
    /// Screen the watch-list with a strategy
    Screen {
        /// Strategy id (see `strategies`)
        strategy: String,
        #[arg(long, value_enum, default_value_t = MarketArg::AShare)]
        market: MarketArg,
        /// Parameter override, e.g. `--param max_pe=12`
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,
    },
    /// List the built-in strategies
    Strategies,
    /// Scan alerts periodically until Ctrl-C
    Monitor {
        /// Seconds between scans
        #[arg(long, default_value_t = 900)]
        interval_secs: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MarketArg {
    AShare,
    HongKong,
    Us,
}

impl From<MarketArg> for Market {
    fn from(arg: MarketArg) -> Self {
        match arg {
            MarketArg::AShare => Market::AShare,
            MarketArg::HongKong => Market::HongKong,
            MarketArg::Us => Market::Us,
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid value for {key}: {err}"))?;
    Ok((key.trim().to_string(), value))
}

async fn build_service(data: &Path, config: AnalysisConfig) -> anyhow::Result<Service> {
    let repo = SnapshotRepository::load(data)
        .await
        .with_context(|| format!("failed to load snapshot {}", data.display()))?;
    let repo = CachedRepository::from_config(repo, &config);
    Ok(AnalysisService::new(Arc::new(repo), config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = AppConfig::from_env()?;
    stock_utils::init_tracing_with(app.log_format);

    let cli = Cli::parse();
    let config = AnalysisConfig::default().with_env_overrides()?;
    info!(app = %app.app_name, environment = %app.environment, "Starting stock-cli");

    if let Command::Strategies = cli.command {
        let service = AnalysisService::new(Arc::new(SnapshotRepository::new(Default::default())), config);
        let strategies = service.screener().registry().all();
        return if cli.json {
            output::print_json(&strategies)
        } else {
            println!("{}", output::strategies_table(strategies));
            Ok(())
        };
    }

    let service = build_service(&cli.data, config).await?;

    match cli.command {
        Command::Technical { symbol } => {
            let report = service.technical(&symbol).await?;
            if cli.json {
                output::print_json(&report)?;
            } else {
                println!("{}", output::technical_table(&report));
            }
        }
        Command::Fundamental { symbol } => {
            let report = service.fundamental(&symbol).await?;
            if cli.json {
                output::print_json(&report)?;
            } else {
                println!("{}", output::fundamental_table(&report));
            }
        }
        Command::Alerts => {
            let report = service.scan_alerts().await?;
            if cli.json {
                output::print_json(&report)?;
            } else {
                println!("{}", output::alerts_table(&report));
                output::print_failures(&report);
            }
        }
        Command::Screen { strategy, market, params } => {
            let overrides: StrategyParams = params.into_iter().collect();
            let report = service.screen(&strategy, &overrides, market.into()).await?;
            if cli.json {
                output::print_json(&report)?;
            } else {
                println!("{}", output::screen_table(&report));
                output::print_failures(&report);
            }
        }
        Command::Monitor { interval_secs } => {
            let scheduler_config = SchedulerConfig {
                scan_interval: Duration::from_secs(interval_secs),
                ..SchedulerConfig::default()
            };
            let mut scheduler = MonitorScheduler::new(service, scheduler_config)?;
            scheduler.start()?;

            tokio::signal::ctrl_c().await?;
            scheduler.stop().await?;

            let stats = scheduler.stats().await;
            if cli.json {
                output::print_json(&stats)?;
            } else {
                println!(
                    "{} scans, {} alerts, {} failed scans",
                    stats.scans, stats.alerts, stats.failed_scans
                );
            }
        }
        Command::Strategies => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("max_pe=12").unwrap(), ("max_pe".to_string(), 12.0));
        assert_eq!(parse_param(" ma_period = 20 ").unwrap(), ("ma_period".to_string(), 20.0));
        assert!(parse_param("max_pe").is_err());
        assert!(parse_param("max_pe=cheap").is_err());
    }

    #[test]
    fn test_cli_parses_screen() {
        let cli = Cli::try_parse_from([
            "stock-cli", "--data", "data.json", "screen", "low_pe", "--market", "us", "--param", "max_pe=10",
        ])
        .unwrap();

        match cli.command {
            Command::Screen { strategy, market, params } => {
                assert_eq!(strategy, "low_pe");
                assert_eq!(Market::from(market), Market::Us);
                assert_eq!(params, vec![("max_pe".to_string(), 10.0)]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_market_value_names() {
        let cli = Cli::try_parse_from(["stock-cli", "screen", "value", "--market", "hong-kong"]).unwrap();
        assert!(matches!(cli.command, Command::Screen { market: MarketArg::HongKong, .. }));
    }
}
