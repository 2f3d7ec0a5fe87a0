//! Interval-driven alert scanning

use crate::error::{MonitorError, Result};
use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use stock_analysis::{AnalysisService, BatchReport};
use stock_core::{AlertEvent, Repository};
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Time between alert scans
    pub scan_interval: Duration,

    /// Retry policy wrapped around each scan
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(15 * 60),
            retry: RetryPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scan_interval.is_zero() {
            return Err(MonitorError::Config("scan_interval must be greater than 0".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(MonitorError::Config("retry.max_attempts must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Running totals across scans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    pub scans: u64,
    /// Scans that failed after all retries
    pub failed_scans: u64,
    pub alerts: u64,
    /// Per-symbol failures inside otherwise successful scans
    pub symbol_failures: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl ScanStats {
    fn record(&mut self, outcome: &Result<BatchReport<AlertEvent>>, at: DateTime<Utc>) {
        self.scans += 1;
        self.last_scan_at = Some(at);
        match outcome {
            Ok(report) => {
                self.alerts += report.succeeded.len() as u64;
                self.symbol_failures += report.failures.len() as u64;
            }
            Err(_) => self.failed_scans += 1,
        }
    }
}

struct Running {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs the watch-list alert scan every `scan_interval`
///
/// The first scan runs as soon as the scheduler starts. A scan that is still
/// running when the next tick is due delays that tick instead of overlapping.
pub struct MonitorScheduler<R: Repository + ?Sized + 'static> {
    service: AnalysisService<R>,
    config: SchedulerConfig,
    stats: Arc<RwLock<ScanStats>>,
    running: Option<Running>,
}

impl<R: Repository + ?Sized + 'static> MonitorScheduler<R> {
    pub fn new(service: AnalysisService<R>, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            service,
            config,
            stats: Arc::new(RwLock::new(ScanStats::default())),
            running: None,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|running| !running.handle.is_finished())
    }

    /// Snapshot of the totals so far
    pub async fn stats(&self) -> ScanStats {
        self.stats.read().await.clone()
    }

    /// Run one scan now, with retries, outside the schedule
    pub async fn run_once(&self) -> Result<BatchReport<AlertEvent>> {
        scan(&self.service, &self.config.retry, &self.stats).await
    }

    /// Spawn the scan loop on the current tokio runtime
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            warn!("Scheduler is already running");
            return Err(MonitorError::AlreadyRunning);
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let service = self.service.clone();
        let retry = self.config.retry.clone();
        let stats = Arc::clone(&self.stats);
        let period = self.config.scan_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Errors are already logged and counted
                        let _ = scan(&service, &retry, &stats).await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Scan loop exited");
        });

        self.running = Some(Running { stop_tx, handle });
        info!(interval = ?period, "Monitor scheduler started");
        Ok(())
    }

    /// Signal the loop to stop and wait for an in-flight scan to finish
    pub async fn stop(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            warn!("Scheduler is not running");
            return Err(MonitorError::NotRunning);
        };

        // The loop may already have exited; a closed channel is fine
        let _ = running.stop_tx.send(true);
        running
            .handle
            .await
            .map_err(|err| MonitorError::Task(err.to_string()))?;

        info!("Monitor scheduler stopped");
        Ok(())
    }
}

impl<R: Repository + ?Sized + 'static> Drop for MonitorScheduler<R> {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.handle.abort();
        }
    }
}

async fn scan<R: Repository + ?Sized>(
    service: &AnalysisService<R>,
    retry: &RetryPolicy,
    stats: &RwLock<ScanStats>,
) -> Result<BatchReport<AlertEvent>> {
    let outcome = retry
        .execute("alert_scan", || service.scan_alerts())
        .await
        .map_err(MonitorError::from);

    match &outcome {
        Ok(report) if report.succeeded.is_empty() => debug!("No alerts triggered"),
        Ok(report) => info!(alerts = report.succeeded.len(), "Generated alerts"),
        Err(err) => error!(error = %err, "Alert scan failed"),
    }

    stats.write().await.record(&outcome, Utc::now());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stock_analysis::AnalysisConfig;
    use stock_core::{FinancialStatement, PriceBar, StockInfo, WatchlistEntry};

    mock! {
        pub Repo {}

        #[async_trait]
        impl Repository for Repo {
            async fn fetch_price_bars(&self, symbol: &str, lookback_days: u32) -> stock_core::Result<Vec<PriceBar>>;
            async fn fetch_statements(&self, symbol: &str, years: u32) -> stock_core::Result<Vec<FinancialStatement>>;
            async fn fetch_stock_info(&self, symbol: &str) -> stock_core::Result<Option<StockInfo>>;
            async fn fetch_watchlist(&self) -> stock_core::Result<Vec<WatchlistEntry>>;
            async fn persist_alert(&self, alert: &AlertEvent) -> stock_core::Result<()>;
        }
    }

    fn fast_config(scan_interval: Duration) -> SchedulerConfig {
        SchedulerConfig {
            scan_interval,
            retry: RetryPolicy::fast(),
        }
    }

    fn scheduler(repo: MockRepo, config: SchedulerConfig) -> MonitorScheduler<MockRepo> {
        let service = AnalysisService::new(Arc::new(repo), AnalysisConfig::default());
        MonitorScheduler::new(service, config).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.scan_interval, Duration::from_secs(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = fast_config(Duration::ZERO);
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_once_retries_transient_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut repo = MockRepo::new();
        repo.expect_fetch_watchlist().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(stock_core::Error::Unavailable("db restarting".to_string()))
            } else {
                Ok(Vec::new())
            }
        });

        let scheduler = scheduler(repo, fast_config(Duration::from_secs(60)));
        let report = scheduler.run_once().await.unwrap();

        assert!(report.succeeded.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let stats = scheduler.stats().await;
        assert_eq!(stats.scans, 1);
        assert_eq!(stats.failed_scans, 0);
        assert!(stats.last_scan_at.is_some());
    }

    #[tokio::test]
    async fn test_run_once_counts_failed_scan() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_watchlist()
            .times(1)
            .returning(|| Err(stock_core::Error::Repository("corrupt table".to_string())));

        let scheduler = scheduler(repo, fast_config(Duration::from_secs(60)));
        assert!(scheduler.run_once().await.is_err());
        assert_eq!(scheduler.stats().await.failed_scans, 1);
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_watchlist().returning(|| Ok(Vec::new()));

        let mut scheduler = scheduler(repo, fast_config(Duration::from_millis(10)));
        scheduler.start().unwrap();
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());

        // First tick fires immediately
        assert!(scheduler.stats().await.scans >= 1);
    }

    #[tokio::test]
    async fn test_double_start_refused() {
        let mut repo = MockRepo::new();
        repo.expect_fetch_watchlist().returning(|| Ok(Vec::new()));

        let mut scheduler = scheduler(repo, fast_config(Duration::from_secs(60)));
        scheduler.start().unwrap();
        assert!(matches!(scheduler.start(), Err(MonitorError::AlreadyRunning)));
        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_when_idle() {
        let mut scheduler = scheduler(MockRepo::new(), fast_config(Duration::from_secs(60)));
        assert!(matches!(scheduler.stop().await, Err(MonitorError::NotRunning)));
    }
}
