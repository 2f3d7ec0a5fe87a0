//! Background monitoring for stock-rs
//!
//! [`MonitorScheduler`] runs the watch-list alert scan on a fixed interval,
//! wrapping each scan in a [`RetryPolicy`] so transient repository outages do
//! not cost a whole cycle.

pub mod error;
pub mod retry;
pub mod scheduler;

pub use error::{MonitorError, Result};
pub use retry::RetryPolicy;
pub use scheduler::{MonitorScheduler, ScanStats, SchedulerConfig};
