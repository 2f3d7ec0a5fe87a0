//! Stateless technical indicators
//!
//! Every function takes an ordered series (oldest first) and returns the
//! indicator value for the *last* bar only. Nothing here keeps state between
//! calls, allocates beyond the input size, or performs I/O.
//!
//! - [`macd`]: DIF/DEA/histogram with the conjunctive golden-cross predicate
//! - [`rsi`]: relative strength over a simple rolling mean of gains and losses
//! - [`kdj`]: stochastic K/D/J with a flat-window RSV fallback of 50
//! - [`moving_averages`]: simple moving averages for several periods at once
//! - [`bollinger`]: middle band ± k population standard deviations
//! - [`atr`]: rolling mean of the true range
//!
//! # Example
//!
//! ```
//! use stock_indicators::{MacdParams, macd, rsi};
//!
//! let closes: Vec<f64> = (0..40).map(|i| 100.0 + f64::from(i)).collect();
//! let m = macd(&closes, MacdParams::default()).unwrap();
//! assert!(m.dif > 0.0);
//! assert!(rsi(&closes, 14).unwrap() > 70.0);
//! ```

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod error;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod window;

pub use atr::{atr, true_range};
pub use bollinger::{Bollinger, BollingerParams, bollinger};
pub use ema::ema_series;
pub use error::{IndicatorError, Result};
pub use kdj::{Kdj, KdjParams, kdj};
pub use ma::{moving_averages, sma};
pub use macd::{Macd, MacdParams, macd};
pub use rsi::rsi;
