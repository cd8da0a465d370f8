//! Offline evaluation of data prefetch predictors.
//!
//! A recorded load trace is replayed through a [Prefetcher], producing a
//! trace of predicted addresses that can be compared against the real
//! access stream.

pub mod config;
pub mod error;
pub mod harness;
pub mod predictor;
pub mod record;
pub mod stats;
pub mod trace;

pub use config::*;
pub use error::*;
pub use harness::*;
pub use predictor::*;
pub use record::*;
pub use trace::*;
