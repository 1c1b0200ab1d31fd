//! Renko + Ichimoku backtest service.
//!
//! Price bars are turned into fixed-size bricks, a Donchian-midpoint cloud is
//! computed over the brick closes, and a long/flat/short state machine walks
//! the bricks producing a trade ledger and a per-brick decision log.

pub mod backtest;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
