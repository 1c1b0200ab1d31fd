//! Delta Exchange candle history over REST.

pub mod client;
pub mod messages;

pub use client::*;
pub use messages::*;
