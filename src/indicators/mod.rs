//! Brick construction and the rolling-window indicators computed over bricks.

pub mod ichimoku;
pub mod renko;

pub use ichimoku::*;
pub use renko::*;
