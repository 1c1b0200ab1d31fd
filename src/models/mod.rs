//! Shared data models spanning the pipeline stages.

pub mod brick;
pub mod candle;
pub mod indicators;
pub mod trade;

pub use brick::Brick;
pub use candle::{PriceBar, SourcePrice};
pub use indicators::IchimokuLines;
pub use trade::{Action, Direction, LogEntry, PositionSide, Trade};
