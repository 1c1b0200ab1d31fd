//! Cloud signals and the position state machine.

pub mod decision;
pub mod engine;

pub use decision::*;
pub use engine::*;
