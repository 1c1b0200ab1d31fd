//! Service surfaces

pub mod http;

pub use http::*;
