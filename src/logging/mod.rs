//! Logging initialization with environment-based formatters
//!
//! Production (`ENVIRONMENT=production|prod`) gets JSON lines with target,
//! file and line for log aggregation. Anything else gets colored,
//! human-readable output. `RUST_LOG` overrides the default `info` filter.

use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::get_environment;

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// The HTTP service logs to stdout.
    Stdout,
    /// The offline runner keeps stdout for its report.
    Stderr,
}

pub fn is_production(env: &str) -> bool {
    matches!(env, "production" | "prod")
}

/// Install the global subscriber for the HTTP service.
pub fn init_logging() {
    init_logging_to(LogOutput::Stdout);
}

pub fn init_logging_to(output: LogOutput) {
    let json = is_production(&get_environment());
    match output {
        LogOutput::Stdout => install(json, std::io::stdout),
        LogOutput::Stderr => install(json, std::io::stderr),
    }
}

fn install<W>(json: bool, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(writer),
            )
            .init();
    }
}
