//! Offline runner: backtest a CSV of bars without touching the network.
//!
//! Usage: `brickcloud <bars.csv> [overrides.json] [output_dir]`
//!
//! The bars file needs a `time,open,high,low,close[,volume]` header. The
//! optional JSON file is overlaid on the default configuration the same way
//! an HTTP request body is. The four CSV reports are written to `output_dir`
//! (default: the current directory) and the summary is printed to stdout as
//! JSON. Logs go to stderr.

use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

use brickcloud::backtest;
use brickcloud::config::BacktestConfig;
use brickcloud::export::{self, CsvKind};
use brickcloud::logging::{self, LogOutput};
use dotenvy::dotenv;
use serde_json::Value;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging_to(LogOutput::Stderr);

    let mut args = env::args().skip(1);
    let bars_path = args
        .next()
        .ok_or("usage: brickcloud <bars.csv> [overrides.json] [output_dir]")?;
    let overrides = match args.next() {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Value::Null,
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    let config = BacktestConfig::default().overlay(&overrides)?;
    config.validate_strategy()?;

    let bars = export::read_bars(File::open(&bars_path)?)?;
    info!(path = %bars_path, bars = bars.len(), "loaded bars");

    let result = backtest::run(&bars, &config);

    fs::create_dir_all(&output_dir)?;
    for kind in CsvKind::ALL {
        let path = output_dir.join(kind.filename(&config));
        fs::write(&path, kind.render(&result)?)?;
        info!(path = %path.display(), "wrote {}", kind.as_str());
    }

    println!("{}", serde_json::to_string_pretty(&result.summary)?);
    Ok(())
}
