//! Unit tests for the per-request backtest configuration

use brickcloud::config::BacktestConfig;
use brickcloud::error::ConfigError;
use brickcloud::models::SourcePrice;
use serde_json::json;

#[test]
fn defaults_are_valid() {
    let config = BacktestConfig::default();
    assert_eq!(config.symbol, "ETHUSDT");
    assert_eq!(config.resolution, "5m");
    assert_eq!(config.brick_size, 40.0);
    assert_eq!(config.reversal_size, 80.0);
    assert_eq!(config.source_type, SourcePrice::Ohlc4);
    assert_eq!((config.tenkan, config.kijun, config.span_b), (5, 26, 52));
    assert_eq!(config.displacement, 26);
    config.validate().unwrap();
}

#[test]
fn overlay_replaces_only_given_fields() {
    let base = BacktestConfig::default();
    let config = base
        .overlay(&json!({ "brick_size": 10, "symbol": "BTCUSD", "source_type": "HL2" }))
        .unwrap();

    assert_eq!(config.brick_size, 10.0);
    assert_eq!(config.symbol, "BTCUSD");
    assert_eq!(config.source_type, SourcePrice::Hl2);
    assert_eq!(config.reversal_size, base.reversal_size);
    assert_eq!(config.start_date, base.start_date);
}

#[test]
fn overlay_ignores_unknown_keys_and_null() {
    let base = BacktestConfig::default();
    assert_eq!(base.overlay(&json!({ "file_type": "all" })).unwrap(), base);
    assert_eq!(base.overlay(&serde_json::Value::Null).unwrap(), base);
}

#[test]
fn overlay_rejects_wrong_types() {
    let base = BacktestConfig::default();
    assert!(matches!(
        base.overlay(&json!({ "brick_size": "big" })),
        Err(ConfigError::Malformed(_))
    ));
    assert!(matches!(
        base.overlay(&json!({ "source_type": "median" })),
        Err(ConfigError::Malformed(_))
    ));
    assert!(matches!(
        base.overlay(&json!([1, 2, 3])),
        Err(ConfigError::Malformed(_))
    ));
}

#[test]
fn overlay_does_not_touch_the_base() {
    let base = BacktestConfig::default();
    let _ = base.overlay(&json!({ "brick_size": 1 })).unwrap();
    assert_eq!(base.brick_size, 40.0);
}

#[test]
fn non_positive_thresholds_fail_validation() {
    let mut config = BacktestConfig {
        brick_size: 0.0,
        ..BacktestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBrickSize(_))
    ));

    config.brick_size = 10.0;
    config.reversal_size = f64::NAN;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidReversalSize(_))
    ));
}

#[test]
fn zero_windows_fail_validation() {
    let config = BacktestConfig {
        kijun: 0,
        ..BacktestConfig::default()
    };
    assert!(matches!(
        config.validate_strategy(),
        Err(ConfigError::InvalidWindow { name: "kijun" })
    ));
}

#[test]
fn zero_displacement_is_allowed() {
    let config = BacktestConfig {
        displacement: 0,
        ..BacktestConfig::default()
    };
    config.validate().unwrap();
}

#[test]
fn inverted_range_fails_validation() {
    let config = BacktestConfig {
        start_date: "2023-08-03".to_string(),
        ..BacktestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyRange { .. })
    ));
}

#[test]
fn bad_resolution_fails_validation() {
    let config = BacktestConfig {
        resolution: "5w".to_string(),
        ..BacktestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidResolution(_))
    ));
}

#[test]
fn time_range_spans_the_requested_days() {
    let (start, end) = BacktestConfig::default().time_range().unwrap();
    assert_eq!(start, 1_690_828_200);
    assert_eq!(end - start, 2 * 86_400 - 1);
}

#[test]
fn production_environments_log_json() {
    use brickcloud::logging::is_production;
    assert!(is_production("production"));
    assert!(is_production("prod"));
    assert!(!is_production("sandbox"));
    assert!(!is_production("development"));
}
