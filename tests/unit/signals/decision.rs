//! Unit tests for per-brick cloud predicates

use brickcloud::indicators::IchimokuParams;
use brickcloud::models::Action;
use brickcloud::signals::decision::{
    insufficient_history_reason, CloudSignals, NO_ENTRY_INSIDE_CLOUD, NO_ENTRY_LONG_LEVELS,
};

#[test]
fn above_everything_is_a_long_entry() {
    let s = CloudSignals::evaluate(110.0, 100.0, 105.0, 95.0);
    assert!(s.long_entry);
    assert!(!s.long_exit);
    assert!(!s.short_entry);
    assert!(s.short_exit);
    assert!(!s.inside_cloud);
}

#[test]
fn below_everything_is_a_short_entry() {
    let s = CloudSignals::evaluate(90.0, 100.0, 105.0, 95.0);
    assert!(s.short_entry);
    assert!(!s.short_exit);
    assert!(!s.long_entry);
    assert!(s.long_exit);
}

#[test]
fn inside_cloud_blocks_both_entries() {
    let s = CloudSignals::evaluate(100.0, 120.0, 105.0, 95.0);
    assert!(s.inside_cloud);
    assert!(!s.long_entry);
    assert!(!s.short_entry);
    assert_eq!(s.no_entry_reason(), NO_ENTRY_INSIDE_CLOUD);
}

#[test]
fn touching_a_level_is_not_crossing_it() {
    let s = CloudSignals::evaluate(105.0, 100.0, 105.0, 95.0);
    assert!(!s.long_entry);
    assert!(!s.long_exit);
    assert!(!s.inside_cloud);
    assert_eq!(s.no_entry_reason(), NO_ENTRY_LONG_LEVELS);
}

#[test]
fn above_cloud_but_below_kijun_is_not_an_entry() {
    let s = CloudSignals::evaluate(110.0, 115.0, 105.0, 95.0);
    assert!(!s.long_entry);
    assert!(s.long_exit);
    assert_eq!(s.no_entry_reason(), NO_ENTRY_LONG_LEVELS);
}

#[test]
fn history_reason_names_missing_lines() {
    let params = IchimokuParams::default();
    assert_eq!(
        insufficient_history_reason(true, true, &params, 3),
        "Not enough history for Ichimoku -> kijun: need 26, have 3; span_b (or span_a): need 52, have 3"
    );
    assert_eq!(
        insufficient_history_reason(false, true, &params, 30),
        "Not enough history for Ichimoku -> span_b (or span_a): need 52, have 30"
    );
    assert_eq!(
        insufficient_history_reason(true, false, &params, 1),
        "Not enough history for Ichimoku -> kijun: need 26, have 1"
    );
}

#[test]
fn history_reason_quotes_the_span_b_window() {
    let params = IchimokuParams {
        tenkan: 5,
        kijun: 60,
        span_b: 52,
        displacement: 26,
    };
    assert_eq!(
        insufficient_history_reason(false, true, &params, 40),
        "Not enough history for Ichimoku -> span_b (or span_a): need 52, have 40"
    );
}

#[test]
fn recorded_flags_follow_the_action() {
    let long = CloudSignals::evaluate(110.0, 100.0, 105.0, 95.0);
    let recorded = long.recorded_for(Action::EnterLong);
    assert!(recorded.long_entry);
    assert!(!recorded.short_exit);

    let recorded = long.recorded_for(Action::NoTrade);
    assert!(recorded.long_entry && !recorded.short_exit && !recorded.long_exit);

    let short = CloudSignals::evaluate(90.0, 100.0, 105.0, 95.0);
    let recorded = short.recorded_for(Action::ExitLong);
    assert!(recorded.long_exit);
    assert!(!recorded.short_entry);

    for action in [Action::HoldLong, Action::HoldShort, Action::Skip] {
        let recorded = short.recorded_for(action);
        assert!(!recorded.long_entry && !recorded.long_exit);
        assert!(!recorded.short_entry && !recorded.short_exit);
    }
    assert_eq!(short.recorded_for(Action::EnterShort).no_entry_reason(), short.no_entry_reason());
}
