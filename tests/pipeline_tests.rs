use horus_trader::config::IndicatorConfig;
use horus_trader::error::EvaluationError;
use horus_trader::indicator::engine;
use horus_trader::model::decision::TradeAction;
use horus_trader::model::series::{PricePoint, PriceSeries};
use horus_trader::risk;
use horus_trader::strategy::momentum;

/// Windows small enough that a few hundred synthetic samples warm
/// everything up, with the same ordering the production config uses.
fn test_params() -> IndicatorConfig {
    IndicatorConfig {
        short_window: 7,
        long_window: 40,
        atr_window: 20,
        vol_window: 50,
        range_window: 5,
    }
}

fn series(closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            timestamp: 900 * i as i64,
            close,
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

#[test]
/// A series shorter than the long-MA window cannot be evaluated at all.
fn short_history_is_rejected_before_any_signal() {
    let err = engine::annotate(&series(&vec![100.0; 30]), &test_params()).unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::InsufficientHistory { got: 30, need: 40 }
    ));
}

#[test]
/// Flat market: constant closes give zero dispersion, a zero ATR and a zero
/// coefficient, so the decision is a hold for any non-negative threshold.
fn flat_market_holds_for_any_threshold() {
    let enriched = engine::annotate(&series(&vec![200.0; 150]), &test_params()).unwrap();
    let (bar, indicators) = enriched.latest();

    assert!(indicators.atr.unwrap().abs() < 1e-12);
    assert!(indicators.std_dev.unwrap().abs() < 1e-12);

    // Nothing held: the zero coefficient reads as a sell below any positive
    // threshold, but a zero-sized sell collapses to a hold.
    for threshold in [0.0, 0.5, 2.0] {
        let d = momentum::evaluate(
            "BTC", indicators, bar.close, threshold, 50_000.0, 0.0, 1_000.0, 0.4,
        );
        assert_eq!(d.action, TradeAction::Hold, "threshold {}", threshold);
        assert_eq!(d.amount, 0.0);
        assert_eq!(d.coefficient, 0.0);
    }
}

#[test]
/// Strong uptrend: the short MA runs well ahead of the long MA, the
/// coefficient clears the bar and the buy is sized against both the cash
/// fraction and the volatility cap, with an exit target above the price.
fn strong_uptrend_buys_with_exit_target() {
    let closes: Vec<f64> = (0..160)
        .map(|i| {
            if i < 100 {
                100.0 + (i as f64 * 0.9).sin() * 0.5
            } else {
                100.0 + (i - 100) as f64 * 2.0
            }
        })
        .collect();
    let enriched = engine::annotate(&series(&closes), &test_params()).unwrap();
    let (bar, indicators) = enriched.latest();

    assert!(indicators.atr.unwrap() > 0.0);
    assert!(indicators.vol_ratio.unwrap() > 0.0);
    assert!(indicators.short_ma.unwrap() > indicators.long_ma.unwrap());

    let capital = 10_000.0;
    let max_position = risk::max_position(
        bar.close,
        indicators.std_dev,
        indicators.vol_ratio,
        capital,
        0.05,
    );
    assert!(max_position > 0.0);

    let free_cash = 10_000.0;
    let d = momentum::evaluate(
        "BTC",
        indicators,
        bar.close,
        0.5,
        free_cash,
        0.0,
        max_position,
        0.4,
    );

    assert_eq!(d.action, TradeAction::Buy);
    assert!(d.coefficient > 0.6);
    assert!(d.coefficient <= momentum::COEFFICIENT_CAP);
    assert!(d.amount > 0.0);
    let cash_bound = free_cash * 0.4 / bar.close;
    let cap_bound = (max_position * d.coefficient).abs() / bar.close;
    assert!((d.amount - cash_bound.min(cap_bound)).abs() < 1e-9);
    let expected_exit = bar.close + 3.0 * indicators.std_dev.unwrap();
    assert!((d.sell_price.unwrap() - expected_exit).abs() < 1e-9);
}

#[test]
/// Collapsing prices push the coefficient below the threshold and the
/// decision liquidates the entire holding, not a fraction of it.
fn downtrend_liquidates_entire_holding() {
    let closes: Vec<f64> = (0..160)
        .map(|i| {
            if i < 100 {
                500.0 + (i as f64 * 0.9).sin() * 0.5
            } else {
                500.0 - (i - 100) as f64 * 3.0
            }
        })
        .collect();
    let enriched = engine::annotate(&series(&closes), &test_params()).unwrap();
    let (bar, indicators) = enriched.latest();

    let d = momentum::evaluate("ETH", indicators, bar.close, 0.5, 10_000.0, 4.25, 800.0, 0.4);
    assert_eq!(d.action, TradeAction::Sell);
    assert!((d.amount - 4.25).abs() < f64::EPSILON);
    assert!(d.sell_price.is_none());
}

#[test]
/// Indicators at a given index never depend on later samples: truncating
/// the series reproduces the full run's values exactly.
fn annotation_has_no_look_ahead() {
    let closes: Vec<f64> = (0..200)
        .map(|i| 100.0 + (i as f64 * 0.31).cos() * 8.0 + i as f64 * 0.05)
        .collect();
    let params = test_params();
    let full = engine::annotate(&series(&closes), &params).unwrap();
    let prefix = engine::annotate(&series(&closes[..120]), &params).unwrap();

    for i in 0..120 {
        let a = &full.indicators[i];
        let b = &prefix.indicators[i];
        assert_eq!(a.short_ma, b.short_ma, "short_ma at {}", i);
        assert_eq!(a.long_ma, b.long_ma, "long_ma at {}", i);
        assert_eq!(a.std_dev, b.std_dev, "std_dev at {}", i);
        assert_eq!(a.vol_ratio, b.vol_ratio, "vol_ratio at {}", i);
        assert_eq!(a.atr, b.atr, "atr at {}", i);
    }
}

#[test]
/// The sizer's degenerate-volatility substitution: a zero std behaves
/// exactly like an explicit std of price/1000.
fn sizer_zero_volatility_substitution() {
    let a = risk::max_position(250.0, Some(0.0), Some(0.02), 20_000.0, 0.05);
    let b = risk::max_position(250.0, Some(0.25), Some(0.02), 20_000.0, 0.05);
    assert!((a - b).abs() < 1e-9);
}

#[test]
/// An insufficient-cash buy dies at the safety-floor guard, not with an
/// error: the cycle simply skips the order.
fn insufficient_cash_skips_the_buy() {
    assert_eq!(
        risk::approve_buy(999.0, 1_000.0, 0.0, 5_000.0),
        Err(risk::RejectionReason::CashBelowSafetyFloor)
    );
    assert_eq!(
        risk::approve_buy(1_000.0, 1_000.0, 0.0, 5_000.0),
        Err(risk::RejectionReason::CashBelowSafetyFloor)
    );
    assert_eq!(risk::approve_buy(1_000.01, 1_000.0, 0.0, 5_000.0), Ok(()));
}
