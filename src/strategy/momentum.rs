use crate::indicator::engine::IndicatorSet;
use crate::model::decision::{Decision, TradeAction};

/// Coefficients above the cap are reported as the cap; the downside is
/// deliberately left uncapped.
pub const COEFFICIENT_CAP: f64 = 5.0;

/// A buy requires the coefficient to clear the threshold by this margin.
pub const BUY_MARGIN: f64 = 0.1;

/// Target normalized volatility for the objective factor.
pub const OBJECTIVE_VOL_TARGET: f64 = 0.02;

/// Clamp band for the objective volatility factor.
pub const OBJECTIVE_VOL_MIN: f64 = 0.9;
pub const OBJECTIVE_VOL_MAX: f64 = 1.11;

/// Floor for a degenerate (zero) short-window standard deviation, as a
/// fraction of price. The position sizer uses a different, smaller floor.
pub const EXIT_VOL_FLOOR_FRACTION: f64 = 0.01;

/// Take-profit distance in units of the short-window standard deviation.
pub const EXIT_SPREAD_MULTIPLIER: f64 = 3.0;

/// Volatility normalization factor: scales the raw trend signal so that an
/// asset trading at its usual volatility is judged on a level field. Bounded
/// to a narrow band so it can never dominate the signal. While the long
/// volatility baseline is still warming up the factor sits at the upper
/// bound.
pub fn objective_vol_factor(vol_ratio: Option<f64>) -> f64 {
    match vol_ratio {
        Some(vr) if vr > 0.0 => (OBJECTIVE_VOL_TARGET / vr).clamp(OBJECTIVE_VOL_MIN, OBJECTIVE_VOL_MAX),
        _ => OBJECTIVE_VOL_MAX,
    }
}

/// The unified direction-and-strength signal: trend (short MA minus long MA)
/// normalized by the average true range and scaled by the objective
/// volatility factor. Zero when the ATR is undefined or zero, which forces
/// the decision to neutral downstream. Capped above at [`COEFFICIENT_CAP`].
pub fn coefficient(indicators: &IndicatorSet) -> f64 {
    let atr = match indicators.atr {
        Some(atr) if atr != 0.0 => atr,
        _ => return 0.0,
    };
    let (short_ma, long_ma) = match (indicators.short_ma, indicators.long_ma) {
        (Some(s), Some(l)) => (s, l),
        _ => return 0.0,
    };
    let ma_diff = short_ma - long_ma;
    let raw = objective_vol_factor(indicators.vol_ratio) * ma_diff / atr;
    if !raw.is_finite() {
        return 0.0;
    }
    raw.min(COEFFICIENT_CAP)
}

/// Turn the latest indicator values into a sized decision for one asset.
///
/// `threshold` is the cycle's adaptive acceptance bar, `free_cash` the cash
/// available at snapshot time, `held_amount` the asset units currently held
/// and `max_position` the volatility-derived exposure cap in cash units.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    asset: &str,
    indicators: &IndicatorSet,
    price: f64,
    threshold: f64,
    free_cash: f64,
    held_amount: f64,
    max_position: f64,
    safety_fraction: f64,
) -> Decision {
    let coefficient = coefficient(indicators);

    let std_dev = match indicators.std_dev {
        Some(s) if s != 0.0 => s,
        _ => price * EXIT_VOL_FLOOR_FRACTION,
    };

    let (action, amount, sell_price) = if coefficient > threshold + BUY_MARGIN {
        let cash_bound = free_cash * safety_fraction / price;
        let cap_bound = (max_position * coefficient).abs() / price;
        (
            TradeAction::Buy,
            cash_bound.min(cap_bound),
            Some(price + EXIT_SPREAD_MULTIPLIER * std_dev),
        )
    } else if coefficient < threshold {
        // Full liquidation, not a partial trim.
        (TradeAction::Sell, held_amount, None)
    } else {
        (TradeAction::Hold, 0.0, None)
    };

    // A zero-sized buy or sell is no order at all.
    let (action, amount, sell_price) = if amount == 0.0 {
        (TradeAction::Hold, 0.0, None)
    } else {
        (action, amount, sell_price)
    };

    Decision {
        asset: asset.to_string(),
        action,
        amount,
        coefficient,
        max_position,
        held_amount,
        price,
        held_value: held_amount * price,
        sell_price,
    }
}
