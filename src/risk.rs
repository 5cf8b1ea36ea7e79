//! Volatility-normalized position sizing and pre-order guards.

/// Floor for a degenerate (zero) standard deviation when sizing, as a
/// fraction of price. Distinct from the evaluator's exit-spread floor.
pub const ZERO_VOL_FLOOR_FRACTION: f64 = 0.001;

/// Stable taxonomy for reasons an order is skipped by the execution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    CashBelowSafetyFloor,
    ExposureAtCap,
    PrecisionMissing,
    QtyRoundsToZero,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashBelowSafetyFloor => "risk.cash_below_safety_floor",
            Self::ExposureAtCap => "risk.exposure_at_cap",
            Self::PrecisionMissing => "meta.precision_missing",
            Self::QtyRoundsToZero => "risk.qty_rounds_to_zero",
        }
    }
}

/// Maximum allowable exposure to one asset, in cash units.
///
/// Scales the risk budget (`total_capital * risk_coefficient`) inversely
/// with the asset's current volatility relative to its own long-run
/// normalized volatility: an asset more volatile than usual gets a smaller
/// cap. An undefined baseline (`vol_ratio` still warming up) yields a zero
/// cap, so such assets can only be sold or held.
pub fn max_position(
    price: f64,
    std_dev: Option<f64>,
    vol_ratio: Option<f64>,
    total_capital: f64,
    risk_coefficient: f64,
) -> f64 {
    let baseline = match vol_ratio {
        Some(vr) if vr > 0.0 => vr,
        _ => return 0.0,
    };
    if price <= 0.0 {
        return 0.0;
    }
    let std_dev = match std_dev {
        Some(s) if s != 0.0 => s,
        _ => price * ZERO_VOL_FLOOR_FRACTION,
    };
    let volatility_ratio = std_dev / price;
    total_capital * risk_coefficient / (volatility_ratio / baseline)
}

/// Gate a buy on the cash safety floor and the per-asset exposure cap.
pub fn approve_buy(
    free_cash: f64,
    safety_floor: f64,
    held_value: f64,
    max_position: f64,
) -> Result<(), RejectionReason> {
    if free_cash <= safety_floor {
        return Err(RejectionReason::CashBelowSafetyFloor);
    }
    if held_value >= max_position {
        return Err(RejectionReason::ExposureAtCap);
    }
    Ok(())
}

/// Round half away from zero at a fixed number of decimal places, matching
/// the exchange's per-pair amount/price precision.
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
