use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
    /// Neutral: no order this cycle.
    Hold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
            TradeAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// One asset's verdict for one cycle. Built once from the cycle's balance
/// snapshot and price history, consumed once by the execution loop.
///
/// Invariant: `amount == 0.0` if and only if `action == Hold`.
#[derive(Debug, Clone)]
pub struct Decision {
    pub asset: String,
    pub action: TradeAction,
    /// Order size in asset units.
    pub amount: f64,
    /// Signal strength, capped above at the coefficient ceiling.
    pub coefficient: f64,
    /// Volatility-derived exposure cap in cash units.
    pub max_position: f64,
    /// Free + locked holdings of the asset at snapshot time.
    pub held_amount: f64,
    /// Last traded price, cash per unit.
    pub price: f64,
    /// Holdings valued at `price`.
    pub held_value: f64,
    /// Take-profit target for the protective limit sell; buys only.
    pub sell_price: Option<f64>,
}

impl Decision {
    /// Degraded decision emitted when an asset's evaluation fails; skips the
    /// asset for this cycle without touching any other asset.
    pub fn neutral(asset: &str) -> Self {
        Self {
            asset: asset.to_string(),
            action: TradeAction::Hold,
            amount: 0.0,
            coefficient: 0.0,
            max_position: 0.0,
            held_amount: 0.0,
            price: 0.0,
            held_value: 0.0,
            sell_price: None,
        }
    }
}
