//! Mark-to-market portfolio valuation.

use crate::model::balance::Balance;
use crate::roostoo::rest::RoostooRestClient;

/// Total capital in cash units: the cash balance (free + locked) at par,
/// plus every other held asset valued at its current ticker price.
///
/// A failed price lookup skips that asset's contribution and continues; the
/// valuation is best-effort within one cycle, never fatal.
pub async fn total_capital(
    client: &RoostooRestClient,
    balance: &Balance,
    cash_asset: &str,
) -> f64 {
    let mut total = balance.total_of(cash_asset);
    for (asset, quantity) in balance.held_assets(cash_asset) {
        let pair = format!("{}/{}", asset, cash_asset);
        match client.ticker(&pair).await {
            Ok(price) => total += quantity * price,
            Err(e) => {
                tracing::warn!(asset, error = %e, "price lookup failed, skipping holding");
            }
        }
    }
    tracing::debug!(total, "portfolio valuation");
    total
}
