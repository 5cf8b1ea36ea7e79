use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;

use crate::config::Config;
use crate::error::EvaluationError;
use crate::horus::rest::HorusClient;
use crate::indicator::engine;
use crate::model::balance::Balance;
use crate::model::decision::{Decision, TradeAction};
use crate::model::order::OrderSide;
use crate::portfolio;
use crate::risk;
use crate::roostoo::rest::RoostooRestClient;
use crate::roostoo::types::TradePairInfo;
use crate::strategy::momentum;

/// Threshold floor: the acceptance bar never drops below this.
pub const THRESHOLD_FLOOR: f64 = 0.5;

/// The next threshold tracks this rank of the previous cycle's coefficient
/// distribution (0-based: the third-highest).
pub const THRESHOLD_RANK: usize = 2;

/// Decay applied to the reference coefficient when deriving the threshold.
pub const THRESHOLD_DECAY: f64 = 0.95;

/// Loop state carried from one cycle to the next. No process-wide mutable
/// state exists: each cycle takes the previous state and returns the next.
#[derive(Debug, Clone, Copy)]
pub struct CycleState {
    pub cycle: u64,
    pub threshold: f64,
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            cycle: 0,
            threshold: 0.0,
        }
    }
}

/// Next cycle's acceptance bar: the third-highest coefficient of this
/// cycle's decisions, decayed, floored at [`THRESHOLD_FLOOR`]. Adapts the
/// bar to the cross-sectional strength of the current signal distribution.
pub fn next_threshold(decisions: &[Decision]) -> f64 {
    let mut coefficients: Vec<f64> = decisions.iter().map(|d| d.coefficient).collect();
    coefficients.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    let reference = coefficients.get(THRESHOLD_RANK).copied().unwrap_or(0.0);
    (reference * THRESHOLD_DECAY).max(THRESHOLD_FLOOR)
}

/// Order decisions for safe execution: sells first (free capital, clear
/// stale limit orders), then buys, holds last; within a class the strongest
/// absolute coefficient acts first.
pub fn sort_for_execution(decisions: &mut [Decision]) {
    fn class_rank(action: TradeAction) -> u8 {
        match action {
            TradeAction::Sell => 0,
            TradeAction::Buy => 1,
            TradeAction::Hold => 2,
        }
    }
    decisions.sort_by(|a, b| {
        class_rank(a.action).cmp(&class_rank(b.action)).then(
            b.coefficient
                .abs()
                .partial_cmp(&a.coefficient.abs())
                .unwrap_or(Ordering::Equal),
        )
    });
}

/// The ranking and execution loop: evaluates every asset in the universe
/// each cycle, recomputes the adaptive threshold, and drives the resulting
/// decisions through throttled order placement. Strictly sequential; all
/// pacing is fixed-duration sleeps.
pub struct Trader {
    roostoo: RoostooRestClient,
    horus: HorusClient,
    config: Config,
    assets: Vec<String>,
}

impl Trader {
    pub fn new(config: Config) -> Result<Self> {
        let roostoo = RoostooRestClient::new(
            &config.roostoo.rest_base_url,
            &config.roostoo.api_key,
            &config.roostoo.api_secret,
        );
        let horus = HorusClient::new(&config.horus)?;
        let assets = config.trading.tradable_assets();
        Ok(Self {
            roostoo,
            horus,
            config,
            assets,
        })
    }

    pub fn roostoo(&self) -> &RoostooRestClient {
        &self.roostoo
    }

    fn pair_of(&self, asset: &str) -> String {
        format!("{}/{}", asset, self.config.roostoo.cash_asset)
    }

    /// Run cycles until an error escapes to the supervisor.
    pub async fn run(&self, mut state: CycleState) -> Result<()> {
        loop {
            state = self.run_cycle(state).await?;
            sleep(Duration::from_secs(self.config.pacing.inter_cycle_delay_secs)).await;
        }
    }

    /// One full cycle: snapshot the wallet, evaluate every asset against the
    /// carried threshold, derive the next threshold, then execute in safe
    /// order.
    ///
    /// The wallet snapshot is taken once and reused for every asset, so
    /// assets evaluated later in the cycle see balances that fills earlier
    /// in the same cycle have already changed. Accepted approximation:
    /// consistency is restored at the next snapshot.
    pub async fn run_cycle(&self, state: CycleState) -> Result<CycleState> {
        let cycle = state.cycle + 1;
        tracing::info!(cycle, threshold = state.threshold, "cycle start");

        let balance = self
            .roostoo
            .balance()
            .await
            .context("balance fetch failed at cycle start")?;

        // Metadata failure degrades the cycle: decisions and the threshold
        // are still computed, order placement is skipped.
        let precision = match self.roostoo.exchange_info().await {
            Ok(map) => Some(map),
            Err(e) => {
                tracing::warn!(error = %e, "exchange metadata unavailable, orders disabled this cycle");
                None
            }
        };

        let mut decisions = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            tracing::debug!(asset, "evaluating");
            let decision = match self.evaluate_asset(asset, &balance, state.threshold).await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(asset, error = %e, "evaluation failed, skipping asset");
                    sleep(Duration::from_secs(self.config.pacing.failure_delay_secs)).await;
                    Decision::neutral(asset)
                }
            };
            decisions.push(decision);
            sleep(Duration::from_secs(self.config.pacing.inter_asset_delay_secs)).await;
        }

        let threshold = next_threshold(&decisions);
        sort_for_execution(&mut decisions);
        tracing::info!(cycle, threshold, "decisions ranked");

        for decision in &decisions {
            tracing::info!(
                asset = %decision.asset,
                action = %decision.action,
                amount = decision.amount,
                coefficient = decision.coefficient,
                max_position = decision.max_position,
                price = decision.price,
                "decision"
            );
            if let Some(map) = &precision {
                if let Some(reason) = self.execute(decision, &balance, map).await {
                    tracing::info!(
                        asset = %decision.asset,
                        reason = reason.as_str(),
                        "order skipped"
                    );
                }
            }
        }

        Ok(CycleState { cycle, threshold })
    }

    /// The per-asset pipeline: ticker price, Horus history, indicators,
    /// portfolio valuation, position cap, then the decision rule. Any
    /// failure is local to this asset.
    async fn evaluate_asset(
        &self,
        asset: &str,
        balance: &Balance,
        threshold: f64,
    ) -> Result<Decision, EvaluationError> {
        let pair = self.pair_of(asset);
        let price = self
            .roostoo
            .ticker(&pair)
            .await
            .map_err(|e| EvaluationError::PriceLookup {
                asset: asset.to_string(),
                reason: e.to_string(),
            })?;

        let series = self
            .horus
            .fetch_series(asset)
            .await
            .map_err(|e| EvaluationError::DataUnavailable(e.to_string()))?;
        let enriched = engine::annotate(&series, &self.config.indicators)?;
        let (_, indicators) = enriched.latest();

        let capital =
            portfolio::total_capital(&self.roostoo, balance, &self.config.roostoo.cash_asset)
                .await;
        let max_position = risk::max_position(
            price,
            indicators.std_dev,
            indicators.vol_ratio,
            capital,
            self.config.trading.risk_coefficient,
        );

        Ok(momentum::evaluate(
            asset,
            indicators,
            price,
            threshold,
            balance.free_of(&self.config.roostoo.cash_asset),
            balance.total_of(asset),
            max_position,
            self.config.trading.safety_fraction,
        ))
    }

    /// Execute one decision. Order failures are logged and never propagate:
    /// a failed order affects only this asset, this cycle. Returns the
    /// rejection reason when a pre-order guard skipped the action.
    pub async fn execute(
        &self,
        decision: &Decision,
        balance: &Balance,
        precision: &HashMap<String, TradePairInfo>,
    ) -> Option<risk::RejectionReason> {
        match decision.action {
            TradeAction::Buy => self.execute_buy(decision, balance, precision).await,
            TradeAction::Sell => self.execute_sell(decision, precision).await,
            TradeAction::Hold => None,
        }
    }

    async fn execute_buy(
        &self,
        decision: &Decision,
        balance: &Balance,
        precision: &HashMap<String, TradePairInfo>,
    ) -> Option<risk::RejectionReason> {
        let asset = decision.asset.as_str();
        let free_cash = balance.free_of(&self.config.roostoo.cash_asset);
        if let Err(reason) = risk::approve_buy(
            free_cash,
            self.config.trading.safety_floor,
            decision.held_value,
            decision.max_position,
        ) {
            return Some(reason);
        }
        let Some(pair_info) = precision.get(asset) else {
            return Some(risk::RejectionReason::PrecisionMissing);
        };
        let amount = risk::round_to_decimals(decision.amount, pair_info.amount_precision);
        if amount == 0.0 {
            return Some(risk::RejectionReason::QtyRoundsToZero);
        }

        let pair = self.pair_of(asset);
        if let Err(e) = self
            .roostoo
            .place_order(&pair, OrderSide::Buy, amount, None)
            .await
        {
            tracing::warn!(asset, error = %e, "market buy failed");
            return None;
        }
        sleep(Duration::from_secs(self.config.pacing.inter_order_delay_secs)).await;

        // Paired protective take-profit. If it fails the position stays
        // open without an exit order; surfaced loudly, no compensating
        // action.
        let sell_price = decision
            .sell_price
            .map(|p| risk::round_to_decimals(p, pair_info.price_precision));
        match sell_price {
            Some(target) => {
                if let Err(e) = self
                    .roostoo
                    .place_order(&pair, OrderSide::Sell, amount, Some(target))
                    .await
                {
                    tracing::warn!(
                        asset,
                        target,
                        error = %e,
                        "protective sell failed, position is unprotected"
                    );
                }
            }
            None => {
                tracing::warn!(asset, "buy decision carried no exit target");
            }
        }
        sleep(Duration::from_secs(self.config.pacing.inter_order_delay_secs)).await;
        None
    }

    async fn execute_sell(
        &self,
        decision: &Decision,
        precision: &HashMap<String, TradePairInfo>,
    ) -> Option<risk::RejectionReason> {
        let asset = decision.asset.as_str();
        let Some(pair_info) = precision.get(asset) else {
            return Some(risk::RejectionReason::PrecisionMissing);
        };
        let amount = risk::round_to_decimals(decision.amount, pair_info.amount_precision);
        if amount == 0.0 {
            return Some(risk::RejectionReason::QtyRoundsToZero);
        }

        let pair = self.pair_of(asset);
        // Clear stale protective limit sells before liquidating.
        match self.roostoo.cancel_orders(&pair).await {
            Ok(count) => tracing::info!(asset, count, "pending orders cancelled"),
            Err(e) => tracing::warn!(asset, error = %e, "cancel failed, selling anyway"),
        }
        if let Err(e) = self
            .roostoo
            .place_order(&pair, OrderSide::Sell, amount, None)
            .await
        {
            tracing::warn!(asset, error = %e, "market sell failed");
        }
        sleep(Duration::from_secs(self.config.pacing.inter_order_delay_secs)).await;
        None
    }
}
