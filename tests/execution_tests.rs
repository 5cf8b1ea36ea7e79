use std::collections::HashMap;

use horus_trader::config::Config;
use horus_trader::model::balance::{AssetBalance, Balance};
use horus_trader::model::decision::{Decision, TradeAction};
use horus_trader::risk::RejectionReason;
use horus_trader::roostoo::types::TradePairInfo;
use horus_trader::trader::Trader;

/// The production config shape with endpoints pointed at an unroutable
/// port, so any accidental network call fails immediately instead of
/// hanging. Every path exercised here decides before reaching the wire.
fn offline_config() -> Config {
    toml::from_str(
        r#"
[roostoo]
rest_base_url = "http://127.0.0.1:9"
cash_asset = "USD"

[horus]
base_url = "http://127.0.0.1:9"
interval = "15m"
lookback_days = 90

[trading]
assets = ["BTC", "ETH"]
risk_coefficient = 0.05
safety_floor = 1000.0
safety_fraction = 0.4

[indicators]
short_window = 7
long_window = 40
atr_window = 80
vol_window = 1000
range_window = 5

[pacing]
inter_asset_delay_secs = 0
inter_order_delay_secs = 0
inter_cycle_delay_secs = 0
failure_delay_secs = 0

[logging]
level = "debug"
"#,
    )
    .unwrap()
}

fn trader() -> Trader {
    Trader::new(offline_config()).unwrap()
}

fn wallet(cash: f64, btc: f64) -> Balance {
    let mut map = HashMap::new();
    map.insert(
        "USD".to_string(),
        AssetBalance {
            free: cash,
            locked: 0.0,
        },
    );
    if btc > 0.0 {
        map.insert(
            "BTC".to_string(),
            AssetBalance {
                free: btc,
                locked: 0.0,
            },
        );
    }
    Balance::new(map)
}

fn precision_for_btc() -> HashMap<String, TradePairInfo> {
    let mut map = HashMap::new();
    map.insert(
        "BTC".to_string(),
        TradePairInfo {
            coin: "BTC".to_string(),
            amount_precision: 4,
            price_precision: 2,
        },
    );
    map
}

fn buy_decision(amount: f64, held_value: f64, max_position: f64) -> Decision {
    Decision {
        asset: "BTC".to_string(),
        action: TradeAction::Buy,
        amount,
        coefficient: 2.0,
        max_position,
        held_amount: 0.0,
        price: 50_000.0,
        held_value,
        sell_price: Some(51_500.0),
    }
}

fn sell_decision(amount: f64) -> Decision {
    Decision {
        asset: "BTC".to_string(),
        action: TradeAction::Sell,
        amount,
        coefficient: -1.0,
        max_position: 500.0,
        held_amount: amount,
        price: 50_000.0,
        held_value: amount * 50_000.0,
        sell_price: None,
    }
}

#[tokio::test]
/// Holds place no orders and report no skip reason.
async fn hold_is_a_silent_no_op() {
    let trader = trader();
    let decision = Decision::neutral("BTC");
    let skipped = trader
        .execute(&decision, &wallet(10_000.0, 0.0), &precision_for_btc())
        .await;
    assert_eq!(skipped, None);
}

#[tokio::test]
/// Free cash at or below the safety floor blocks every buy before any
/// order is built.
async fn buy_below_cash_floor_is_skipped() {
    let trader = trader();
    let decision = buy_decision(0.01, 0.0, 500.0);
    let skipped = trader
        .execute(&decision, &wallet(800.0, 0.0), &precision_for_btc())
        .await;
    assert_eq!(skipped, Some(RejectionReason::CashBelowSafetyFloor));
}

#[tokio::test]
/// A holding already at or above the volatility cap blocks further buys.
async fn buy_at_exposure_cap_is_skipped() {
    let trader = trader();
    let decision = buy_decision(0.01, 600.0, 500.0);
    let skipped = trader
        .execute(&decision, &wallet(10_000.0, 0.01), &precision_for_btc())
        .await;
    assert_eq!(skipped, Some(RejectionReason::ExposureAtCap));
}

#[tokio::test]
/// Without exchange precision metadata for the pair, a buy cannot be
/// rounded and is skipped.
async fn buy_without_pair_metadata_is_skipped() {
    let trader = trader();
    let decision = Decision {
        asset: "ETH".to_string(),
        ..buy_decision(0.5, 0.0, 500.0)
    };
    let skipped = trader
        .execute(&decision, &wallet(10_000.0, 0.0), &precision_for_btc())
        .await;
    assert_eq!(skipped, Some(RejectionReason::PrecisionMissing));
}

#[tokio::test]
/// A buy amount that rounds to zero at the pair's amount precision never
/// reaches the exchange.
async fn dust_buy_rounds_to_zero_and_is_skipped() {
    let trader = trader();
    // 4 decimals of amount precision: 0.00004 rounds to 0.0
    let decision = buy_decision(0.00004, 0.0, 500.0);
    let skipped = trader
        .execute(&decision, &wallet(10_000.0, 0.0), &precision_for_btc())
        .await;
    assert_eq!(skipped, Some(RejectionReason::QtyRoundsToZero));
}

#[tokio::test]
/// Sells share the metadata guard: no precision entry, no liquidation.
async fn sell_without_pair_metadata_is_skipped() {
    let trader = trader();
    let decision = Decision {
        asset: "ETH".to_string(),
        ..sell_decision(0.5)
    };
    let skipped = trader
        .execute(&decision, &wallet(0.0, 0.0), &precision_for_btc())
        .await;
    assert_eq!(skipped, Some(RejectionReason::PrecisionMissing));
}

#[tokio::test]
/// A dust holding whose quantity rounds to zero is not worth a cancel or
/// a market sell.
async fn dust_sell_rounds_to_zero_and_is_skipped() {
    let trader = trader();
    let decision = sell_decision(0.00004);
    let skipped = trader
        .execute(&decision, &wallet(0.0, 0.00004), &precision_for_btc())
        .await;
    assert_eq!(skipped, Some(RejectionReason::QtyRoundsToZero));
}
