use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ServerTimeResponse {
    #[serde(rename = "ServerTime")]
    pub server_time: u64,
}

/// GET /v3/exchangeInfo
#[derive(Debug, Deserialize)]
pub struct ExchangeInfoResponse {
    #[serde(rename = "TradePairs", default)]
    pub trade_pairs: HashMap<String, TradePairInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradePairInfo {
    #[serde(rename = "Coin")]
    pub coin: String,
    #[serde(rename = "AmountPrecision")]
    pub amount_precision: u32,
    #[serde(rename = "PricePrecision")]
    pub price_precision: u32,
}

/// GET /v3/ticker
#[derive(Debug, Deserialize)]
pub struct TickerResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "ErrMsg", default)]
    pub err_msg: String,
    #[serde(rename = "Data", default)]
    pub data: HashMap<String, TickerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerEntry {
    #[serde(rename = "LastPrice")]
    pub last_price: f64,
}

/// GET /v3/balance
#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    #[serde(rename = "SpotWallet", default)]
    pub spot_wallet: HashMap<String, WalletEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WalletEntry {
    #[serde(rename = "Free", default)]
    pub free: f64,
    #[serde(rename = "Lock", default)]
    pub lock: f64,
}

/// POST /v3/place_order
#[derive(Debug, Deserialize)]
pub struct PlaceOrderResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "ErrMsg", default)]
    pub err_msg: String,
    #[serde(rename = "OrderDetail")]
    pub order_detail: Option<OrderDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    #[serde(rename = "OrderID")]
    pub order_id: u64,
    #[serde(rename = "Pair", default)]
    pub pair: String,
    #[serde(rename = "Side", default)]
    pub side: String,
    #[serde(rename = "Type", default)]
    pub order_type: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// POST /v3/cancel_order
#[derive(Debug, Deserialize)]
pub struct CancelOrderResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "ErrMsg", default)]
    pub err_msg: String,
    #[serde(rename = "CanceledOrderIDs", default)]
    pub canceled_order_ids: Vec<u64>,
}
