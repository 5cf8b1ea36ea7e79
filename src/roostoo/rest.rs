use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use crate::model::balance::{AssetBalance, Balance};
use crate::model::order::{OrderSide, OrderType};

use super::types::{
    BalanceResponse, CancelOrderResponse, ExchangeInfoResponse, OrderDetail, PlaceOrderResponse,
    ServerTimeResponse, TickerResponse, TradePairInfo,
};

/// Signed REST client for the Roostoo mock exchange.
///
/// Signed endpoints take a 13-digit millisecond `timestamp` parameter; the
/// signature is HMAC-SHA256 over the parameters sorted by key and joined as
/// `k=v&k=v`, sent in the `MSG-SIGNATURE` header next to `RST-API-KEY`.
///
/// Transport failures surface as [`AppError::Http`]; `Success: false`
/// responses and non-2xx bodies surface as [`AppError::RoostooApi`].
pub struct RoostooRestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl RoostooRestClient {
    pub fn new(base_url: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    fn timestamp_ms() -> String {
        chrono::Utc::now().timestamp_millis().to_string()
    }

    /// Parameters sorted by key, joined `k=v&k=v`. This exact string is both
    /// the signing input and, for POST endpoints, the form body.
    fn canonical_query(params: &[(String, String)]) -> String {
        let mut sorted: Vec<&(String, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn sign(&self, total_params: &str) -> String {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.api_secret.as_bytes()).expect("HMAC key error");
        mac.update(total_params.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Startup connectivity probe.
    pub async fn server_time(&self) -> Result<u64, AppError> {
        let url = format!("{}/v3/serverTime", self.base_url);
        let resp: ServerTimeResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.server_time)
    }

    /// Per-pair precision metadata, keyed by bare asset id.
    pub async fn exchange_info(&self) -> Result<HashMap<String, TradePairInfo>, AppError> {
        let url = format!("{}/v3/exchangeInfo", self.base_url);
        let resp: ExchangeInfoResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp
            .trade_pairs
            .into_values()
            .map(|info| (info.coin.clone(), info))
            .collect())
    }

    /// Last traded price for one pair.
    pub async fn ticker(&self, pair: &str) -> Result<f64, AppError> {
        let url = format!("{}/v3/ticker", self.base_url);
        let resp: TickerResponse = self
            .http
            .get(&url)
            .query(&[("timestamp", Self::timestamp_ms()), ("pair", pair.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !resp.success {
            return Err(AppError::RoostooApi { msg: resp.err_msg });
        }
        resp.data
            .get(pair)
            .map(|entry| entry.last_price)
            .ok_or_else(|| AppError::RoostooApi {
                msg: format!("ticker response missing pair {}", pair),
            })
    }

    /// Wallet snapshot across all assets.
    pub async fn balance(&self) -> Result<Balance, AppError> {
        let url = format!("{}/v3/balance", self.base_url);
        let params = vec![("timestamp".to_string(), Self::timestamp_ms())];
        let total_params = Self::canonical_query(&params);
        let signature = self.sign(&total_params);

        let resp = self
            .http
            .get(&url)
            .header("RST-API-KEY", &self.api_key)
            .header("MSG-SIGNATURE", signature)
            .query(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::RoostooApi {
                msg: format!("balance request rejected: {}", body),
            });
        }

        let wallet: BalanceResponse = resp.json().await?;
        Ok(Balance::new(
            wallet
                .spot_wallet
                .into_iter()
                .map(|(asset, entry)| {
                    (
                        asset,
                        AssetBalance {
                            free: entry.free,
                            locked: entry.lock,
                        },
                    )
                })
                .collect(),
        ))
    }

    /// Place a market (price `None`) or limit (price `Some`) order.
    /// Quantities and prices must already be rounded to pair precision.
    pub async fn place_order(
        &self,
        pair: &str,
        side: OrderSide,
        quantity: f64,
        price: Option<f64>,
    ) -> Result<OrderDetail, AppError> {
        let order_type = match price {
            Some(_) => OrderType::Limit,
            None => OrderType::Market,
        };
        let mut params = vec![
            ("pair".to_string(), pair.to_string()),
            ("side".to_string(), side.as_roostoo_str().to_string()),
            ("type".to_string(), order_type.as_roostoo_str().to_string()),
            ("quantity".to_string(), format!("{}", quantity)),
            ("timestamp".to_string(), Self::timestamp_ms()),
        ];
        if let Some(p) = price {
            params.push(("price".to_string(), format!("{}", p)));
        }

        tracing::info!(
            pair,
            side = %side,
            order_type = %order_type,
            quantity,
            price = ?price,
            "placing order"
        );

        let resp: PlaceOrderResponse = self.signed_post("/v3/place_order", &params).await?;
        if !resp.success {
            return Err(AppError::RoostooApi { msg: resp.err_msg });
        }
        let detail = resp.order_detail.ok_or_else(|| AppError::RoostooApi {
            msg: "place_order response missing OrderDetail".to_string(),
        })?;
        tracing::info!(
            order_id = detail.order_id,
            status = %detail.status,
            "order accepted"
        );
        Ok(detail)
    }

    /// Cancel every pending order for a pair; returns the cancelled count.
    pub async fn cancel_orders(&self, pair: &str) -> Result<usize, AppError> {
        let params = vec![
            ("pair".to_string(), pair.to_string()),
            ("timestamp".to_string(), Self::timestamp_ms()),
        ];
        tracing::info!(pair, "cancelling pending orders");

        let resp: CancelOrderResponse = self.signed_post("/v3/cancel_order", &params).await?;
        if !resp.success {
            return Err(AppError::RoostooApi { msg: resp.err_msg });
        }
        Ok(resp.canceled_order_ids.len())
    }

    /// Signed POST: the canonical query string doubles as the form body.
    async fn signed_post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, AppError> {
        let total_params = Self::canonical_query(params);
        let signature = self.sign(&total_params);
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http
            .post(&url)
            .header("RST-API-KEY", &self.api_key)
            .header("MSG-SIGNATURE", signature)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(total_params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::RoostooApi {
                msg: format!("POST {} rejected: {}", path, body),
            });
        }
        Ok(resp.json().await?)
    }
}
