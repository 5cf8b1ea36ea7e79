use anyhow::{bail, Context, Result};

use crate::config::HorusConfig;
use crate::model::series::{PricePoint, PriceSeries};

/// Client for the Horus market-data API: windowed close-price history per
/// asset, authenticated with a static API key header.
pub struct HorusClient {
    http: reqwest::Client,
    config: HorusConfig,
    interval_secs: u64,
}

impl HorusClient {
    pub fn new(config: &HorusConfig) -> Result<Self> {
        let interval_secs = config.interval_seconds()?;
        let mut config = config.clone();
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            interval_secs,
        })
    }

    /// Fetch the close-price history for one asset over the configured
    /// lookback window, validated into a `PriceSeries`. An empty response is
    /// a failure; a short one is passed through and rejected later by the
    /// indicator engine if it cannot fill the longest window.
    pub async fn fetch_series(&self, asset: &str) -> Result<PriceSeries> {
        // Roostoo pairs carry a /USD suffix; Horus wants the bare asset id.
        let asset = asset.split('/').next().unwrap_or(asset);
        let now = chrono::Utc::now().timestamp();
        let start = self.config.window_start(now);
        let expected = (now - start) as u64 / self.interval_secs;

        let url = format!("{}/market/price", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.config.api_key)
            .query(&[
                ("asset", asset.to_string()),
                ("interval", self.config.interval.clone()),
                ("start", start.to_string()),
                ("end", now.to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("Horus price request for {} failed", asset))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Horus returned {} for {}: {}", status, asset, body);
        }

        let points: Vec<PricePoint> = resp
            .json()
            .await
            .with_context(|| format!("Horus price response for {} is not valid JSON", asset))?;
        if points.is_empty() {
            bail!("Horus returned no samples for {}", asset);
        }
        if (points.len() as u64) < expected {
            tracing::debug!(
                asset,
                got = points.len(),
                expected,
                "Horus returned a partial series"
            );
        }

        let series = PriceSeries::new(points)
            .with_context(|| format!("Horus series for {} failed validation", asset))?;
        tracing::debug!(
            asset,
            samples = series.len(),
            last_close = series.latest_close(),
            "series fetched"
        );
        Ok(series)
    }
}
