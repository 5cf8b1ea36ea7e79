use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub roostoo: RoostooConfig,
    pub horus: HorusConfig,
    pub trading: TradingConfig,
    pub indicators: IndicatorConfig,
    pub pacing: PacingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoostooConfig {
    pub rest_base_url: String,
    pub cash_asset: String,
    #[serde(skip)]
    pub api_key: String,
    #[serde(skip)]
    pub api_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HorusConfig {
    pub base_url: String,
    pub interval: String,
    pub lookback_days: u32,
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    pub assets: Vec<String>,
    pub risk_coefficient: f64,
    /// Free cash must exceed this before any buy is placed.
    pub safety_floor: f64,
    /// Fraction of free cash a single buy may spend.
    pub safety_fraction: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub atr_window: usize,
    pub vol_window: usize,
    pub range_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    pub inter_asset_delay_secs: u64,
    pub inter_order_delay_secs: u64,
    pub inter_cycle_delay_secs: u64,
    pub failure_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Convert a Horus candle interval ("15m", "1h", "1d") into seconds.
pub fn interval_seconds(s: &str) -> Result<u64> {
    match s {
        "15m" => Ok(900),
        "1h" => Ok(3_600),
        "1d" => Ok(86_400),
        other => bail!(
            "invalid interval '{}': Horus serves only 15m, 1h and 1d",
            other
        ),
    }
}

impl HorusConfig {
    pub fn interval_seconds(&self) -> Result<u64> {
        interval_seconds(&self.interval)
    }

    /// Start of the fetch window, `lookback_days` before `now` (epoch seconds).
    pub fn window_start(&self, now: i64) -> i64 {
        now - 86_400 * i64::from(self.lookback_days)
    }
}

impl TradingConfig {
    pub fn tradable_assets(&self) -> Vec<String> {
        let mut out = Vec::new();
        for asset in &self.assets {
            let a = asset.trim().to_ascii_uppercase();
            if !a.is_empty() && !out.iter().any(|v| v == &a) {
                out.push(a);
            }
        }
        out
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;

        config.roostoo.api_key = std::env::var("ROOSTOO_API_KEY")
            .context("ROOSTOO_API_KEY not set in .env or environment")?;
        config.roostoo.api_secret = std::env::var("ROOSTOO_API_SECRET")
            .context("ROOSTOO_API_SECRET not set in .env or environment")?;
        config.horus.api_key = std::env::var("HORUS_API_KEY")
            .context("HORUS_API_KEY not set in .env or environment")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.roostoo.rest_base_url)
            .context("roostoo.rest_base_url is not a valid URL")?;
        url::Url::parse(&self.horus.base_url).context("horus.base_url is not a valid URL")?;
        self.horus
            .interval_seconds()
            .context("horus.interval is invalid")?;
        if self.horus.lookback_days == 0 {
            bail!("horus.lookback_days must be > 0");
        }
        if self.trading.tradable_assets().is_empty() {
            bail!("trading.assets must name at least one asset");
        }
        if self.trading.risk_coefficient <= 0.0 {
            bail!("trading.risk_coefficient must be > 0");
        }
        if !(self.trading.safety_fraction > 0.0 && self.trading.safety_fraction <= 1.0) {
            bail!("trading.safety_fraction must be in (0, 1]");
        }
        if self.indicators.short_window == 0
            || self.indicators.long_window == 0
            || self.indicators.atr_window == 0
            || self.indicators.vol_window == 0
            || self.indicators.range_window == 0
        {
            bail!("indicator windows must all be > 0");
        }
        if self.indicators.short_window >= self.indicators.long_window {
            bail!("indicators.short_window must be less than indicators.long_window");
        }
        Ok(())
    }
}
