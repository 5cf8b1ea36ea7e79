use thiserror::Error;

/// Gateway faults surfaced by the Roostoo client: transport failures
/// convert via `#[from]`, application-level rejections carry the
/// provider's message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("roostoo API error: {msg}")]
    RoostooApi { msg: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Per-asset failures inside one decision cycle. These degrade the asset's
/// decision to a neutral one and never abort the cycle for other assets.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("insufficient history: {got} samples, need {need}")]
    InsufficientHistory { got: usize, need: usize },

    #[error("price lookup failed for {asset}: {reason}")]
    PriceLookup { asset: String, reason: String },

    #[error("invalid price series: {0}")]
    InvalidSeries(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_the_provider_message() {
        let err = AppError::RoostooApi {
            msg: "pair not found".to_string(),
        };
        assert_eq!(err.to_string(), "roostoo API error: pair not found");
    }

    #[test]
    fn evaluation_errors_name_the_failing_asset() {
        let err = EvaluationError::PriceLookup {
            asset: "BTC".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(err.to_string().contains("BTC"));
        assert!(EvaluationError::InsufficientHistory { got: 30, need: 40 }
            .to_string()
            .contains("30"));
    }
}
