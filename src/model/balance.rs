use std::collections::HashMap;

/// Free and locked quantities of one wallet asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetBalance {
    pub free: f64,
    pub locked: f64,
}

impl AssetBalance {
    pub fn total(&self) -> f64 {
        self.free + self.locked
    }
}

/// Point-in-time wallet snapshot, fetched once at the top of each cycle and
/// reused for every asset evaluated in that cycle. Fills placed later in the
/// same cycle are invisible until the next snapshot.
#[derive(Debug, Clone, Default)]
pub struct Balance {
    wallet: HashMap<String, AssetBalance>,
}

impl Balance {
    pub fn new(wallet: HashMap<String, AssetBalance>) -> Self {
        Self { wallet }
    }

    pub fn free_of(&self, asset: &str) -> f64 {
        self.wallet.get(asset).map(|b| b.free).unwrap_or(0.0)
    }

    pub fn total_of(&self, asset: &str) -> f64 {
        self.wallet.get(asset).map(|b| b.total()).unwrap_or(0.0)
    }

    /// Assets with a positive total holding, excluding the cash asset.
    pub fn held_assets(&self, cash_asset: &str) -> Vec<(&str, f64)> {
        let mut held: Vec<(&str, f64)> = self
            .wallet
            .iter()
            .filter(|(asset, bal)| asset.as_str() != cash_asset && bal.total() > 0.0)
            .map(|(asset, bal)| (asset.as_str(), bal.total()))
            .collect();
        held.sort_by(|a, b| a.0.cmp(b.0));
        held
    }
}
