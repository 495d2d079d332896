//! Token parameters fixed at ledger construction.

use serde::{Deserialize, Serialize};

/// BEP20 metadata for the flash token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    /// Human-readable token name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Ticker symbol.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Number of decimals the raw `u128` amounts carry.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_name() -> String {
    "Flash Token".to_string()
}

fn default_symbol() -> String {
    "FLASH".to_string()
}

fn default_decimals() -> u8 {
    18
}

impl TokenParams {
    /// One whole token in raw units (`10^decimals`), saturating for absurd decimals.
    pub fn unit(&self) -> u128 {
        10u128.checked_pow(self.decimals as u32).unwrap_or(u128::MAX)
    }
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
        }
    }
}
