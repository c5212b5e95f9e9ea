//! Normalization rule tables.
//!
//! The normalizer is driven by data, not compiled-in lists: deployments can
//! extend the suffix and crypto tables without touching the matching logic.
//! The built-in defaults cover the markets the system ships with.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Exchange suffixes recognized at the tail of a symbol, without the dot.
/// Toronto, TSX Venture, CSE, NEO, and the common US-exchange forms.
const DEFAULT_EXCHANGE_SUFFIXES: &[&str] = &["TO", "V", "CN", "NE", "US", "N", "OQ"];

/// Crypto base codes whose bare or dashless spellings resolve to `{CODE}-USD`.
const DEFAULT_CRYPTO_CODES: &[&str] = &[
    "BTC", "ETH", "SOL", "ADA", "DOT", "DOGE", "LTC", "XRP", "AVAX", "LINK", "MATIC", "UNI",
];

/// Versioned rule tables consumed by [`super::SymbolNormalizer`].
///
/// Treat an instance as immutable configuration: build it once at startup
/// (or load it from settings) and share it behind the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRules {
    /// Schema version of the table, for config round-trips.
    pub version: u32,
    /// Exchange suffixes stripped from the symbol tail, uppercase, no dot.
    pub exchange_suffixes: Vec<String>,
    /// Known crypto base codes, uppercase.
    pub crypto_codes: HashSet<String>,
}

impl SymbolRules {
    /// Builds a rule table from caller-provided lists. Entries are
    /// upper-cased so lookups stay case-insensitive.
    pub fn new<S: AsRef<str>>(version: u32, exchange_suffixes: &[S], crypto_codes: &[S]) -> Self {
        SymbolRules {
            version,
            exchange_suffixes: exchange_suffixes
                .iter()
                .map(|s| s.as_ref().to_uppercase())
                .collect(),
            crypto_codes: crypto_codes
                .iter()
                .map(|s| s.as_ref().to_uppercase())
                .collect(),
        }
    }

    pub fn is_crypto_code(&self, code: &str) -> bool {
        self.crypto_codes.contains(code)
    }
}

impl Default for SymbolRules {
    fn default() -> Self {
        SymbolRules::new(1, DEFAULT_EXCHANGE_SUFFIXES, DEFAULT_CRYPTO_CODES)
    }
}
