//! Ticker normalization.
//!
//! Position symbols, target-allocation tickers, and inbound signal symbols
//! are all user- or feed-entered free text. Every comparison in the core
//! goes through this module first; a call site that compares raw strings is
//! a defect.
//!
//! Two forms exist:
//!
//! | Form | Use | Example |
//! |------|-----|---------|
//! | canonical | holdings registry key | `BTCUSD` -> `BTC-USD`, `XIC.TO` -> `XIC` |
//! | loose | cross-spelling comparison key | `BTC-USD` -> `BTCUSD`, `XIC.TO` -> `XIC` |
//!
//! Both are pure and idempotent: `canonical(canonical(x)) == canonical(x)`.
//!
//! ## Examples
//!
//! ```
//! use driftguard_core::symbols::SymbolNormalizer;
//!
//! let normalizer = SymbolNormalizer::default();
//! assert_eq!(normalizer.canonical("btcusd"), "BTC-USD");
//! assert_eq!(normalizer.canonical("BTC-USD"), "BTC-USD");
//! assert_eq!(normalizer.loose("XIC.TO"), normalizer.loose("XIC"));
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::SymbolRules;

lazy_static! {
    /// A crypto pair already in storage form: 2-5 letters, dash, USD.
    static ref CRYPTO_PAIR_REGEX: Regex =
        Regex::new(r"^[A-Z]{2,5}-USD$").expect("Invalid regex pattern");

    /// Generic crypto spelling: base code glued to a USD or USDT quote.
    static ref CRYPTO_GLUED_REGEX: Regex =
        Regex::new(r"^([A-Z]{2,5})(USD|USDT)$").expect("Invalid regex pattern");
}

/// Normalizes free-text symbols against a [`SymbolRules`] table.
///
/// Holds no mutable state; share one instance behind an `Arc` across
/// services so every call site uses the same table version.
#[derive(Debug, Clone, Default)]
pub struct SymbolNormalizer {
    rules: SymbolRules,
}

impl SymbolNormalizer {
    pub fn new(rules: SymbolRules) -> Self {
        SymbolNormalizer { rules }
    }

    pub fn rules(&self) -> &SymbolRules {
        &self.rules
    }

    /// Canonical storage form: uppercase, exchange suffix stripped, crypto
    /// pairs spelled `{BASE}-USD`. Non-matching strings pass through
    /// unchanged and are assumed to be equities.
    pub fn canonical(&self, raw: &str) -> String {
        let symbol = self.strip_exchange_suffix(&raw.trim().to_uppercase());

        if CRYPTO_PAIR_REGEX.is_match(&symbol) {
            return symbol;
        }

        let dashless = symbol.replace('-', "");
        if self.rules.is_crypto_code(&dashless) {
            return format!("{}-USD", dashless);
        }
        if let Some(captures) = CRYPTO_GLUED_REGEX.captures(&dashless) {
            return format!("{}-USD", &captures[1]);
        }

        symbol
    }

    /// Loose comparison key: canonical form with dashes removed, so a crypto
    /// pair matches any of its spellings and share-class dashes don't split
    /// one holding into two.
    pub fn loose(&self, raw: &str) -> String {
        self.canonical(raw).replace('-', "")
    }

    /// Removes at most one known exchange suffix from the symbol tail.
    /// `XIC.TO` -> `XIC`; `BRK.B` is untouched because `B` is a share
    /// class, not a listed suffix.
    fn strip_exchange_suffix(&self, symbol: &str) -> String {
        if let Some((head, tail)) = symbol.rsplit_once('.') {
            if !head.is_empty() && self.rules.exchange_suffixes.iter().any(|s| s == tail) {
                return head.to_string();
            }
        }
        symbol.to_string()
    }
}
