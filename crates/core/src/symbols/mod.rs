//! Symbols module - ticker normalization rules and the normalizer.

mod normalizer;
mod symbol_rules;

pub use normalizer::SymbolNormalizer;
pub use symbol_rules::SymbolRules;
