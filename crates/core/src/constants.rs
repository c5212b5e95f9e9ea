/// Ticker used for cash balances within an account. Cash is liquidity, not
/// a tradeable position: reconciliation never emits buy/sell actions for it.
pub const CASH_TICKER: &str = "CASH";

/// Default allocation drift tolerance band, in percentage points.
/// Variance strictly inside the band classifies as on-target.
pub const DEFAULT_DRIFT_BAND_PCT: &str = "2";

/// Default buy/sell noise threshold, in account currency units.
/// Action amounts at or below this stay `hold`.
pub const DEFAULT_TRADE_NOISE_AMOUNT: &str = "50";

/// Decimal precision for reconciliation output (percentages and dollars).
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for compliance weight display.
pub const COMPLIANCE_DECIMAL_PRECISION: u32 = 1;
