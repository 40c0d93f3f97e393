//! Fundamental data model supplied by the external data collaborator.

/// One instrument in the coarse universe for a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseEntry {
    pub symbol: String,
    pub has_fundamental_data: bool,
}

/// One instrument's fundamental snapshot for a single step.
///
/// Immutable for the duration of one selection pass. Fields mirror the
/// vendor's fundamental feed: valuation ratios, balance-sheet items and
/// multi-year growth rates.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalRecord {
    pub symbol: String,
    /// ISO-style three-letter country code, e.g. "USA".
    pub country_code: String,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub ev_to_ebitda: f64,
    /// One-year quick ratio (liquid assets / current liabilities).
    pub quick_ratio: f64,
    /// Trailing twelve-month net debt.
    pub net_debt: f64,
    /// Trailing twelve-month EBITDA.
    pub ebitda: f64,
    /// Three-year revenue growth rate.
    pub revenue_growth: f64,
    /// Three-year net-income growth rate.
    pub net_income_growth: f64,
    /// Numeric sector classification code.
    pub sector_code: u32,
}
