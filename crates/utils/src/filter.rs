//! Investable-universe pre-filter.

use polars::prelude::*;

/// Exchange and share-code restriction applied before the panel is built.
///
/// An empty code list leaves that dimension unrestricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseFilter {
    /// Column holding the exchange code (CRSP `EXCHCD`).
    pub exchange_col: String,
    /// Accepted exchange codes.
    pub exchange_codes: Vec<i64>,
    /// Column holding the share code (CRSP `SHRCD`).
    pub share_col: String,
    /// Accepted share codes.
    pub share_codes: Vec<i64>,
}

impl UniverseFilter {
    /// Filter with the CRSP column names and no restriction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exchange_col: "EXCHCD".to_string(),
            exchange_codes: Vec::new(),
            share_col: "SHRCD".to_string(),
            share_codes: Vec::new(),
        }
    }

    /// NYSE, AMEX and NASDAQ common stocks (exchange 1-3, share 10-11).
    #[must_use]
    pub fn us_common_stocks() -> Self {
        Self::new().with_exchange_codes(vec![1, 2, 3]).with_share_codes(vec![10, 11])
    }

    /// Restrict to the given exchange codes.
    #[must_use]
    pub fn with_exchange_codes(mut self, codes: Vec<i64>) -> Self {
        self.exchange_codes = codes;
        self
    }

    /// Restrict to the given share codes.
    #[must_use]
    pub fn with_share_codes(mut self, codes: Vec<i64>) -> Self {
        self.share_codes = codes;
        self
    }

    /// Whether the filter restricts anything.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.exchange_codes.is_empty() && self.share_codes.is_empty()
    }
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep only rows whose exchange and share codes are accepted.
///
/// Codes are compared as integers; rows with a null or non-numeric code are
/// dropped when that dimension is restricted.
pub fn filter_universe(df: LazyFrame, filter: &UniverseFilter) -> LazyFrame {
    let predicates: Vec<Expr> = [
        code_predicate(&filter.exchange_col, &filter.exchange_codes),
        code_predicate(&filter.share_col, &filter.share_codes),
    ]
    .into_iter()
    .flatten()
    .collect();

    match predicates.into_iter().reduce(|a, b| a.and(b)) {
        Some(predicate) => df.filter(predicate),
        None => df,
    }
}

fn code_predicate(column: &str, codes: &[i64]) -> Option<Expr> {
    codes
        .iter()
        .map(|&code| col(column).cast(DataType::Int64).eq(lit(code)))
        .reduce(|a, b| a.or(b))
        .map(|expr| expr.fill_null(lit(false)))
}
