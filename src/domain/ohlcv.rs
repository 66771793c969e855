//! OHLCV bar representation.

use chrono::NaiveDate;

/// One trading day's price/volume record. Immutable once produced by the
/// data source; bars are identified by their position in the series.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// All four prices finite and volume non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume >= 0
    }
}
