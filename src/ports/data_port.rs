//! Data access port trait.

use crate::domain::error::LowtideError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Source of one daily OHLCV series.
pub trait DataPort {
    /// Bars within the inclusive date range, sorted by date ascending.
    /// `None` bounds are open-ended.
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, LowtideError>;

    /// First date, last date, and bar count of the full series, or `None`
    /// when the source is empty.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, LowtideError>;
}
