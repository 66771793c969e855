#![allow(dead_code)]

use chrono::NaiveDate;
use lowtide::domain::backtest::BacktestConfig;
use lowtide::domain::error::LowtideError;
use lowtide::domain::execution::Sizer;
pub use lowtide::domain::ohlcv::OhlcvBar;
use lowtide::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, LowtideError> {
        if let Some(reason) = &self.error {
            return Err(LowtideError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|b| start_date.is_none_or(|start| b.date >= start))
            .filter(|b| end_date.is_none_or(|end| b.date <= end))
            .cloned()
            .collect())
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, LowtideError> {
        if let Some(reason) = &self.error {
            return Err(LowtideError::Data {
                reason: reason.clone(),
            });
        }
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, self.bars.len()))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: i64, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day_offset),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

/// One bar per close, on consecutive days from 2024-01-01.
pub fn make_series(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close))
        .collect()
}

/// Unit-sized, commission-free config so scenario pnl comes out per unit.
pub fn unit_config(symbol: &str) -> BacktestConfig {
    BacktestConfig {
        symbol: symbol.to_string(),
        initial_cash: 1000.0,
        commission_pct: 0.0,
        sizer: Sizer::FixedUnits(1),
        start_date: None,
        end_date: None,
    }
}
