//! CSV file data adapter.
//!
//! Reads one daily OHLCV series from a single CSV file with a header row and
//! `date,open,high,low,close,volume` columns, dates as `%Y-%m-%d`. Malformed
//! rows are fatal data errors.

use crate::domain::error::LowtideError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<Vec<OhlcvBar>, LowtideError> {
        let content = fs::read_to_string(&self.path).map_err(|e| LowtideError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| LowtideError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| LowtideError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                LowtideError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let open = parse_price(&record, 1, "open", date)?;
            let high = parse_price(&record, 2, "high", date)?;
            let low = parse_price(&record, 3, "low", date)?;
            let close = parse_price(&record, 4, "close", date)?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| LowtideError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| LowtideError::Data {
                    reason: format!("invalid volume value on {}: {}", date, e),
                })?;

            bars.push(OhlcvBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_price(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    date: NaiveDate,
) -> Result<f64, LowtideError> {
    record
        .get(idx)
        .ok_or_else(|| LowtideError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| LowtideError::Data {
            reason: format!("invalid {} value on {}: {}", name, date, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, LowtideError> {
        let bars = self.read_all()?;
        Ok(bars
            .into_iter()
            .filter(|b| start_date.is_none_or(|start| b.date >= start))
            .filter(|b| end_date.is_none_or(|end| b.date <= end))
            .collect())
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, LowtideError> {
        let bars = self.read_all()?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const CSV_CONTENT: &str = "date,open,high,low,close,volume\n\
        2024-01-17,110.0,120.0,105.0,115.0,55000\n\
        2024-01-15,100.0,110.0,90.0,105.0,50000\n\
        2024-01-16,105.0,115.0,100.0,110.0,60000\n";

    fn write_csv(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("prices.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn fetch_parses_and_sorts() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(write_csv(dir.path(), CSV_CONTENT));

        let bars = adapter.fetch_ohlcv(None, None).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(15));
        assert_eq!(bars[1].date, date(16));
        assert_eq!(bars[2].date, date(17));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50_000);
    }

    #[test]
    fn fetch_filters_by_date_range() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(write_csv(dir.path(), CSV_CONTENT));

        let bars = adapter.fetch_ohlcv(Some(date(16)), Some(date(16))).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(16));

        let bars = adapter.fetch_ohlcv(Some(date(16)), None).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn missing_file_is_data_error() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/prices.csv"));
        let err = adapter.fetch_ohlcv(None, None).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn malformed_price_is_data_error() {
        let dir = TempDir::new().unwrap();
        let content = "date,open,high,low,close,volume\n2024-01-15,abc,110.0,90.0,105.0,50000\n";
        let adapter = CsvAdapter::new(write_csv(dir.path(), content));

        let err = adapter.fetch_ohlcv(None, None).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn malformed_date_is_data_error() {
        let dir = TempDir::new().unwrap();
        let content = "date,open,high,low,close,volume\n15/01/2024,100.0,110.0,90.0,105.0,50000\n";
        let adapter = CsvAdapter::new(write_csv(dir.path(), content));

        let err = adapter.fetch_ohlcv(None, None).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn short_row_is_data_error() {
        let dir = TempDir::new().unwrap();
        let content = "date,open,high,low,close,volume\n2024-01-15,100.0,110.0\n";
        let adapter = CsvAdapter::new(write_csv(dir.path(), content));

        let err = adapter.fetch_ohlcv(None, None).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn data_range_reports_bounds() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(write_csv(dir.path(), CSV_CONTENT));

        let range = adapter.data_range().unwrap().unwrap();
        assert_eq!(range, (date(15), date(17), 3));
    }

    #[test]
    fn data_range_empty_file() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(write_csv(dir.path(), "date,open,high,low,close,volume\n"));

        assert!(adapter.data_range().unwrap().is_none());
    }
}
