//! Rolling-low indicator.
//!
//! LOW(n)[i] = min(C[i-j] for j in 0..n-1)
//! Warmup: first (n-1) bars are invalid.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// A single point in the rolling-low series, aligned 1:1 with the bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingLowPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

/// Minimum close over the trailing `period`-bar window ending at each bar.
///
/// The minimum is taken over the raw close values, so a valid point's value
/// is bit-identical to one of the closes in its window. Entry logic compares
/// the current close against this series by exact equality and relies on
/// that.
pub fn rolling_low(bars: &[OhlcvBar], period: usize) -> Vec<RollingLowPoint> {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for i in 0..bars.len() {
        let date = bars[i].date;
        let valid = period > 0 && i >= warmup;

        let value = if valid {
            let start = i + 1 - period;
            bars[start..=i]
                .iter()
                .map(|b| b.close)
                .fold(f64::INFINITY, f64::min)
        } else {
            0.0
        };

        values.push(RollingLowPoint { date, valid, value });
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn warmup_flags() {
        let bars = make_bars(&[10.0, 9.0, 8.0, 7.0, 6.0]);
        let series = rolling_low(&bars, 3);

        assert!(!series[0].valid);
        assert!(!series[1].valid);
        assert!(series[2].valid);
        assert!(series[3].valid);
        assert!(series[4].valid);
    }

    #[test]
    fn decreasing_series_tracks_current_close() {
        let bars = make_bars(&[10.0, 9.0, 8.0, 7.0, 6.0]);
        let series = rolling_low(&bars, 5);

        assert!(series[4].valid);
        assert_eq!(series[4].value, 6.0);
    }

    #[test]
    fn window_slides() {
        let bars = make_bars(&[5.0, 9.0, 8.0, 7.0, 6.0]);
        let series = rolling_low(&bars, 3);

        // windows: [5,9,8]=5, [9,8,7]=7, [8,7,6]=6
        assert_eq!(series[2].value, 5.0);
        assert_eq!(series[3].value, 7.0);
        assert_eq!(series[4].value, 6.0);
    }

    #[test]
    fn value_is_bitwise_equal_to_a_window_close() {
        let bars = make_bars(&[0.1 + 0.2, 0.3, 0.30000000000000004, 0.2, 0.25]);
        let series = rolling_low(&bars, 3);

        for (i, point) in series.iter().enumerate().skip(2) {
            let window: Vec<f64> = bars[i - 2..=i].iter().map(|b| b.close).collect();
            assert!(window.iter().any(|&c| c == point.value));
        }
    }

    #[test]
    fn period_one_equals_close() {
        let bars = make_bars(&[10.0, 9.0, 11.0]);
        let series = rolling_low(&bars, 1);

        for (point, bar) in series.iter().zip(&bars) {
            assert!(point.valid);
            assert_eq!(point.value, bar.close);
        }
    }

    #[test]
    fn period_longer_than_series_never_valid() {
        let bars = make_bars(&[10.0, 9.0, 8.0]);
        let series = rolling_low(&bars, 5);

        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|p| !p.valid));
    }

    #[test]
    fn period_zero_never_valid() {
        let bars = make_bars(&[10.0, 9.0]);
        let series = rolling_low(&bars, 0);
        assert!(series.iter().all(|p| !p.valid));
    }

    #[test]
    fn empty_series() {
        let series = rolling_low(&[], 5);
        assert!(series.is_empty());
    }
}
