//! Backtest engine and event loop.
//!
//! One explicit `BacktestConfig` configures the whole run; there is no
//! process-wide engine state. The loop is strictly single-threaded: each
//! bar is fully processed (decision, fill, notifications) before the next.

use chrono::NaiveDate;

use crate::domain::error::LowtideError;
use crate::domain::execution::{Broker, Sizer};
use crate::domain::indicator::rolling_low;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::strategy::{BarContext, RunContext, Strategy};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub initial_cash: f64,
    pub commission_pct: f64,
    pub sizer: Sizer,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            symbol: String::new(),
            initial_cash: 1000.0,
            commission_pct: 0.0,
            sizer: Sizer::default(),
            start_date: None,
            end_date: None,
        }
    }
}

/// Account state captured at run start and run end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountSnapshot {
    pub starting_cash: f64,
    pub final_value: f64,
}

/// Drive the strategy over the full series.
///
/// Per bar: build the context, let the strategy submit at most one order,
/// fill it at the current close, then deliver `notify_order` and (if a round
/// trip closed) `notify_trade` before advancing. After the last bar the
/// strategy receives `on_run_complete` with the final account value marked
/// to the last close.
pub fn run_backtest<S: Strategy>(
    bars: &[OhlcvBar],
    strategy: &mut S,
    config: &BacktestConfig,
) -> Result<AccountSnapshot, LowtideError> {
    validate_series(bars, &config.symbol)?;

    let lows = rolling_low(bars, strategy.lookback());
    let mut broker = Broker::new(config.initial_cash, config.commission_pct, config.sizer);

    for (i, bar) in bars.iter().enumerate() {
        let low = lows.get(i).filter(|p| p.valid).map(|p| p.value);
        let ctx = BarContext {
            bars,
            index: i,
            rolling_low: low,
            position: broker.position_state(),
            cash: broker.cash(),
            value: broker.value(bar.close),
        };

        if let Some(request) = strategy.on_bar(&ctx) {
            let (order, closed) = broker.execute(request, bar);
            strategy.notify_order(&order);
            if let Some(trade) = closed {
                strategy.notify_trade(&trade);
            }
        }
    }

    let last_close = bars[bars.len() - 1].close;
    let snapshot = AccountSnapshot {
        starting_cash: config.initial_cash,
        final_value: broker.value(last_close),
    };

    let ctx = RunContext {
        symbol: &config.symbol,
        bars,
        starting_cash: snapshot.starting_cash,
        final_value: snapshot.final_value,
    };
    strategy.on_run_complete(&ctx);

    Ok(snapshot)
}

/// Fatal data checks, applied before any bar is processed.
fn validate_series(bars: &[OhlcvBar], symbol: &str) -> Result<(), LowtideError> {
    if bars.is_empty() {
        return Err(LowtideError::NoData {
            symbol: symbol.to_string(),
        });
    }

    for bar in bars {
        if !bar.is_well_formed() {
            return Err(LowtideError::Data {
                reason: format!("malformed bar on {}", bar.date),
            });
        }
    }

    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(LowtideError::Data {
                reason: format!(
                    "bar dates not strictly increasing: {} then {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderRequest;

    struct NeverTrades;

    impl Strategy for NeverTrades {
        fn on_bar(&mut self, _ctx: &BarContext<'_>) -> Option<OrderRequest> {
            None
        }
    }

    fn make_bar(day: u32, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    fn config() -> BacktestConfig {
        BacktestConfig {
            symbol: "BTC/USDC".into(),
            ..BacktestConfig::default()
        }
    }

    #[test]
    fn empty_series_is_fatal() {
        let err = run_backtest(&[], &mut NeverTrades, &config()).unwrap_err();
        assert!(matches!(err, LowtideError::NoData { symbol } if symbol == "BTC/USDC"));
    }

    #[test]
    fn unsorted_dates_are_fatal() {
        let bars = vec![make_bar(2, 10.0), make_bar(1, 9.0)];
        let err = run_backtest(&bars, &mut NeverTrades, &config()).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn duplicate_dates_are_fatal() {
        let bars = vec![make_bar(1, 10.0), make_bar(1, 9.0)];
        let err = run_backtest(&bars, &mut NeverTrades, &config()).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn nan_close_is_fatal() {
        let bars = vec![make_bar(1, 10.0), make_bar(2, f64::NAN)];
        let err = run_backtest(&bars, &mut NeverTrades, &config()).unwrap_err();
        assert!(matches!(err, LowtideError::Data { .. }));
    }

    #[test]
    fn idle_strategy_preserves_cash() {
        let bars = vec![make_bar(1, 10.0), make_bar(2, 11.0)];
        let snapshot = run_backtest(&bars, &mut NeverTrades, &config()).unwrap();

        assert_eq!(snapshot.starting_cash, 1000.0);
        assert_eq!(snapshot.final_value, 1000.0);
    }

    #[test]
    fn default_config() {
        let c = BacktestConfig::default();
        assert_eq!(c.initial_cash, 1000.0);
        assert_eq!(c.commission_pct, 0.0);
        assert_eq!(c.sizer, Sizer::PercentOfCash(100.0));
        assert!(c.start_date.is_none());
        assert!(c.end_date.is_none());
    }
}
