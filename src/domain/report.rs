//! Run-end performance report.

use std::fmt;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::ClosedTrade;

/// Comparative performance statistics for one completed run.
///
/// `best_trade`/`worst_trade` are `None` when no round trip closed; every
/// average degrades to 0.0 when its subset is empty instead of faulting.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub symbol: String,
    pub period: usize,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub performance_vs_cash: f64,
    pub buy_and_hold: f64,
    pub performance_vs_buy_and_hold: f64,
    pub best_trade: Option<f64>,
    pub worst_trade: Option<f64>,
    pub total_trades: usize,
    pub positive_trades: usize,
    pub negative_trades: usize,
    pub win_rate: f64,
    pub avg_trade: f64,
    pub avg_positive: f64,
    pub avg_negative: f64,
}

impl PerformanceReport {
    pub fn compute(
        symbol: &str,
        period: usize,
        starting_cash: f64,
        final_value: f64,
        bars: &[OhlcvBar],
        trades: &[ClosedTrade],
    ) -> Self {
        let performance_vs_cash = final_value - starting_cash;

        // Raw one-unit price delta across the series, deliberately not
        // scaled to starting cash.
        let buy_and_hold = match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => last.close - first.close,
            _ => 0.0,
        };
        let performance_vs_buy_and_hold = performance_vs_cash - buy_and_hold;

        let total_trades = trades.len();
        let positive_trades = trades.iter().filter(|t| t.pnl > 0.0).count();
        // Zero-pnl trades land in the negative bucket.
        let negative_trades = total_trades - positive_trades;

        let win_rate = if total_trades > 0 {
            positive_trades as f64 / total_trades as f64
        } else {
            0.0
        };

        let best_trade = trades.iter().map(|t| t.pnl).max_by(f64::total_cmp);
        let worst_trade = trades.iter().map(|t| t.pnl).min_by(f64::total_cmp);

        let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
        let avg_trade = if total_trades > 0 {
            total_pnl / total_trades as f64
        } else {
            0.0
        };

        let positive_pnl: f64 = trades.iter().map(|t| t.pnl).filter(|&p| p > 0.0).sum();
        let avg_positive = if positive_trades > 0 {
            positive_pnl / positive_trades as f64
        } else {
            0.0
        };

        // The denominator is the negative COUNT, which includes zero-pnl
        // trades, while the numerator sums only strictly-negative pnl.
        let negative_pnl: f64 = trades.iter().map(|t| t.pnl).filter(|&p| p < 0.0).sum();
        let avg_negative = if negative_trades > 0 {
            negative_pnl / negative_trades as f64
        } else {
            0.0
        };

        PerformanceReport {
            symbol: symbol.to_string(),
            period,
            starting_balance: starting_cash,
            final_balance: final_value,
            performance_vs_cash,
            buy_and_hold,
            performance_vs_buy_and_hold,
            best_trade,
            worst_trade,
            total_trades,
            positive_trades,
            negative_trades,
            win_rate,
            avg_trade,
            avg_positive,
            avg_negative,
        }
    }
}

fn fmt_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- General Information -----")?;
        writeln!(f, "Pair Symbol: {}", self.symbol)?;
        writeln!(f, "Period: {}", self.period)?;
        writeln!(f, "Starting balance: {:.2}", self.starting_balance)?;
        writeln!(f, "Final balance: {:.2}", self.final_balance)?;
        writeln!(f, "Performance vs US Dollar: {:.2}", self.performance_vs_cash)?;
        writeln!(f, "Buy and Hold Performance: {:.2}", self.buy_and_hold)?;
        writeln!(
            f,
            "Performance vs Buy and Hold: {:.2}",
            self.performance_vs_buy_and_hold
        )?;
        writeln!(f, "Best trade: {}", fmt_optional(self.best_trade))?;
        writeln!(f, "Worst trade: {}", fmt_optional(self.worst_trade))?;
        writeln!(f, "----- Trades Information -----")?;
        writeln!(f, "Total trades on period: {}", self.total_trades)?;
        writeln!(f, "Number of positive trades: {}", self.positive_trades)?;
        writeln!(f, "Number of negative trades: {}", self.negative_trades)?;
        writeln!(f, "Trades win rate ratio: {:.2}%", self.win_rate * 100.0)?;
        writeln!(f, "Average trades performance: {:.2}", self.avg_trade)?;
        writeln!(f, "Average positive trades: {:.2}", self.avg_positive)?;
        write!(f, "Average negative trades: {:.2}", self.avg_negative)
    }
}
