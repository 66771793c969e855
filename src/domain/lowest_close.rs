//! Lowest-close mean-reversion strategy.
//!
//! Enter when today's close is the lowest close of the trailing `period`
//! bars and nothing is held; exit on the first close above the prior close
//! while long.

use crate::domain::order::{FillLog, Order, OrderRequest};
use crate::domain::position::{ClosedTrade, PositionState, TradeLedger};
use crate::domain::report::PerformanceReport;
use crate::domain::strategy::{BarContext, RunContext, Strategy};

pub const DEFAULT_PERIOD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowestCloseParams {
    /// Trailing window size for the rolling low. Positive.
    pub period: usize,
}

impl Default for LowestCloseParams {
    fn default() -> Self {
        LowestCloseParams {
            period: DEFAULT_PERIOD,
        }
    }
}

/// Per-bar decision outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enter,
    Exit,
    Hold,
}

/// Pure decision function.
///
/// The entry predicate is evaluated first: a close that ties the rolling low
/// while long is a Hold, even if it also ticked up. Equality is exact; the
/// rolling low is computed from the same close values it is compared
/// against.
pub fn decide(
    close: f64,
    rolling_low: f64,
    prev_close: Option<f64>,
    position: PositionState,
) -> Action {
    if close == rolling_low {
        if position.is_flat() {
            Action::Enter
        } else {
            Action::Hold
        }
    } else if position.is_long() && prev_close.is_some_and(|prev| close > prev) {
        Action::Exit
    } else {
        Action::Hold
    }
}

/// Strategy instance for one backtest run.
///
/// Owns the fill log, the trade ledger, and (after the run) the performance
/// report; all are created at run start and discarded with the instance.
#[derive(Debug, Default)]
pub struct LowestCloseStrategy {
    params: LowestCloseParams,
    fills: FillLog,
    ledger: TradeLedger,
    report: Option<PerformanceReport>,
}

impl LowestCloseStrategy {
    pub fn new(params: LowestCloseParams) -> Self {
        LowestCloseStrategy {
            params,
            fills: FillLog::default(),
            ledger: TradeLedger::new(),
            report: None,
        }
    }

    pub fn params(&self) -> LowestCloseParams {
        self.params
    }

    pub fn fills(&self) -> &FillLog {
        &self.fills
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    /// The report computed by `on_run_complete`; `None` before the run ends.
    pub fn report(&self) -> Option<&PerformanceReport> {
        self.report.as_ref()
    }

    pub fn into_report(self) -> Option<PerformanceReport> {
        self.report
    }
}

impl Strategy for LowestCloseStrategy {
    fn lookback(&self) -> usize {
        self.params.period
    }

    fn on_bar(&mut self, ctx: &BarContext<'_>) -> Option<OrderRequest> {
        // No decisions until the rolling low is defined.
        let rolling_low = ctx.rolling_low()?;
        let close = ctx.bar().close;
        let prev_close = ctx.bar_at(-1).map(|b| b.close);

        match decide(close, rolling_low, prev_close, ctx.position()) {
            Action::Enter => Some(OrderRequest::buy()),
            Action::Exit => Some(OrderRequest::sell()),
            Action::Hold => None,
        }
    }

    fn notify_order(&mut self, order: &Order) {
        self.fills.record(order);
    }

    fn notify_trade(&mut self, trade: &ClosedTrade) {
        self.ledger.record(trade.clone());
    }

    fn on_run_complete(&mut self, ctx: &RunContext<'_>) {
        self.report = Some(PerformanceReport::compute(
            ctx.symbol,
            self.params.period,
            ctx.starting_cash,
            ctx.final_value,
            ctx.bars,
            self.ledger.trades(),
        ));
    }
}
