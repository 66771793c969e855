//! Strategy trait and the per-bar/end-of-run views the engine hands it.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::order::{Order, OrderRequest};
use crate::domain::position::{ClosedTrade, PositionState};

/// Everything a strategy may observe on one bar.
///
/// Offset 0 is the current bar; prior bars are negative offsets. Positive
/// offsets are refused so strategies stay causal.
#[derive(Debug)]
pub struct BarContext<'a> {
    pub(crate) bars: &'a [OhlcvBar],
    pub(crate) index: usize,
    pub(crate) rolling_low: Option<f64>,
    pub(crate) position: PositionState,
    pub(crate) cash: f64,
    pub(crate) value: f64,
}

impl BarContext<'_> {
    /// The current bar (offset 0).
    pub fn bar(&self) -> &OhlcvBar {
        &self.bars[self.index]
    }

    /// The bar at a non-positive offset from the current bar, if it exists.
    pub fn bar_at(&self, offset: i64) -> Option<&OhlcvBar> {
        if offset > 0 {
            return None;
        }
        let back = offset.unsigned_abs() as usize;
        self.index.checked_sub(back).map(|i| &self.bars[i])
    }

    /// Rolling low at the current bar; `None` until the warmup has elapsed.
    pub fn rolling_low(&self) -> Option<f64> {
        self.rolling_low
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Account value marked to the current close.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// End-of-run view handed to `on_run_complete` after the last bar.
#[derive(Debug)]
pub struct RunContext<'a> {
    pub symbol: &'a str,
    pub bars: &'a [OhlcvBar],
    pub starting_cash: f64,
    pub final_value: f64,
}

/// Callback contract between the engine and a strategy.
///
/// The engine drives a strictly synchronous sequence per bar: `on_bar`, then
/// (if an order was submitted) `notify_order`, then `notify_trade` if that
/// fill closed a round trip, all before the next bar. `on_run_complete`
/// fires exactly once, after the last bar and all notifications.
pub trait Strategy {
    /// Bars of history the strategy needs before its indicator is defined.
    fn lookback(&self) -> usize {
        0
    }

    /// Per-bar decision point. At most one order per bar.
    fn on_bar(&mut self, ctx: &BarContext<'_>) -> Option<OrderRequest>;

    /// Fired when a submitted order resolves (completed or rejected).
    fn notify_order(&mut self, _order: &Order) {}

    /// Fired when a round trip closes.
    fn notify_trade(&mut self, _trade: &ClosedTrade) {}

    /// Fired once after the last bar.
    fn on_run_complete(&mut self, _ctx: &RunContext<'_>) {}
}
