//! Order execution and account accounting.
//!
//! Market orders fill at the submitting bar's close. Rejections complete the
//! order with no fill and no account change.

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::order::{ExecutedFill, Order, OrderRequest, OrderStatus, Side};
use crate::domain::position::{ClosedTrade, OpenPosition, PositionState};

/// Position-sizing policy applied to buy orders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizer {
    /// Always this many units.
    FixedUnits(i64),
    /// Spend this percentage of available cash, floored to whole units.
    PercentOfCash(f64),
}

impl Default for Sizer {
    fn default() -> Self {
        Sizer::PercentOfCash(100.0)
    }
}

impl Sizer {
    pub fn size(&self, cash: f64, price: f64) -> i64 {
        match *self {
            Sizer::FixedUnits(n) => n,
            Sizer::PercentOfCash(pct) => {
                if price <= 0.0 {
                    return 0;
                }
                (cash * pct / 100.0 / price).floor() as i64
            }
        }
    }
}

/// Commission: trade_value * pct / 100.
pub fn calculate_commission(trade_value: f64, commission_pct: f64) -> f64 {
    trade_value * commission_pct / 100.0
}

/// Simulated account: cash plus at most one open parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct Broker {
    cash: f64,
    position: Option<OpenPosition>,
    commission_pct: f64,
    sizer: Sizer,
}

impl Broker {
    pub fn new(initial_cash: f64, commission_pct: f64, sizer: Sizer) -> Self {
        Broker {
            cash: initial_cash,
            position: None,
            commission_pct,
            sizer,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position_state(&self) -> PositionState {
        if self.position.is_some() {
            PositionState::Long
        } else {
            PositionState::Flat
        }
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        self.position.as_ref()
    }

    /// Account value marked to the given price.
    pub fn value(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map(|p| p.market_value(price))
            .unwrap_or(0.0);
        self.cash + position_value
    }

    /// Execute a request against the given bar at its close. Returns the
    /// resolved order and, when a sell closed the round trip, the trade.
    pub fn execute(&mut self, request: OrderRequest, bar: &OhlcvBar) -> (Order, Option<ClosedTrade>) {
        match request.side {
            Side::Buy => (self.execute_buy(bar), None),
            Side::Sell => self.execute_sell(bar),
        }
    }

    fn execute_buy(&mut self, bar: &OhlcvBar) -> Order {
        let mut order = submitted(Side::Buy, bar.date);

        if self.position.is_some() {
            order.status = OrderStatus::Rejected;
            return order;
        }

        let price = bar.close;
        let quantity = self.sizer.size(self.cash, price);
        if quantity <= 0 {
            order.status = OrderStatus::Rejected;
            return order;
        }

        let cost = quantity as f64 * price;
        let commission = calculate_commission(cost, self.commission_pct);
        if cost + commission > self.cash {
            order.status = OrderStatus::Rejected;
            return order;
        }

        self.cash -= cost + commission;
        self.position = Some(OpenPosition {
            quantity,
            entry_price: price,
            entry_date: bar.date,
            entry_commission: commission,
        });

        order.status = OrderStatus::Completed;
        order.fill = Some(ExecutedFill {
            price,
            commission,
            quantity,
        });
        order
    }

    fn execute_sell(&mut self, bar: &OhlcvBar) -> (Order, Option<ClosedTrade>) {
        let mut order = submitted(Side::Sell, bar.date);

        let Some(position) = self.position.take() else {
            order.status = OrderStatus::Rejected;
            return (order, None);
        };

        let price = bar.close;
        let proceeds = position.quantity as f64 * price;
        let commission = calculate_commission(proceeds, self.commission_pct);

        self.cash += proceeds - commission;

        let pnl = position.quantity as f64 * (price - position.entry_price)
            - position.entry_commission
            - commission;

        let trade = ClosedTrade {
            quantity: position.quantity,
            entry_price: position.entry_price,
            exit_price: price,
            entry_date: position.entry_date,
            exit_date: bar.date,
            pnl,
        };

        order.status = OrderStatus::Completed;
        order.fill = Some(ExecutedFill {
            price,
            commission,
            quantity: position.quantity,
        });
        (order, Some(trade))
    }
}

fn submitted(side: Side, date: NaiveDate) -> Order {
    Order {
        side,
        submitted: date,
        status: OrderStatus::Submitted,
        fill: None,
    }
}
