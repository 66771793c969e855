//! Order types and per-side fill tracking.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// What a strategy submits. Sizing is delegated to the broker's sizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    pub side: Side,
}

impl OrderRequest {
    pub fn buy() -> Self {
        OrderRequest { side: Side::Buy }
    }

    pub fn sell() -> Self {
        OrderRequest { side: Side::Sell }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Submitted,
    Completed,
    Rejected,
}

/// Recorded outcome of a completed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutedFill {
    pub price: f64,
    pub commission: f64,
    pub quantity: i64,
}

/// An order as resolved by the broker. `fill` is present exactly when
/// `status` is `Completed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub side: Side,
    pub submitted: NaiveDate,
    pub status: OrderStatus,
    pub fill: Option<ExecutedFill>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

/// Most recent completed fill per side.
///
/// A new completed buy overwrites the previous entry fill, a completed sell
/// the previous exit fill. Rejected orders leave the log untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FillLog {
    entry: Option<FillRecord>,
    exit: Option<FillRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRecord {
    pub price: f64,
    pub commission: f64,
}

impl FillLog {
    pub fn record(&mut self, order: &Order) {
        if !order.is_completed() {
            return;
        }
        let Some(fill) = order.fill else {
            return;
        };
        let record = FillRecord {
            price: fill.price,
            commission: fill.commission,
        };
        match order.side {
            Side::Buy => self.entry = Some(record),
            Side::Sell => self.exit = Some(record),
        }
    }

    pub fn entry(&self) -> Option<FillRecord> {
        self.entry
    }

    pub fn exit(&self) -> Option<FillRecord> {
        self.exit
    }
}
