use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Number of fixed-point ticks per unit of quoted price or base-asset size.
///
/// Both [`Price`] and `Quantity` are stored as `i64` scaled by this factor so
/// that all book arithmetic is exact integer arithmetic; no comparison in the
/// matching path ever touches a float.
pub const FIXED_POINT_SCALE: i64 = 100_000_000;

/// Opaque, caller-assigned order identifier. Unique across the book's lifetime.
pub type OrderId = u64;

/// Monotonically increasing sequence assigned by the [`crate::book::OrderBook`]
/// at insertion time. Defines intra-level time priority; never the wall clock,
/// never reused.
pub type ArrivalSeq = u64;

/// A strictly positive price, represented as a fixed-scale integer (ticks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub i64);

impl Price {
    pub fn from_decimal(value: Decimal) -> Self {
        let scaled = (value * Decimal::from(FIXED_POINT_SCALE)).round();
        Price(scaled.to_i64().expect("price out of fixed-point range"))
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(FIXED_POINT_SCALE)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// A strictly positive base-asset size, represented as a fixed-scale integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(pub i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn from_decimal(value: Decimal) -> Self {
        let scaled = (value * Decimal::from(FIXED_POINT_SCALE)).round();
        Quantity(scaled.to_i64().expect("quantity out of fixed-point range"))
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(FIXED_POINT_SCALE)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn min(self, other: Quantity) -> Quantity {
        Quantity(self.0.min(other.0))
    }
}

impl Add for Quantity {
    type Output = Quantity;
    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;
    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// Side of the book an order or fill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Distinguishes the strategy's own resting orders from synthetic orders the
/// [`crate::replay::ReplaySimulator`] synthesizes to represent aggregated
/// external liquidity at a depth-feed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Aggregated external liquidity reconciled from a depth-delta event.
    Exchange,
    /// The quoting strategy's own resting order.
    Maker,
}

/// Immediate-or-cancel: discard any unmatched remainder instead of resting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeInForce {
    #[default]
    GoodTillCancelled,
    ImmediateOrCancel,
}

/// The unit of matching.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub remaining_size: Quantity,
    pub arrival_seq: ArrivalSeq,
    pub origin: Origin,
    pub time_in_force: TimeInForce,
    /// Logical timestamp (nanoseconds) at which the order was submitted.
    pub timestamp: u64,
}

impl Order {
    /// Builds an order prior to book admission; `arrival_seq` is assigned by
    /// the book on `insert_resting`, not here.
    pub fn new(
        id: OrderId,
        side: Side,
        price: Price,
        size: Quantity,
        origin: Origin,
        timestamp: u64,
    ) -> Self {
        Order {
            id,
            side,
            price,
            remaining_size: size,
            arrival_seq: 0,
            origin,
            time_in_force: TimeInForce::GoodTillCancelled,
            timestamp,
        }
    }

    pub fn ioc(mut self) -> Self {
        self.time_in_force = TimeInForce::ImmediateOrCancel;
        self
    }
}

/// Emitted atomically when matching reduces a maker's `remaining_size`.
///
/// `price` is always the maker's resting price — price improvement flows to
/// the taker, never the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub taker_origin: Origin,
    pub maker_origin: Origin,
    pub price: Price,
    pub size: Quantity,
    pub timestamp: u64,
}
