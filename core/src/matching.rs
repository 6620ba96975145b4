use tracing::trace;

use crate::book::OrderBook;
use crate::error::{InvalidOrder, SubmitError};
use crate::types::{Fill, Order, Side, TimeInForce};

/// The single authority that mutates an [`OrderBook`]'s contents via matches.
pub struct MatchingEngine<'a> {
    book: &'a mut OrderBook,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(book: &'a mut OrderBook) -> Self {
        MatchingEngine { book }
    }

    /// Matches `order` greedily against the opposite side under price-time
    /// priority, then rests any remainder (unless the order is IOC, in which
    /// case the remainder is discarded).
    ///
    /// Intra-level order is strictly FIFO by `arrival_seq`; fill price is
    /// always the resting maker's price, never the incoming order's price.
    ///
    /// Returns [`SubmitError::Fault`] if the book's internal state is found
    /// to violate a precondition while matching; the caller must then treat
    /// the book as undefined and abort the run rather than continue.
    pub fn submit(&mut self, mut order: Order) -> Result<Vec<Fill>, SubmitError> {
        if order.id == 0 {
            return Err(InvalidOrder::EmptyId.into());
        }
        if order.price.0 <= 0 {
            return Err(InvalidOrder::NonPositivePrice.into());
        }
        if order.remaining_size.0 <= 0 {
            return Err(InvalidOrder::NonPositiveSize.into());
        }
        if self.book.contains(order.id) {
            return Err(InvalidOrder::DuplicateId(order.id).into());
        }

        let mut fills = Vec::new();
        let taker_side = order.side;
        let taker_origin = order.origin;
        let taker_id = order.id;
        let limit_price = order.price;
        let timestamp = order.timestamp;
        let requested = order.remaining_size;

        let remaining = self.book.match_incoming(
            taker_side,
            limit_price,
            requested,
            |maker, matched_size| {
                trace!(
                    taker_id,
                    maker_id = maker.id,
                    price = maker.price.0,
                    size = matched_size.0,
                    "fill"
                );
                fills.push(Fill {
                    taker_order_id: taker_id,
                    maker_order_id: maker.id,
                    taker_origin,
                    maker_origin: maker.origin,
                    price: maker.price,
                    size: matched_size,
                    timestamp,
                });
            },
        )?;

        order.remaining_size = remaining;

        if !remaining.is_zero() {
            if order.time_in_force == TimeInForce::ImmediateOrCancel {
                trace!(taker_id, leftover = remaining.0, "ioc remainder discarded");
            } else {
                self.book.insert_resting(order)?;
            }
        }

        Ok(fills)
    }

    /// Cancels `order_id`. Never fails; absence is a boolean result.
    pub fn cancel(&mut self, order_id: crate::types::OrderId) -> bool {
        self.book.cancel(order_id)
    }

    pub fn book(&self) -> &OrderBook {
        self.book
    }
}

/// Greatest size a side could still absorb before book state would be
/// considered crossed; used only by property tests/invariant checks.
pub fn would_cross(book: &OrderBook, side: Side, price: crate::types::Price) -> bool {
    match side {
        Side::Buy => book.best_ask().is_some_and(|(ask, _)| price >= ask),
        Side::Sell => book.best_bid().is_some_and(|(bid, _)| price <= bid),
    }
}
