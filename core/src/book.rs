use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::trace;

use crate::error::{EngineFault, InvalidOrder};
use crate::types::{ArrivalSeq, Order, OrderId, Price, Quantity, Side};

/// An ordered queue of [`Order`]s resting at one price. Preserves insertion
/// order; `arrival_seq` is strictly increasing from front to back.
#[derive(Debug, Default)]
pub struct PriceLevel {
    orders: VecDeque<Order>,
}

impl PriceLevel {
    fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn aggregate_size(&self) -> Quantity {
        self.orders
            .iter()
            .fold(Quantity::ZERO, |acc, o| acc + o.remaining_size)
    }

    /// Removes the order with `id`, preserving FIFO order of the rest.
    /// Returns `true` iff an order was removed.
    fn remove(&mut self, id: OrderId) -> bool {
        if let Some(pos) = self.orders.iter().position(|o| o.id == id) {
            self.orders.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

/// The two-sided in-memory limit order book.
///
/// `bids` and `asks` are sorted maps keyed by price; `bids` is walked in
/// descending order and `asks` in ascending order by the matching engine and
/// by `depth`/`best_*`. `index` gives O(1) `(side, price)` lookup for cancel;
/// locating the order's exact queue position within a level is then a scan of
/// that level, which in practice holds a handful of resting orders.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<Price, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
    index: HashMap<OrderId, (Side, Price)>,
    next_seq: ArrivalSeq,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn side_map(&self, side: Side) -> &BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_map_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Places `order` at the back of its side's price level.
    ///
    /// Precondition (caller's responsibility, enforced by the matching
    /// engine): the order does not cross the opposite side.
    pub fn insert_resting(&mut self, mut order: Order) -> Result<OrderId, InvalidOrder> {
        if order.id == 0 {
            return Err(InvalidOrder::EmptyId);
        }
        if order.price.0 <= 0 {
            return Err(InvalidOrder::NonPositivePrice);
        }
        if order.remaining_size.is_zero() || order.remaining_size.0 < 0 {
            return Err(InvalidOrder::NonPositiveSize);
        }
        if self.index.contains_key(&order.id) {
            return Err(InvalidOrder::DuplicateId(order.id));
        }

        order.arrival_seq = self.next_seq;
        self.next_seq += 1;

        let id = order.id;
        let side = order.side;
        let price = order.price;
        self.index.insert(id, (side, price));
        self.side_map_mut(side).entry(price).or_default().push_back(order);

        trace!(order_id = id, ?side, price = price.0, "order resting");
        Ok(id)
    }

    /// Removes `order_id` from the book. Idempotent: a second call on an
    /// already-removed id returns `false`, never an error.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let Some((side, price)) = self.index.remove(&order_id) else {
            return false;
        };

        let map = self.side_map_mut(side);
        let Some(level) = map.get_mut(&price) else {
            return false;
        };
        let removed = level.remove(order_id);
        if level.is_empty() {
            map.remove(&price);
        }
        if removed {
            trace!(order_id, ?side, price = price.0, "order cancelled");
        }
        removed
    }

    /// Reduces a resting order's size in place, preserving its queue
    /// position. Used to absorb a shrinking depth delta without
    /// disturbing FIFO priority the way a cancel-and-re-rest would. Removes
    /// the order (and the level, if now empty) when `new_size` is zero.
    pub(crate) fn shrink_resting(&mut self, order_id: OrderId, new_size: Quantity) {
        let Some(&(side, price)) = self.index.get(&order_id) else {
            return;
        };
        let map = self.side_map_mut(side);
        let Some(level) = map.get_mut(&price) else {
            return;
        };
        if new_size.is_zero() {
            level.remove(order_id);
            if level.is_empty() {
                map.remove(&price);
            }
            self.index.remove(&order_id);
        } else if let Some(order) = level.orders.iter_mut().find(|o| o.id == order_id) {
            order.remaining_size = new_size;
        }
    }

    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids
            .iter()
            .next_back()
            .map(|(p, level)| (*p, level.aggregate_size()))
    }

    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks
            .iter()
            .next()
            .map(|(p, level)| (*p, level.aggregate_size()))
    }

    /// Top-`n` levels for `side`, best price first.
    pub fn depth(&self, side: Side, n: usize) -> Vec<(Price, Quantity)> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .rev()
                .take(n)
                .map(|(p, l)| (*p, l.aggregate_size()))
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .take(n)
                .map(|(p, l)| (*p, l.aggregate_size()))
                .collect(),
        }
    }

    pub fn find(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = self.index.get(&order_id)?;
        self.side_map(*side)
            .get(price)?
            .iter()
            .find(|o| o.id == order_id)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// All resting orders at `(side, price)`, best (front) first. Used by the
    /// replay simulator to reconcile depth deltas against EXCHANGE-origin
    /// orders without disturbing MAKER orders at the same level.
    pub fn orders_at(&self, side: Side, price: Price) -> impl Iterator<Item = &Order> {
        self.side_map(side)
            .get(&price)
            .into_iter()
            .flat_map(|level| level.iter())
    }

    /// Matches `remaining` units of `taker_side`'s counter-side liquidity up
    /// to (and including) `limit_price`, invoking `on_fill(maker_order,
    /// matched_size)` for each maker touched in strict price-time priority.
    /// Fully consumed makers are removed from the book and unindexed; emptied
    /// levels are removed atomically with the last erase. Returns the
    /// remaining unfilled size.
    ///
    /// `taker_side` is the side of the incoming order; matching walks the
    /// opposite side. Before touching each maker this defensively verifies
    /// that the index and the level agree on where it rests, and that its
    /// resting size is still positive; either violation aborts the match
    /// with an [`EngineFault`] instead of silently matching against
    /// corrupted state.
    pub(crate) fn match_incoming(
        &mut self,
        taker_side: Side,
        limit_price: Price,
        mut remaining: Quantity,
        mut on_fill: impl FnMut(&Order, Quantity),
    ) -> Result<Quantity, EngineFault> {
        let opposite = taker_side.opposite();
        loop {
            if remaining.is_zero() {
                break;
            }
            let Some((level_price, _)) = self.best_level_price(opposite) else {
                break;
            };
            let crosses = match taker_side {
                Side::Buy => level_price <= limit_price,
                Side::Sell => level_price >= limit_price,
            };
            if !crosses {
                break;
            }

            let front_id = {
                let level = self.side_map(opposite).get(&level_price);
                match level.and_then(|l| l.orders.front()) {
                    Some(order) => order.id,
                    None => {
                        self.side_map_mut(opposite).remove(&level_price);
                        return Err(EngineFault::EmptyLevelNotRemoved { side: opposite, price: level_price });
                    }
                }
            };

            if self.index.get(&front_id) != Some(&(opposite, level_price)) {
                self.index.remove(&front_id);
                let map = self.side_map_mut(opposite);
                if let Some(level) = map.get_mut(&level_price) {
                    level.remove(front_id);
                }
                if map.get(&level_price).is_some_and(PriceLevel::is_empty) {
                    map.remove(&level_price);
                }
                return Err(EngineFault::DanglingIndexEntry(front_id));
            }

            let map = self.side_map_mut(opposite);
            let level = map.get_mut(&level_price).expect("level presence just confirmed");

            let front_remaining = level.orders.front().expect("front just confirmed").remaining_size;
            if front_remaining.0 <= 0 {
                level.orders.pop_front();
                if level.is_empty() {
                    map.remove(&level_price);
                }
                self.index.remove(&front_id);
                return Err(EngineFault::CorruptRestingSize {
                    order_id: front_id,
                    remaining_size: front_remaining.0,
                });
            }

            let mut fully_filled_id = None;
            if let Some(maker) = level.orders.front_mut() {
                let matched = remaining.min(maker.remaining_size);
                on_fill(maker, matched);
                maker.remaining_size -= matched;
                remaining -= matched;
                if maker.remaining_size.is_zero() {
                    fully_filled_id = Some(maker.id);
                }
            }

            if let Some(id) = fully_filled_id {
                level.orders.pop_front();
                self.index.remove(&id);
            }

            let map = self.side_map_mut(opposite);
            if map.get(&level_price).is_some_and(PriceLevel::is_empty) {
                map.remove(&level_price);
            }
        }
        Ok(remaining)
    }

    fn best_level_price(&self, side: Side) -> Option<(Price, Quantity)> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
        }
    }
}
