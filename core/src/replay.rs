use tracing::{error, trace, warn};

use crate::book::OrderBook;
use crate::error::{EngineFault, ProtocolError, ReplayError, SubmitError};
use crate::features::FeatureExtractor;
use crate::ledger::Ledger;
use crate::matching::MatchingEngine;
use crate::strategy::Strategy;
use crate::types::{Fill, Order, OrderId, Origin, Price, Quantity, Side};

/// One record of the book-event stream the replay simulator (and, by the
/// same contract, the live loop) consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookEvent {
    /// The venue reports that aggregated resting liquidity at `(side,
    /// price)` is now `new_aggregate_size`.
    DepthDelta {
        side: Side,
        price: Price,
        new_aggregate_size: Quantity,
        ts: u64,
    },
    /// A taker consumed resting liquidity on `side` at `price`.
    Trade {
        side: Side,
        price: Price,
        size: Quantity,
        ts: u64,
    },
    /// A pure clock advance with no book mutation.
    Tick { ts: u64 },
}

impl BookEvent {
    pub fn ts(&self) -> u64 {
        match self {
            BookEvent::DepthDelta { ts, .. } => *ts,
            BookEvent::Trade { ts, .. } => *ts,
            BookEvent::Tick { ts } => *ts,
        }
    }
}

/// Per-step outcome handed back to the caller driving the simulator, mostly
/// useful for the CLI's summary/logging layer.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub fills: Vec<Fill>,
}

/// Drives the Book Store, Matching Engine, Feature Extractor, and Quoting
/// Strategy over a sequence of recorded depth events.
///
/// Strictly single-threaded cooperative: one event at a time, no
/// concurrency within a run. Given the same event stream, strategy, and
/// parameters, two runs produce byte-identical fill logs and final book
/// state (no wall-clock reads, no unordered iteration).
pub struct ReplaySimulator<S: Strategy> {
    book: OrderBook,
    features: FeatureExtractor,
    strategy: S,
    ledger: Ledger,
    clock: u64,
    last_event_ts: Option<u64>,
    next_maker_id: OrderId,
    next_synthetic_id: OrderId,
    open_maker_quotes: Vec<OrderId>,
    fills: Vec<Fill>,
}

impl<S: Strategy> ReplaySimulator<S> {
    pub fn new(strategy: S, ring_capacity: usize, volatility_window: usize) -> Self {
        ReplaySimulator {
            book: OrderBook::new(),
            features: FeatureExtractor::new(ring_capacity, volatility_window),
            strategy,
            ledger: Ledger::new(),
            clock: 0,
            last_event_ts: None,
            next_maker_id: 1,
            // MAKER ids and EXCHANGE-synthetic ids are drawn from disjoint
            // ranges so a collision between the two origins is impossible.
            next_synthetic_id: 1 << 62,
            open_maker_quotes: Vec::new(),
            fills: Vec::new(),
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    pub fn open_quotes(&self) -> &[OrderId] {
        &self.open_maker_quotes
    }

    /// Cancels every currently open maker quote, returning the ids that
    /// were cancelled. Used for an orderly shutdown outside the normal
    /// event-driven step loop.
    pub fn cancel_all(&mut self) -> Vec<OrderId> {
        let ids = std::mem::take(&mut self.open_maker_quotes);
        let mut engine = MatchingEngine::new(&mut self.book);
        for id in &ids {
            engine.cancel(*id);
        }
        ids
    }

    /// Runs the full event stream to completion, aborting on the first
    /// [`ReplayError`] (out-of-order event or internal engine fault).
    pub fn run(&mut self, events: impl IntoIterator<Item = BookEvent>) -> Result<(), ReplayError> {
        for event in events {
            self.step(event)?;
        }
        Ok(())
    }

    /// Applies exactly one event: advance clock, apply to the book, extract
    /// features, invoke the strategy, reconcile cancels then inserts.
    pub fn step(&mut self, event: BookEvent) -> Result<StepOutcome, ReplayError> {
        let ts = event.ts();
        if let Some(last) = self.last_event_ts {
            if ts < last {
                error!(ts, last_ts = last, "out-of-order event");
                return Err(ProtocolError::OutOfOrder { ts, last_ts: last }.into());
            }
        }
        self.clock = ts;
        self.last_event_ts = Some(ts);

        let mut step_fills = Vec::new();
        match event {
            BookEvent::DepthDelta {
                side,
                price,
                new_aggregate_size,
                ts,
            } => {
                self.reconcile_depth_delta(side, price, new_aggregate_size, ts)?;
            }
            BookEvent::Trade { side, price, size, ts } => {
                let taker = Order::new(
                    self.next_synthetic_id(),
                    side,
                    price,
                    size,
                    Origin::Exchange,
                    ts,
                )
                .ioc();
                let mut engine = MatchingEngine::new(&mut self.book);
                let fills = match engine.submit(taker) {
                    Ok(fills) => fills,
                    Err(SubmitError::Invalid(e)) => {
                        warn!(error = %e, "malformed synthetic taker order, dropping");
                        Vec::new()
                    }
                    Err(SubmitError::Fault(fault)) => return Err(fault.into()),
                };
                for fill in &fills {
                    self.record_fill(fill);
                }
                step_fills.extend(fills);
            }
            BookEvent::Tick { .. } => {}
        }

        self.features.observe(&self.book);
        let features = self.features.extract(&self.book);
        let action = self
            .strategy
            .on_step(&features, &self.ledger, &self.open_maker_quotes, self.clock);

        // Cancels run before inserts within a single step.
        for id in &action.cancel {
            let mut engine = MatchingEngine::new(&mut self.book);
            engine.cancel(*id);
        }
        self.open_maker_quotes.retain(|id| !action.cancel.contains(id));

        for intent in action.submit {
            let id = self.next_maker_id();
            let order = Order::new(id, intent.side, intent.price, intent.size, Origin::Maker, self.clock);
            let mut engine = MatchingEngine::new(&mut self.book);
            match engine.submit(order) {
                Ok(fills) => {
                    for fill in &fills {
                        self.record_fill(fill);
                    }
                    if self.book.contains(id) {
                        self.open_maker_quotes.push(id);
                    }
                    step_fills.extend(fills);
                }
                Err(SubmitError::Invalid(e)) => {
                    warn!(error = %e, order_id = id, "strategy submitted invalid order");
                }
                Err(SubmitError::Fault(fault)) => return Err(fault.into()),
            }
        }

        self.fills.extend(step_fills.iter().cloned());
        Ok(StepOutcome { fills: step_fills })
    }

    fn record_fill(&mut self, fill: &Fill) {
        if fill.maker_origin == Origin::Maker {
            let maker_side = self
                .book
                .find(fill.maker_order_id)
                .map(|o| o.side)
                // Order may already be fully filled and gone from the book;
                // the maker side is then the opposite of the taker's side.
                .unwrap_or_else(|| self.infer_maker_side(fill));
            self.ledger.record_fill(fill, maker_side);
            trace!(
                maker_id = fill.maker_order_id,
                taker_id = fill.taker_order_id,
                price = fill.price.0,
                size = fill.size.0,
                "maker fill recorded in ledger"
            );
        }
    }

    fn infer_maker_side(&self, fill: &Fill) -> Side {
        // The maker and taker of a trade are always on opposite sides.
        if self.book.contains(fill.taker_order_id) {
            self.book
                .find(fill.taker_order_id)
                .map(|o| o.side.opposite())
                .unwrap_or(Side::Buy)
        } else {
            Side::Buy
        }
    }

    /// Reconciles a depth delta by synthesizing/consuming EXCHANGE-origin
    /// orders at `(side, price)`. MAKER orders at that level are never
    /// touched.
    fn reconcile_depth_delta(
        &mut self,
        side: Side,
        price: Price,
        new_aggregate_size: Quantity,
        ts: u64,
    ) -> Result<(), EngineFault> {
        let exchange_total: i64 = self
            .book
            .orders_at(side, price)
            .filter(|o| o.origin == Origin::Exchange)
            .map(|o| o.remaining_size.0)
            .sum();

        let delta = new_aggregate_size.0 - exchange_total;
        if delta > 0 {
            let id = self.next_synthetic_id();
            let order = Order::new(id, side, price, Quantity(delta), Origin::Exchange, ts);
            let mut engine = MatchingEngine::new(&mut self.book);
            match engine.submit(order) {
                Ok(_) => {}
                Err(SubmitError::Invalid(e)) => {
                    warn!(error = %e, "failed to synthesize exchange liquidity");
                }
                Err(SubmitError::Fault(fault)) => return Err(fault),
            }
        } else if delta < 0 {
            let mut to_absorb = -delta;
            let exchange_ids: Vec<OrderId> = self
                .book
                .orders_at(side, price)
                .filter(|o| o.origin == Origin::Exchange)
                .map(|o| o.id)
                .collect();
            for id in exchange_ids {
                if to_absorb <= 0 {
                    break;
                }
                let Some(order) = self.book.find(id) else { continue };
                let available = order.remaining_size.0;
                if available <= to_absorb {
                    self.book.cancel(id);
                    to_absorb -= available;
                } else {
                    // Partial reduction: cancel and re-rest the remainder at
                    // the back would break FIFO priority, so instead we
                    // shrink it in place via a direct book mutation.
                    self.shrink_order(id, Quantity(available - to_absorb));
                    to_absorb = 0;
                }
            }
        }
        Ok(())
    }

    fn shrink_order(&mut self, id: OrderId, new_size: Quantity) {
        self.book.shrink_resting(id, new_size);
    }

    fn next_maker_id(&mut self) -> OrderId {
        let id = self.next_maker_id;
        self.next_maker_id += 1;
        id
    }

    fn next_synthetic_id(&mut self) -> OrderId {
        let id = self.next_synthetic_id;
        self.next_synthetic_id += 1;
        id
    }
}
