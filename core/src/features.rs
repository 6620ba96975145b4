use crate::book::OrderBook;
use crate::types::{Price, Quantity};

/// Fixed-capacity ring of mid-price samples, one per replayed event step.
/// Oldest samples are overwritten once the ring is full.
#[derive(Debug)]
pub struct MidPriceRing {
    capacity: usize,
    samples: Vec<f64>,
    next: usize,
    len: usize,
}

impl MidPriceRing {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "mid-price ring capacity must be positive");
        MidPriceRing {
            capacity,
            samples: vec![0.0; capacity],
            next: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, mid: f64) {
        self.samples[self.next] = mid;
        self.next = (self.next + 1) % self.capacity;
        self.len = (self.len + 1).min(self.capacity);
    }

    /// Standard deviation of the last `window` samples (most recent first);
    /// `0.0` when fewer than 2 samples are available.
    pub fn volatility(&self, window: usize) -> f64 {
        let n = window.min(self.len);
        if n < 2 {
            return 0.0;
        }
        let mut values = Vec::with_capacity(n);
        for i in 0..n {
            let idx = (self.next + self.capacity - 1 - i) % self.capacity;
            values.push(self.samples[idx]);
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        variance.sqrt()
    }
}

/// Size-weighted fair-value estimate between best bid and best ask.
/// `None` when either side of the book is empty.
pub fn microprice(book: &OrderBook) -> Option<f64> {
    let (bid_price, bid_size) = book.best_bid()?;
    let (ask_price, ask_size) = book.best_ask()?;
    let denom = bid_size.0 + ask_size.0;
    if denom == 0 {
        return None;
    }
    let numer = bid_price.0 as i128 * ask_size.0 as i128 + ask_price.0 as i128 * bid_size.0 as i128;
    Some(numer as f64 / denom as f64)
}

/// Arithmetic mid of best bid/ask; `None` when either side is empty.
pub fn mid_price(book: &OrderBook) -> Option<f64> {
    let (bid, _) = book.best_bid()?;
    let (ask, _) = book.best_ask()?;
    Some((bid.0 as f64 + ask.0 as f64) / 2.0)
}

/// Normalized difference between cumulative bid and ask size over the top `n`
/// levels on each side. Returns `0.0` when the combined size is `0`.
pub fn imbalance(book: &OrderBook, n: usize) -> f64 {
    let bid_sum: i64 = book.depth(crate::types::Side::Buy, n).iter().map(|(_, q)| q.0).sum();
    let ask_sum: i64 = book.depth(crate::types::Side::Sell, n).iter().map(|(_, q)| q.0).sum();
    let denom = bid_sum + ask_sum;
    if denom == 0 {
        0.0
    } else {
        (bid_sum - ask_sum) as f64 / denom as f64
    }
}

/// Snapshot of derived book features for a single replay step, as handed to
/// the quoting strategy.
#[derive(Debug, Clone, Copy)]
pub struct Features {
    pub microprice: Option<f64>,
    pub mid_price: Option<f64>,
    pub imbalance_1: f64,
    pub imbalance_2: f64,
    pub imbalance_5: f64,
    pub volatility: f64,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub best_bid_size: Option<Quantity>,
    pub best_ask_size: Option<Quantity>,
}

/// Pure functions of the current [`OrderBook`] plus a bounded history ring of
/// mid-prices. Call [`FeatureExtractor::observe`] once per replay step before
/// reading `extract`, so the volatility window advances exactly once per
/// event, matching the simulator's "sampled one per event step" contract.
pub struct FeatureExtractor {
    ring: MidPriceRing,
    volatility_window: usize,
}

impl FeatureExtractor {
    pub fn new(ring_capacity: usize, volatility_window: usize) -> Self {
        FeatureExtractor {
            ring: MidPriceRing::new(ring_capacity),
            volatility_window,
        }
    }

    pub fn observe(&mut self, book: &OrderBook) {
        if let Some(mid) = mid_price(book) {
            self.ring.push(mid);
        }
    }

    pub fn extract(&self, book: &OrderBook) -> Features {
        let (best_bid, best_bid_size) = match book.best_bid() {
            Some((p, q)) => (Some(p), Some(q)),
            None => (None, None),
        };
        let (best_ask, best_ask_size) = match book.best_ask() {
            Some((p, q)) => (Some(p), Some(q)),
            None => (None, None),
        };
        Features {
            microprice: microprice(book),
            mid_price: mid_price(book),
            imbalance_1: imbalance(book, 1),
            imbalance_2: imbalance(book, 2),
            imbalance_5: imbalance(book, 5),
            volatility: self.ring.volatility(self.volatility_window),
            best_bid,
            best_ask,
            best_bid_size,
            best_ask_size,
        }
    }
}
