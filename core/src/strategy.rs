use crate::features::Features;
use crate::ledger::Ledger;
use crate::types::{OrderId, Price, Quantity, Side};

/// One side of a strategy's desired resting quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteIntent {
    pub side: Side,
    pub price: Price,
    pub size: Quantity,
}

/// What the strategy wants to happen to its open quotes this step.
/// Cancels are applied before inserts within a single replay step.
#[derive(Debug, Clone, Default)]
pub struct QuoteAction {
    pub cancel: Vec<OrderId>,
    pub submit: Vec<QuoteIntent>,
}

impl QuoteAction {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cancel_all(open_quotes: &[OrderId]) -> Self {
        QuoteAction {
            cancel: open_quotes.to_vec(),
            submit: Vec::new(),
        }
    }
}

/// A pluggable quoting strategy: given features, inventory, and the
/// strategy's currently open quotes, emits a [`QuoteAction`].
///
/// Implementations are interchangeable without book-layer knowledge; the
/// replay simulator and the live loop drive any `Strategy` identically.
pub trait Strategy {
    fn on_step(
        &mut self,
        features: &Features,
        ledger: &Ledger,
        open_quotes: &[OrderId],
        clock: u64,
    ) -> QuoteAction;
}

impl Strategy for Box<dyn Strategy + Send> {
    fn on_step(
        &mut self,
        features: &Features,
        ledger: &Ledger,
        open_quotes: &[OrderId],
        clock: u64,
    ) -> QuoteAction {
        (**self).on_step(features, ledger, open_quotes, clock)
    }
}

/// Returns quotes at `mid +/- spread/2`, cancelling any previously open quote
/// first. The simplest possible quoting strategy.
pub struct NaiveStrategy {
    /// Half-spread and full spread, in price ticks.
    pub spread_ticks: i64,
    pub size: Quantity,
}

impl NaiveStrategy {
    pub fn new(spread_ticks: i64, size: Quantity) -> Self {
        NaiveStrategy { spread_ticks, size }
    }
}

impl Strategy for NaiveStrategy {
    fn on_step(
        &mut self,
        features: &Features,
        _ledger: &Ledger,
        open_quotes: &[OrderId],
        _clock: u64,
    ) -> QuoteAction {
        let mut action = QuoteAction::cancel_all(open_quotes);
        let Some(mid) = features.mid_price else {
            return action;
        };
        let half = self.spread_ticks / 2;
        let mid_ticks = mid.round() as i64;
        action.submit.push(QuoteIntent {
            side: Side::Buy,
            price: Price(mid_ticks - half),
            size: self.size,
        });
        action.submit.push(QuoteIntent {
            side: Side::Sell,
            price: Price(mid_ticks + half),
            size: self.size,
        });
        action
    }
}

/// Fill-probability-as-a-function-of-distance-from-mid table, trained
/// externally. Stores a sorted list of `(distance_ticks, probability)`
/// samples and linearly interpolates between the nearest two.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FillProbTable {
    samples: Vec<(i64, f64)>,
}

impl FillProbTable {
    /// Builds a table from `(distance_ticks, probability)` samples, sorting
    /// them by distance. Probabilities should lie in `[0, 1]`.
    pub fn from_samples(mut samples: Vec<(i64, f64)>) -> Self {
        samples.sort_by_key(|(d, _)| *d);
        FillProbTable { samples }
    }

    pub fn probability(&self, distance_ticks: i64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        if distance_ticks <= self.samples[0].0 {
            return self.samples[0].1;
        }
        if let Some(last) = self.samples.last() {
            if distance_ticks >= last.0 {
                return last.1;
            }
        }
        let idx = self
            .samples
            .partition_point(|(d, _)| *d <= distance_ticks);
        let (d0, p0) = self.samples[idx - 1];
        let (d1, p1) = self.samples[idx];
        let t = (distance_ticks - d0) as f64 / (d1 - d0) as f64;
        p0 + t * (p1 - p0)
    }
}

/// Maximizes `expected_edge = p(distance) * spread_half - |inventory| * k`
/// subject to a configured max half-spread, then shifts both quotes toward
/// reducing `|inventory|`.
pub struct EvStrategy {
    pub max_half_spread_ticks: i64,
    pub skew_k: f64,
    pub fill_prob_table: FillProbTable,
    size: Box<dyn Fn(i64) -> Quantity + Send>,
    /// Search resolution for the half-spread that maximizes expected edge.
    step_ticks: i64,
}

impl EvStrategy {
    pub fn new(
        max_half_spread_ticks: i64,
        skew_k: f64,
        fill_prob_table: FillProbTable,
        size_fn: impl Fn(i64) -> Quantity + Send + 'static,
    ) -> Self {
        EvStrategy {
            max_half_spread_ticks,
            skew_k,
            fill_prob_table,
            size: Box::new(size_fn),
            step_ticks: 1,
        }
    }

    /// The half-spread (ticks) that maximizes `p(d) * d - |inventory| * k`
    /// over `d` in `1..=max_half_spread_ticks`.
    fn best_half_spread(&self, inventory: i64) -> i64 {
        let penalty = inventory.unsigned_abs() as f64 * self.skew_k;
        let mut best_d = 1i64;
        let mut best_edge = f64::MIN;
        let mut d = 1i64;
        while d <= self.max_half_spread_ticks {
            let edge = self.fill_prob_table.probability(d) * d as f64 - penalty;
            if edge > best_edge {
                best_edge = edge;
                best_d = d;
            }
            d += self.step_ticks;
        }
        best_d
    }

    /// Skew in ticks applied toward reducing `|inventory|`: long inventory
    /// pulls the bid back and the ask closer; short is symmetric.
    fn skew_ticks(&self, inventory: i64) -> i64 {
        (inventory as f64 * self.skew_k).round() as i64
    }
}

impl Strategy for EvStrategy {
    fn on_step(
        &mut self,
        features: &Features,
        ledger: &Ledger,
        open_quotes: &[OrderId],
        _clock: u64,
    ) -> QuoteAction {
        let mut action = QuoteAction::cancel_all(open_quotes);
        let Some(mid) = features.mid_price else {
            return action;
        };
        let mid_ticks = mid.round() as i64;
        let inventory = ledger.inventory;
        let half_spread = self.best_half_spread(inventory);
        let skew = self.skew_ticks(inventory);

        let bid_distance = half_spread + skew;
        let ask_distance = half_spread - skew;
        let size = (self.size)(inventory);

        if bid_distance > 0 {
            action.submit.push(QuoteIntent {
                side: Side::Buy,
                price: Price(mid_ticks - bid_distance),
                size,
            });
        }
        if ask_distance > 0 {
            action.submit.push(QuoteIntent {
                side: Side::Sell,
                price: Price(mid_ticks + ask_distance),
                size,
            });
        }
        action
    }
}
