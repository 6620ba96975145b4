use mm_core::prelude::*;

/// Quickly builds a GTC limit order for testing.
pub fn make_order(id: OrderId, side: Side, price: i64, size: i64, ts: u64, origin: Origin) -> Order {
    Order::new(id, side, Price(price), Quantity(size), origin, ts)
}

pub fn maker(id: OrderId, side: Side, price: i64, size: i64, ts: u64) -> Order {
    make_order(id, side, price, size, ts, Origin::Maker)
}

pub struct PassStrategy;

impl Strategy for PassStrategy {
    fn on_step(
        &mut self,
        _features: &Features,
        _ledger: &Ledger,
        _open_quotes: &[OrderId],
        _clock: u64,
    ) -> QuoteAction {
        QuoteAction::empty()
    }
}

/// Submits a single fixed maker quote on its first invocation, then passes
/// forever after. Lets tests seed a MAKER-origin order at a known price
/// without reaching into simulator internals.
pub struct OneShotMaker {
    intent: Option<QuoteIntent>,
}

impl OneShotMaker {
    pub fn new(side: Side, price: i64, size: i64) -> Self {
        OneShotMaker {
            intent: Some(QuoteIntent {
                side,
                price: Price(price),
                size: Quantity(size),
            }),
        }
    }
}

impl Strategy for OneShotMaker {
    fn on_step(
        &mut self,
        _features: &Features,
        _ledger: &Ledger,
        _open_quotes: &[OrderId],
        _clock: u64,
    ) -> QuoteAction {
        match self.intent.take() {
            Some(intent) => QuoteAction {
                cancel: Vec::new(),
                submit: vec![intent],
            },
            None => QuoteAction::empty(),
        }
    }
}
