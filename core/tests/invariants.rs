mod common;

use proptest::prelude::*;

use mm_core::book::OrderBook;
use mm_core::matching::MatchingEngine;
use mm_core::types::{Order, OrderId, Origin, Price, Quantity, Side};

#[derive(Debug, Clone, Copy)]
struct OrderSpec {
    side: Side,
    price: i64,
    size: i64,
}

fn order_spec_strategy() -> impl Strategy<Value = OrderSpec> {
    (prop_oneof![Just(Side::Buy), Just(Side::Sell)], 95i64..=105, 1i64..=5)
        .prop_map(|(side, price, size)| OrderSpec { side, price, size })
}

proptest! {
    /// The book is never left in a crossed state after any sequence of
    /// submits, regardless of arrival order or price overlap.
    #[test]
    fn book_never_crosses(specs in prop::collection::vec(order_spec_strategy(), 0..50)) {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new(&mut book);
        for (i, spec) in specs.into_iter().enumerate() {
            let order = Order::new((i + 1) as OrderId, spec.side, Price(spec.price), Quantity(spec.size), Origin::Maker, i as u64);
            let _ = engine.submit(order);

            if let (Some((bid, _)), Some((ask, _))) = (engine.book().best_bid(), engine.book().best_ask()) {
                prop_assert!(bid < ask, "book crossed: bid {:?} >= ask {:?}", bid, ask);
            }
        }
    }

    /// Total size is conserved across a submit: whatever isn't matched
    /// either rests in the book (GTC) or is discarded (IOC).
    #[test]
    fn size_is_conserved_across_a_submit(specs in prop::collection::vec(order_spec_strategy(), 1..30)) {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new(&mut book);
        for (i, spec) in specs.into_iter().enumerate() {
            let order = Order::new((i + 1) as OrderId, spec.side, Price(spec.price), Quantity(spec.size), Origin::Maker, i as u64);
            let requested = order.remaining_size;
            if let Ok(fills) = engine.submit(order) {
                let matched: i64 = fills.iter().map(|f| f.size.0).sum();
                let resting = engine.book().find((i + 1) as OrderId).map(|o| o.remaining_size.0).unwrap_or(0);
                prop_assert!(matched + resting <= requested.0);
                prop_assert!(matched >= 0);
            }
        }
    }

    /// A fill's price is always the resting maker's submitted price, never
    /// the incoming taker's limit price.
    #[test]
    fn fill_price_is_always_the_makers_price(specs in prop::collection::vec(order_spec_strategy(), 1..30)) {
        let mut book = OrderBook::new();
        let mut maker_prices = std::collections::HashMap::new();
        let mut engine = MatchingEngine::new(&mut book);
        for (i, spec) in specs.into_iter().enumerate() {
            let id = (i + 1) as OrderId;
            maker_prices.insert(id, Price(spec.price));
            let order = Order::new(id, spec.side, Price(spec.price), Quantity(spec.size), Origin::Maker, i as u64);
            if let Ok(fills) = engine.submit(order) {
                for fill in &fills {
                    let expected = maker_prices[&fill.maker_order_id];
                    prop_assert_eq!(fill.price, expected);
                }
            }
        }
    }

    /// Within a single price level, resting orders stay in strictly
    /// increasing arrival order.
    #[test]
    fn arrival_order_is_preserved_within_a_level(specs in prop::collection::vec((95i64..=105, 1i64..=5), 1..20)) {
        let mut book = OrderBook::new();
        {
            let mut engine = MatchingEngine::new(&mut book);
            for (i, (price, size)) in specs.into_iter().enumerate() {
                // All buys at non-crossing prices so nothing matches away: fixes
                // every order resting at its own level for the duration.
                let order = Order::new((i + 1) as OrderId, Side::Buy, Price(price), Quantity(size), Origin::Maker, i as u64);
                let _ = engine.submit(order);
            }
        }
        for (price, _) in book.depth(Side::Buy, 10) {
            let seqs: Vec<_> = book.orders_at(Side::Buy, price).map(|o| o.arrival_seq).collect();
            let mut sorted = seqs.clone();
            sorted.sort();
            prop_assert_eq!(seqs, sorted);
        }
    }
}

#[test]
fn cancel_is_idempotent_under_proptest_style_repetition() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);
    engine.submit(common::maker(1, Side::Buy, 100, 3, 0)).unwrap();
    for _ in 0..5 {
        let _ = engine.cancel(1);
    }
    assert!(engine.book().find(1).is_none());
}

#[test]
fn empty_level_is_removed_after_full_consumption() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);
    engine.submit(common::maker(1, Side::Sell, 100, 4, 0)).unwrap();
    let fills = engine.submit(common::maker(2, Side::Buy, 100, 4, 1)).unwrap();
    assert_eq!(fills.len(), 1);
    assert!(engine.book().depth(Side::Sell, 10).is_empty());
    assert!(engine.book().find(1).is_none());
}
