mod common;

use common::*;
use mm_core::prelude::*;

#[test]
fn fifo_at_a_level() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);

    engine.submit(maker(1, Side::Sell, 100, 5, 1000)).unwrap();
    engine.submit(maker(2, Side::Sell, 100, 5, 1001)).unwrap();

    let fills = engine.submit(maker(3, Side::Buy, 100, 7, 1002)).unwrap();

    assert_eq!(fills.len(), 2);
    assert_eq!((fills[0].maker_order_id, fills[0].size), (1, Quantity(5)));
    assert_eq!((fills[1].maker_order_id, fills[1].size), (2, Quantity(2)));
    assert!(fills.iter().all(|f| f.price == Price(100)));

    let remaining = engine.book().find(2).unwrap();
    assert_eq!(remaining.remaining_size, Quantity(3));
}

#[test]
fn price_improvement_to_taker() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);

    engine.submit(maker(1, Side::Sell, 100, 10, 1000)).unwrap();
    let fills = engine.submit(maker(2, Side::Buy, 105, 4, 1001)).unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].price, Price(100));
    assert_eq!(fills[0].size, Quantity(4));
}

#[test]
fn no_cross_rests_both_sides() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);

    engine.submit(maker(1, Side::Sell, 101, 1, 1000)).unwrap();
    let fills = engine.submit(maker(2, Side::Buy, 100, 1, 1001)).unwrap();

    assert!(fills.is_empty());
    assert_eq!(engine.book().best_bid(), Some((Price(100), Quantity(1))));
    assert_eq!(engine.book().best_ask(), Some((Price(101), Quantity(1))));
}

#[test]
fn order_exactly_equal_to_level_removes_it() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);

    engine.submit(maker(1, Side::Sell, 100, 10, 1000)).unwrap();
    let fills = engine.submit(maker(2, Side::Buy, 100, 10, 1001)).unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(engine.book().best_ask(), None);
}

#[test]
fn ioc_discards_unfilled_remainder() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);

    engine.submit(maker(1, Side::Sell, 100, 3, 1000)).unwrap();
    let taker = maker(2, Side::Buy, 100, 10, 1001).ioc();
    let fills = engine.submit(taker).unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].size, Quantity(3));
    assert!(engine.book().find(2).is_none());
    assert_eq!(engine.book().best_bid(), None);
}

#[test]
fn rejects_invalid_orders_and_leaves_book_unchanged() {
    let mut book = OrderBook::new();
    let mut engine = MatchingEngine::new(&mut book);

    assert_eq!(
        engine.submit(maker(0, Side::Buy, 100, 1, 1000)).unwrap_err(),
        SubmitError::Invalid(InvalidOrder::EmptyId)
    );
    assert_eq!(
        engine.submit(maker(1, Side::Buy, 0, 1, 1000)).unwrap_err(),
        SubmitError::Invalid(InvalidOrder::NonPositivePrice)
    );
    assert_eq!(
        engine.submit(maker(1, Side::Buy, 100, 0, 1000)).unwrap_err(),
        SubmitError::Invalid(InvalidOrder::NonPositiveSize)
    );

    engine.submit(maker(1, Side::Buy, 100, 1, 1000)).unwrap();
    assert_eq!(
        engine.submit(maker(1, Side::Buy, 100, 1, 1001)).unwrap_err(),
        SubmitError::Invalid(InvalidOrder::DuplicateId(1))
    );
    assert_eq!(engine.book().depth(Side::Buy, 10).len(), 1);
}
