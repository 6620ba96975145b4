mod common;

use common::*;
use mm_core::prelude::*;

#[test]
fn depth_delta_shrinks_exchange_liquidity_fifo() {
    let mut sim = ReplaySimulator::new(PassStrategy, 16, 8);

    sim.step(BookEvent::DepthDelta {
        side: Side::Buy,
        price: Price(100),
        new_aggregate_size: Quantity(5),
        ts: 1,
    })
    .unwrap();
    assert_eq!(sim.book().best_bid(), Some((Price(100), Quantity(5))));

    sim.step(BookEvent::DepthDelta {
        side: Side::Buy,
        price: Price(100),
        new_aggregate_size: Quantity(3),
        ts: 2,
    })
    .unwrap();
    assert_eq!(sim.book().best_bid(), Some((Price(100), Quantity(3))));
}

#[test]
fn depth_delta_never_touches_maker_orders_at_same_level() {
    // The strategy rests one MAKER buy@100 the moment the simulator takes
    // its first step, coexisting with the EXCHANGE liquidity the same
    // DepthDelta synthesizes at that level.
    let mut sim = ReplaySimulator::new(OneShotMaker::new(Side::Buy, 100, 2), 16, 8);

    sim.step(BookEvent::DepthDelta {
        side: Side::Buy,
        price: Price(100),
        new_aggregate_size: Quantity(5),
        ts: 1,
    })
    .unwrap();
    // 5 EXCHANGE + 2 MAKER resting at the same price.
    assert_eq!(sim.book().best_bid(), Some((Price(100), Quantity(7))));

    sim.step(BookEvent::DepthDelta {
        side: Side::Buy,
        price: Price(100),
        new_aggregate_size: Quantity(0),
        ts: 2,
    })
    .unwrap();

    // All EXCHANGE liquidity absorbed; the MAKER order survives untouched.
    assert_eq!(sim.book().best_bid(), Some((Price(100), Quantity(2))));
}
