use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use mm_core::prelude::{BookEvent, Price, Quantity, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Deserialize;

/// On-disk shape of one line of a recorded depth-event log. Mirrors
/// [`BookEvent`] but carries `price`/`size` as decimal strings instead of
/// the fixed-point wrapper types directly; they're converted to
/// [`Price`]/[`Quantity`] ticks at this boundary via `from_decimal`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventRecord {
    DepthDelta {
        side: WireSide,
        price: Decimal,
        size: Decimal,
        ts: u64,
    },
    Trade {
        side: WireSide,
        price: Decimal,
        size: Decimal,
        ts: u64,
    },
    Tick {
        ts: u64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireSide {
    Buy,
    Sell,
}

impl From<WireSide> for Side {
    fn from(value: WireSide) -> Self {
        match value {
            WireSide::Buy => Side::Buy,
            WireSide::Sell => Side::Sell,
        }
    }
}

impl From<EventRecord> for BookEvent {
    fn from(record: EventRecord) -> Self {
        match record {
            EventRecord::DepthDelta { side, price, size, ts } => BookEvent::DepthDelta {
                side: side.into(),
                price: Price::from_decimal(price),
                new_aggregate_size: Quantity::from_decimal(size),
                ts,
            },
            EventRecord::Trade { side, price, size, ts } => BookEvent::Trade {
                side: side.into(),
                price: Price::from_decimal(price),
                size: Quantity::from_decimal(size),
                ts,
            },
            EventRecord::Tick { ts } => BookEvent::Tick { ts },
        }
    }
}

/// Reads a newline-delimited JSON depth-event log from disk for one
/// `(symbol, date)` pair. Returns `Ok(None)` (never an error) when no log
/// file is present for that day, so the caller can fall back to the
/// synthetic/paper generator rather than treating an absent recording as a
/// hard failure.
pub fn load_recorded_stream(path: &Path) -> Result<Option<Vec<BookEvent>>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("opening event log {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut events = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {} of {}", lineno + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: EventRecord = serde_json::from_str(&line)
            .with_context(|| format!("parsing event log line {} of {}", lineno + 1, path.display()))?;
        events.push(record.into());
    }
    Ok(Some(events))
}

/// Synthesizes a deterministic-shaped but randomized stream standing in for
/// a day's worth of depth events, used by `backtest` when no recorded log
/// is found and by `live --paper` in place of a real venue feed.
///
/// Timestamps start strictly after `start_ts` and increase monotonically,
/// so a caller stitching successive batches together (as the live loop
/// does) can pass the previous batch's last timestamp back in without
/// producing an out-of-order event at the seam.
pub fn synthetic_stream(seed: u64, count: usize, base_price_ticks: i64, start_ts: u64) -> Vec<BookEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut events = Vec::with_capacity(count);
    let mut ts = start_ts;
    for _ in 0..count {
        ts += rng.random_range(1..=5);
        let side = if rng.random_bool(0.5) { Side::Buy } else { Side::Sell };
        let offset = rng.random_range(0..=5);
        let price = match side {
            Side::Buy => Price(base_price_ticks - offset),
            Side::Sell => Price(base_price_ticks + 1 + offset),
        };
        let size = Quantity(1 + rng.random_range(0..10));
        if rng.random_bool(0.7) {
            events.push(BookEvent::DepthDelta {
                side,
                price,
                new_aggregate_size: size,
                ts,
            });
        } else {
            events.push(BookEvent::Trade { side, price, size, ts });
        }
    }
    events
}
