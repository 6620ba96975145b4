use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use mm_core::types::Fill;
use serde::Serialize;

/// Persists the fill stream the core emits. A stand-in for the columnar
/// append-only format named in the source system; swapping in a real
/// columnar writer only means implementing this trait, never touching the
/// core.
pub trait FillSink {
    fn record(&mut self, fill: &Fill) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// One line of the on-disk fill log, matching the core -> collaborator fill
/// schema documented alongside [`mm_core::replay::BookEvent`].
#[derive(Serialize)]
struct FillRecord<'a> {
    ts: u64,
    taker_id: u64,
    maker_id: u64,
    price_ticks: i64,
    size_ticks: i64,
    taker_origin: &'a str,
    maker_origin: &'a str,
}

fn origin_label(origin: mm_core::types::Origin) -> &'static str {
    match origin {
        mm_core::types::Origin::Exchange => "exchange",
        mm_core::types::Origin::Maker => "maker",
    }
}

/// Writes one JSON object per fill, newline-delimited.
pub struct NdjsonFillSink {
    writer: BufWriter<File>,
}

impl NdjsonFillSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("creating fill log {}", path.display()))?;
        Ok(NdjsonFillSink {
            writer: BufWriter::new(file),
        })
    }
}

impl FillSink for NdjsonFillSink {
    fn record(&mut self, fill: &Fill) -> Result<()> {
        let record = FillRecord {
            ts: fill.timestamp,
            taker_id: fill.taker_order_id,
            maker_id: fill.maker_order_id,
            price_ticks: fill.price.0,
            size_ticks: fill.size.0,
            taker_origin: origin_label(fill.taker_origin),
            maker_origin: origin_label(fill.maker_origin),
        };
        serde_json::to_writer(&mut self.writer, &record).context("serializing fill record")?;
        self.writer.write_all(b"\n").context("writing fill record newline")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("flushing fill log")
    }
}

/// A [`FillSink`] that discards everything, used by `live --paper` runs that
/// don't need a persisted log.
pub struct NullFillSink;

impl FillSink for NullFillSink {
    fn record(&mut self, _fill: &Fill) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
