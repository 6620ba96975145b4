use thiserror::Error;

use crate::types::OrderId;

/// Malformed insert inputs. The book is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidOrder {
    #[error("order id must be non-empty")]
    EmptyId,
    #[error("order price must be strictly positive")]
    NonPositivePrice,
    #[error("order size must be strictly positive")]
    NonPositiveSize,
    #[error("duplicate order id {0}")]
    DuplicateId(OrderId),
}

/// An external event arrived out of order, or was otherwise ill-formed.
///
/// The replay simulator aborts the run on this error; the live loop's
/// reconnect policy lives in the collaborator, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("event timestamp {ts} is before the last observed timestamp {last_ts}")]
    OutOfOrder { ts: u64, last_ts: u64 },
    #[error("depth event missing required field: {0}")]
    MissingField(&'static str),
}

/// A book invariant was observed to be broken: price-time ordering, index
/// consistency, or no-crossed-book.
///
/// Unrecoverable: the caller must treat book state as undefined and abort the
/// simulation or session. No component swallows this error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineFault {
    #[error("order {0} is indexed but missing from its price level")]
    DanglingIndexEntry(OrderId),
    #[error("price level at side={side:?} price={price} is empty but was not removed")]
    EmptyLevelNotRemoved { side: crate::types::Side, price: crate::types::Price },
    #[error("book crossed: best bid {bid} >= best ask {ask}")]
    BookCrossed { bid: crate::types::Price, ask: crate::types::Price },
    #[error("resting order {order_id} had non-positive remaining size {remaining_size}, skipped and removed")]
    CorruptRestingSize { order_id: OrderId, remaining_size: i64 },
}

/// Error surface of [`crate::matching::MatchingEngine::submit`]: either a
/// malformed input, which leaves the book unchanged and is safe to report
/// back to the submitter, or an [`EngineFault`], which is not.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] InvalidOrder),
    #[error(transparent)]
    Fault(#[from] EngineFault),
}

/// Error surface of [`crate::replay::ReplaySimulator::step`]/`run`: either
/// an ill-formed external event, which aborts the run, or an internal
/// [`EngineFault`], which also aborts the run but indicates the book itself
/// (not just the input stream) is no longer trustworthy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Fault(#[from] EngineFault),
}
