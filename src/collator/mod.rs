//! Transaction-to-event collation
//!
//! Turns an ordered transaction log into the history timeline of a set of
//! documents: created, edited, published, unpublished, deleted, truncated.
//!
//! # Invariants
//!
//! - Deterministic: no state survives a call
//! - Output is ordered by time; no event starts after it ends
//! - Only transactions touching a requested document contribute
//! - Classification of a transaction sees only its own mutations and its
//!   position; only edit merging looks at a neighbour

mod classifier;
mod event;
mod filters;
mod pipeline;
mod reducer;
mod sorter;

pub use classifier::{Classification, Classifier};
pub use event::{EventType, HistoryEvent};
pub use filters::RelevanceFilter;
pub use pipeline::{classify_transaction, collate, collate_with_config, Collation, Collator};
pub use reducer::EventReducer;
pub use sorter::TemporalSorter;
