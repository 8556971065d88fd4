//! transaction-collator - deterministic document history from transaction logs
//!
//! Reads the raw transaction log of a document store and collates it into a
//! compact timeline of semantic events (created, edited, published,
//! unpublished, deleted, truncated).
//!
//! ```ignore
//! use transaction_collator::collate;
//!
//! let events = collate(&["doc1", "drafts.doc1"], ndjson.as_bytes())?;
//! ```

pub mod cli;
pub mod collator;
pub mod config;
pub mod observability;
pub mod transaction;

pub use collator::{collate, collate_with_config, Collator, EventType, HistoryEvent};
pub use config::{CollatorConfig, ParsePolicy};
pub use transaction::{Mutation, ParseError, Transaction, TransactionLog};
