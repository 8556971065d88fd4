//! Observability for the collator
//!
//! Provides structured JSON logging and typed lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on collation results
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use transaction_collator::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CollateComplete, &[("events", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
