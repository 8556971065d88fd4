//! Transaction log subsystem
//!
//! Decodes the raw history log into ordered `Transaction` records. Records
//! are read-only from here on; the collator never mutates them.

mod errors;
mod parser;
mod record;

pub use errors::{ParseError, ParseErrorCode, ParseResult};
pub use parser::{LogParser, TransactionLog};
pub use record::{
    is_draft_id, DeletePayload, DocumentPayload, Mutation, PatchPayload,
    SquashedPayload, Transaction, DRAFT_PREFIX,
};
