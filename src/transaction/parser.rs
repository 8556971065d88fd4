//! Line-delimited transaction log parser
//!
//! One JSON record per line, in log order. Blank lines (including lines of
//! only whitespace) are skipped. Line numbers in errors are 1-based.
//!
//! Malformed lines either abort the parse or are skipped with a warning,
//! depending on `ParsePolicy`.

use crate::config::ParsePolicy;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{ParseError, ParseResult};
use super::record::Transaction;

/// A transaction log in any of the forms callers hand us
#[derive(Debug, Clone)]
pub enum TransactionLog<'a> {
    /// Raw NDJSON bytes, e.g. a response body
    Raw(&'a [u8]),
    /// NDJSON text
    Text(&'a str),
    /// Transactions already decoded by the caller
    Parsed(Vec<Transaction>),
}

impl<'a> From<&'a [u8]> for TransactionLog<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TransactionLog::Raw(bytes)
    }
}

impl<'a> From<&'a str> for TransactionLog<'a> {
    fn from(text: &'a str) -> Self {
        TransactionLog::Text(text)
    }
}

impl From<Vec<Transaction>> for TransactionLog<'_> {
    fn from(transactions: Vec<Transaction>) -> Self {
        TransactionLog::Parsed(transactions)
    }
}

/// Decodes transaction logs into transactions, preserving log order
pub struct LogParser;

impl LogParser {
    /// Decode any log form
    pub fn parse(log: TransactionLog<'_>, policy: ParsePolicy) -> ParseResult<Vec<Transaction>> {
        match log {
            TransactionLog::Raw(bytes) => Self::parse_bytes(bytes, policy),
            TransactionLog::Text(text) => Self::parse_str(text, policy),
            TransactionLog::Parsed(transactions) => Ok(transactions),
        }
    }

    /// Decode NDJSON text
    pub fn parse_str(text: &str, policy: ParsePolicy) -> ParseResult<Vec<Transaction>> {
        let mut transactions = Vec::new();

        for (index, line) in text.lines().enumerate() {
            Self::accept(Self::parse_line(line, index + 1), policy, &mut transactions)?;
        }

        Ok(transactions)
    }

    /// Decode NDJSON bytes.
    ///
    /// UTF-8 is checked per line so one bad line can be skipped without
    /// losing the rest of the log.
    pub fn parse_bytes(bytes: &[u8], policy: ParsePolicy) -> ParseResult<Vec<Transaction>> {
        let mut transactions = Vec::new();

        for (index, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let line_number = index + 1;
            let decoded = std::str::from_utf8(raw)
                .map_err(|e| ParseError::invalid_encoding(line_number, e.to_string()))
                .and_then(|line| Self::parse_line(line, line_number));

            Self::accept(decoded, policy, &mut transactions)?;
        }

        Ok(transactions)
    }

    /// Decode a single line. `Ok(None)` for blank lines.
    pub fn parse_line(line: &str, line_number: usize) -> ParseResult<Option<Transaction>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| ParseError::malformed_record(line_number, e))
    }

    fn accept(
        decoded: ParseResult<Option<Transaction>>,
        policy: ParsePolicy,
        transactions: &mut Vec<Transaction>,
    ) -> ParseResult<()> {
        match decoded {
            Ok(Some(transaction)) => transactions.push(transaction),
            Ok(None) => {}
            Err(err) => match policy {
                ParsePolicy::Abort => return Err(err),
                ParsePolicy::Skip => {
                    let line = err.line().to_string();
                    log_event_with_fields(
                        Event::LogLineSkipped,
                        &[
                            ("code", err.code().code()),
                            ("line", line.as_str()),
                            ("reason", err.message()),
                        ],
                    );
                }
            },
        }
        Ok(())
    }
}
