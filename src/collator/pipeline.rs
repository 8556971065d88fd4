//! Collation pipeline
//!
//! Execution flow (strict order):
//! 1. Parse the log into transactions
//! 2. Keep transactions touching the requested documents
//! 3. Stable-sort by timestamp
//! 4. Classify each transaction by its mutations and position
//! 5. Drop hidden event types
//! 6. Merge adjacent edits
//!
//! The pipeline holds no state between calls: same inputs, same timeline.

use crate::config::CollatorConfig;
use crate::transaction::{LogParser, ParseResult, Transaction, TransactionLog};

use super::classifier::Classifier;
use super::event::HistoryEvent;
use super::filters::RelevanceFilter;
use super::reducer::EventReducer;
use super::sorter::TemporalSorter;

/// Timeline plus counts from one collate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collation {
    /// Displayed history, oldest first
    pub events: Vec<HistoryEvent>,
    /// Transactions decoded from the log
    pub transactions_read: usize,
    /// Transactions that touched a requested document
    pub transactions_relevant: usize,
}

/// Turns transaction logs into history timelines
pub struct Collator {
    config: CollatorConfig,
}

impl Default for Collator {
    fn default() -> Self {
        Self::new(CollatorConfig::default())
    }
}

impl Collator {
    /// Creates a collator with the given configuration
    pub fn new(config: CollatorConfig) -> Self {
        Self { config }
    }

    /// Collates a log into the history of `document_ids`
    pub fn collate<'a, S, L>(&self, document_ids: &[S], log: L) -> ParseResult<Vec<HistoryEvent>>
    where
        S: AsRef<str>,
        L: Into<TransactionLog<'a>>,
    {
        self.collate_detailed(document_ids, log)
            .map(|collation| collation.events)
    }

    /// Like `collate`, also reporting how many transactions were seen
    pub fn collate_detailed<'a, S, L>(&self, document_ids: &[S], log: L) -> ParseResult<Collation>
    where
        S: AsRef<str>,
        L: Into<TransactionLog<'a>>,
    {
        let transactions = LogParser::parse(log.into(), self.config.parse_policy)?;
        let transactions_read = transactions.len();

        let mut relevant = RelevanceFilter::new(document_ids).apply(transactions);
        TemporalSorter::sort(&mut relevant);

        let events = self.collate_sorted(&relevant);

        Ok(Collation {
            events,
            transactions_read,
            transactions_relevant: relevant.len(),
        })
    }

    /// Classify and reduce. `transactions` must already be filtered and
    /// time-sorted: a transaction's index here is the position the
    /// classifier sees.
    fn collate_sorted(&self, transactions: &[Transaction]) -> Vec<HistoryEvent> {
        let classified = transactions
            .iter()
            .enumerate()
            .map(|(index, transaction)| classify_transaction(transaction, index))
            .collect();

        EventReducer::new(self.config.edit_merge_window()).reduce(classified)
    }
}

/// Classify one transaction at its position in the sorted sequence
pub fn classify_transaction(transaction: &Transaction, index: usize) -> HistoryEvent {
    let classification = Classifier::classify(&transaction.mutations, index);
    let user_ids = Classifier::user_ids(transaction, classification.event_type);

    HistoryEvent::from_transaction(
        transaction,
        classification.event_type,
        classification.document_id,
        user_ids,
    )
}

/// Collate with default configuration
pub fn collate<'a, S, L>(document_ids: &[S], log: L) -> ParseResult<Vec<HistoryEvent>>
where
    S: AsRef<str>,
    L: Into<TransactionLog<'a>>,
{
    Collator::default().collate(document_ids, log)
}

/// Collate with an explicit configuration
pub fn collate_with_config<'a, S, L>(
    document_ids: &[S],
    log: L,
    config: &CollatorConfig,
) -> ParseResult<Vec<HistoryEvent>>
where
    S: AsRef<str>,
    L: Into<TransactionLog<'a>>,
{
    Collator::new(config.clone()).collate(document_ids, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collator::EventType;
    use crate::transaction::Mutation;
    use chrono::{TimeZone, Utc};

    const DOCS: [&str; 2] = ["doc1", "drafts.doc1"];

    fn tx(id: &str, secs: i64, author: &str, mutations: Vec<Mutation>) -> Transaction {
        Transaction::new(
            id,
            Utc.timestamp_opt(secs, 0).unwrap(),
            author,
            DOCS.iter().map(|d| d.to_string()).collect(),
            mutations,
        )
    }

    #[test]
    fn test_document_lifecycle() {
        let log = vec![
            tx("r1", 0, "alice", vec![Mutation::create_if_not_exists("drafts.doc1")]),
            tx("r2", 30, "alice", vec![Mutation::patch("drafts.doc1")]),
            tx(
                "r3",
                60,
                "bob",
                vec![
                    Mutation::create_or_replace("doc1"),
                    Mutation::delete("drafts.doc1"),
                ],
            ),
            tx(
                "r4",
                3600,
                "bob",
                vec![Mutation::delete("doc1"), Mutation::delete("drafts.doc1")],
            ),
        ];

        let events = collate(&DOCS, log).unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();

        assert_eq!(
            types,
            vec![
                EventType::Created,
                EventType::Edited,
                EventType::Published,
                EventType::Deleted,
            ]
        );
        assert_eq!(events[2].display_document_id.as_deref(), Some("doc1"));
        assert_eq!(events[2].user_ids, vec!["bob"]);
    }

    #[test]
    fn test_position_zero_is_after_filter_and_sort() {
        let mut unrelated = tx("r0", 0, "x", vec![Mutation::create("other")]);
        unrelated.document_ids = Some(vec!["other".into()]);

        let log = vec![
            tx("r2", 20, "alice", vec![Mutation::create_if_not_exists("doc1")]),
            unrelated,
            tx("r1", 10, "alice", vec![Mutation::create_if_not_exists("drafts.doc1")]),
        ];

        let collation = Collator::default().collate_detailed(&DOCS, log).unwrap();

        assert_eq!(collation.transactions_read, 3);
        assert_eq!(collation.transactions_relevant, 2);
        assert_eq!(collation.events[0].rev, "r1");
        assert_eq!(collation.events[0].event_type, EventType::Created);
        assert_eq!(collation.events[1].event_type, EventType::Published);
    }

    #[test]
    fn test_custom_window() {
        let log = vec![
            tx("r1", 0, "alice", vec![Mutation::patch("drafts.doc1")]),
            tx("r2", 120, "bob", vec![Mutation::patch("drafts.doc1")]),
        ];

        let config = CollatorConfig {
            edit_merge_window_ms: 60_000,
            ..CollatorConfig::default()
        };
        assert_eq!(collate_with_config(&DOCS, log.clone(), &config).unwrap().len(), 2);
        assert_eq!(collate(&DOCS, log).unwrap().len(), 1);
    }

    #[test]
    fn test_text_log() {
        let log = concat!(
            r#"{"id":"r1","timestamp":"2019-03-01T10:00:00Z","author":"alice","documentIDs":["doc1"],"mutations":[{"createIfNotExists":{"_id":"doc1"}}]}"#,
            "\n"
        );

        let events = collate(&["doc1"], log).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Created);
    }
}
