//! Relevance filtering
//!
//! Keeps only transactions that touch at least one document of interest.
//! Transactions without `documentIDs` never match.

use std::collections::HashSet;

use crate::transaction::Transaction;

/// Matches transactions against a set of document ids
pub struct RelevanceFilter {
    document_ids: HashSet<String>,
}

impl RelevanceFilter {
    /// Create a filter for the given documents
    pub fn new<S: AsRef<str>>(document_ids: &[S]) -> Self {
        Self {
            document_ids: document_ids.iter().map(|id| id.as_ref().to_string()).collect(),
        }
    }

    /// Checks if a transaction touches any document of interest
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match &transaction.document_ids {
            Some(ids) => ids.iter().any(|id| self.document_ids.contains(id)),
            None => false,
        }
    }

    /// Drops irrelevant transactions, preserving order
    pub fn apply(&self, mut transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions.retain(|tx| self.matches(tx));
        transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Mutation;
    use chrono::{TimeZone, Utc};

    fn tx(id: &str, document_ids: Option<Vec<&str>>) -> Transaction {
        Transaction {
            id: id.into(),
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            author: "alice".into(),
            document_ids: document_ids.map(|ids| ids.into_iter().map(String::from).collect()),
            mutations: vec![Mutation::patch("doc1")],
        }
    }

    #[test]
    fn test_intersection_matches() {
        let filter = RelevanceFilter::new(&["doc1", "drafts.doc1"]);

        assert!(filter.matches(&tx("a", Some(vec!["drafts.doc1"]))));
        assert!(filter.matches(&tx("b", Some(vec!["other", "doc1"]))));
        assert!(!filter.matches(&tx("c", Some(vec!["other"]))));
    }

    #[test]
    fn test_absent_or_empty_ids_never_match() {
        let filter = RelevanceFilter::new(&["doc1"]);

        assert!(!filter.matches(&tx("a", None)));
        assert!(!filter.matches(&tx("b", Some(vec![]))));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = RelevanceFilter::new(&["doc1"]);
        let kept = filter.apply(vec![
            tx("a", Some(vec!["doc1"])),
            tx("b", Some(vec!["doc2"])),
            tx("c", Some(vec!["doc1"])),
            tx("d", None),
        ]);

        let ids: Vec<_> = kept.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_interest_set_matches_nothing() {
        let filter = RelevanceFilter::new::<&str>(&[]);
        assert!(!filter.matches(&tx("a", Some(vec!["doc1"]))));
    }
}
