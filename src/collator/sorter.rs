//! Temporal ordering of transactions
//!
//! Sorts by timestamp ascending. The sort is stable: transactions sharing a
//! timestamp keep their log order, which matters because the classifier
//! treats position 0 specially.

use crate::transaction::Transaction;

/// Sorts transactions by commit time
pub struct TemporalSorter;

impl TemporalSorter {
    /// Stable ascending sort by timestamp
    pub fn sort(transactions: &mut [Transaction]) {
        transactions.sort_by_key(|tx| tx.timestamp);
    }
}
