//! History events: the output of collation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Semantic classification of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Created,
    Edited,
    Published,
    Unpublished,
    Deleted,
    Truncated,
    /// Classified but never surfaced in a timeline
    DiscardDraft,
    Unknown,
}

impl EventType {
    /// Wire name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::Edited => "edited",
            EventType::Published => "published",
            EventType::Unpublished => "unpublished",
            EventType::Deleted => "deleted",
            EventType::Truncated => "truncated",
            EventType::DiscardDraft => "discardDraft",
            EventType::Unknown => "unknown",
        }
    }

    /// Whether events of this type appear in the final timeline
    pub fn is_displayed(&self) -> bool {
        !matches!(self, EventType::DiscardDraft)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a document's history timeline.
///
/// Covers one transaction, or a run of edits merged by the reducer. In the
/// latter case `rev` is the last transaction of the run and `start_time`
/// precedes `end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(rename = "documentIDs")]
    pub document_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_document_id: Option<String>,
    pub rev: String,
    pub user_ids: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl HistoryEvent {
    /// Build the event for a single classified transaction
    pub fn from_transaction(
        transaction: &Transaction,
        event_type: EventType,
        display_document_id: Option<String>,
        user_ids: Vec<String>,
    ) -> Self {
        Self {
            event_type,
            document_ids: transaction.document_ids().to_vec(),
            display_document_id,
            rev: transaction.id.clone(),
            user_ids: unique(user_ids),
            start_time: transaction.timestamp,
            end_time: transaction.timestamp,
        }
    }

    /// True until the event has absorbed an earlier one
    pub fn is_single_point(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Fold `earlier` into this event.
    ///
    /// Authors are unioned, this event's first. The start time is only pulled
    /// back when `earlier` is itself a single point; a span that already
    /// absorbed something does not extend the next one.
    pub fn absorb(self, earlier: &HistoryEvent) -> HistoryEvent {
        let start_time = if earlier.is_single_point() {
            earlier.start_time
        } else {
            self.start_time
        };

        let mut user_ids = self.user_ids;
        user_ids.extend(earlier.user_ids.iter().cloned());

        HistoryEvent {
            user_ids: unique(user_ids),
            start_time,
            ..self
        }
    }
}

/// Removes duplicates, keeping the first occurrence of each id
fn unique(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event_at(secs: i64, users: &[&str]) -> HistoryEvent {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        HistoryEvent {
            event_type: EventType::Edited,
            document_ids: vec!["doc1".into()],
            display_document_id: Some("doc1".into()),
            rev: format!("rev{}", secs),
            user_ids: users.iter().map(|u| u.to_string()).collect(),
            start_time: at,
            end_time: at,
        }
    }

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(serde_json::to_value(EventType::DiscardDraft).unwrap(), json!("discardDraft"));
        assert_eq!(serde_json::to_value(EventType::Unpublished).unwrap(), json!("unpublished"));
        assert_eq!(EventType::Truncated.to_string(), "truncated");
        assert!(!EventType::DiscardDraft.is_displayed());
        assert!(EventType::Unknown.is_displayed());
    }

    #[test]
    fn test_absorb_single_point() {
        let merged = event_at(100, &["bob"]).absorb(&event_at(0, &["alice"]));

        assert_eq!(merged.user_ids, vec!["bob", "alice"]);
        assert_eq!(merged.start_time.timestamp(), 0);
        assert_eq!(merged.end_time.timestamp(), 100);
        assert_eq!(merged.rev, "rev100");
    }

    #[test]
    fn test_absorb_span_keeps_own_start() {
        let span = event_at(100, &["bob"]).absorb(&event_at(0, &["alice"]));
        let merged = event_at(200, &["carol", "bob"]).absorb(&span);

        assert_eq!(merged.start_time.timestamp(), 200);
        assert_eq!(merged.user_ids, vec!["carol", "bob", "alice"]);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(event_at(0, &["alice"])).unwrap();

        assert_eq!(value["type"], "edited");
        assert_eq!(value["documentIDs"], json!(["doc1"]));
        assert_eq!(value["displayDocumentId"], "doc1");
        assert_eq!(value["userIds"], json!(["alice"]));
        assert_eq!(value["startTime"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_missing_display_id_omitted() {
        let mut event = event_at(0, &["alice"]);
        event.display_document_id = None;

        let value = serde_json::to_value(event).unwrap();
        assert!(value.get("displayDocumentId").is_none());
    }
}
