//! Transaction and mutation records
//!
//! A transaction is one atomic write as reported by the history API:
//!
//! ```text
//! {"id": "<rev>", "timestamp": "<rfc3339>", "author": "<user>",
//!  "documentIDs": ["doc", "drafts.doc"],
//!  "mutations": [{"<kind>": {...}}, ...]}
//! ```
//!
//! Mutation payloads are only inspected for their target id. Everything else
//! they carry is kept opaquely in `fields`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix that marks the draft copy of a document
pub const DRAFT_PREFIX: &str = "drafts.";

/// Returns true if `id` names a draft
pub fn is_draft_id(id: &str) -> bool {
    id.starts_with(DRAFT_PREFIX)
}

/// One atomic write against one or more documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Revision identifier
    pub id: String,
    /// Commit time
    pub timestamp: DateTime<Utc>,
    /// User who made the write
    pub author: String,
    /// Documents affected. Absent on some system transactions.
    #[serde(rename = "documentIDs", default, skip_serializing_if = "Option::is_none")]
    pub document_ids: Option<Vec<String>>,
    /// Mutations in the order they were applied
    pub mutations: Vec<Mutation>,
}

impl Transaction {
    /// Create a transaction touching `document_ids`
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        author: impl Into<String>,
        document_ids: Vec<String>,
        mutations: Vec<Mutation>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            author: author.into(),
            document_ids: Some(document_ids),
            mutations,
        }
    }

    /// Document ids, empty when absent
    pub fn document_ids(&self) -> &[String] {
        self.document_ids.as_deref().unwrap_or(&[])
    }
}

/// A single write inside a transaction. Exactly one payload per mutation.
///
/// Mutation objects are only presence-checked for a known key; an
/// unrecognised key decodes as `Other` instead of failing the log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    /// Partial update of an existing document
    Patch(PatchPayload),
    /// Full document; fails upstream if the id exists
    Create(DocumentPayload),
    /// Full document; replaces if the id exists
    CreateOrReplace(DocumentPayload),
    /// Full document; no-op if the id exists
    CreateIfNotExists(DocumentPayload),
    /// Removal of a document
    Delete(DeletePayload),
    /// Truncation checkpoint standing in for squashed history
    CreateSquashed(SquashedPayload),
    /// Any mutation whose key is none of the above. Kept verbatim; it is
    /// neither a patch nor a delete to the classifier.
    #[serde(untagged)]
    Other(Map<String, Value>),
}

impl Mutation {
    /// The document this mutation targets, if the payload names one
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::Patch(p) => p.id.as_deref(),
            Mutation::Create(d) | Mutation::CreateOrReplace(d) | Mutation::CreateIfNotExists(d) => {
                d.id.as_deref()
            }
            Mutation::Delete(d) => d.id.as_deref(),
            Mutation::CreateSquashed(s) => s.id.as_deref(),
            Mutation::Other(_) => None,
        }
    }

    pub fn is_patch(&self) -> bool {
        matches!(self, Mutation::Patch(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Mutation::Delete(_))
    }

    pub fn patch(id: impl Into<String>) -> Self {
        Mutation::Patch(PatchPayload::new(id))
    }

    pub fn create(id: impl Into<String>) -> Self {
        Mutation::Create(DocumentPayload::new(id))
    }

    pub fn create_or_replace(id: impl Into<String>) -> Self {
        Mutation::CreateOrReplace(DocumentPayload::new(id))
    }

    pub fn create_if_not_exists(id: impl Into<String>) -> Self {
        Mutation::CreateIfNotExists(DocumentPayload::new(id))
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Mutation::Delete(DeletePayload::new(id))
    }

    pub fn create_squashed<I, S>(id: impl Into<String>, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Mutation::CreateSquashed(SquashedPayload {
            id: Some(id.into()),
            authors: authors.into_iter().map(Into::into).collect(),
            fields: Map::new(),
        })
    }
}

/// Full document body carried by the create family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DocumentPayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }
}

/// Partial update; `id` is the patched document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PatchPayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }
}

/// Deletion target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DeletePayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }
}

/// Synthesized document that replaces truncated history, plus everyone who
/// contributed to that history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquashedPayload {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_prefix() {
        assert!(is_draft_id("drafts.doc1"));
        assert!(!is_draft_id("doc1"));
        assert!(!is_draft_id(".drafts.doc1"));
    }

    #[test]
    fn test_mutation_kinds_from_json() {
        let mutations: Vec<Mutation> = serde_json::from_value(json!([
            {"patch": {"id": "drafts.doc1", "set": {"title": "Hello"}}},
            {"create": {"_id": "doc1", "_type": "post"}},
            {"createOrReplace": {"_id": "doc1"}},
            {"createIfNotExists": {"_id": "drafts.doc1"}},
            {"delete": {"id": "drafts.doc1"}},
            {"createSquashed": {"_id": "doc1", "authors": ["a", "b"]}}
        ]))
        .unwrap();

        assert!(matches!(mutations[0], Mutation::Patch(_)));
        assert!(matches!(mutations[1], Mutation::Create(_)));
        assert!(matches!(mutations[2], Mutation::CreateOrReplace(_)));
        assert!(matches!(mutations[3], Mutation::CreateIfNotExists(_)));
        assert!(matches!(mutations[4], Mutation::Delete(_)));
        assert!(matches!(mutations[5], Mutation::CreateSquashed(_)));
        assert_eq!(mutations[0].target_id(), Some("drafts.doc1"));
        assert_eq!(mutations[4].target_id(), Some("drafts.doc1"));
    }

    #[test]
    fn test_payload_keeps_extra_fields() {
        let mutation: Mutation =
            serde_json::from_value(json!({"create": {"_id": "doc1", "title": "Hi"}})).unwrap();

        match &mutation {
            Mutation::Create(doc) => assert_eq!(doc.fields["title"], "Hi"),
            other => panic!("unexpected mutation {:?}", other),
        }

        let back = serde_json::to_value(&mutation).unwrap();
        assert_eq!(back, json!({"create": {"_id": "doc1", "title": "Hi"}}));
    }

    #[test]
    fn test_missing_id_is_absent_not_error() {
        let mutation: Mutation =
            serde_json::from_value(json!({"createIfNotExists": {"_type": "post"}})).unwrap();
        assert_eq!(mutation.target_id(), None);
    }

    #[test]
    fn test_unrecognised_mutation_kind_kept_as_other() {
        let raw = json!({"createOrPatch": {"_id": "doc1"}});
        let mutation: Mutation = serde_json::from_value(raw.clone()).unwrap();

        assert!(matches!(&mutation, Mutation::Other(fields) if fields.contains_key("createOrPatch")));
        assert!(!mutation.is_patch());
        assert!(!mutation.is_delete());
        assert_eq!(mutation.target_id(), None);
        assert_eq!(serde_json::to_value(&mutation).unwrap(), raw);
    }

    #[test]
    fn test_non_object_mutation_rejected() {
        let result: Result<Mutation, _> = serde_json::from_value(json!("patch"));
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_without_document_ids() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "rev1",
            "timestamp": "2019-03-01T10:00:00Z",
            "author": "alice",
            "mutations": []
        }))
        .unwrap();

        assert!(tx.document_ids.is_none());
        assert!(tx.document_ids().is_empty());
    }
}
