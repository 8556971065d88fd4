//! Transaction classification
//!
//! Maps the mutations of one transaction to a single `EventType` and a
//! representative document id. Classification looks only at the
//! transaction's own mutations and its position in the filtered, sorted
//! sequence; it never looks at neighbouring transactions.
//!
//! Rules, first match wins:
//!
//! 1. Position 0 with a createOrReplace / createIfNotExists / create → created
//! 2. Later single createIfNotExists → edited (draft id) or published
//! 3. Any create-family mutation plus a delete of a draft → published
//! 4. Exactly two non-patch mutations, createIfNotExists or create plus a
//!    delete of a published id → unpublished
//! 5. Any create-family mutation on a draft id → edited (a restore, for now)
//! 6. Single delete of a draft → discardDraft
//! 7. Single createSquashed → truncated
//! 8. Only deletes → deleted
//! 9. Any patch → edited
//! 10. Otherwise unknown

use crate::transaction::{
    is_draft_id, DeletePayload, DocumentPayload, Mutation, PatchPayload, SquashedPayload,
    Transaction,
};

use super::event::EventType;

/// Outcome of classifying one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub event_type: EventType,
    /// Best-effort representative document
    pub document_id: Option<String>,
}

impl Classification {
    fn new(event_type: EventType, document_id: Option<&str>) -> Self {
        Self {
            event_type,
            document_id: document_id.map(str::to_string),
        }
    }
}

/// First mutation of each kind, gathered in one pass over a transaction
#[derive(Debug, Default)]
struct MutationSummary<'a> {
    create_or_replace: Option<&'a DocumentPayload>,
    create: Option<&'a DocumentPayload>,
    create_if_not_exists: Option<&'a DocumentPayload>,
    delete: Option<&'a DeletePayload>,
    squashed: Option<&'a SquashedPayload>,
    patch: Option<&'a PatchPayload>,
    total: usize,
    non_patch: usize,
    all_deletes: bool,
}

impl<'a> MutationSummary<'a> {
    fn scan(mutations: &'a [Mutation]) -> Self {
        let mut summary = MutationSummary {
            total: mutations.len(),
            all_deletes: true,
            ..Default::default()
        };

        for mutation in mutations {
            match mutation {
                Mutation::Patch(p) => {
                    summary.patch.get_or_insert(p);
                }
                Mutation::Create(d) => {
                    summary.create.get_or_insert(d);
                }
                Mutation::CreateOrReplace(d) => {
                    summary.create_or_replace.get_or_insert(d);
                }
                Mutation::CreateIfNotExists(d) => {
                    summary.create_if_not_exists.get_or_insert(d);
                }
                Mutation::Delete(d) => {
                    summary.delete.get_or_insert(d);
                }
                Mutation::CreateSquashed(s) => {
                    summary.squashed.get_or_insert(s);
                }
                Mutation::Other(_) => {}
            }

            if !mutation.is_patch() {
                summary.non_patch += 1;
            }
            if !mutation.is_delete() {
                summary.all_deletes = false;
            }
        }

        summary
    }

    /// The create-family payload that speaks for the transaction
    fn create_value(&self) -> Option<&'a DocumentPayload> {
        self.create_or_replace
            .or(self.create)
            .or(self.create_if_not_exists)
    }

    fn create_value_id(&self) -> Option<&'a str> {
        self.create_value().and_then(|d| d.id.as_deref())
    }

    fn any_create_on_draft(&self) -> bool {
        [self.create_or_replace, self.create, self.create_if_not_exists]
            .into_iter()
            .flatten()
            .any(|d| d.id.as_deref().is_some_and(is_draft_id))
    }

    fn deletes_draft(&self) -> bool {
        self.delete
            .and_then(|d| d.id.as_deref())
            .is_some_and(is_draft_id)
    }

    fn deletes_published(&self) -> bool {
        self.delete
            .and_then(|d| d.id.as_deref())
            .is_some_and(|id| !is_draft_id(id))
    }
}

/// Classifies transactions into history event types
pub struct Classifier;

impl Classifier {
    /// Classify a transaction's mutations.
    ///
    /// `transaction_index` is the position in the filtered, time-sorted
    /// sequence; 0 is the earliest relevant transaction.
    pub fn classify(mutations: &[Mutation], transaction_index: usize) -> Classification {
        let s = MutationSummary::scan(mutations);

        if transaction_index == 0 {
            let created = s
                .create_or_replace
                .or(s.create_if_not_exists)
                .or(s.create);
            if let Some(doc) = created {
                return Classification::new(EventType::Created, doc.id.as_deref());
            }
        }

        if transaction_index > 0 && s.total == 1 {
            if let Some(doc) = s.create_if_not_exists {
                let id = doc.id.as_deref();
                let event_type = if id.is_some_and(is_draft_id) {
                    EventType::Edited
                } else {
                    EventType::Published
                };
                return Classification::new(event_type, id);
            }
        }

        if s.create_value().is_some() && s.deletes_draft() {
            return Classification::new(EventType::Published, s.create_value_id());
        }

        if s.non_patch == 2
            && (s.create_if_not_exists.is_some() || s.create.is_some())
            && s.deletes_published()
        {
            return Classification::new(EventType::Unpublished, s.create_value_id());
        }

        // Restoring an old revision writes the draft wholesale. Reported as an
        // edit until transactions can be tagged as restores.
        if s.any_create_on_draft() {
            return Classification::new(EventType::Edited, s.create_value_id());
        }

        if s.total == 1 && s.deletes_draft() {
            return Classification::new(EventType::DiscardDraft, None);
        }

        if s.total == 1 {
            if let Some(squashed) = s.squashed {
                return Classification::new(EventType::Truncated, squashed.id.as_deref());
            }
        }

        if s.all_deletes {
            return Classification::new(EventType::Deleted, None);
        }

        if let Some(patch) = s.patch {
            return Classification::new(EventType::Edited, patch.id.as_deref());
        }

        Classification::new(EventType::Unknown, None)
    }

    /// Users credited for a classified transaction.
    ///
    /// A truncation credits everyone who contributed to the squashed
    /// history; everything else credits the transaction author.
    pub fn user_ids(transaction: &Transaction, event_type: EventType) -> Vec<String> {
        if event_type == EventType::Truncated {
            let squashed = transaction.mutations.iter().find_map(|m| match m {
                Mutation::CreateSquashed(s) => Some(s),
                _ => None,
            });
            if let Some(squashed) = squashed {
                return squashed.authors.clone();
            }
        }

        vec![transaction.author.clone()]
    }
}
