use crate::model::RelationshipRecord;
use serde::{Deserialize, Serialize};

/// Search box state: the query text plus the two toggle buttons.
///
/// Queries are ephemeral and recomputed on every change; nothing here is cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub whole_word: bool,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `whole_word` means equality of the (possibly lower-cased) strings, not a word-boundary
    /// search.
    pub fn matches(&self, value: &str) -> bool {
        if self.case_sensitive {
            return if self.whole_word {
                value == self.text
            } else {
                value.contains(self.text.as_str())
            };
        }
        let value = value.to_lowercase();
        let text = self.text.to_lowercase();
        if self.whole_word {
            value == text
        } else {
            value.contains(text.as_str())
        }
    }

    pub fn matches_record(&self, record: &RelationshipRecord) -> bool {
        record.columns().into_iter().any(|v| self.matches(v))
    }
}

/// Order-preserving subsequence of `records` that match `query`. An empty query keeps everything.
pub fn filter<'a>(records: &'a [RelationshipRecord], query: &Query) -> Vec<&'a RelationshipRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| query.matches_record(r)).collect()
}

/// Owned variant of [`filter`], for callers that feed the result straight into a layout pass.
pub fn filter_owned(records: &[RelationshipRecord], query: &Query) -> Vec<RelationshipRecord> {
    filter(records, query).into_iter().cloned().collect()
}
