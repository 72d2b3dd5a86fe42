use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One `event -> origin -> target` binding found in a source file.
///
/// Records are produced once per extraction run and never mutated. Duplicates are legal: the same
/// receiver bound twice yields two identical records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// The signal being relayed, e.g. `post_save`.
    pub event: String,
    /// The sender the receiver is bound to, e.g. `Order`.
    pub origin: String,
    /// The receiving function, e.g. `update_inventory`.
    pub target: String,
    pub source_file: String,
}

impl RelationshipRecord {
    pub fn new(
        event: impl Into<String>,
        origin: impl Into<String>,
        target: impl Into<String>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            origin: origin.into(),
            target: target.into(),
            source_file: source_file.into(),
        }
    }

    /// The value of the field that backs a node of the given kind.
    pub fn field(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Origin => &self.origin,
            NodeKind::Event => &self.event,
            NodeKind::Target => &self.target,
        }
    }

    /// All four fields, in table column order (signal, sender, receiver, file).
    pub fn columns(&self) -> [&str; 4] {
        [&self.event, &self.origin, &self.target, &self.source_file]
    }
}

/// The three node tiers of a relationship diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Origin,
    Event,
    Target,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Origin => "origin",
            NodeKind::Event => "event",
            NodeKind::Target => "target",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ();

    /// Accepts both the tier names and the signal vocabulary (`sender`, `signal`, `receiver`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "origin" | "sender" => Ok(Self::Origin),
            "event" | "signal" => Ok(Self::Event),
            "target" | "receiver" => Ok(Self::Target),
            _ => Err(()),
        }
    }
}

/// All records sharing one origin.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub origin: &'a str,
    pub records: Vec<&'a RelationshipRecord>,
}

impl<'a> Group<'a> {
    /// Distinct event names, in first-seen order.
    pub fn events(&self) -> IndexSet<&'a str> {
        self.records.iter().map(|r| r.event.as_str()).collect()
    }

    /// Distinct target names, in first-seen order.
    pub fn targets(&self) -> IndexSet<&'a str> {
        self.records.iter().map(|r| r.target.as_str()).collect()
    }
}

/// Partitions records by origin. Groups come back in first-seen origin order and each record
/// lands in exactly one group.
pub fn group_records(records: &[RelationshipRecord]) -> Vec<Group<'_>> {
    let mut by_origin: IndexMap<&str, Vec<&RelationshipRecord>> = IndexMap::new();
    for record in records {
        by_origin
            .entry(record.origin.as_str())
            .or_default()
            .push(record);
    }
    by_origin
        .into_iter()
        .map(|(origin, records)| Group { origin, records })
        .collect()
}

/// Summary shown for a selected node: the distinct neighbours of a label within its group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Related {
    pub events: IndexSet<String>,
    pub origins: IndexSet<String>,
    pub targets: IndexSet<String>,
}

impl Related {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.origins.is_empty() && self.targets.is_empty()
    }
}

/// Looks up everything related to the node `(kind, label)`.
///
/// The lookup is scoped to the origin group of the first record whose `kind` field equals
/// `label`. When no record matches, the scope is the whole record list (and the result is empty).
pub fn related_to(kind: NodeKind, label: &str, records: &[RelationshipRecord]) -> Related {
    let scope_origin = records
        .iter()
        .find(|r| r.field(kind) == label)
        .map(|r| r.origin.as_str());

    let mut out = Related::default();
    for record in records {
        if scope_origin.is_some_and(|origin| record.origin != origin) {
            continue;
        }
        if record.field(kind) != label {
            continue;
        }
        out.events.insert(record.event.clone());
        out.origins.insert(record.origin.clone());
        out.targets.insert(record.target.clone());
    }
    out
}
