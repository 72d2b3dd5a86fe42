//! Query highlighting for a laid-out diagram.
//!
//! A frame (and its caption) is lit when its origin matches the query. Nodes and edges carry no
//! group reference: they are lit when they sit inside a lit frame, so the decision only needs the
//! geometry that the layout already produced.

use crate::model::SignalGraphLayout;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use sigmap_core::Query;
use sigmap_core::geom::{Rect, rect_contains_inclusive};

pub const FULL_OPACITY: f64 = 1.0;
pub const DIMMED_OPACITY: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum ElementId {
    /// Keyed by origin.
    Frame(String),
    /// Keyed by origin.
    FrameLabel(String),
    Node(String),
    Edge(String),
}

/// Display opacity per drawn element. Transient: never written back into the layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub frames: IndexMap<String, f64>,
    pub frame_labels: IndexMap<String, f64>,
    pub nodes: IndexMap<String, f64>,
    pub edges: IndexMap<String, f64>,
}

impl Highlight {
    /// Opacity of `id`; elements unknown to this map are drawn at full opacity.
    pub fn opacity(&self, id: &ElementId) -> f64 {
        let found = match id {
            ElementId::Frame(origin) => self.frames.get(origin),
            ElementId::FrameLabel(origin) => self.frame_labels.get(origin),
            ElementId::Node(node) => self.nodes.get(node),
            ElementId::Edge(edge) => self.edges.get(edge),
        };
        found.copied().unwrap_or(FULL_OPACITY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, f64)> + '_ {
        let frames = self
            .frames
            .iter()
            .map(|(k, v)| (ElementId::Frame(k.clone()), *v));
        let labels = self
            .frame_labels
            .iter()
            .map(|(k, v)| (ElementId::FrameLabel(k.clone()), *v));
        let nodes = self
            .nodes
            .iter()
            .map(|(k, v)| (ElementId::Node(k.clone()), *v));
        let edges = self
            .edges
            .iter()
            .map(|(k, v)| (ElementId::Edge(k.clone()), *v));
        frames.chain(labels).chain(nodes).chain(edges)
    }

    pub fn len(&self) -> usize {
        self.frames.len() + self.frame_labels.len() + self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lit(on: bool) -> f64 {
    if on { FULL_OPACITY } else { DIMMED_OPACITY }
}

/// Computes element opacities for `query` from scratch.
///
/// An empty query lights everything. Otherwise an element is lit iff it is (frame, caption) or
/// lies inside (node centre, both edge endpoints) a frame whose origin matches.
pub fn highlight(query: &Query, layout: &SignalGraphLayout) -> Highlight {
    let mut out = Highlight::default();

    if query.is_empty() {
        for frame in &layout.frames {
            out.frames.insert(frame.origin.clone(), FULL_OPACITY);
            out.frame_labels.insert(frame.origin.clone(), FULL_OPACITY);
        }
        for node in &layout.nodes {
            out.nodes.insert(node.id.clone(), FULL_OPACITY);
        }
        for edge in &layout.edges {
            out.edges.insert(edge.id.clone(), FULL_OPACITY);
        }
        return out;
    }

    let matched: FxHashSet<&str> = layout
        .frames
        .iter()
        .filter(|f| query.matches(&f.title_label.text))
        .map(|f| f.origin.as_str())
        .collect();
    let lit_rects: Vec<Rect> = layout
        .frames
        .iter()
        .filter(|f| matched.contains(f.origin.as_str()))
        .map(|f| f.rect())
        .collect();

    for frame in &layout.frames {
        let on = lit(matched.contains(frame.origin.as_str()));
        out.frames.insert(frame.origin.clone(), on);
        out.frame_labels.insert(frame.origin.clone(), on);
    }

    for node in &layout.nodes {
        let center = node.center();
        let inside = lit_rects.iter().any(|r| rect_contains_inclusive(r, center));
        out.nodes.insert(node.id.clone(), lit(inside));
    }

    for edge in &layout.edges {
        let inside = match (edge.start(), edge.end()) {
            (Some(start), Some(end)) => lit_rects
                .iter()
                .any(|r| rect_contains_inclusive(r, start) && rect_contains_inclusive(r, end)),
            _ => false,
        };
        out.edges.insert(edge.id.clone(), lit(inside));
    }

    tracing::debug!(
        query = %query.text,
        matched_groups = matched.len(),
        "computed highlight"
    );
    out
}
