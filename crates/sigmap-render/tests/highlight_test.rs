use sigmap_core::{Query, RelationshipRecord};
use sigmap_render::highlight::{DIMMED_OPACITY, FULL_OPACITY};
use sigmap_render::{ElementId, LayoutOptions, highlight, layout};

fn example_records() -> Vec<RelationshipRecord> {
    vec![
        RelationshipRecord::new("post_save", "Order", "update_inventory", "orders.py"),
        RelationshipRecord::new("post_save", "Order", "send_receipt", "orders.py"),
        RelationshipRecord::new("pre_delete", "User", "cleanup_sessions", "users.py"),
    ]
}

#[test]
fn empty_query_lights_everything() {
    let out = layout(&example_records(), &LayoutOptions::default());
    let h = highlight(&Query::default(), &out);
    assert_eq!(
        h.len(),
        out.frames.len() * 2 + out.nodes.len() + out.edges.len()
    );
    assert!(h.iter().all(|(_, o)| o == FULL_OPACITY));
}

#[test]
fn matching_origin_lights_its_group_only() {
    let out = layout(&example_records(), &LayoutOptions::default());
    let h = highlight(&Query::new("order"), &out);

    assert_eq!(h.opacity(&ElementId::Frame("Order".into())), FULL_OPACITY);
    assert_eq!(h.opacity(&ElementId::FrameLabel("Order".into())), FULL_OPACITY);
    assert_eq!(h.opacity(&ElementId::Frame("User".into())), DIMMED_OPACITY);
    assert_eq!(h.opacity(&ElementId::FrameLabel("User".into())), DIMMED_OPACITY);

    for node in &out.nodes {
        let expected = if node.id.starts_with("0:") {
            FULL_OPACITY
        } else {
            DIMMED_OPACITY
        };
        assert_eq!(h.opacity(&ElementId::Node(node.id.clone())), expected, "{}", node.id);
    }
    for edge in &out.edges {
        let expected = if edge.from.starts_with("0:") {
            FULL_OPACITY
        } else {
            DIMMED_OPACITY
        };
        assert_eq!(h.opacity(&ElementId::Edge(edge.id.clone())), expected, "{}", edge.id);
    }
}

#[test]
fn only_frame_captions_decide_the_match() {
    let out = layout(&example_records(), &LayoutOptions::default());
    // `post_save` is an event label, not an origin: no group lights up.
    let h = highlight(&Query::new("post_save"), &out);
    assert!(h.iter().all(|(_, o)| o == DIMMED_OPACITY));
}

#[test]
fn match_flags_are_respected() {
    let out = layout(&example_records(), &LayoutOptions::default());

    let h = highlight(&Query::new("Ord").whole_word(true), &out);
    assert_eq!(h.opacity(&ElementId::Frame("Order".into())), DIMMED_OPACITY);

    let h = highlight(&Query::new("user").case_sensitive(true), &out);
    assert_eq!(h.opacity(&ElementId::Frame("User".into())), DIMMED_OPACITY);

    let h = highlight(&Query::new("User").case_sensitive(true), &out);
    assert_eq!(h.opacity(&ElementId::Frame("User".into())), FULL_OPACITY);
    assert_eq!(h.opacity(&ElementId::Node("1:target:cleanup_sessions".into())), FULL_OPACITY);
}

#[test]
fn highlight_leaves_layout_untouched_and_is_recomputed() {
    let out = layout(&example_records(), &LayoutOptions::default());
    let before = out.clone();
    let a = highlight(&Query::new("order"), &out);
    let b = highlight(&Query::new("user"), &out);
    let a_again = highlight(&Query::new("order"), &out);
    assert_eq!(out, before);
    assert_ne!(a, b);
    assert_eq!(a, a_again);
}

#[test]
fn empty_layout_has_empty_highlight() {
    let out = layout(&[], &LayoutOptions::default());
    assert!(highlight(&Query::new("x"), &out).is_empty());
}
