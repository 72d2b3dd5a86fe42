use crate::*;

fn sample() -> Vec<RelationshipRecord> {
    vec![
        RelationshipRecord::new("post_save", "Order", "update_inventory", "orders.py"),
        RelationshipRecord::new("post_save", "Order", "send_receipt", "orders.py"),
        RelationshipRecord::new("pre_delete", "User", "cleanup_sessions", "users.py"),
        RelationshipRecord::new("post_delete", "Order", "update_inventory", "orders.py"),
    ]
}

#[test]
fn groups_follow_first_seen_origin_order() {
    let records = sample();
    let groups = group_records(&records);
    let origins: Vec<_> = groups.iter().map(|g| g.origin).collect();
    assert_eq!(origins, vec!["Order", "User"]);
    assert_eq!(groups[0].records.len(), 3);
    assert_eq!(groups[1].records.len(), 1);

    let total: usize = groups.iter().map(|g| g.records.len()).sum();
    assert_eq!(total, records.len(), "every record lands in one group");
}

#[test]
fn group_events_and_targets_are_distinct_in_first_seen_order() {
    let records = sample();
    let groups = group_records(&records);
    let order = &groups[0];
    assert_eq!(
        order.events().into_iter().collect::<Vec<_>>(),
        vec!["post_save", "post_delete"]
    );
    assert_eq!(
        order.targets().into_iter().collect::<Vec<_>>(),
        vec!["update_inventory", "send_receipt"]
    );
}

#[test]
fn duplicate_records_are_kept() {
    let mut records = sample();
    records.push(records[0].clone());
    let groups = group_records(&records);
    assert_eq!(groups[0].records.len(), 4);
    assert_eq!(groups[0].events().len(), 2);
}

#[test]
fn empty_input_has_no_groups() {
    assert!(group_records(&[]).is_empty());
}

#[test]
fn related_to_event_is_scoped_to_first_matching_origin() {
    let mut records = sample();
    records.push(RelationshipRecord::new(
        "post_save",
        "Invoice",
        "archive",
        "billing.py",
    ));

    let related = related_to(NodeKind::Event, "post_save", &records);
    assert_eq!(related.origins.iter().collect::<Vec<_>>(), vec!["Order"]);
    assert_eq!(
        related.targets.iter().collect::<Vec<_>>(),
        vec!["update_inventory", "send_receipt"]
    );
    assert_eq!(related.events.iter().collect::<Vec<_>>(), vec!["post_save"]);
}

#[test]
fn related_to_target_collects_all_its_events() {
    let records = sample();
    let related = related_to(NodeKind::Target, "update_inventory", &records);
    assert_eq!(
        related.events.iter().collect::<Vec<_>>(),
        vec!["post_save", "post_delete"]
    );
    assert_eq!(related.origins.iter().collect::<Vec<_>>(), vec!["Order"]);
}

#[test]
fn related_to_unknown_label_is_empty() {
    let records = sample();
    assert!(related_to(NodeKind::Origin, "Nope", &records).is_empty());
}

#[test]
fn node_kind_accepts_signal_vocabulary() {
    assert_eq!("sender".parse::<NodeKind>(), Ok(NodeKind::Origin));
    assert_eq!("Signal".parse::<NodeKind>(), Ok(NodeKind::Event));
    assert_eq!("receiver".parse::<NodeKind>(), Ok(NodeKind::Target));
    assert_eq!("target".parse::<NodeKind>(), Ok(NodeKind::Target));
    assert!("edge".parse::<NodeKind>().is_err());
}
