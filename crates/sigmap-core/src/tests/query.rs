use crate::*;

fn sample() -> Vec<RelationshipRecord> {
    vec![
        RelationshipRecord::new("post_save", "Order", "update_inventory", "shop/orders.py"),
        RelationshipRecord::new("post_save", "Order", "send_receipt", "shop/orders.py"),
        RelationshipRecord::new("pre_delete", "User", "cleanup_sessions", "accounts/users.py"),
    ]
}

#[test]
fn default_match_is_case_insensitive_substring() {
    let q = Query::new("ORD");
    assert!(q.matches("Order"));
    assert!(q.matches("shop/orders.py"));
    assert!(!q.matches("User"));
}

#[test]
fn case_sensitive_match_compares_as_is() {
    let q = Query::new("order").case_sensitive(true);
    assert!(!q.matches("Order"));
    assert!(q.matches("shop/orders.py"));
}

#[test]
fn whole_word_requires_equality() {
    let q = Query::new("order").whole_word(true);
    assert!(q.matches("Order"));
    assert!(!q.matches("Orders"));

    let q = Query::new("order").whole_word(true).case_sensitive(true);
    assert!(!q.matches("Order"));
    assert!(q.matches("order"));
}

#[test]
fn empty_query_keeps_every_record_in_order() {
    let records = sample();
    let out = filter(&records, &Query::default());
    assert_eq!(out.len(), records.len());
    for (a, b) in out.iter().zip(records.iter()) {
        assert_eq!(*a, b);
    }
}

#[test]
fn filter_is_an_order_preserving_subsequence() {
    let records = sample();
    let out = filter(&records, &Query::new("receipt"));
    assert_eq!(out, vec![&records[1]]);

    let out = filter(&records, &Query::new("post_save"));
    assert_eq!(out, vec![&records[0], &records[1]]);
}

#[test]
fn any_field_can_match() {
    let records = sample();
    assert_eq!(filter(&records, &Query::new("accounts")).len(), 1);
    assert_eq!(filter(&records, &Query::new("cleanup")).len(), 1);
    assert_eq!(filter(&records, &Query::new("user")).len(), 1);
    assert!(filter(&records, &Query::new("missing")).is_empty());
}

#[test]
fn filter_owned_matches_filter() {
    let records = sample();
    let q = Query::new("order");
    let owned = filter_owned(&records, &q);
    let borrowed: Vec<RelationshipRecord> = filter(&records, &q).into_iter().cloned().collect();
    assert_eq!(owned, borrowed);
}
