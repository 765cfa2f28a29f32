use notifier_core::{diff_progress, ProgressItem};
use pretty_assertions::assert_eq;

fn item(title: &str, link: &str, value: i64) -> ProgressItem {
    ProgressItem {
        title: title.to_string(),
        link: link.to_string(),
        value,
    }
}

fn init_logging() {
    notifier_logging::initialize_for_tests();
}

#[test]
fn identical_sets_yield_no_changes() {
    init_logging();
    let previous = vec![item("A", "link1", 40), item("B", "link2", 10)];
    let current = previous.clone();
    assert!(diff_progress(&previous, &current).is_empty());
}

#[test]
fn new_key_is_reported_with_zero_old_value() {
    init_logging();
    let previous = vec![item("A", "link1", 40)];
    let current = vec![item("A", "link1", 40), item("B", "link2", 10)];

    let changes = diff_progress(&previous, &current);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].title, "B");
    assert_eq!(changes[0].link, "link2");
    assert!(changes[0].is_new);
    assert_eq!(changes[0].old_value, 0);
    assert_eq!(changes[0].value, 10);
}

#[test]
fn new_key_with_high_value_still_gets_zero_old_value() {
    init_logging();
    let changes = diff_progress(&[], &[item("C", "", 95)]);
    assert_eq!(changes.len(), 1);
    assert!(changes[0].is_new);
    assert_eq!(changes[0].old_value, 0);
    assert_eq!(changes[0].value, 95);
}

#[test]
fn changed_value_carries_exact_old_and_new() {
    init_logging();
    let previous = vec![item("A", "link1", 40)];
    let current = vec![item("A", "link1", 75)];

    let changes = diff_progress(&previous, &current);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].title, "A");
    assert!(!changes[0].is_new);
    assert_eq!(changes[0].old_value, 40);
    assert_eq!(changes[0].value, 75);
}

#[test]
fn unchanged_items_never_appear_alongside_changes() {
    init_logging();
    let previous = vec![item("A", "link1", 40), item("B", "link2", 10)];
    let current = vec![item("A", "link1", 40), item("B", "link2", 20)];

    let changes = diff_progress(&previous, &current);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].title, "B");
}

#[test]
fn changes_preserve_source_presentation_order() {
    init_logging();
    let previous = vec![item("A", "", 1), item("B", "", 2), item("C", "", 3)];
    let current = vec![item("C", "", 4), item("B", "", 2), item("A", "", 5)];

    let changes = diff_progress(&previous, &current);
    let titles: Vec<&str> = changes.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A"]);
}
