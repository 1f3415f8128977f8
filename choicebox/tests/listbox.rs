use choicebox::choice::Choice;
use choicebox::listbox::Listbox;

fn cities() -> Vec<Choice> {
    vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto"),
        Choice::new("3", "Faro"),
    ]
}

#[test]
fn test_query_narrows_and_resets_highlight() {
    let mut listbox = Listbox::with_choices(cities());
    listbox.highlight_down();
    assert_eq!(listbox.highlight(), 1);

    listbox.set_query("a");
    assert_eq!(listbox.filtered_len(), 2); // Lisboa, Faro
    assert_eq!(listbox.highlight(), 0);
}

#[test]
fn test_highlight_commit_maps_to_original_choice() {
    let mut listbox = Listbox::with_choices(cities());
    listbox.set_query("a");
    listbox.highlight_down();
    // Second filtered entry is Faro, original index 2.
    let committed = listbox.commit_highlighted().unwrap();
    assert_eq!(committed.value, "3");
    assert_eq!(committed.label, "Faro");
}

#[test]
fn test_highlight_does_not_wrap() {
    let mut listbox = Listbox::with_choices(cities());
    assert!(!listbox.highlight_up());
    assert_eq!(listbox.highlight(), 0);

    assert!(listbox.highlight_down());
    assert!(listbox.highlight_down());
    assert!(!listbox.highlight_down());
    assert_eq!(listbox.highlight(), 2);
}

#[test]
fn test_highlight_noop_on_empty_filter() {
    let mut listbox = Listbox::with_choices(cities());
    listbox.set_query("zzz");
    assert_eq!(listbox.filtered_len(), 0);
    assert!(!listbox.highlight_down());
    assert!(!listbox.highlight_up());
    assert!(listbox.commit_highlighted().is_none());
}

#[test]
fn test_set_highlight_clamps() {
    let mut listbox = Listbox::with_choices(cities());
    listbox.set_highlight(99);
    assert_eq!(listbox.highlight(), 2);
}

#[test]
fn test_disabled_choice_cannot_commit() {
    let mut listbox: Listbox = Listbox::with_choices(vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto").disabled(),
    ]);
    listbox.set_highlight(1);
    assert!(listbox.commit_highlighted().is_none());
    assert!(listbox.selectable_by_value("2").is_none());
    assert!(listbox.by_value("2").is_some());
}

#[test]
fn test_replacing_choices_keeps_query() {
    let mut listbox = Listbox::with_choices(cities());
    listbox.set_query("o");
    listbox.set_choices(vec![
        Choice::new("a", "Madrid"),
        Choice::new("b", "Toledo"),
    ]);
    assert_eq!(listbox.query(), "o");
    assert_eq!(listbox.filtered_len(), 1); // Toledo
    assert_eq!(listbox.highlight(), 0);
}
