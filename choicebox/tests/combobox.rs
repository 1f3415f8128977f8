use choicebox::choice::Choice;
use choicebox::combobox::Combobox;
use choicebox::events::EventResult;
use choicebox::keybinds::{Key, KeyCombo};

fn cities() -> Vec<Choice> {
    vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto"),
        Choice::new("3", "Faro"),
    ]
}

#[test]
fn test_select_commits_and_closes() {
    let combobox = Combobox::with_choices(cities());
    combobox.open();
    assert!(combobox.select("2"));
    assert_eq!(combobox.selected_value(), Some("2".to_string()));
    assert_eq!(combobox.selected_label(), Some("Porto".to_string()));
    assert!(!combobox.is_open());
    assert_eq!(combobox.search_text(), "");
}

#[test]
fn test_select_unknown_or_disabled_is_noop() {
    let combobox: Combobox = Combobox::with_choices(vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto").disabled(),
    ]);
    assert!(!combobox.select("nope"));
    assert!(!combobox.select("2"));
    assert_eq!(combobox.selected_value(), None);
}

#[test]
fn test_select_noop_while_widget_disabled() {
    let combobox = Combobox::with_choices(cities());
    combobox.set_disabled(true);
    assert!(!combobox.select("1"));
    combobox.open();
    assert!(!combobox.is_open());
}

#[test]
fn test_clear_requires_clearable() {
    let combobox = Combobox::with_choices(cities());
    combobox.select("1");
    assert!(!combobox.clear());
    assert_eq!(combobox.selected_value(), Some("1".to_string()));

    combobox.set_clearable(true);
    assert!(combobox.clear());
    assert_eq!(combobox.selected_value(), None);
    // Clearing never opens the dropdown.
    assert!(!combobox.is_open());
}

#[test]
fn test_typing_filters_and_enter_commits() {
    let combobox = Combobox::with_choices(cities());
    let (result, _) = combobox.handle_key(&KeyCombo::key(Key::Down));
    assert_eq!(result, EventResult::Consumed);
    assert!(combobox.is_open());

    combobox.handle_key(&KeyCombo::key(Key::Char('a')));
    assert_eq!(combobox.filtered_len(), 2); // Lisboa, Faro

    combobox.handle_key(&KeyCombo::key(Key::Down));
    assert_eq!(combobox.highlight(), 1);

    let (_, events) = combobox.handle_key(&KeyCombo::key(Key::Enter));
    let change = events.change.unwrap();
    assert_eq!(change.value, Some("3".to_string())); // Faro
    assert!(!combobox.is_open());
}

#[test]
fn test_highlight_clamps_at_ends() {
    let combobox = Combobox::with_choices(cities());
    combobox.open();
    combobox.handle_key(&KeyCombo::key(Key::Up));
    assert_eq!(combobox.highlight(), 0);
    for _ in 0..10 {
        combobox.handle_key(&KeyCombo::key(Key::Down));
    }
    assert_eq!(combobox.highlight(), 2);
}

#[test]
fn test_escape_closes_and_clears_search() {
    let combobox = Combobox::with_choices(cities());
    combobox.open();
    combobox.handle_key(&KeyCombo::key(Key::Char('p')));
    assert_eq!(combobox.filtered_len(), 1);

    let (result, _) = combobox.handle_key(&KeyCombo::key(Key::Escape));
    assert_eq!(result, EventResult::Consumed);
    assert!(!combobox.is_open());

    // Reopening shows the full list again.
    combobox.open();
    assert_eq!(combobox.search_text(), "");
    assert_eq!(combobox.filtered_len(), 3);
}

#[test]
fn test_escape_on_closed_widget_is_ignored() {
    let combobox = Combobox::with_choices(cities());
    let (result, _) = combobox.handle_key(&KeyCombo::key(Key::Escape));
    assert_eq!(result, EventResult::Ignored);
}

#[test]
fn test_tab_closes_but_propagates() {
    let combobox = Combobox::with_choices(cities());
    combobox.open();
    let (result, _) = combobox.handle_key(&KeyCombo::key(Key::Tab));
    assert_eq!(result, EventResult::Ignored);
    assert!(!combobox.is_open());
}

#[test]
fn test_pointer_select_skips_disabled() {
    let combobox: Combobox = Combobox::with_choices(vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto").disabled(),
    ]);
    combobox.open();
    let events = combobox.pointer_select(1);
    assert!(events.change.is_none());
    assert_eq!(combobox.selected_value(), None);

    let events = combobox.pointer_select(0);
    assert_eq!(events.change.unwrap().value, Some("1".to_string()));
}

#[test]
fn test_create_flow_success() {
    let combobox = Combobox::with_choices(cities());
    combobox.set_creatable(true);
    combobox.open();
    for c in "Braga".chars() {
        combobox.handle_key(&KeyCombo::key(Key::Char(c)));
    }
    assert_eq!(combobox.filtered_len(), 0);

    let (_, events) = combobox.handle_key(&KeyCombo::key(Key::Enter));
    let request = events.create.unwrap();
    assert_eq!(request.text, "Braga");
    assert!(combobox.is_creating());

    // Re-entrant Enter while pending must not emit a second request.
    let (_, events) = combobox.handle_key(&KeyCombo::key(Key::Enter));
    assert!(events.create.is_none());

    combobox.create_succeeded();
    assert!(!combobox.is_creating());
    assert!(!combobox.is_open());
}

#[test]
fn test_create_flow_failure_keeps_search() {
    let combobox = Combobox::with_choices(cities());
    combobox.set_creatable(true);
    combobox.open();
    for c in "Braga".chars() {
        combobox.handle_key(&KeyCombo::key(Key::Char(c)));
    }
    let (_, events) = combobox.handle_key(&KeyCombo::key(Key::Enter));
    assert!(events.create.is_some());

    combobox.create_failed("name already exists");
    assert!(!combobox.is_creating());
    assert!(combobox.is_open());
    assert_eq!(combobox.search_text(), "Braga");
    assert_eq!(combobox.error(), Some("name already exists".to_string()));

    // The user can retry after editing.
    combobox.handle_key(&KeyCombo::key(Key::Backspace));
    let (_, events) = combobox.handle_key(&KeyCombo::key(Key::Enter));
    assert_eq!(events.create.unwrap().text, "Brag");
}

#[test]
fn test_non_creatable_enter_on_empty_filter_is_quiet() {
    let combobox = Combobox::with_choices(cities());
    combobox.open();
    combobox.handle_key(&KeyCombo::key(Key::Char('z')));
    let (result, events) = combobox.handle_key(&KeyCombo::key(Key::Enter));
    assert_eq!(result, EventResult::Consumed);
    assert!(events.change.is_none());
    assert!(events.create.is_none());
}

#[test]
fn test_unsearchable_ignores_typed_text() {
    let combobox = Combobox::with_choices(cities());
    combobox.set_searchable(false);
    combobox.open();
    combobox.handle_key(&KeyCombo::key(Key::Char('a')));
    assert_eq!(combobox.search_text(), "");
    assert_eq!(combobox.filtered_len(), 3);
}

#[test]
fn test_selecting_clears_previous_error() {
    let combobox = Combobox::with_choices(cities());
    combobox.set_error("required");
    assert!(combobox.has_error());
    combobox.select("1");
    assert!(!combobox.has_error());
}
