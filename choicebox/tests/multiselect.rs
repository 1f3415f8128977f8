use choicebox::choice::Choice;
use choicebox::events::EventResult;
use choicebox::keybinds::{Key, KeyCombo};
use choicebox::multiselect::MultiCombobox;

fn cities() -> Vec<Choice> {
    vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto"),
        Choice::new("3", "Faro"),
    ]
}

#[test]
fn test_toggle_appends_in_insertion_order() {
    let multi = MultiCombobox::with_choices(cities());
    assert!(multi.toggle("2"));
    assert!(multi.toggle("1"));
    assert_eq!(multi.selected_values(), vec!["2", "1"]);
    let labels: Vec<String> = multi
        .selected_choices()
        .iter()
        .map(|c| c.label.clone())
        .collect();
    assert_eq!(labels, vec!["Porto", "Lisboa"]);
}

#[test]
fn test_toggle_off_removes() {
    let multi = MultiCombobox::with_choices(cities());
    multi.toggle("1");
    multi.toggle("2");
    assert!(multi.toggle("1"));
    assert_eq!(multi.selected_values(), vec!["2"]);
}

#[test]
fn test_cap_blocks_additions_but_not_removals() {
    let multi = MultiCombobox::with_max_selections(2);
    multi.set_choices(cities());
    assert!(multi.toggle("1"));
    assert!(multi.toggle("2"));
    // Third addition is a no-op at the cap.
    assert!(!multi.toggle("3"));
    assert_eq!(multi.selected_values(), vec!["1", "2"]);
    assert!(multi.at_max());

    // Removal always works, and frees a slot.
    assert!(multi.toggle("1"));
    assert!(multi.toggle("3"));
    assert_eq!(multi.selected_values(), vec!["2", "3"]);
}

#[test]
fn test_shrinking_cap_keeps_existing_selection() {
    let multi = MultiCombobox::with_choices(cities());
    multi.toggle("1");
    multi.toggle("2");
    multi.toggle("3");
    multi.set_max_selections(Some(1));
    assert_eq!(multi.selected_len(), 3);
    assert!(multi.at_max());
}

#[test]
fn test_disabled_choice_cannot_be_added() {
    let multi: MultiCombobox = MultiCombobox::with_choices(vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto").disabled(),
    ]);
    assert!(!multi.toggle("2"));
    assert!(multi.selected_values().is_empty());
}

#[test]
fn test_backspace_pops_most_recent_chip() {
    let multi = MultiCombobox::with_choices(cities());
    multi.toggle("1");
    multi.toggle("3");

    let (result, events) = multi.handle_key(&KeyCombo::key(Key::Backspace));
    assert_eq!(result, EventResult::Consumed);
    assert_eq!(events.change.unwrap().values, vec!["1"]);

    // Works again, down to empty, then turns into a no-op.
    multi.handle_key(&KeyCombo::key(Key::Backspace));
    assert!(multi.selected_values().is_empty());
    let (result, _) = multi.handle_key(&KeyCombo::key(Key::Backspace));
    assert_eq!(result, EventResult::Ignored);
}

#[test]
fn test_backspace_edits_search_before_popping() {
    let multi = MultiCombobox::with_choices(cities());
    multi.toggle("1");
    multi.open();
    multi.handle_key(&KeyCombo::key(Key::Char('p')));

    let (_, events) = multi.handle_key(&KeyCombo::key(Key::Backspace));
    assert!(events.change.is_none());
    assert_eq!(multi.selected_values(), vec!["1"]);
    assert_eq!(multi.search_text(), "");

    // Now the search is empty, so the next Backspace pops the chip.
    let (_, events) = multi.handle_key(&KeyCombo::key(Key::Backspace));
    assert_eq!(events.change.unwrap().values, Vec::<String>::new());
}

#[test]
fn test_retoggled_value_moves_to_back() {
    let multi = MultiCombobox::with_choices(cities());
    multi.toggle("1");
    multi.toggle("2");
    multi.toggle("1"); // off
    multi.toggle("1"); // on again, now most recent
    assert_eq!(multi.selected_values(), vec!["2", "1"]);
    assert_eq!(multi.pop_last(), Some("1".to_string()));
}

#[test]
fn test_enter_toggles_highlighted() {
    let multi = MultiCombobox::with_choices(cities());
    multi.handle_key(&KeyCombo::key(Key::Enter)); // opens
    assert!(multi.is_open());
    multi.handle_key(&KeyCombo::key(Key::Down));

    let (_, events) = multi.handle_key(&KeyCombo::key(Key::Enter));
    assert_eq!(events.change.unwrap().values, vec!["2"]);
    // Dropdown stays open for further toggles.
    assert!(multi.is_open());

    let (_, events) = multi.handle_key(&KeyCombo::key(Key::Enter));
    assert_eq!(events.change.unwrap().values, Vec::<String>::new());
}

#[test]
fn test_pointer_toggle_uses_filtered_index() {
    let multi = MultiCombobox::with_choices(cities());
    multi.open();
    multi.handle_key(&KeyCombo::key(Key::Char('a'))); // Lisboa, Faro
    let events = multi.pointer_toggle(1);
    assert_eq!(events.change.unwrap().values, vec!["3"]);
}

#[test]
fn test_pointer_remove_works_while_closed() {
    let multi = MultiCombobox::with_choices(cities());
    multi.toggle("1");
    multi.toggle("2");
    let events = multi.pointer_remove("1");
    assert_eq!(events.change.unwrap().values, vec!["2"]);
    let events = multi.pointer_remove("1");
    assert!(events.change.is_none());
}
