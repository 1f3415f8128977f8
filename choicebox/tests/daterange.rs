use chrono::NaiveDate;

use choicebox::daterange::{
    DateRange, DateRangePicker, SelectionPhase, default_presets,
};
use choicebox::events::EventResult;
use choicebox::keybinds::{Key, KeyCombo};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_two_picks_commit_a_range_and_close() {
    let picker = DateRangePicker::new();
    picker.open();
    assert_eq!(picker.phase(), SelectionPhase::AwaitingStart);

    picker.pick(date(2025, 1, 5));
    assert_eq!(picker.phase(), SelectionPhase::AwaitingEnd);
    assert!(picker.is_open());

    picker.pick(date(2025, 1, 10));
    let range = picker.range();
    assert_eq!(range.start, Some(date(2025, 1, 5)));
    assert_eq!(range.end, Some(date(2025, 1, 10)));
    assert!(!picker.is_open());
    assert_eq!(picker.phase(), SelectionPhase::AwaitingStart);
}

#[test]
fn test_reversed_picks_are_swapped() {
    let picker = DateRangePicker::new();
    picker.open();
    picker.pick(date(2025, 1, 10));
    picker.pick(date(2025, 1, 5));

    let range = picker.range();
    assert_eq!(range.start, Some(date(2025, 1, 5)));
    assert_eq!(range.end, Some(date(2025, 1, 10)));
}

#[test]
fn test_pick_past_existing_end_collapses_range() {
    let picker = DateRangePicker::with_range(DateRange::new(
        Some(date(2025, 1, 5)),
        Some(date(2025, 1, 10)),
    ));
    picker.open();

    // New start beyond the old end: the old end cannot survive.
    picker.pick(date(2025, 1, 20));
    let range = picker.range();
    assert_eq!(range.start, Some(date(2025, 1, 20)));
    assert_eq!(range.end, None);
    assert_eq!(picker.phase(), SelectionPhase::AwaitingEnd);
}

#[test]
fn test_restart_before_existing_end_keeps_it() {
    let picker = DateRangePicker::with_range(DateRange::new(
        Some(date(2025, 1, 5)),
        Some(date(2025, 1, 10)),
    ));
    picker.open();

    picker.pick(date(2025, 1, 7));
    let range = picker.range();
    assert_eq!(range.start, Some(date(2025, 1, 7)));
    assert_eq!(range.end, Some(date(2025, 1, 10)));
    assert_eq!(picker.phase(), SelectionPhase::AwaitingEnd);
}

#[test]
fn test_hover_preview_never_mutates_committed_state() {
    let picker = DateRangePicker::new();
    picker.open();
    picker.pick(date(2025, 1, 5));

    picker.hover(Some(date(2025, 1, 8)));
    assert_eq!(
        picker.preview_range(),
        Some((date(2025, 1, 5), date(2025, 1, 8)))
    );
    assert!(picker.in_preview(date(2025, 1, 6)));
    assert_eq!(picker.range().end, None);

    // Hovering before the start orders the preview.
    picker.hover(Some(date(2025, 1, 2)));
    assert_eq!(
        picker.preview_range(),
        Some((date(2025, 1, 2), date(2025, 1, 5)))
    );

    picker.hover(None);
    assert_eq!(picker.preview_range(), None);
}

#[test]
fn test_no_preview_while_awaiting_start() {
    let picker = DateRangePicker::new();
    picker.open();
    picker.hover(Some(date(2025, 1, 8)));
    assert_eq!(picker.preview_range(), None);
}

#[test]
fn test_invalid_dates_are_inert() {
    let picker = DateRangePicker::new();
    picker.set_min_date(Some(date(2025, 1, 10)));
    picker.set_max_date(Some(date(2025, 1, 20)));
    picker.set_disabled_dates([date(2025, 1, 15)]);
    picker.open();

    assert!(picker.pick(date(2025, 1, 9)).is_none());
    assert!(picker.pick(date(2025, 1, 21)).is_none());
    assert!(picker.pick(date(2025, 1, 15)).is_none());
    assert!(picker.range().is_empty());
    assert_eq!(picker.phase(), SelectionPhase::AwaitingStart);

    assert!(picker.pick(date(2025, 1, 12)).is_some());
}

#[test]
fn test_custom_predicate_blocks_dates() {
    use chrono::Datelike;
    let picker = DateRangePicker::new();
    // Weekdays only.
    picker.set_predicate(|d| d.weekday().number_from_monday() <= 5);
    picker.open();

    // 2025-01-04 is a Saturday.
    assert!(picker.pick(date(2025, 1, 4)).is_none());
    assert!(picker.pick(date(2025, 1, 6)).is_some());
}

#[test]
fn test_clear_keeps_popover_open() {
    let picker = DateRangePicker::with_range(DateRange::new(
        Some(date(2025, 1, 5)),
        Some(date(2025, 1, 10)),
    ));
    picker.open();
    let events = picker.pointer_clear();
    assert!(events.change.is_some());

    assert!(picker.range().is_empty());
    assert_eq!(picker.phase(), SelectionPhase::AwaitingStart);
    assert!(picker.is_open());

    // Clearing an already empty range emits nothing.
    let events = picker.pointer_clear();
    assert!(events.change.is_none());
}

#[test]
fn test_preset_commits_atomically_and_closes() {
    let picker = DateRangePicker::new();
    picker.set_presets(default_presets());
    picker.open();
    picker.pick(date(2025, 3, 3)); // mid-selection, about to be replaced

    let today = date(2025, 3, 15);
    let range = picker.apply_preset_at(2, today).unwrap(); // last 7 days
    assert_eq!(range.start, Some(date(2025, 3, 9)));
    assert_eq!(range.end, Some(today));
    assert!(!picker.is_open());
    assert_eq!(picker.phase(), SelectionPhase::AwaitingStart);
}

#[test]
fn test_unknown_preset_is_noop() {
    let picker = DateRangePicker::new();
    picker.open();
    assert!(picker.apply_preset_at(7, date(2025, 3, 15)).is_none());
}

#[test]
fn test_keyboard_hover_and_pick() {
    let picker = DateRangePicker::new();
    let (result, _) = picker.handle_key(&KeyCombo::key(Key::Down));
    assert_eq!(result, EventResult::Consumed);
    assert!(picker.is_open());

    // Seed the cursor, then move a week down and a day right.
    picker.hover(Some(date(2025, 6, 10)));
    picker.handle_key(&KeyCombo::key(Key::Down));
    picker.handle_key(&KeyCombo::key(Key::Right));
    assert_eq!(picker.hovered(), Some(date(2025, 6, 18)));

    let (_, events) = picker.handle_key(&KeyCombo::key(Key::Enter));
    assert!(events.change.is_some());
    assert_eq!(picker.range().start, Some(date(2025, 6, 18)));
    assert_eq!(picker.phase(), SelectionPhase::AwaitingEnd);
}

#[test]
fn test_arrow_across_month_edge_follows_view() {
    let picker = DateRangePicker::new();
    picker.open();
    picker.set_view(2025, 1);
    picker.hover(Some(date(2025, 1, 31)));
    picker.handle_key(&KeyCombo::key(Key::Right));
    assert_eq!(picker.hovered(), Some(date(2025, 2, 1)));
    assert_eq!(picker.view(), (2025, 2));
}

#[test]
fn test_escape_closes_and_resets_phase() {
    let picker = DateRangePicker::new();
    picker.open();
    picker.pick(date(2025, 1, 5));
    assert_eq!(picker.phase(), SelectionPhase::AwaitingEnd);

    let (result, _) = picker.handle_key(&KeyCombo::key(Key::Escape));
    assert_eq!(result, EventResult::Consumed);
    assert!(!picker.is_open());
    assert_eq!(picker.phase(), SelectionPhase::AwaitingStart);
    // The partial start survives the close.
    assert_eq!(picker.range().start, Some(date(2025, 1, 5)));
}

#[test]
fn test_month_navigation() {
    let picker = DateRangePicker::new();
    picker.set_view(2025, 12);
    picker.next_month();
    assert_eq!(picker.view(), (2026, 1));
    picker.prev_month();
    picker.prev_month();
    assert_eq!(picker.view(), (2025, 11));
}

#[test]
fn test_typed_entry_waits_for_a_valid_date() {
    let picker = DateRangePicker::new();
    picker.input_start("05/01");
    assert_eq!(picker.range().start, None);
    assert_eq!(picker.typed_start(), "05/01");

    picker.input_start("05/01/2025");
    assert_eq!(picker.range().start, Some(date(2025, 1, 5)));
    assert_eq!(picker.typed_start(), "");
}

#[test]
fn test_typed_entry_respects_constraints() {
    let picker = DateRangePicker::new();
    picker.set_min_date(Some(date(2025, 1, 10)));
    picker.input_start("05/01/2025");
    assert_eq!(picker.range().start, None);
    assert_eq!(picker.typed_start(), "05/01/2025");
}

#[test]
fn test_typed_entry_normalizes_reversed_bounds() {
    let picker = DateRangePicker::with_range(DateRange::new(
        Some(date(2025, 1, 10)),
        Some(date(2025, 1, 20)),
    ));
    picker.input_end("05/01/2025");
    let range = picker.range();
    assert_eq!(range.start, Some(date(2025, 1, 5)));
    assert_eq!(range.end, Some(date(2025, 1, 10)));
}

#[test]
fn test_disabled_picker_ignores_everything() {
    let picker = DateRangePicker::new();
    picker.set_disabled(true);
    picker.open();
    assert!(!picker.is_open());
    assert!(picker.pick(date(2025, 1, 5)).is_none());
    let (result, _) = picker.handle_key(&KeyCombo::key(Key::Down));
    assert_eq!(result, EventResult::Ignored);
}

#[test]
fn test_grid_is_sunday_padded() {
    use chrono::Datelike;
    let picker = DateRangePicker::new();
    picker.set_view(2025, 3);
    let grid = picker.grid();
    assert_eq!(grid.len() % 7, 0);
    assert_eq!(grid[0].weekday().num_days_from_sunday(), 0);
    assert!(grid.contains(&date(2025, 3, 1)));
    assert!(grid.contains(&date(2025, 3, 31)));
}
