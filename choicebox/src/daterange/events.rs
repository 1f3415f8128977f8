//! Event handling for the DateRangePicker widget.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::events::EventResult;
use crate::keybinds::{Key, KeyCombo};

use super::state::DateRangePicker;

/// Event fired when the committed range changes.
#[derive(Debug, Clone)]
pub struct RangeChangeEvent {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Pending events to be dispatched after input handling.
#[derive(Debug, Clone, Default)]
pub struct DateRangeEvents {
    pub change: Option<RangeChangeEvent>,
}

impl DateRangePicker {
    fn change_event(&self) -> RangeChangeEvent {
        let range = self.range();
        RangeChangeEvent {
            start: range.start,
            end: range.end,
        }
    }

    /// Commit a calendar cell click.
    pub fn pointer_pick(&self, date: NaiveDate) -> DateRangeEvents {
        let mut events = DateRangeEvents::default();
        if self.pick(date).is_some() {
            events.change = Some(self.change_event());
        }
        events
    }

    /// Commit a preset column click.
    pub fn pointer_preset(&self, index: usize) -> DateRangeEvents {
        let mut events = DateRangeEvents::default();
        if self.apply_preset(index).is_some() {
            events.change = Some(self.change_event());
        }
        events
    }

    /// Commit the clear button.
    pub fn pointer_clear(&self) -> DateRangeEvents {
        let mut events = DateRangeEvents::default();
        if !self.range().is_empty() {
            self.clear();
            events.change = Some(self.change_event());
        }
        events
    }

    /// Handle keyboard input. Returns events that should be dispatched.
    ///
    /// Arrow keys move the hover cursor across the grid (a day sideways, a
    /// week vertically); Enter picks the hovered date through the same phase
    /// machine a pointer click uses.
    pub fn handle_key(&self, key: &KeyCombo) -> (EventResult, DateRangeEvents) {
        let mut events = DateRangeEvents::default();

        if self.is_disabled() {
            return (EventResult::Ignored, events);
        }

        match key.key {
            Key::Down if !self.is_open() && !key.modifiers.any() => {
                self.open();
                return (EventResult::Consumed, events);
            }
            Key::Enter if !self.is_open() && !key.modifiers.any() => {
                self.open();
                return (EventResult::Consumed, events);
            }
            Key::Escape => {
                if self.is_open() {
                    self.close();
                    return (EventResult::Consumed, events);
                }
            }
            Key::Tab => {
                if self.is_open() {
                    self.close();
                }
                return (EventResult::Ignored, events);
            }
            Key::Left if self.is_open() && !key.modifiers.any() => {
                self.move_hover(Duration::days(-1));
                return (EventResult::Consumed, events);
            }
            Key::Right if self.is_open() && !key.modifiers.any() => {
                self.move_hover(Duration::days(1));
                return (EventResult::Consumed, events);
            }
            Key::Up if self.is_open() && !key.modifiers.any() => {
                self.move_hover(Duration::days(-7));
                return (EventResult::Consumed, events);
            }
            Key::Down if self.is_open() && !key.modifiers.any() => {
                self.move_hover(Duration::days(7));
                return (EventResult::Consumed, events);
            }
            Key::PageUp if self.is_open() => {
                self.prev_month();
                return (EventResult::Consumed, events);
            }
            Key::PageDown if self.is_open() => {
                self.next_month();
                return (EventResult::Consumed, events);
            }
            Key::Enter if self.is_open() && !key.modifiers.any() => {
                if let Some(date) = self.hovered()
                    && self.pick(date).is_some()
                {
                    events.change = Some(self.change_event());
                }
                return (EventResult::Consumed, events);
            }
            _ => {}
        }

        (EventResult::Ignored, events)
    }

    /// Move the hover cursor, seeding it from the committed start or today.
    fn move_hover(&self, delta: Duration) {
        let current = self.hovered().or(self.range().start);
        let next = match current {
            Some(date) => date + delta,
            None => Local::now().date_naive(),
        };
        // Keep the view following the cursor across month edges.
        let (year, month) = self.view();
        if !super::calendar::in_view_month(next, year, month) {
            self.set_view(next.year(), next.month());
        }
        self.hover(Some(next));
    }
}
