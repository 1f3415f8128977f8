//! Event handling for the MultiCombobox widget.

use crate::events::EventResult;
use crate::keybinds::{Key, KeyCombo};

use super::state::MultiCombobox;

/// Event fired when the committed selection set changes.
#[derive(Debug, Clone)]
pub struct MultiChangeEvent {
    /// All selected values in insertion order.
    pub values: Vec<String>,
}

/// Pending events to be dispatched after input handling.
#[derive(Debug, Clone, Default)]
pub struct MultiComboboxEvents {
    pub change: Option<MultiChangeEvent>,
}

impl<M: Clone> MultiCombobox<M> {
    fn change_event(&self) -> MultiChangeEvent {
        MultiChangeEvent {
            values: self.selected_values(),
        }
    }

    /// Toggle the choice at a filtered index (pointer click).
    pub fn pointer_toggle(&self, filtered_index: usize) -> MultiComboboxEvents {
        let mut events = MultiComboboxEvents::default();
        let Some(choice) = self.filtered_choice(filtered_index) else {
            return events;
        };
        if self.toggle(&choice.value) {
            events.change = Some(self.change_event());
        }
        events
    }

    /// Remove a value via its chip "x" button.
    pub fn pointer_remove(&self, value: &str) -> MultiComboboxEvents {
        let mut events = MultiComboboxEvents::default();
        if self.remove(value) {
            events.change = Some(self.change_event());
        }
        events
    }

    /// Handle keyboard input. Returns events that should be dispatched.
    pub fn handle_key(&self, key: &KeyCombo) -> (EventResult, MultiComboboxEvents) {
        let mut events = MultiComboboxEvents::default();

        if self.is_disabled() {
            return (EventResult::Ignored, events);
        }

        match key.key {
            Key::Down if !key.modifiers.any() => {
                if self.is_open() {
                    if let Ok(mut guard) = self.inner.write() {
                        guard.listbox.highlight_down();
                    }
                } else {
                    self.open();
                }
                return (EventResult::Consumed, events);
            }
            Key::Up if !key.modifiers.any() => {
                if self.is_open() {
                    if let Ok(mut guard) = self.inner.write() {
                        guard.listbox.highlight_up();
                    }
                    return (EventResult::Consumed, events);
                }
            }
            Key::Enter if !key.modifiers.any() => {
                if self.is_open() && self.filtered_len() > 0 {
                    let committed = self
                        .inner
                        .read()
                        .ok()
                        .and_then(|guard| guard.listbox.commit_highlighted());
                    if let Some(choice) = committed
                        && self.toggle(&choice.value)
                    {
                        events.change = Some(self.change_event());
                    }
                } else if !self.is_open() {
                    self.open();
                }
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
            Key::Backspace => {
                // Backspace edits the search first; over empty search it
                // removes the most recently added chip.
                if self.search_backspace() {
                    return (EventResult::Consumed, events);
                }
                if self.pop_last().is_some() {
                    events.change = Some(self.change_event());
                    return (EventResult::Consumed, events);
                }
            }
            Key::Space if self.is_open() => {
                self.search_insert(' ');
                return (EventResult::Consumed, events);
            }
            Key::Char(c) if self.is_open() && !key.modifiers.ctrl && !key.modifiers.alt => {
                self.search_insert(c);
                return (EventResult::Consumed, events);
            }
            _ => {}
        }

        (EventResult::Ignored, events)
    }
}
