//! Event handling for the Combobox widget.

use crate::events::EventResult;
use crate::keybinds::{Key, KeyCombo};

use super::state::Combobox;

/// Event fired when the committed selection changes.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The newly committed value (None after a clear).
    pub value: Option<String>,
}

/// Request to create a new option from unmatched search text.
///
/// Emitted at most once per pending creation; the owner resolves it by
/// calling `create_succeeded` or `create_failed` on the widget.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// The trimmed search text to create from.
    pub text: String,
}

/// Pending events to be dispatched after input handling.
#[derive(Debug, Clone, Default)]
pub struct ComboboxEvents {
    pub change: Option<ChangeEvent>,
    pub create: Option<CreateRequest>,
}

impl<M: Clone> Combobox<M> {
    /// Request creation of a new option from the current search text.
    ///
    /// Returns a request only when the widget is creatable, the filtered list
    /// is empty, the trimmed search text is non-empty, and no creation is
    /// already pending. Re-entrant calls while pending are no-ops.
    pub fn request_create(&self) -> Option<CreateRequest> {
        if let Ok(mut guard) = self.inner.write()
            && guard.creatable
            && !guard.creating
            && guard.listbox.is_filtered_empty()
        {
            let text = guard.search.value().trim().to_string();
            if text.is_empty() {
                return None;
            }
            guard.creating = true;
            return Some(CreateRequest { text });
        }
        None
    }

    /// Commit the choice at a filtered index (pointer click).
    pub fn pointer_select(&self, filtered_index: usize) -> ComboboxEvents {
        let mut events = ComboboxEvents::default();
        let Some(choice) = self.filtered_choice(filtered_index) else {
            return events;
        };
        if choice.disabled {
            return events;
        }
        if self.select(&choice.value) {
            events.change = Some(ChangeEvent {
                value: Some(choice.value),
            });
        }
        events
    }

    /// Clear the selection via the clear affordance (pointer click on "x").
    pub fn pointer_clear(&self) -> ComboboxEvents {
        let mut events = ComboboxEvents::default();
        if self.clear() {
            events.change = Some(ChangeEvent { value: None });
        }
        events
    }

    /// Handle keyboard input. Returns events that should be dispatched.
    pub fn handle_key(&self, key: &KeyCombo) -> (EventResult, ComboboxEvents) {
        let mut events = ComboboxEvents::default();

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
                        && self.select(&choice.value)
                    {
                        events.change = Some(ChangeEvent {
                            value: Some(choice.value),
                        });
                    }
                } else if self.is_open() {
                    if let Some(request) = self.request_create() {
                        events.create = Some(request);
                    }
                } else {
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
                // Close without selecting; let focus move on.
                if self.is_open() {
                    self.close();
                }
                return (EventResult::Ignored, events);
            }
            Key::Backspace if self.is_open() => {
                self.search_backspace();
                return (EventResult::Consumed, events);
            }
            Key::Delete if self.is_open() => {
                self.search_delete();
                return (EventResult::Consumed, events);
            }
            Key::Left if self.is_open() => {
                self.search_cursor_left();
                return (EventResult::Consumed, events);
            }
            Key::Right if self.is_open() => {
                self.search_cursor_right();
                return (EventResult::Consumed, events);
            }
            Key::Home if self.is_open() => {
                self.search_cursor_home();
                return (EventResult::Consumed, events);
            }
            Key::End if self.is_open() => {
                self.search_cursor_end();
                return (EventResult::Consumed, events);
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
