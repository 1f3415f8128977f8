//! Filtered dropdown list with a highlighted entry.
//!
//! `Listbox` is the shared controller underneath the combobox widgets: it
//! owns the candidate list, filters it by the current query, and tracks
//! which filtered entry the keyboard highlight sits on. It is a plain struct
//! mutated under the owning widget's lock.

use crate::choice::Choice;
use crate::filter::{FilterMatch, FilterMode, filter_choices};

/// Filtered candidate list + highlight state.
#[derive(Debug, Clone, Default)]
pub struct Listbox<M = ()> {
    /// Full candidate list
    choices: Vec<Choice<M>>,
    /// Current search query
    query: String,
    /// Filter mode
    mode: FilterMode,
    /// Cached filter result (indices into `choices`)
    filtered: Vec<FilterMatch>,
    /// Highlighted index into `filtered`
    highlight: usize,
}

impl<M: Clone> Listbox<M> {
    /// Create an empty listbox.
    pub fn new() -> Self {
        Self {
            choices: Vec::new(),
            query: String::new(),
            mode: FilterMode::default(),
            filtered: Vec::new(),
            highlight: 0,
        }
    }

    /// Create a listbox over an initial candidate list.
    pub fn with_choices(choices: Vec<Choice<M>>) -> Self {
        let mut listbox = Self::new();
        listbox.set_choices(choices);
        listbox
    }

    /// Get the full candidate list.
    pub fn choices(&self) -> &[Choice<M>] {
        &self.choices
    }

    /// Replace the candidate list, keeping the query and resetting the
    /// highlight.
    pub fn set_choices(&mut self, choices: Vec<Choice<M>>) {
        self.choices = choices;
        self.refilter();
    }

    /// Get the current query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the query. Resets the highlight to the top; never touches
    /// selection state (the widgets own that).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    /// Get the filter mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Change the filter mode and refilter.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
        self.refilter();
    }

    // -------------------------------------------------------------------------
    // Filtered view
    // -------------------------------------------------------------------------

    /// Number of entries the dropdown should render.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Check if the filtered list is empty.
    pub fn is_filtered_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Get the choice at a filtered index.
    pub fn filtered_choice(&self, filtered_index: usize) -> Option<&Choice<M>> {
        self.filtered
            .get(filtered_index)
            .and_then(|m| self.choices.get(m.index))
    }

    /// Iterate the filtered choices in render order.
    pub fn filtered_choices(&self) -> impl Iterator<Item = &Choice<M>> {
        self.filtered
            .iter()
            .filter_map(|m| self.choices.get(m.index))
    }

    /// Find a non-disabled choice by value in the full candidate list.
    pub fn selectable_by_value(&self, value: &str) -> Option<&Choice<M>> {
        self.choices
            .iter()
            .find(|c| c.matches_value(value) && !c.disabled)
    }

    /// Find any choice by value in the full candidate list.
    pub fn by_value(&self, value: &str) -> Option<&Choice<M>> {
        self.choices.iter().find(|c| c.matches_value(value))
    }

    // -------------------------------------------------------------------------
    // Highlight
    // -------------------------------------------------------------------------

    /// Get the highlighted index into the filtered list.
    pub fn highlight(&self) -> usize {
        self.highlight
    }

    /// Set the highlight, clamped to the filtered list.
    pub fn set_highlight(&mut self, index: usize) {
        let max = self.filtered.len().saturating_sub(1);
        self.highlight = index.min(max);
    }

    /// Reset the highlight to the top.
    pub fn reset_highlight(&mut self) {
        self.highlight = 0;
    }

    /// Move the highlight up one entry. No wraparound; no-op at the top or
    /// on an empty list.
    pub fn highlight_up(&mut self) -> bool {
        if self.filtered.is_empty() || self.highlight == 0 {
            return false;
        }
        self.highlight -= 1;
        true
    }

    /// Move the highlight down one entry. No wraparound; no-op at the bottom
    /// or on an empty list.
    pub fn highlight_down(&mut self) -> bool {
        if self.filtered.is_empty() {
            return false;
        }
        let max = self.filtered.len() - 1;
        if self.highlight >= max {
            return false;
        }
        self.highlight += 1;
        true
    }

    /// Get the highlighted choice.
    pub fn highlighted(&self) -> Option<&Choice<M>> {
        self.filtered_choice(self.highlight)
    }

    /// Commit the highlighted choice.
    ///
    /// Returns the choice only if the highlight points at an existing,
    /// non-disabled entry. Disabled entries cannot be committed.
    pub fn commit_highlighted(&self) -> Option<Choice<M>> {
        self.highlighted()
            .filter(|choice| !choice.disabled)
            .cloned()
    }

    fn refilter(&mut self) {
        self.filtered = filter_choices(&self.query, &self.choices, self.mode);
        self.highlight = 0;
    }
}
