//! MultiCombobox widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::trace;

use crate::choice::Choice;
use crate::filter::FilterMode;
use crate::geometry::Rect;
use crate::listbox::Listbox;
use crate::outside::DismissTarget;
use crate::search::SearchField;
use crate::validation::ErrorDisplay;

/// Unique identifier for a MultiCombobox widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MultiComboboxId(usize);

impl MultiComboboxId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for MultiComboboxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__multi_combobox_{}", self.0)
    }
}

/// Internal state for a MultiCombobox widget.
#[derive(Debug)]
pub(super) struct MultiComboboxInner<M> {
    /// Filtered candidate list + highlight
    pub listbox: Listbox<M>,
    /// Dropdown search input
    pub search: SearchField,
    /// Selected values in insertion order (chip render order)
    pub selected: Vec<String>,
    /// Maximum number of selections (None = unbounded)
    pub max_selections: Option<usize>,
    /// Placeholder shown when nothing is selected
    pub placeholder: String,
    /// Optional field label
    pub label: Option<String>,
    /// Message shown when the filter yields nothing
    pub empty_message: String,
    /// Whether the dropdown has a search input
    pub searchable: bool,
    /// Whether the whole widget is inert
    pub disabled: bool,
    /// Whether the field is required (display concern only)
    pub required: bool,
    /// Validation error message (if any)
    pub error: Option<String>,
    /// How to display validation errors
    pub error_display: ErrorDisplay,
    /// Cached anchor rect for outside-dismiss hit testing
    pub anchor_rect: Option<Rect>,
}

impl<M: Clone> Default for MultiComboboxInner<M> {
    fn default() -> Self {
        Self {
            listbox: Listbox::new(),
            search: SearchField::new(),
            selected: Vec::new(),
            max_selections: None,
            placeholder: String::new(),
            label: None,
            empty_message: "No options found".to_string(),
            searchable: true,
            disabled: false,
            required: false,
            error: None,
            error_display: ErrorDisplay::default(),
            anchor_rect: None,
        }
    }
}

/// A searchable multi-select dropdown with removable chips.
///
/// Selection is an insertion-ordered set of values: toggling an entry on
/// appends it, toggling it off removes it, and Backspace over an empty
/// search removes the most recently added value. An optional cap turns
/// further additions into no-ops.
#[derive(Debug)]
pub struct MultiCombobox<M: Clone = ()> {
    /// Unique identifier for this widget instance
    id: MultiComboboxId,
    /// Internal state
    pub(super) inner: Arc<RwLock<MultiComboboxInner<M>>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Whether the dropdown is open
    is_open: Arc<AtomicBool>,
}

impl<M: Clone> MultiCombobox<M> {
    /// Create a new empty multi-combobox.
    pub fn new() -> Self {
        Self {
            id: MultiComboboxId::new(),
            inner: Arc::new(RwLock::new(MultiComboboxInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a multi-combobox over an initial candidate list.
    pub fn with_choices(choices: Vec<Choice<M>>) -> Self {
        Self {
            id: MultiComboboxId::new(),
            inner: Arc::new(RwLock::new(MultiComboboxInner {
                listbox: Listbox::with_choices(choices),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a multi-combobox with a selection cap.
    pub fn with_max_selections(max: usize) -> Self {
        Self {
            id: MultiComboboxId::new(),
            inner: Arc::new(RwLock::new(MultiComboboxInner {
                max_selections: Some(max),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the unique ID for this widget.
    pub fn id(&self) -> MultiComboboxId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the candidate list.
    pub fn set_choices(&self, choices: Vec<Choice<M>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.listbox.set_choices(choices);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the selection cap. Shrinking the cap never evicts existing
    /// selections; it only blocks further additions.
    pub fn set_max_selections(&self, max: Option<usize>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.max_selections = max;
        }
    }

    /// Get the selection cap.
    pub fn max_selections(&self) -> Option<usize> {
        self.inner
            .read()
            .map(|guard| guard.max_selections)
            .unwrap_or(None)
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.placeholder = placeholder.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the placeholder text.
    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.placeholder.clone())
            .unwrap_or_default()
    }

    /// Set the field label.
    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = Some(label.into());
        }
    }

    /// Set the empty-state message.
    pub fn set_empty_message(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.empty_message = message.into();
        }
    }

    /// Enable or disable the search input.
    pub fn set_searchable(&self, searchable: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.searchable = searchable;
        }
    }

    /// Enable or disable the whole widget.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Check if the widget is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.disabled)
            .unwrap_or(false)
    }

    /// Mark the field required.
    pub fn set_required(&self, required: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.required = required;
        }
    }

    /// Change the dropdown filter mode.
    pub fn set_filter_mode(&self, mode: FilterMode) {
        if let Ok(mut guard) = self.inner.write() {
            guard.listbox.set_mode(mode);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Get the selected values in insertion order.
    pub fn selected_values(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| guard.selected.clone())
            .unwrap_or_default()
    }

    /// Get the selected choices in insertion order (chip rendering).
    pub fn selected_choices(&self) -> Vec<Choice<M>> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .selected
                    .iter()
                    .filter_map(|v| guard.listbox.by_value(v).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of selected values.
    pub fn selected_len(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.selected.len())
            .unwrap_or(0)
    }

    /// Check if a value is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.inner
            .read()
            .map(|guard| guard.selected.iter().any(|v| v == value))
            .unwrap_or(false)
    }

    /// Check if the selection cap is reached.
    pub fn at_max(&self) -> bool {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .max_selections
                    .is_some_and(|max| guard.selected.len() >= max)
            })
            .unwrap_or(false)
    }

    /// Toggle a value.
    ///
    /// Already-selected values are always removed, regardless of the cap.
    /// Unselected values are appended only while below the cap and only when
    /// they name a non-disabled choice; otherwise the toggle is a no-op.
    /// Returns whether the selection changed.
    pub fn toggle(&self, value: &str) -> bool {
        let changed = if let Ok(mut guard) = self.inner.write() {
            if guard.disabled {
                false
            } else if let Some(pos) = guard.selected.iter().position(|v| v == value) {
                guard.selected.remove(pos);
                true
            } else if guard
                .max_selections
                .is_some_and(|max| guard.selected.len() >= max)
            {
                false
            } else if guard.listbox.selectable_by_value(value).is_some() {
                guard.selected.push(value.to_string());
                guard.error = None;
                true
            } else {
                false
            }
        } else {
            false
        };
        if changed {
            trace!("{}: toggled {value:?}", self.id);
            self.dirty.store(true, Ordering::SeqCst);
        }
        changed
    }

    /// Remove a value unconditionally (chip "x" button). Works while the
    /// dropdown is closed. Returns whether anything was removed.
    pub fn remove(&self, value: &str) -> bool {
        let removed = if let Ok(mut guard) = self.inner.write() {
            if let Some(pos) = guard.selected.iter().position(|v| v == value) {
                guard.selected.remove(pos);
                true
            } else {
                false
            }
        } else {
            false
        };
        if removed {
            self.dirty.store(true, Ordering::SeqCst);
        }
        removed
    }

    /// Remove the most recently added value (Backspace over empty search).
    /// Returns the removed value, if any.
    pub fn pop_last(&self) -> Option<String> {
        let popped = self
            .inner
            .write()
            .ok()
            .and_then(|mut guard| guard.selected.pop());
        if popped.is_some() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        popped
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    /// Open the dropdown. No-op when the widget is disabled.
    pub fn open(&self) {
        if self.is_disabled() {
            return;
        }
        if !self.is_open.swap(true, Ordering::SeqCst) {
            if let Ok(mut guard) = self.inner.write() {
                guard.listbox.reset_highlight();
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Close the dropdown and clear the search text.
    pub fn close(&self) {
        if self.is_open.swap(false, Ordering::SeqCst) {
            if let Ok(mut guard) = self.inner.write() {
                guard.search.clear();
                guard.listbox.set_query("");
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Toggle the dropdown open/closed.
    pub fn toggle_open(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    // -------------------------------------------------------------------------
    // Search text
    // -------------------------------------------------------------------------

    /// Get the current search text.
    pub fn search_text(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.search.value().to_string())
            .unwrap_or_default()
    }

    /// Insert a character into the search text.
    pub fn search_insert(&self, c: char) {
        if let Ok(mut guard) = self.inner.write()
            && guard.searchable
        {
            guard.search.insert_char(c);
            let query = guard.search.value().to_string();
            guard.listbox.set_query(query);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Delete the character before the search cursor. Returns false when the
    /// search text was already empty.
    pub fn search_backspace(&self) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && guard.searchable
            && guard.search.delete_char_before()
        {
            let query = guard.search.value().to_string();
            guard.listbox.set_query(query);
            self.dirty.store(true, Ordering::SeqCst);
            return true;
        }
        false
    }

    // -------------------------------------------------------------------------
    // Dropdown view
    // -------------------------------------------------------------------------

    /// Number of entries the dropdown should render.
    pub fn filtered_len(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.listbox.filtered_len())
            .unwrap_or(0)
    }

    /// Get the choice at a filtered index.
    pub fn filtered_choice(&self, filtered_index: usize) -> Option<Choice<M>> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.listbox.filtered_choice(filtered_index).cloned())
    }

    /// Get the filtered choices in render order.
    pub fn filtered_choices(&self) -> Vec<Choice<M>> {
        self.inner
            .read()
            .map(|guard| guard.listbox.filtered_choices().cloned().collect())
            .unwrap_or_default()
    }

    /// Get the highlighted index into the filtered list.
    pub fn highlight(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.listbox.highlight())
            .unwrap_or(0)
    }

    /// Move the highlight to a filtered index (pointer hover).
    pub fn hover(&self, filtered_index: usize) {
        if let Ok(mut guard) = self.inner.write() {
            guard.listbox.set_highlight(filtered_index);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Anchor rect (set by the embedding renderer)
    // -------------------------------------------------------------------------

    /// Get the anchor rect used for outside-dismiss hit testing.
    pub fn anchor_rect(&self) -> Option<Rect> {
        self.inner
            .read()
            .map(|guard| guard.anchor_rect)
            .unwrap_or(None)
    }

    /// Set the anchor rect (called by the embedding renderer).
    pub fn set_anchor_rect(&self, rect: Rect) {
        if let Ok(mut guard) = self.inner.write() {
            guard.anchor_rect = Some(rect);
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the widget state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Set a validation error message.
    pub fn set_error(&self, msg: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error = Some(msg.into());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Clear the validation error.
    pub fn clear_error(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.error.is_some()
        {
            guard.error = None;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Check if this widget has a validation error.
    pub fn has_error(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.error.is_some())
            .unwrap_or(false)
    }

    /// Get the current validation error message.
    pub fn error(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.error.clone())
            .unwrap_or(None)
    }

    /// Get the error display mode.
    pub fn error_display(&self) -> ErrorDisplay {
        self.inner
            .read()
            .map(|guard| guard.error_display)
            .unwrap_or_default()
    }

    /// Set the error display mode.
    pub fn set_error_display(&self, display: ErrorDisplay) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error_display = display;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}

impl<M: Clone> Clone for MultiCombobox<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            is_open: Arc::clone(&self.is_open),
        }
    }
}

impl<M: Clone> Default for MultiCombobox<M> {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Validatable implementation
// -----------------------------------------------------------------------------

use crate::validation::Validatable;

impl<M: Clone> Validatable for MultiCombobox<M> {
    type Value = Vec<String>;

    fn validation_value(&self) -> Self::Value {
        self.selected_values()
    }

    fn set_error(&self, msg: impl Into<String>) {
        MultiCombobox::set_error(self, msg)
    }

    fn clear_error(&self) {
        MultiCombobox::clear_error(self)
    }

    fn has_error(&self) -> bool {
        MultiCombobox::has_error(self)
    }

    fn error(&self) -> Option<String> {
        MultiCombobox::error(self)
    }

    fn widget_id(&self) -> String {
        self.id_string()
    }

    fn error_display(&self) -> ErrorDisplay {
        MultiCombobox::error_display(self)
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        MultiCombobox::set_error_display(self, display)
    }
}

// -----------------------------------------------------------------------------
// DismissTarget implementation
// -----------------------------------------------------------------------------

impl<M: Clone + Send + Sync> DismissTarget for MultiCombobox<M> {
    fn target_id(&self) -> String {
        self.id_string()
    }

    fn is_open(&self) -> bool {
        MultiCombobox::is_open(self)
    }

    fn bounds(&self) -> Option<Rect> {
        self.anchor_rect()
    }

    fn dismiss(&self) {
        self.close();
    }
}
