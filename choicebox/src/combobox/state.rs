//! Combobox widget state.

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

/// Unique identifier for a Combobox widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboboxId(usize);

impl ComboboxId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ComboboxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__combobox_{}", self.0)
    }
}

/// Internal state for a Combobox widget.
#[derive(Debug)]
pub(super) struct ComboboxInner<M> {
    /// Filtered candidate list + highlight
    pub listbox: Listbox<M>,
    /// Dropdown search input
    pub search: SearchField,
    /// Currently selected value (None if nothing selected)
    pub selected: Option<String>,
    /// Placeholder shown when nothing is selected
    pub placeholder: String,
    /// Optional field label
    pub label: Option<String>,
    /// Message shown when the filter yields nothing
    pub empty_message: String,
    /// Whether the dropdown has a search input
    pub searchable: bool,
    /// Whether an unmatched search text may create a new option
    pub creatable: bool,
    /// Whether the selection can be cleared
    pub clearable: bool,
    /// Whether the whole widget is inert
    pub disabled: bool,
    /// Whether the field is required (display concern only)
    pub required: bool,
    /// A creation request is pending; further requests are no-ops
    pub creating: bool,
    /// Validation error message (if any)
    pub error: Option<String>,
    /// How to display validation errors
    pub error_display: ErrorDisplay,
    /// Cached anchor rect for outside-dismiss hit testing
    pub anchor_rect: Option<Rect>,
}

impl<M: Clone> Default for ComboboxInner<M> {
    fn default() -> Self {
        Self {
            listbox: Listbox::new(),
            search: SearchField::new(),
            selected: None,
            placeholder: String::new(),
            label: None,
            empty_message: "No options found".to_string(),
            searchable: true,
            creatable: false,
            clearable: false,
            disabled: false,
            required: false,
            creating: false,
            error: None,
            error_display: ErrorDisplay::default(),
            anchor_rect: None,
        }
    }
}

/// A searchable single-select dropdown with reactive state.
///
/// `Combobox` manages selection, dropdown open/close, the search filter, and
/// the keyboard highlight. Committed values come back to the owner as event
/// structs from `handle_key`/`pointer_select`; the widget never invokes
/// callbacks of its own.
#[derive(Debug)]
pub struct Combobox<M: Clone = ()> {
    /// Unique identifier for this combobox instance
    id: ComboboxId,
    /// Internal state
    pub(super) inner: Arc<RwLock<ComboboxInner<M>>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Whether the dropdown is open
    is_open: Arc<AtomicBool>,
}

impl<M: Clone> Combobox<M> {
    /// Create a new empty combobox.
    pub fn new() -> Self {
        Self {
            id: ComboboxId::new(),
            inner: Arc::new(RwLock::new(ComboboxInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a combobox over an initial candidate list.
    pub fn with_choices(choices: Vec<Choice<M>>) -> Self {
        Self {
            id: ComboboxId::new(),
            inner: Arc::new(RwLock::new(ComboboxInner {
                listbox: Listbox::with_choices(choices),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a combobox with a placeholder.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            id: ComboboxId::new(),
            inner: Arc::new(RwLock::new(ComboboxInner {
                placeholder: placeholder.into(),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the unique ID for this combobox.
    pub fn id(&self) -> ComboboxId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the candidate list. The current search keeps filtering the new
    /// list; the highlight resets to the top.
    pub fn set_choices(&self, choices: Vec<Choice<M>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.listbox.set_choices(choices);
            self.dirty.store(true, Ordering::SeqCst);
        }
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
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the field label.
    pub fn label(&self) -> Option<String> {
        self.inner.read().map(|guard| guard.label.clone()).unwrap_or(None)
    }

    /// Set the empty-state message.
    pub fn set_empty_message(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.empty_message = message.into();
        }
    }

    /// Get the empty-state message.
    pub fn empty_message(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.empty_message.clone())
            .unwrap_or_default()
    }

    /// Enable or disable the search input.
    pub fn set_searchable(&self, searchable: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.searchable = searchable;
        }
    }

    /// Enable or disable the create-new affordance.
    pub fn set_creatable(&self, creatable: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.creatable = creatable;
        }
    }

    /// Enable or disable clearing the selection.
    pub fn set_clearable(&self, clearable: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.clearable = clearable;
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

    /// Check if the field is required.
    pub fn is_required(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.required)
            .unwrap_or(false)
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

    /// Get the currently selected value.
    pub fn selected_value(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.selected.clone())
            .unwrap_or(None)
    }

    /// Get the label of the currently selected choice.
    pub fn selected_label(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| {
            guard
                .selected
                .as_deref()
                .and_then(|v| guard.listbox.by_value(v))
                .map(|c| c.label.clone())
        })
    }

    /// Select a value.
    ///
    /// No-op when the value does not name a non-disabled choice, or when the
    /// widget is disabled. On success the dropdown closes and the search text
    /// clears. Returns whether the selection was applied.
    pub fn select(&self, value: &str) -> bool {
        let applied = if let Ok(mut guard) = self.inner.write() {
            if guard.disabled || guard.listbox.selectable_by_value(value).is_none() {
                false
            } else {
                guard.selected = Some(value.to_string());
                guard.error = None;
                guard.search.clear();
                let query = guard.search.value().to_string();
                guard.listbox.set_query(query);
                true
            }
        } else {
            false
        };
        if applied {
            trace!("{}: selected {value:?}", self.id);
            self.is_open.store(false, Ordering::SeqCst);
            self.dirty.store(true, Ordering::SeqCst);
        }
        applied
    }

    /// Clear the selection.
    ///
    /// Only available when the widget is clearable; never opens the dropdown.
    /// Returns whether anything was cleared.
    pub fn clear(&self) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && guard.clearable
            && guard.selected.is_some()
        {
            guard.selected = None;
            self.dirty.store(true, Ordering::SeqCst);
            return true;
        }
        false
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

    /// Close the dropdown and clear the search text, so reopening shows the
    /// full list rather than the last filter.
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
    pub fn toggle(&self) {
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

    /// Get the search cursor position (byte offset).
    pub fn search_cursor(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.search.cursor())
            .unwrap_or(0)
    }

    /// Insert a character into the search text. No-op unless the widget is
    /// searchable.
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

    /// Delete the character before the search cursor.
    pub fn search_backspace(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.searchable
            && guard.search.delete_char_before()
        {
            let query = guard.search.value().to_string();
            guard.listbox.set_query(query);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Delete the character at the search cursor.
    pub fn search_delete(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.searchable
        {
            guard.search.delete_char_at();
            let query = guard.search.value().to_string();
            guard.listbox.set_query(query);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the search cursor.
    pub fn search_cursor_left(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.cursor_left();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the search cursor.
    pub fn search_cursor_right(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.cursor_right();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the search cursor to the start.
    pub fn search_cursor_home(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.cursor_home();
        }
    }

    /// Move the search cursor to the end.
    pub fn search_cursor_end(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.cursor_end();
        }
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
    // Creation flow
    // -------------------------------------------------------------------------

    /// Check if a creation request is pending.
    pub fn is_creating(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.creating)
            .unwrap_or(false)
    }

    /// Mark a pending creation as succeeded: clears the pending flag and the
    /// search text, and closes the dropdown.
    pub fn create_succeeded(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.creating = false;
        }
        self.close();
    }

    /// Mark a pending creation as failed.
    ///
    /// The dropdown stays open with the search text intact so the user can
    /// retry; the message lands on the widget's error surface.
    pub fn create_failed(&self, msg: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.creating = false;
            guard.error = Some(msg.into());
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

    /// Check if the combobox state has changed.
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

    /// Check if this combobox has a validation error.
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

impl<M: Clone> Clone for Combobox<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            is_open: Arc::clone(&self.is_open),
        }
    }
}

impl<M: Clone> Default for Combobox<M> {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Validatable implementation
// -----------------------------------------------------------------------------

use crate::validation::Validatable;

impl<M: Clone> Validatable for Combobox<M> {
    type Value = Option<String>;

    fn validation_value(&self) -> Self::Value {
        self.selected_value()
    }

    fn set_error(&self, msg: impl Into<String>) {
        Combobox::set_error(self, msg)
    }

    fn clear_error(&self) {
        Combobox::clear_error(self)
    }

    fn has_error(&self) -> bool {
        Combobox::has_error(self)
    }

    fn error(&self) -> Option<String> {
        Combobox::error(self)
    }

    fn widget_id(&self) -> String {
        self.id_string()
    }

    fn error_display(&self) -> ErrorDisplay {
        Combobox::error_display(self)
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        Combobox::set_error_display(self, display)
    }
}

// -----------------------------------------------------------------------------
// DismissTarget implementation
// -----------------------------------------------------------------------------

impl<M: Clone + Send + Sync> DismissTarget for Combobox<M> {
    fn target_id(&self) -> String {
        self.id_string()
    }

    fn is_open(&self) -> bool {
        Combobox::is_open(self)
    }

    fn bounds(&self) -> Option<Rect> {
        self.anchor_rect()
    }

    fn dismiss(&self) {
        self.close();
    }
}
