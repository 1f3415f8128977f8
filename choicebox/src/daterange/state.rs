//! Date range picker state.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{Datelike, Local, NaiveDate};
use log::trace;

use crate::geometry::Rect;
use crate::outside::DismissTarget;
use crate::validation::{ErrorDisplay, Validatable};

use super::calendar::{self, month_grid};
use super::presets::RangePreset;

/// Unique identifier for a DateRangePicker widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRangePickerId(usize);

impl DateRangePickerId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for DateRangePickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__daterange_{}", self.0)
    }
}

/// A pair of optional dates, kept ordered once complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range from its bounds.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Check whether neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check whether both bounds are set.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Check whether a date falls inside the committed range (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => date >= start && date <= end,
            _ => false,
        }
    }
}

/// Which bound the next pick commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPhase {
    #[default]
    AwaitingStart,
    AwaitingEnd,
}

/// Internal state for a DateRangePicker widget.
pub(super) struct DateRangeInner {
    /// Committed range
    pub range: DateRange,
    /// Which bound the next pick sets
    pub phase: SelectionPhase,
    /// Date under the pointer, for preview highlighting only
    pub hover: Option<NaiveDate>,
    /// Year of the month currently shown
    pub view_year: i32,
    /// Month currently shown (1-12)
    pub view_month: u32,
    /// Raw typed text for the start field, kept until it parses valid
    pub typed_start: String,
    /// Raw typed text for the end field
    pub typed_end: String,
    /// Earliest selectable date
    pub min_date: Option<NaiveDate>,
    /// Latest selectable date
    pub max_date: Option<NaiveDate>,
    /// Individually blocked dates
    pub disabled_dates: BTreeSet<NaiveDate>,
    /// Extra validity predicate from the embedder
    pub predicate: Option<Arc<dyn Fn(NaiveDate) -> bool + Send + Sync>>,
    /// Preset column
    pub presets: Vec<RangePreset>,
    /// Optional field label
    pub label: Option<String>,
    /// Placeholder shown while the range is empty
    pub placeholder: String,
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

impl Default for DateRangeInner {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            range: DateRange::default(),
            phase: SelectionPhase::default(),
            hover: None,
            view_year: today.year(),
            view_month: today.month(),
            typed_start: String::new(),
            typed_end: String::new(),
            min_date: None,
            max_date: None,
            disabled_dates: BTreeSet::new(),
            predicate: None,
            presets: Vec::new(),
            label: None,
            placeholder: "Select a period".to_string(),
            disabled: false,
            required: false,
            error: None,
            error_display: ErrorDisplay::default(),
            anchor_rect: None,
        }
    }
}

impl std::fmt::Debug for DateRangeInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateRangeInner")
            .field("range", &self.range)
            .field("phase", &self.phase)
            .field("view", &(self.view_year, self.view_month))
            .finish()
    }
}

/// A two-phase date range picker with hover preview.
///
/// Picks alternate between the start and end bound; the second pick of a pair
/// closes the control, swapping the bounds if the user clicked them in
/// reverse order. Committed ranges always satisfy `start <= end`.
#[derive(Debug)]
pub struct DateRangePicker {
    /// Unique identifier for this picker instance
    id: DateRangePickerId,
    /// Internal state
    pub(super) inner: Arc<RwLock<DateRangeInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Whether the calendar popover is open
    is_open: Arc<AtomicBool>,
}

impl DateRangePicker {
    /// Create a new empty picker viewing the current month.
    pub fn new() -> Self {
        Self {
            id: DateRangePickerId::new(),
            inner: Arc::new(RwLock::new(DateRangeInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a picker with an initial committed range.
    pub fn with_range(range: DateRange) -> Self {
        let picker = Self::new();
        if let Ok(mut guard) = picker.inner.write() {
            guard.range = range;
            if let Some(start) = range.start {
                guard.view_year = start.year();
                guard.view_month = start.month();
            }
        }
        picker
    }

    /// Get the unique ID for this picker.
    pub fn id(&self) -> DateRangePickerId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Set the earliest selectable date.
    pub fn set_min_date(&self, min: Option<NaiveDate>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.min_date = min;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the latest selectable date.
    pub fn set_max_date(&self, max: Option<NaiveDate>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.max_date = max;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Replace the individually blocked dates.
    pub fn set_disabled_dates(&self, dates: impl IntoIterator<Item = NaiveDate>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled_dates = dates.into_iter().collect();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Install an extra validity predicate. Dates failing it are inert.
    pub fn set_predicate(&self, predicate: impl Fn(NaiveDate) -> bool + Send + Sync + 'static) {
        if let Ok(mut guard) = self.inner.write() {
            guard.predicate = Some(Arc::new(predicate));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Replace the preset column.
    pub fn set_presets(&self, presets: Vec<RangePreset>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.presets = presets;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the field label.
    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = Some(label.into());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the placeholder shown while the range is empty.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.placeholder = placeholder.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Enable or disable the whole widget.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
        if disabled {
            self.close();
        }
    }

    /// Mark the field required.
    pub fn set_required(&self, required: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.required = required;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Check whether the widget is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.disabled)
            .unwrap_or(false)
    }

    /// Check whether the field is required.
    pub fn is_required(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.required)
            .unwrap_or(false)
    }

    /// Get the field label.
    pub fn label(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.label.clone())
            .unwrap_or(None)
    }

    /// Get the placeholder text.
    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.placeholder.clone())
            .unwrap_or_default()
    }

    /// Get the preset labels in column order.
    pub fn preset_labels(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .presets
                    .iter()
                    .map(|preset| preset.label().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Open / close
    // -------------------------------------------------------------------------

    /// Open the calendar popover. No-op while disabled.
    pub fn open(&self) {
        if self.is_disabled() {
            return;
        }
        if !self.is_open.swap(true, Ordering::SeqCst) {
            // Bring the view back to the committed start, if any.
            if let Ok(mut guard) = self.inner.write() {
                if let Some(start) = guard.range.start {
                    guard.view_year = start.year();
                    guard.view_month = start.month();
                }
            }
            self.dirty.store(true, Ordering::SeqCst);
            trace!("{}: opened", self.id);
        }
    }

    /// Close the popover. Clears the hover preview and resets the phase so
    /// the next open starts a fresh pick sequence.
    pub fn close(&self) {
        if self.is_open.swap(false, Ordering::SeqCst) {
            if let Ok(mut guard) = self.inner.write() {
                guard.hover = None;
                guard.phase = SelectionPhase::AwaitingStart;
            }
            self.dirty.store(true, Ordering::SeqCst);
            trace!("{}: closed", self.id);
        }
    }

    /// Toggle the popover.
    pub fn toggle_open(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Check whether the popover is open.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Range state
    // -------------------------------------------------------------------------

    /// Get the committed range.
    pub fn range(&self) -> DateRange {
        self.inner
            .read()
            .map(|guard| guard.range)
            .unwrap_or_default()
    }

    /// Get the current selection phase.
    pub fn phase(&self) -> SelectionPhase {
        self.inner
            .read()
            .map(|guard| guard.phase)
            .unwrap_or_default()
    }

    /// Replace the committed range without running the phase machine.
    pub fn set_range(&self, range: DateRange) {
        if let Ok(mut guard) = self.inner.write() {
            guard.range = normalize(range);
            guard.phase = SelectionPhase::AwaitingStart;
            guard.typed_start.clear();
            guard.typed_end.clear();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Reset both bounds and the phase. The popover stays open so a new
    /// selection can start immediately.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.range = DateRange::default();
            guard.phase = SelectionPhase::AwaitingStart;
            guard.hover = None;
            guard.typed_start.clear();
            guard.typed_end.clear();
            self.dirty.store(true, Ordering::SeqCst);
        }
        trace!("{}: cleared", self.id);
    }

    /// Check whether a date satisfies every configured constraint.
    pub fn is_valid_date(&self, date: NaiveDate) -> bool {
        self.inner
            .read()
            .map(|guard| date_is_valid(&guard, date))
            .unwrap_or(false)
    }

    /// Commit a date pick, advancing the phase machine.
    ///
    /// Returns the committed range when the pick was applied; invalid dates
    /// are inert and return `None`. Completing a range closes the popover.
    pub fn pick(&self, date: NaiveDate) -> Option<DateRange> {
        if self.is_disabled() {
            return None;
        }
        let mut close_after = false;
        let committed = {
            let mut guard = self.inner.write().ok()?;
            if !date_is_valid(&guard, date) {
                return None;
            }
            match guard.phase {
                SelectionPhase::AwaitingStart => {
                    // A pick past an existing end collapses the range.
                    if guard.range.end.is_some_and(|end| date > end) {
                        guard.range = DateRange::new(Some(date), None);
                    } else {
                        guard.range.start = Some(date);
                    }
                    guard.phase = SelectionPhase::AwaitingEnd;
                }
                SelectionPhase::AwaitingEnd => {
                    match guard.range.start {
                        Some(start) if date < start => {
                            guard.range = DateRange::new(Some(date), Some(start));
                        }
                        Some(start) => {
                            guard.range = DateRange::new(Some(start), Some(date));
                        }
                        None => {
                            guard.range = DateRange::new(Some(date), None);
                        }
                    }
                    guard.phase = SelectionPhase::AwaitingStart;
                    close_after = true;
                }
            }
            guard.hover = None;
            guard.typed_start.clear();
            guard.typed_end.clear();
            guard.range
        };
        self.dirty.store(true, Ordering::SeqCst);
        trace!("{}: picked {date}, range now {committed:?}", self.id);
        if close_after {
            self.close();
        }
        Some(committed)
    }

    /// Resolve a preset and commit it, bypassing the phase machine.
    ///
    /// Returns the committed range; closes the popover.
    pub fn apply_preset(&self, index: usize) -> Option<DateRange> {
        self.apply_preset_at(index, Local::now().date_naive())
    }

    /// Resolve a preset against an explicit reference date.
    pub fn apply_preset_at(&self, index: usize, today: NaiveDate) -> Option<DateRange> {
        if self.is_disabled() {
            return None;
        }
        let committed = {
            let mut guard = self.inner.write().ok()?;
            let range = guard.presets.get(index)?.resolve(today);
            guard.range = normalize(range);
            guard.phase = SelectionPhase::AwaitingStart;
            guard.hover = None;
            guard.typed_start.clear();
            guard.typed_end.clear();
            guard.range
        };
        self.dirty.store(true, Ordering::SeqCst);
        trace!("{}: preset {index} committed {committed:?}", self.id);
        self.close();
        Some(committed)
    }

    // -------------------------------------------------------------------------
    // Hover preview
    // -------------------------------------------------------------------------

    /// Report the pointer hovering a calendar cell.
    pub fn hover(&self, date: Option<NaiveDate>) {
        if let Ok(mut guard) = self.inner.write()
            && guard.hover != date
        {
            guard.hover = date;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the hovered date, if any.
    pub fn hovered(&self) -> Option<NaiveDate> {
        self.inner.read().map(|guard| guard.hover).unwrap_or(None)
    }

    /// The range to highlight: committed bounds, or while awaiting the end
    /// pick with a hover active, the start-to-hover span (ordered). Derived
    /// only; committed state never moves with the pointer.
    pub fn preview_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let guard = self.inner.read().ok()?;
        let start = guard.range.start?;
        let other = match (guard.phase, guard.hover) {
            (SelectionPhase::AwaitingEnd, Some(hover)) => hover,
            _ => guard.range.end?,
        };
        Some((start.min(other), start.max(other)))
    }

    /// Check whether a cell falls inside the preview span.
    pub fn in_preview(&self, date: NaiveDate) -> bool {
        self.preview_range()
            .is_some_and(|(start, end)| date >= start && date <= end)
    }

    // -------------------------------------------------------------------------
    // Typed entry
    // -------------------------------------------------------------------------

    /// Update the typed text for the start bound.
    ///
    /// The raw text is retained as typed; it is committed only once it parses
    /// as `DD/MM/YYYY` to a constraint-satisfying date.
    pub fn input_start(&self, text: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            let text = text.into();
            if let Some(date) = parse_typed(&text)
                && date_is_valid(&guard, date)
            {
                guard.range.start = Some(date);
                guard.range = normalize(guard.range);
                guard.typed_start.clear();
            } else {
                guard.typed_start = text;
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Update the typed text for the end bound.
    pub fn input_end(&self, text: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            let text = text.into();
            if let Some(date) = parse_typed(&text)
                && date_is_valid(&guard, date)
            {
                guard.range.end = Some(date);
                guard.range = normalize(guard.range);
                guard.typed_end.clear();
            } else {
                guard.typed_end = text;
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Raw typed start text still awaiting a valid parse.
    pub fn typed_start(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.typed_start.clone())
            .unwrap_or_default()
    }

    /// Raw typed end text still awaiting a valid parse.
    pub fn typed_end(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.typed_end.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Month view
    // -------------------------------------------------------------------------

    /// The (year, month) pair currently shown.
    pub fn view(&self) -> (i32, u32) {
        self.inner
            .read()
            .map(|guard| (guard.view_year, guard.view_month))
            .unwrap_or((1970, 1))
    }

    /// Jump the view to a specific month.
    pub fn set_view(&self, year: i32, month: u32) {
        if !(1..=12).contains(&month) {
            return;
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.view_year = year;
            guard.view_month = month;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Show the next month.
    pub fn next_month(&self) {
        self.shift_view(1);
    }

    /// Show the previous month.
    pub fn prev_month(&self) {
        self.shift_view(-1);
    }

    fn shift_view(&self, delta: i32) {
        if let Ok(mut guard) = self.inner.write() {
            let (year, month) = calendar::step_month(guard.view_year, guard.view_month, delta);
            guard.view_year = year;
            guard.view_month = month;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// The dates the current month view renders, padded to whole weeks.
    pub fn grid(&self) -> Vec<NaiveDate> {
        let (year, month) = self.view();
        month_grid(year, month)
    }

    // -------------------------------------------------------------------------
    // Render state
    // -------------------------------------------------------------------------

    /// Set the anchor rect used for outside-dismiss hit testing.
    pub fn set_anchor_rect(&self, rect: Rect) {
        if let Ok(mut guard) = self.inner.write() {
            guard.anchor_rect = Some(rect);
        }
    }

    /// Get the anchor rect, if the renderer has reported one.
    pub fn anchor_rect(&self) -> Option<Rect> {
        self.inner
            .read()
            .map(|guard| guard.anchor_rect)
            .unwrap_or(None)
    }

    /// Check if the picker state has changed.
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

    /// Clear any validation error.
    pub fn clear_error(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.error.is_some()
        {
            guard.error = None;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}

impl Default for DateRangePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DateRangePicker {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            is_open: Arc::clone(&self.is_open),
        }
    }
}

impl Validatable for DateRangePicker {
    type Value = DateRange;

    fn validation_value(&self) -> Self::Value {
        self.range()
    }

    fn set_error(&self, msg: impl Into<String>) {
        DateRangePicker::set_error(self, msg);
    }

    fn clear_error(&self) {
        DateRangePicker::clear_error(self);
    }

    fn has_error(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.error.is_some())
            .unwrap_or(false)
    }

    fn error(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.error.clone())
            .unwrap_or(None)
    }

    fn widget_id(&self) -> String {
        self.id_string()
    }

    fn error_display(&self) -> ErrorDisplay {
        self.inner
            .read()
            .map(|guard| guard.error_display)
            .unwrap_or_default()
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error_display = display;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}

impl DismissTarget for DateRangePicker {
    fn target_id(&self) -> String {
        self.id_string()
    }

    fn is_open(&self) -> bool {
        DateRangePicker::is_open(self)
    }

    fn bounds(&self) -> Option<Rect> {
        self.anchor_rect()
    }

    fn dismiss(&self) {
        self.close();
    }
}

/// Order the bounds when both are present.
fn normalize(range: DateRange) -> DateRange {
    match (range.start, range.end) {
        (Some(start), Some(end)) if end < start => DateRange::new(Some(end), Some(start)),
        _ => range,
    }
}

fn date_is_valid(inner: &DateRangeInner, date: NaiveDate) -> bool {
    if inner.min_date.is_some_and(|min| date < min) {
        return false;
    }
    if inner.max_date.is_some_and(|max| date > max) {
        return false;
    }
    if inner.disabled_dates.contains(&date) {
        return false;
    }
    if let Some(predicate) = &inner.predicate
        && !predicate(date)
    {
        return false;
    }
    true
}

/// Parse `DD/MM/YYYY` typed input.
fn parse_typed(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()
}
