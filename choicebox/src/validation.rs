//! Validation plumbing shared by the widgets.

/// Where to display validation errors for a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDisplay {
    /// Show error message below the widget (default).
    #[default]
    Below,
    /// Show error message inline/to the right of the widget.
    Inline,
    /// Don't display error message - widget only shows error styling.
    None,
}

/// Trait for widgets that expose a value and an error surface.
///
/// The embedding application validates `validation_value()` and pushes the
/// outcome back through `set_error`/`clear_error`; the widget only stores
/// and displays it.
pub trait Validatable {
    /// The value this widget contributes to validation.
    type Value;

    /// Extract the current value.
    fn validation_value(&self) -> Self::Value;

    /// Set a validation error message.
    fn set_error(&self, msg: impl Into<String>);

    /// Clear the validation error.
    fn clear_error(&self);

    /// Check if the widget currently has an error.
    fn has_error(&self) -> bool;

    /// Get the current error message.
    fn error(&self) -> Option<String>;

    /// Stable widget identifier for error reporting.
    fn widget_id(&self) -> String;

    /// Get the error display mode.
    fn error_display(&self) -> ErrorDisplay;

    /// Set the error display mode.
    fn set_error_display(&self, display: ErrorDisplay);
}
