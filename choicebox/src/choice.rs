//! Selectable candidate type shared by all combobox widgets.

use serde::{Deserialize, Serialize};

/// One selectable candidate.
///
/// Identity is the `value` string: two choices with the same value are the
/// same selection, whatever their labels say. `M` carries an opaque payload
/// for the embedding application (default `()`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice<M = ()> {
    /// Unique value within one options list
    pub value: String,
    /// Display label
    pub label: String,
    /// Optional secondary text shown under the label
    pub description: Option<String>,
    /// Disabled choices render but cannot be committed
    pub disabled: bool,
    /// Opaque payload for the embedding application
    pub meta: Option<M>,
}

impl<M> Choice<M> {
    /// Create a choice from a value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
            disabled: false,
            meta: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the choice disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Attach a meta payload.
    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<M> Choice<M> {
    /// Check selection identity against a value.
    pub fn matches_value(&self, value: &str) -> bool {
        self.value == value
    }
}
