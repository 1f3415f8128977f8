//! Multi-value combobox widget with removable chips.

mod events;
mod state;

pub use events::{MultiChangeEvent, MultiComboboxEvents};
pub use state::{MultiCombobox, MultiComboboxId};
