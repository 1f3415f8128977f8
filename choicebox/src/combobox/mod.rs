//! Single-value combobox widget.

mod events;
mod state;

pub use events::{ChangeEvent, ComboboxEvents, CreateRequest};
pub use state::{Combobox, ComboboxId};
