//! Headless selection/editing widget state machines for terminal UIs.
//!
//! Each widget owns its state behind `Arc<RwLock<..>>` and is driven by
//! keyboard/pointer events fed in by the embedding application. Widgets never
//! render; they expose their state for whatever frontend hosts them and emit
//! committed values as event structs returned from the handlers that caused
//! them.

pub mod choice;
pub mod combobox;
pub mod daterange;
pub mod error;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod keybinds;
pub mod listbox;
pub mod multiselect;
pub mod outside;
pub mod remote;
pub mod search;
pub mod validation;

pub mod prelude {
    pub use crate::choice::Choice;
    pub use crate::combobox::{Combobox, ComboboxEvents, ComboboxId, CreateRequest};
    pub use crate::daterange::{
        DateRange, DateRangeEvents, DateRangePicker, DateRangePickerId, RangePreset,
        SelectionPhase, default_presets,
    };
    pub use crate::error::{CreateError, LoadError};
    pub use crate::events::{EventResult, Modifiers};
    pub use crate::filter::{FilterMatch, FilterMode};
    pub use crate::geometry::Rect;
    pub use crate::keybinds::{Key, KeyCombo};
    pub use crate::listbox::Listbox;
    pub use crate::multiselect::{MultiCombobox, MultiComboboxEvents, MultiComboboxId};
    pub use crate::outside::{DismissGuard, DismissRegistry, DismissTarget};
    pub use crate::remote::{FetchToken, Loader, RemoteCombobox};
    pub use crate::validation::{ErrorDisplay, Validatable};
}
