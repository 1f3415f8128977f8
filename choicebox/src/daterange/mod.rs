//! Two-phase date range picker with presets and hover preview.

pub mod calendar;
mod events;
mod presets;
mod state;

pub use events::{DateRangeEvents, RangeChangeEvent};
pub use presets::{RangePreset, default_presets};
pub use state::{DateRange, DateRangePicker, DateRangePickerId, SelectionPhase};
