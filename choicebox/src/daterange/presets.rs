//! Named range presets.
//!
//! A preset is a pure function of "today": resolving it never reads widget
//! state, so presets stay testable with a fixed date.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};

use super::calendar::{first_of_month, last_of_month, step_month};
use super::state::DateRange;

/// A named shortcut resolving to a complete range.
#[derive(Clone)]
pub struct RangePreset {
    label: String,
    resolve: Arc<dyn Fn(NaiveDate) -> DateRange + Send + Sync>,
}

impl RangePreset {
    /// Create a preset from a label and a resolver over "today".
    pub fn new(
        label: impl Into<String>,
        resolve: impl Fn(NaiveDate) -> DateRange + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            resolve: Arc::new(resolve),
        }
    }

    /// The label shown in the preset column.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resolve the preset against a reference date.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        (self.resolve)(today)
    }
}

impl std::fmt::Debug for RangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangePreset")
            .field("label", &self.label)
            .finish()
    }
}

/// The stock preset column: today, yesterday, rolling windows, and calendar
/// months.
pub fn default_presets() -> Vec<RangePreset> {
    vec![
        RangePreset::new("Today", |today| DateRange::new(Some(today), Some(today))),
        RangePreset::new("Yesterday", |today| {
            let yesterday = today.pred_opt().unwrap_or(today);
            DateRange::new(Some(yesterday), Some(yesterday))
        }),
        RangePreset::new("Last 7 days", |today| {
            DateRange::new(Some(today - Duration::days(6)), Some(today))
        }),
        RangePreset::new("Last 30 days", |today| {
            DateRange::new(Some(today - Duration::days(29)), Some(today))
        }),
        RangePreset::new("This month", |today| {
            DateRange::new(
                first_of_month(today.year(), today.month()),
                last_of_month(today.year(), today.month()),
            )
        }),
        RangePreset::new("Last month", |today| {
            let (year, month) = step_month(today.year(), today.month(), -1);
            DateRange::new(first_of_month(year, month), last_of_month(year, month))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rolling_windows_include_today() {
        let today = date(2025, 8, 27);
        let presets = default_presets();
        let last7 = presets[2].resolve(today);
        assert_eq!(last7.start, Some(date(2025, 8, 21)));
        assert_eq!(last7.end, Some(today));
        let last30 = presets[3].resolve(today);
        assert_eq!(last30.start, Some(date(2025, 7, 29)));
    }

    #[test]
    fn calendar_months_snap_to_boundaries() {
        let today = date(2025, 3, 15);
        let presets = default_presets();
        let this_month = presets[4].resolve(today);
        assert_eq!(this_month.start, Some(date(2025, 3, 1)));
        assert_eq!(this_month.end, Some(date(2025, 3, 31)));
        let last_month = presets[5].resolve(today);
        assert_eq!(last_month.start, Some(date(2025, 2, 1)));
        assert_eq!(last_month.end, Some(date(2025, 2, 28)));
    }

    #[test]
    fn last_month_crosses_the_year_boundary() {
        let presets = default_presets();
        let last_month = presets[5].resolve(date(2025, 1, 10));
        assert_eq!(last_month.start, Some(date(2024, 12, 1)));
        assert_eq!(last_month.end, Some(date(2024, 12, 31)));
    }
}
