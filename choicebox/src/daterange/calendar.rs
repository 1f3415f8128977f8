//! Month grid arithmetic for the date range picker.

use chrono::{Datelike, Duration, NaiveDate};

/// First day of a month, if the year/month pair is representable.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of a month.
pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = step_month(year, month, 1);
    first_of_month(next_year, next_month)?.pred_opt()
}

/// Step a (year, month) pair by a signed number of months.
pub fn step_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), (zero_based.rem_euclid(12) + 1) as u32)
}

/// Produce the dates a month view renders, padded to whole weeks.
///
/// Weeks start on Sunday. Leading and trailing cells come from the adjacent
/// months so the grid is always a multiple of seven; callers can grey those
/// out by comparing against the view month.
pub fn month_grid(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };
    let Some(last) = last_of_month(year, month) else {
        return Vec::new();
    };

    let lead = first.weekday().num_days_from_sunday() as i64;
    let trail = 6 - last.weekday().num_days_from_sunday() as i64;
    let total = lead + last.day() as i64 + trail;

    let mut days = Vec::with_capacity(total as usize);
    let mut day = first - Duration::days(lead);
    for _ in 0..total {
        days.push(day);
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }
    days
}

/// Check whether a grid cell belongs to the viewed month.
pub fn in_view_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_whole_weeks() {
        for (year, month) in [(2024, 2), (2025, 3), (2025, 6), (2026, 1)] {
            let grid = month_grid(year, month);
            assert_eq!(grid.len() % 7, 0, "{year}-{month}");
            assert_eq!(grid[0].weekday().num_days_from_sunday(), 0);
        }
    }

    #[test]
    fn grid_covers_the_month() {
        let grid = month_grid(2025, 6);
        // June 2025 starts on a Sunday: no leading padding.
        assert_eq!(grid[0], NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert!(grid.contains(&NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
    }

    #[test]
    fn step_month_wraps_years() {
        assert_eq!(step_month(2025, 12, 1), (2026, 1));
        assert_eq!(step_month(2025, 1, -1), (2024, 12));
        assert_eq!(step_month(2025, 6, -18), (2023, 12));
    }

    #[test]
    fn last_of_month_handles_leap_years() {
        assert_eq!(
            last_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            last_of_month(2025, 2),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
    }
}
