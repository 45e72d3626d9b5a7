use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Navigation limits: not before the launch date, not past the final
/// season year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationBounds {
    pub lower: NaiveDate,
    pub final_year: i32,
}

/// Monday-anchored start of the ISO week containing `date`; Sunday belongs
/// to the previous week.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// The 7 consecutive days shown for the week containing `date`.
pub fn week_window(date: NaiveDate) -> [NaiveDate; 7] {
    let start = start_of_week(date);
    core::array::from_fn(|i| {
        start
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(start)
    })
}

/// Clamps a requested week start into the navigation bounds. Requests past
/// either edge land on the nearest allowed week instead of erroring, so an
/// out-of-range navigation click is a no-op for a caller already at the
/// edge.
pub fn clamp_to_bounds(candidate_week_start: NaiveDate, bounds: &NavigationBounds) -> NaiveDate {
    let floor = start_of_week(bounds.lower);
    if candidate_week_start < floor {
        return floor;
    }
    if candidate_week_start.year() > bounds.final_year {
        let ceiling = NaiveDate::from_ymd_opt(bounds.final_year, 12, 31)
            .map(start_of_week)
            .unwrap_or(floor);
        return ceiling.max(floor);
    }
    candidate_week_start
}

/// Shifts the visible week by `weeks` and clamps the result.
pub fn shift_week(current_start: NaiveDate, weeks: i64, bounds: &NavigationBounds) -> NaiveDate {
    let shifted = if weeks >= 0 {
        current_start.checked_add_days(Days::new(weeks.unsigned_abs() * 7))
    } else {
        current_start.checked_sub_days(Days::new(weeks.unsigned_abs() * 7))
    };
    clamp_to_bounds(shifted.unwrap_or(current_start), bounds)
}

/// What a month picker needs: cell count and where day 1 falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub days_in_month: u32,
    /// Sunday-based offset of day 1 (0 = Sunday), matching the grid header.
    pub first_weekday_offset: u32,
}

/// Pure arithmetic for the month picker; `None` for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days_in_month = next_month.signed_duration_since(first).num_days() as u32;
    Some(MonthGrid {
        days_in_month,
        first_weekday_offset: first.weekday().num_days_from_sunday(),
    })
}

/// Previous/next month navigation with year carry.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bounds() -> NavigationBounds {
        NavigationBounds {
            lower: day(2025, 12, 29),
            final_year: 2026,
        }
    }

    #[test]
    fn week_starts_on_monday_and_sunday_belongs_to_previous_week() {
        // 2026-01-05 is a Monday.
        assert_eq!(start_of_week(day(2026, 1, 5)), day(2026, 1, 5));
        assert_eq!(start_of_week(day(2026, 1, 7)), day(2026, 1, 5));
        // Sunday 2026-01-11 still belongs to the week of the 5th.
        assert_eq!(start_of_week(day(2026, 1, 11)), day(2026, 1, 5));
    }

    #[test]
    fn week_window_is_seven_consecutive_days() {
        let window = week_window(day(2026, 1, 7));
        assert_eq!(window[0], day(2026, 1, 5));
        assert_eq!(window[6], day(2026, 1, 11));
        for pair in window.windows(2) {
            assert_eq!(pair[1], pair[0].succ_opt().unwrap());
        }
    }

    #[test]
    fn navigating_before_the_lower_bound_is_clamped() {
        // One week before the 2025-12-29 launch week: unchanged.
        let earlier = day(2025, 12, 22);
        assert_eq!(clamp_to_bounds(earlier, &bounds()), day(2025, 12, 29));
        assert_eq!(
            shift_week(day(2025, 12, 29), -1, &bounds()),
            day(2025, 12, 29)
        );
    }

    #[test]
    fn navigating_past_the_final_year_is_clamped() {
        let last_allowed = shift_week(day(2026, 12, 28), 1, &bounds());
        assert_eq!(last_allowed.year(), 2026);
        assert_eq!(last_allowed, start_of_week(day(2026, 12, 31)));
    }

    #[test]
    fn in_range_navigation_moves_freely() {
        assert_eq!(shift_week(day(2026, 1, 5), 1, &bounds()), day(2026, 1, 12));
        assert_eq!(shift_week(day(2026, 1, 12), -1, &bounds()), day(2026, 1, 5));
    }

    #[test]
    fn month_grid_matches_the_calendar() {
        // January 2026 has 31 days and starts on a Thursday.
        let grid = month_grid(2026, 1).unwrap();
        assert_eq!(grid.days_in_month, 31);
        assert_eq!(grid.first_weekday_offset, 4);

        // February 2024: leap year.
        assert_eq!(month_grid(2024, 2).unwrap().days_in_month, 29);
        assert_eq!(month_grid(2026, 2).unwrap().days_in_month, 28);

        assert!(month_grid(2026, 13).is_none());
    }

    #[test]
    fn month_shift_carries_the_year() {
        assert_eq!(shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(shift_month(2025, 12, 1), (2026, 1));
        assert_eq!(shift_month(2026, 6, 3), (2026, 9));
        assert_eq!(shift_month(2026, 1, -13), (2024, 12));
    }
}
