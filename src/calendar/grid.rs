use super::market::is_market_day;
use std::fmt;
use std::iter::successors;
use thiserror::Error;
use time::{Date, Duration, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Number of weeks shown for every month, enough for a 31-day month
/// starting on a Sunday
pub(crate) const WEEKS_IN_GRID: usize = 6;

pub(crate) const GRID_CELLS: usize = DAYS_IN_WEEK * WEEKS_IN_GRID;

// Grids for the first and last representable years would run off the ends of
// `time::Date`'s range, so those years are not shown.
const MIN_YEAR: i32 = -9998;
const MAX_YEAR: i32 = 9998;

const MONTHS_IN_YEAR: i64 = 12;

pub(crate) trait WeekdayExt {
    /// Index of the weekday in a Monday-first week
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        (self.number_days_from_sunday() + 6) % 7
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

/// A month of a year whose entire grid can be represented
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> Result<YearMonth, OutOfTimeError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(YearMonth { year, month })
        } else {
            Err(OutOfTimeError)
        }
    }

    /// Construct from a month number that may lie outside 1 through 12,
    /// carrying the excess into the year (so month 13 of 2025 is January
    /// 2026 and month 0 is December 2024)
    pub(crate) fn from_raw(year: i32, month: i64) -> Result<YearMonth, OutOfTimeError> {
        let index = i64::from(year)
            .checked_mul(MONTHS_IN_YEAR)
            .and_then(|i| i.checked_add(month))
            .and_then(|i| i.checked_sub(1))
            .ok_or(OutOfTimeError)?;
        YearMonth::from_index(index)
    }

    pub(crate) fn of(date: Date) -> Result<YearMonth, OutOfTimeError> {
        YearMonth::new(date.year(), date.month())
    }

    pub(crate) fn checked_add_months(self, delta: i32) -> Result<YearMonth, OutOfTimeError> {
        YearMonth::from_raw(self.year, i64::from(u8::from(self.month)) + i64::from(delta))
    }

    pub(crate) fn first_day(self) -> Date {
        self.clamped_day(1)
    }

    /// Returns the date with the given day of the month, or the last day of
    /// the month if the month is too short
    pub(crate) fn clamped_day(self, day: u8) -> Date {
        (1..=day.max(1))
            .rev()
            .find_map(|d| Date::from_calendar_date(self.year, self.month, d).ok())
            .expect("the first of a supported month should be a valid date")
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    // `index` counts months since January of year 0
    fn from_index(index: i64) -> Result<YearMonth, OutOfTimeError> {
        let year = i32::try_from(index.div_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        let offset = u8::try_from(index.rem_euclid(MONTHS_IN_YEAR))
            .expect("a month offset should fit in a u8");
        YearMonth::new(year, Month::January.nth_next(offset))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CalendarCell {
    pub(crate) date: Date,
    pub(crate) day_number: u8,
    pub(crate) is_current_month: bool,
    pub(crate) is_today: bool,
    pub(crate) is_market_day: bool,
}

/// The six weeks of days shown for a month, starting from the Monday on or
/// before the first of the month
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month: YearMonth,
    // Invariant: consecutive dates, first one a Monday
    cells: [CalendarCell; GRID_CELLS],
}

impl MonthGrid {
    pub(crate) fn month(&self) -> YearMonth {
        self.month
    }

    pub(crate) fn cells(&self) -> &[CalendarCell; GRID_CELLS] {
        &self.cells
    }

    pub(crate) fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> + '_ {
        self.cells().chunks_exact(DAYS_IN_WEEK)
    }
}

#[cfg(test)]
impl MonthGrid {
    fn first_date(&self) -> Date {
        self.cells[0].date
    }

    fn last_date(&self) -> Date {
        self.cells[GRID_CELLS - 1].date
    }

    pub(crate) fn get(&self, date: Date) -> Option<&CalendarCell> {
        let offset = usize::try_from((date - self.first_date()).whole_days()).ok()?;
        self.cells.get(offset)
    }
}

pub(crate) fn build_grid(month: YearMonth, today: Date, anchor: Date) -> MonthGrid {
    let first = month.first_day();
    let offset = first.weekday().index0();
    let start = first
        .checked_sub(Duration::days(offset.into()))
        .expect("grid of a supported month should start after the beginning of time");
    let cells = iter_days_from(start)
        .take(GRID_CELLS)
        .map(|date| CalendarCell {
            date,
            day_number: date.day(),
            is_current_month: month.contains(date),
            is_today: date == today,
            is_market_day: is_market_day(date, anchor),
        })
        .collect::<Vec<_>>()
        .try_into()
        .expect("grid of a supported month should end before the end of time");
    MonthGrid { month, cells }
}

fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

#[cfg(test)]
impl YearMonth {
    fn length(self) -> u8 {
        self.clamped_day(31).day()
    }
}
