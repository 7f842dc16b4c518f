use time::{macros::date, Date};

/// Market days recur every this many days
const MARKET_PERIOD: i32 = 3;

/// The market day that every other market day is counted from, unless
/// overridden on the command line
pub(crate) const DEFAULT_ANCHOR: Date = date!(2026 - 02 - 02);

/// Returns `true` if `date` falls a whole number of market periods before or
/// after `anchor`.
///
/// Days are counted as Julian day numbers, so the difference is a pure
/// calendar-day count.
pub(crate) fn is_market_day(date: Date, anchor: Date) -> bool {
    let diff = date.to_julian_day() - anchor.to_julian_day();
    diff.rem_euclid(MARKET_PERIOD) == 0
}
