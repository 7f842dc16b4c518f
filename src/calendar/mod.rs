mod grid;
mod market;
mod view;
mod widget;
pub(crate) use self::market::DEFAULT_ANCHOR;
pub(crate) use self::view::ViewState;
pub(crate) use self::widget::MonthView;

/// Week-day column labels, Monday first
pub(crate) static WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
