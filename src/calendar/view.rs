use super::grid::{build_grid, MonthGrid, OutOfTimeError, YearMonth};
use time::Date;

/// The month currently on display, plus the selected date.  The grid itself
/// is never stored; it is rebuilt from `view_date` whenever it is asked for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ViewState {
    today: Date,
    anchor: Date,
    // Invariant: `YearMonth::of(view_date)` is always `Ok`
    view_date: Date,
    selected_date: Option<Date>,
}

impl ViewState {
    pub(crate) fn new(today: Date, anchor: Date) -> Result<ViewState, OutOfTimeError> {
        YearMonth::of(today)?;
        YearMonth::of(anchor)?;
        Ok(ViewState {
            today,
            anchor,
            view_date: today,
            selected_date: None,
        })
    }

    /// Update the real-world date, e.g. after midnight passes.  Dates outside
    /// the supported months are rejected and the old date is kept.
    pub(crate) fn set_today(&mut self, today: Date) -> Result<(), OutOfTimeError> {
        YearMonth::of(today)?;
        if today != self.today {
            log::debug!("Today is now {today}");
            self.today = today;
        }
        Ok(())
    }

    pub(crate) fn view_month(&self) -> YearMonth {
        YearMonth::of(self.view_date).expect("view date should always be in a supported month")
    }

    pub(crate) fn selected_date(&self) -> Option<Date> {
        self.selected_date
    }

    pub(crate) fn set_selected_date(&mut self, date: Option<Date>) {
        log::debug!("Selected date: {date:?}");
        self.selected_date = date;
    }

    pub(crate) fn grid(&self) -> MonthGrid {
        build_grid(self.view_month(), self.today, self.anchor)
    }

    /// Move the view by `delta` months, keeping the day of the month where
    /// possible.  If the target month is shorter than the current day, the
    /// last day of the target month is used instead.
    ///
    /// On error, the view is left unchanged.
    pub(crate) fn advance_month(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        let target = self.view_month().checked_add_months(delta)?;
        self.view_date = target.clamped_day(self.view_date.day());
        log::debug!("Moved view by {delta} months to {}", self.view_date);
        Ok(())
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        self.advance_month(1)
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        self.advance_month(-1)
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.view_date = self.today;
        log::debug!("Jumped to today, {}", self.view_date);
    }

    pub(crate) fn jump_to_anchor(&mut self) {
        self.view_date = self.anchor;
        log::debug!("Jumped to anchor, {}", self.view_date);
    }

    pub(crate) fn jump_to_date(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        YearMonth::of(date)?;
        self.view_date = date;
        Ok(())
    }
}

#[cfg(test)]
impl ViewState {
    pub(crate) fn view_date(&self) -> Date {
        self.view_date
    }
}
