use super::grid::{CalendarCell, YearMonth, DAYS_IN_WEEK};
use super::view::ViewState;
use super::WEEKDAY_LABELS;
use crate::theme::{
    BASE_STYLE, MARKET_DAY_STYLE, OUTSIDE_MONTH_STYLE, SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};

/// Number of columns per day of week
const DAY_WIDTH: u16 = 5;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

const TITLE_LINE: u16 = 0;

const WEEKDAY_LINE: u16 = 1;

const RULE_LINE: u16 = 2;

/// Line on which the first week of the grid is drawn
const FIRST_WEEK_LINE: u16 = 3;

const ACS_HLINE: char = '─';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView;

impl StatefulWidget for MonthView {
    type State = ViewState;

    /*
     *            February 2026
     *  Mo   Tu   We   Th   Fr   Sa   Su
     * ───────────────────────────────────
     *  26   27   28   29   30   31    1
     *   2    3    4    5    6    7    8
     *  ...
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(MAIN_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        let grid = state.grid();
        let selected = state.selected_date();
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(grid.month());
        canvas.draw_weekdays();
        canvas.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);
        for (week_no, week) in std::iter::zip(0u16.., grid.weeks()) {
            for (col, cell) in std::iter::zip(0u16.., week) {
                let style = cell_style(cell, selected == Some(cell.date));
                canvas.draw_day(week_no, col, show(cell), style);
            }
        }
    }
}

fn show(cell: &CalendarCell) -> String {
    let day = cell.day_number;
    if cell.is_today {
        format!("[{day:2}]")
    } else {
        format!(" {day:2} ")
    }
}

fn cell_style(cell: &CalendarCell, is_selected: bool) -> Style {
    let mut style = if cell.is_market_day {
        MARKET_DAY_STYLE
    } else {
        BASE_STYLE
    };
    if !cell.is_current_month {
        style = style.patch(OUTSIDE_MONTH_STYLE);
    }
    if is_selected {
        style = style.patch(SELECTED_STYLE);
    }
    style
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, month: YearMonth) {
        let title = month.to_string();
        let width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        let x = self.area.width.saturating_sub(width) / 2;
        self.mvprint(TITLE_LINE, x, title, Some(TITLE_STYLE));
    }

    fn draw_weekdays(&mut self) {
        let header = WEEKDAY_LABELS
            .iter()
            .map(|label| format!(" {label} "))
            .collect::<Vec<_>>()
            .join(" ");
        self.mvprint(WEEKDAY_LINE, 0, header, Some(WEEKDAY_STYLE));
    }

    fn draw_day(&mut self, week_no: u16, col: u16, s: String, style: Style) {
        debug_assert!(usize::from(col) < DAYS_IN_WEEK, "column out of range");
        self.mvprint(FIRST_WEEK_LINE + week_no, DAY_WIDTH * col, s, Some(style));
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Paragraph truncates text running past the calendar's right
            // edge; the Rect it is given must lie inside the frame.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::market::DEFAULT_ANCHOR;
    use time::macros::date;

    #[test]
    fn test_cell_style() {
        let mut cell = CalendarCell {
            date: date!(2026 - 02 - 02),
            day_number: 2,
            is_current_month: true,
            is_today: false,
            is_market_day: true,
        };
        assert_eq!(cell_style(&cell, false), MARKET_DAY_STYLE);
        cell.is_market_day = false;
        assert_eq!(cell_style(&cell, false), BASE_STYLE);
        cell.is_current_month = false;
        assert_eq!(
            cell_style(&cell, true),
            BASE_STYLE.add_modifier(Modifier::DIM | Modifier::REVERSED)
        );
    }

    #[test]
    fn test_show() {
        let mut cell = CalendarCell {
            date: date!(2026 - 02 - 05),
            day_number: 5,
            is_current_month: true,
            is_today: false,
            is_market_day: true,
        };
        assert_eq!(show(&cell), "  5 ");
        cell.is_today = true;
        assert_eq!(show(&cell), "[ 5]");
    }

    #[test]
    fn test_narrow_area() {
        let mut view = ViewState::new(date!(2026 - 02 - 15), DEFAULT_ANCHOR).unwrap();
        let area = Rect::new(0, 0, 12, 4);
        let mut buffer = Buffer::empty(area);
        MonthView.render(area, &mut buffer, &mut view);
        let expected = Buffer::with_lines([
            "February 202",
            " Mo   Tu   W",
            "────────────",
            " 26   27   2",
        ]);
        assert_eq!(buffer.content().len(), expected.content().len());
        for (got, want) in std::iter::zip(buffer.content(), expected.content()) {
            assert_eq!(got.symbol(), want.symbol());
        }
    }
}
