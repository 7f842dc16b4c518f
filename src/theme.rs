use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MARKET_DAY_STYLE: Style = Style::new()
    .fg(Color::LightGreen)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

/// Applied on top of a day's style when the day lies outside the month on
/// display
pub(crate) const OUTSIDE_MONTH_STYLE: Style = Style::new().add_modifier(Modifier::DIM);

pub(crate) const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);
