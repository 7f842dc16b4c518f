use crate::calendar::{MonthView, ViewState};
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, OffsetDateTime};

/// Months skipped by the page keys
const MONTHS_PER_PAGE: i32 = 12;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    view: ViewState,
    state: AppState,
}

impl App {
    pub(crate) fn new(view: ViewState) -> App {
        App {
            view,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.refresh_today();
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn refresh_today(&mut self) {
        match OffsetDateTime::now_local() {
            Ok(now) => self.set_today(now.date()),
            Err(e) => log::warn!("Failed to determine local date: {e}"),
        }
    }

    fn set_today(&mut self, today: Date) {
        if let Err(e) = self.view.set_today(today) {
            log::warn!("Cannot show {today} as today: {e}");
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the key was invalid or the move would leave the
    // range of supported dates
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h' | 'p') | KeyCode::Left => self.view.previous_month().is_ok(),
                KeyCode::Char('l' | 'n') | KeyCode::Right => self.view.next_month().is_ok(),
                KeyCode::Char('w') | KeyCode::PageUp => {
                    self.view.advance_month(-MONTHS_PER_PAGE).is_ok()
                }
                KeyCode::Char('z') | KeyCode::PageDown => {
                    self.view.advance_month(MONTHS_PER_PAGE).is_ok()
                }
                KeyCode::Char('0' | 't') | KeyCode::Home => {
                    self.view.jump_to_today();
                    true
                }
                KeyCode::Char('a') => {
                    self.view.jump_to_anchor();
                    true
                }
                KeyCode::Char('x') => {
                    self.view.set_selected_date(None);
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        MonthView.render(area, buf, &mut self.view);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}
