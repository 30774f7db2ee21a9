use crate::help::Help;
use attendance_cal::{
    AttendanceCalendar, AttendanceDataset, CalendarCallbacks, CalendarHit, CalendarState,
    CalendarTheme, DayCell, MonthAttendanceRecord, MonthView, StyleOverrides, WidthNotifier,
};
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{window_size, WindowSize};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::macros::date;

/// Width in pixels assumed for each terminal column when the terminal does
/// not report its size in pixels
const ASSUMED_COLUMN_PIXELS: u32 = 8;

static STATUS_HINT: &str = "Press ? for help";

/// Presentation settings chosen on the command line
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Options {
    pub(crate) theme: CalendarTheme,
    pub(crate) styles: StyleOverrides,
    pub(crate) hide_navigation: bool,
    pub(crate) hide_weekday_headers: bool,
}

#[derive(Debug)]
pub(crate) struct App {
    view: MonthView,
    attendance: AttendanceDataset,
    options: Options,
    calendar: CalendarState,
    widths: WidthNotifier,
    status: Option<String>,
    state: AppState,
}

impl App {
    pub(crate) fn new(view: MonthView, attendance: AttendanceDataset, options: Options) -> App {
        App {
            view,
            attendance,
            options,
            calendar: CalendarState::new(view),
            widths: WidthNotifier::new(),
            status: None,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let _observation = self.calendar.observe_width(&self.widths);
        self.measure(terminal.size()?.width);
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_event(&read()?)?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match event {
            Event::Resize(columns, _) => self.measure(*columns),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if !self.click(*column, *row) {
                    self.beep()?;
                }
            }
            _ => {
                if let Some(KeyEvent {
                    code, modifiers, ..
                }) = event.as_key_press_event()
                {
                    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                        self.state = AppState::Quitting;
                    } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                        self.beep()?;
                    }
                }
            }
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('p') | KeyCode::PageUp => self.dispatch(CalendarHit::PreviousMonth),
                KeyCode::Char('n') | KeyCode::PageDown => self.dispatch(CalendarHit::NextMonth),
                KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
                KeyCode::Enter | KeyCode::Char(' ') => self.click_selection(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reset();
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

    /// Publish the width of a terminal `columns` cells wide to the calendar
    fn measure(&self, columns: u16) {
        self.widths
            .notify(container_width(columns, window_size().ok()));
    }

    // Returns `false` if the click landed on something that ignores clicks
    fn click(&mut self, x: u16, y: u16) -> bool {
        let Some(hit) = self.calendar.hit_test(x, y) else {
            return true;
        };
        if let CalendarHit::Day(DayCell {
            day,
            in_current_month: true,
        }) = hit
        {
            self.calendar.select_day(u8::try_from(day).ok());
        }
        self.dispatch(hit)
    }

    fn click_selection(&mut self) -> bool {
        match self.calendar.selected_day() {
            Some(day) => self.dispatch(CalendarHit::Day(DayCell::in_month(day))),
            None => false,
        }
    }

    fn dispatch(&mut self, hit: CalendarHit) -> bool {
        let current = self.view;
        let outcome = {
            let view = &mut self.view;
            let status = &mut self.status;
            let mut callbacks = CalendarCallbacks::new(|next| *view = next).on_date_click(
                |day, month_index, year| {
                    *status = Some(format!("Clicked on {day}/{}/{year}", month_index + 1));
                },
            );
            callbacks.dispatch(hit, current, Some(&self.attendance))
        };
        let fired = match outcome {
            Ok(fired) => fired,
            Err(e) => {
                log::info!("cannot leave {current}: {e}");
                false
            }
        };
        self.clamp_selection();
        fired
    }

    fn move_selection(&mut self, delta: i16) -> bool {
        let day = match self.calendar.selected_day() {
            Some(d) => i16::from(d) + delta,
            None => 1,
        };
        if (1..=i16::from(self.view.days_in_month())).contains(&day) {
            self.calendar.select_day(u8::try_from(day).ok());
            true
        } else {
            false
        }
    }

    // Keep the selected day within the displayed month after navigating
    fn clamp_selection(&mut self) {
        let last = self.view.days_in_month();
        if let Some(day) = self.calendar.selected_day() {
            self.calendar.select_day(Some(day.min(last)));
        }
    }

    fn reset(&mut self) {
        self.view = self.calendar.initial_view();
        self.clamp_selection();
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [calendar_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        AttendanceCalendar::new()
            .view(self.view)
            .attendance(&self.attendance)
            .theme(self.options.theme)
            .styles(self.options.styles)
            .show_navigation(!self.options.hide_navigation)
            .show_weekday_headers(!self.options.hide_weekday_headers)
            .render(calendar_area, buf, &mut self.calendar);
        let base = Style::new()
            .fg(self.options.theme.muted_text)
            .bg(self.options.theme.background);
        Line::styled(self.status.as_deref().unwrap_or(STATUS_HINT), base)
            .centered()
            .render(status_area, buf);
        if self.state == AppState::Helping {
            Help(base.fg(self.options.theme.text)).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}

/// Estimate the width in pixels of a terminal area `columns` cells wide
fn container_width(columns: u16, window: Option<WindowSize>) -> u32 {
    match window {
        Some(ws) if ws.width > 0 && ws.columns > 0 => {
            u32::from(ws.width) * u32::from(columns) / u32::from(ws.columns)
        }
        _ => u32::from(columns) * ASSUMED_COLUMN_PIXELS,
    }
}

/// Sample attendance for January 2024
pub(crate) fn demo_attendance() -> AttendanceDataset {
    AttendanceDataset::from(MonthAttendanceRecord::new(
        MonthView::containing(date!(2024 - 01 - 01)),
        [
            1, 2, 3, 5, 8, 9, 10, 12, 15, 16, 17, 19, 22, 23, 24, 26, 29, 30, 31,
        ],
        [4, 11, 18, 25],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_cal::{decide_columns, Columns};
    use time::Month;

    fn view(year: i32, month: Month) -> MonthView {
        MonthView::new(year, month).unwrap()
    }

    fn app() -> App {
        App::new(
            view(2024, Month::January),
            demo_attendance(),
            Options::default(),
        )
    }

    fn render(app: &mut App) -> Buffer {
        let area = Rect::new(0, 0, 47, 15);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn status_line(buffer: &Buffer) -> String {
        let width = usize::from(buffer.area.width);
        buffer
            .content
            .chunks(width)
            .last()
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .unwrap_or_default()
    }

    #[test]
    fn test_month_navigation() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.view, view(2024, Month::February));
        assert!(app.handle_key(KeyCode::PageUp));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.view, view(2023, Month::December));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.view, view(2024, Month::January));
    }

    #[test]
    fn test_click_present_day() {
        let mut app = app();
        render(&mut app);
        // January 1st, 2024 is a Monday
        assert!(app.click(7, 4));
        assert_eq!(app.status.as_deref(), Some("Clicked on 1/1/2024"));
        assert_eq!(app.calendar.selected_day(), Some(1));
        let buffer = render(&mut app);
        assert_eq!(status_line(&buffer).trim(), "Clicked on 1/1/2024");
    }

    #[test]
    fn test_click_navigation_buttons() {
        let mut app = app();
        render(&mut app);
        assert!(app.click(5, 0));
        assert_eq!(app.view, view(2024, Month::February));
        render(&mut app);
        assert!(app.click(1, 0));
        assert!(app.click(1, 0));
        assert_eq!(app.view, view(2023, Month::December));
    }

    #[test]
    fn test_click_without_attendance_is_ignored() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('n')));
        render(&mut app);
        assert!(!app.click(35, 4));
        assert_eq!(app.status, None);
        let buffer = render(&mut app);
        assert_eq!(status_line(&buffer).trim(), STATUS_HINT);
    }

    #[test]
    fn test_click_padding_is_ignored() {
        let mut app = app();
        render(&mut app);
        assert!(!app.click(0, 4));
        assert_eq!(app.status, None);
        assert_eq!(app.calendar.selected_day(), None);
    }

    #[test]
    fn test_keyboard_selection() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.calendar.selected_day(), Some(1));
        assert!(app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Left));
        assert_eq!(app.calendar.selected_day(), Some(14));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.status.as_deref(), Some("Clicked on 14/1/2024"));
    }

    #[test]
    fn test_selection_stops_at_month_edges() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Right));
        assert!(!app.handle_key(KeyCode::Up));
        assert!(!app.handle_key(KeyCode::Left));
        assert_eq!(app.calendar.selected_day(), Some(1));
    }

    #[test]
    fn test_selection_clamped_to_shorter_month() {
        let mut app = app();
        app.calendar.select_day(Some(31));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.calendar.selected_day(), Some(29));
    }

    #[test]
    fn test_help() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }

    #[test]
    fn test_container_width() {
        assert_eq!(container_width(80, None), 640);
        assert_eq!(container_width(84, None), 672);
        let ws = WindowSize {
            rows: 24,
            columns: 100,
            width: 900,
            height: 480,
        };
        assert_eq!(container_width(100, Some(ws)), 900);
        let unknown = WindowSize {
            rows: 24,
            columns: 100,
            width: 0,
            height: 0,
        };
        assert_eq!(container_width(100, Some(unknown)), 800);
        assert_eq!(decide_columns(container_width(83, None)), Columns::Seven);
        assert_eq!(decide_columns(container_width(84, None)), Columns::Fourteen);
    }

    #[test]
    fn test_width_observation_ends_with_run_scope() {
        let app = app();
        {
            let _observation = app.calendar.observe_width(&app.widths);
            app.widths.notify(container_width(100, None));
            assert_eq!(app.calendar.columns(), Columns::Fourteen);
            assert_eq!(app.widths.listener_count(), 1);
        }
        assert_eq!(app.widths.listener_count(), 0);
        app.widths.notify(container_width(60, None));
        assert_eq!(app.calendar.columns(), Columns::Fourteen);
    }
}
