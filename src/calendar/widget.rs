use super::controller::{classify_day, resolve_active_record, CalendarHit};
use super::grid::build_month_grid;
use super::layout::{decide_columns, Columns, Subscription, WidthNotifier};
use super::view::MonthView;
use crate::attendance::AttendanceDataset;
use crate::theme::{CalendarTheme, SlotStyles, StyleOverrides};
use ratatui::{prelude::*, widgets::*};
use std::cell::Cell;
use std::iter::zip;
use std::rc::Rc;

static WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

static PREV_BUTTON: &str = " < ";

static NEXT_BUTTON: &str = " > ";

/// Columns between the left edge of the previous-month button and the left
/// edge of the next-month button
const NEXT_BUTTON_OFFSET: u16 = 4;

/// Number of lines taken up by the navigation row and the blank line below it
const NAV_LINES: u16 = 2;

/// Number of lines taken up by the weekday labels and their rule
const WEEKDAY_LINES: u16 = 2;

/// Number of lines taken up by each row of the grid
const ROW_LINES: u16 = 2;

const ACS_HLINE: char = '─';

/// Horizontal measurements of the grid for a given column count
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Geometry {
    columns: u16,
    cell_width: u16,
    gap: u16,
}

impl Geometry {
    fn for_columns(columns: Columns) -> Geometry {
        match columns {
            Columns::Seven => Geometry {
                columns: 7,
                cell_width: 5,
                gap: 2,
            },
            Columns::Fourteen => Geometry {
                columns: 14,
                cell_width: 4,
                gap: 1,
            },
        }
    }

    fn width(self) -> u16 {
        self.columns * self.cell_width + (self.columns - 1) * self.gap
    }

    fn cell_x(self, column: u16) -> u16 {
        column * (self.cell_width + self.gap)
    }
}

/// A month calendar showing attendance.
///
/// The widget is a pure function of its inputs: it draws the month it is
/// given and records where its controls and days ended up in the
/// [`CalendarState`], so that the host can map clicks back to them with
/// [`CalendarState::hit_test()`] and feed the result to
/// [`CalendarCallbacks::dispatch()`](super::CalendarCallbacks::dispatch).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttendanceCalendar<'a> {
    view: Option<MonthView>,
    attendance: Option<&'a AttendanceDataset>,
    theme: CalendarTheme,
    styles: StyleOverrides,
    show_navigation: bool,
    show_weekday_headers: bool,
}

impl<'a> AttendanceCalendar<'a> {
    pub fn new() -> AttendanceCalendar<'a> {
        AttendanceCalendar {
            view: None,
            attendance: None,
            theme: CalendarTheme::default(),
            styles: StyleOverrides::default(),
            show_navigation: true,
            show_weekday_headers: true,
        }
    }

    /// Set the month to display.  If this is not called, the state's initial
    /// view is displayed.
    pub fn view(mut self, view: MonthView) -> AttendanceCalendar<'a> {
        self.view = Some(view);
        self
    }

    pub fn attendance(mut self, dataset: &'a AttendanceDataset) -> AttendanceCalendar<'a> {
        self.attendance = Some(dataset);
        self
    }

    pub fn theme(mut self, theme: CalendarTheme) -> AttendanceCalendar<'a> {
        self.theme = theme;
        self
    }

    pub fn styles(mut self, styles: StyleOverrides) -> AttendanceCalendar<'a> {
        self.styles = styles;
        self
    }

    pub fn show_navigation(mut self, show: bool) -> AttendanceCalendar<'a> {
        self.show_navigation = show;
        self
    }

    pub fn show_weekday_headers(mut self, show: bool) -> AttendanceCalendar<'a> {
        self.show_weekday_headers = show;
        self
    }
}

impl Default for AttendanceCalendar<'_> {
    fn default() -> Self {
        AttendanceCalendar::new()
    }
}

/// Everything about a calendar instance that persists between renders
#[derive(Debug)]
pub struct CalendarState {
    initial_view: MonthView,
    columns: Rc<Cell<Columns>>,
    selected_day: Option<u8>,
    hits: Vec<(Rect, CalendarHit)>,
}

impl CalendarState {
    pub fn new(initial_view: MonthView) -> CalendarState {
        CalendarState {
            initial_view,
            columns: Rc::new(Cell::new(Columns::default())),
            selected_day: None,
            hits: Vec::new(),
        }
    }

    /// The month displayed when the widget is not given a view
    pub fn initial_view(&self) -> MonthView {
        self.initial_view
    }

    pub fn columns(&self) -> Columns {
        self.columns.get()
    }

    /// Follow the container widths published by `notifier`, switching between
    /// the one-week and two-week layouts as they change.
    ///
    /// Observation lasts until the returned `Subscription` is dropped.
    pub fn observe_width(&self, notifier: &WidthNotifier) -> Subscription {
        let columns = Rc::clone(&self.columns);
        notifier.subscribe(move |width| {
            let decided = decide_columns(width);
            if columns.replace(decided) != decided {
                log::debug!(
                    "container is {width}px wide; switching to {} columns",
                    decided.get()
                );
            }
        })
    }

    pub fn selected_day(&self) -> Option<u8> {
        self.selected_day
    }

    pub fn select_day(&mut self, day: Option<u8>) {
        self.selected_day = day;
    }

    /// Returns the control or day drawn at the given screen position by the
    /// most recent render
    pub fn hit_test(&self, x: u16, y: u16) -> Option<CalendarHit> {
        let pos = Position::new(x, y);
        self.hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|&(_, hit)| hit)
    }
}

impl Default for CalendarState {
    /// Create a state whose initial view is the current month
    fn default() -> CalendarState {
        CalendarState::new(MonthView::current())
    }
}

impl StatefulWidget for AttendanceCalendar<'_> {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let view = self.view.unwrap_or(state.initial_view);
        let columns = state.columns.get();
        let geometry = Geometry::for_columns(columns);
        let styles = self.theme.resolve(&self.styles);
        let active = resolve_active_record(view, self.attendance);
        buf.set_style(area, styles.container);
        state.hits.clear();
        let left = area.width.saturating_sub(geometry.width()) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(geometry.width().min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        let mut y = 0;
        if self.show_navigation {
            canvas.draw_navigation(y, geometry, view, &styles, &mut state.hits);
            y += NAV_LINES;
        }
        if self.show_weekday_headers {
            canvas.draw_weekdays(y, geometry, &styles);
            y += WEEKDAY_LINES;
        }
        let cells = build_month_grid(view, columns.get());
        for (row, week) in zip(0u16.., cells.chunks(columns.get().get())) {
            let line = y.saturating_add(row.saturating_mul(ROW_LINES));
            for (col, &cell) in zip(0u16.., week) {
                let selected =
                    cell.in_current_month && state.selected_day.map(u16::from) == Some(cell.day);
                let style = styles.for_day(classify_day(cell, active), selected);
                let text = cell.show(usize::from(geometry.cell_width));
                if let Some(rect) = canvas.mvprint(line, geometry.cell_x(col), text, Some(style)) {
                    state.hits.push((rect, CalendarHit::Day(cell)));
                }
            }
        }
    }
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

    fn draw_navigation(
        &mut self,
        y: u16,
        geometry: Geometry,
        view: MonthView,
        styles: &SlotStyles,
        hits: &mut Vec<(Rect, CalendarHit)>,
    ) {
        if let Some(rect) = self.mvprint(y, 0, PREV_BUTTON, Some(styles.navigation_button)) {
            hits.push((rect, CalendarHit::PreviousMonth));
        }
        if let Some(rect) = self.mvprint(
            y,
            NEXT_BUTTON_OFFSET,
            NEXT_BUTTON,
            Some(styles.navigation_button),
        ) {
            hits.push((rect, CalendarHit::NextMonth));
        }
        let title = view.to_string();
        let title_width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        let x = geometry.width().saturating_sub(title_width) / 2;
        self.mvprint(y, x, title, Some(styles.month_title));
    }

    fn draw_weekdays(&mut self, y: u16, geometry: Geometry, styles: &SlotStyles) {
        let width = usize::from(geometry.cell_width);
        for (col, label) in zip(0..geometry.columns, WEEKDAY_LABELS.iter().cycle()) {
            self.mvprint(
                y,
                geometry.cell_x(col),
                format!("{label:^width$}"),
                Some(styles.weekday_header),
            );
        }
        self.hline(y + 1, 0, ACS_HLINE, geometry.width(), styles.rule);
    }

    /// Print `s` at the given position relative to the canvas, truncating it
    /// at the canvas's right edge.  Returns the screen area actually drawn, if
    /// any.
    fn mvprint<S: AsRef<str>>(
        &mut self,
        y: u16,
        x: u16,
        s: S,
        style: Option<Style>,
    ) -> Option<Rect> {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            let rect = Rect {
                x: x + self.area.x,
                y: y + self.area.y,
                width: (self.area.width - x).min(width),
                height: 1,
            };
            Paragraph::new(text).render(rect, self.buf);
            Some(rect)
        } else {
            None
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16, style: Style) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Some(style));
    }
}
