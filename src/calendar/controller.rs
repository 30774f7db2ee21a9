use super::grid::DayCell;
use super::view::{MonthView, OutOfTimeError};
use crate::attendance::{AttendanceDataset, MonthAttendanceRecord};
use std::fmt;

/// How a day cell should be presented
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DayStatus {
    Present,
    Absent,
    /// An in-month day with no attendance information
    Neutral,
    /// A day borrowed from an adjacent month
    Padding,
}

/// A part of the rendered calendar that reacts to clicks
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CalendarHit {
    PreviousMonth,
    NextMonth,
    Day(DayCell),
}

/// Returns the record in `dataset` for exactly the month `view`, if any
pub fn resolve_active_record(
    view: MonthView,
    dataset: Option<&AttendanceDataset>,
) -> Option<&MonthAttendanceRecord> {
    dataset.and_then(|ds| ds.record_for(view))
}

/// Classify a grid cell for styling.
///
/// Presence is checked before absence, so a day listed in both sets of the
/// active record is `Present`.
pub fn classify_day(cell: DayCell, active: Option<&MonthAttendanceRecord>) -> DayStatus {
    if !cell.in_current_month {
        return DayStatus::Padding;
    }
    match active {
        Some(record) => match u8::try_from(cell.day) {
            Ok(day) if record.is_present(day) => DayStatus::Present,
            Ok(day) if record.is_absent(day) => DayStatus::Absent,
            _ => DayStatus::Neutral,
        },
        None => DayStatus::Neutral,
    }
}

/// A cell accepts clicks only if a click handler is configured, the cell is a
/// day of the displayed month, and there is attendance data for that month.
pub fn is_interactive(
    cell: DayCell,
    active: Option<&MonthAttendanceRecord>,
    has_click_handler: bool,
) -> bool {
    has_click_handler && cell.in_current_month && active.is_some()
}

type ViewCallback<'a> = Box<dyn FnMut(MonthView) + 'a>;

type DateCallback<'a> = Box<dyn FnMut(u8, u8, i32) + 'a>;

/// The host's handlers for calendar interaction.
///
/// The calendar never changes the displayed month itself: navigation is
/// reported to `on_change_view` with the proposed new view, and it is up to
/// the host to display it.  Clicks on interactive days are reported to the
/// optional date click handler as `(day, month_index, year)`, where
/// `month_index` counts from 0 for January like [`MonthView::month_index()`].
pub struct CalendarCallbacks<'a> {
    on_change_view: ViewCallback<'a>,
    on_date_click: Option<DateCallback<'a>>,
}

impl<'a> CalendarCallbacks<'a> {
    pub fn new<F>(on_change_view: F) -> CalendarCallbacks<'a>
    where
        F: FnMut(MonthView) + 'a,
    {
        CalendarCallbacks {
            on_change_view: Box::new(on_change_view),
            on_date_click: None,
        }
    }

    pub fn on_date_click<F>(mut self, on_date_click: F) -> CalendarCallbacks<'a>
    where
        F: FnMut(u8, u8, i32) + 'a,
    {
        self.on_date_click = Some(Box::new(on_date_click));
        self
    }

    pub fn has_click_handler(&self) -> bool {
        self.on_date_click.is_some()
    }

    /// Respond to a click on `hit` while `view` is displayed.
    ///
    /// Returns `Ok(true)` if a callback was invoked and `Ok(false)` if the
    /// click was ignored because the cell is not interactive.  Navigating past
    /// the supported range of dates is an error.
    pub fn dispatch(
        &mut self,
        hit: CalendarHit,
        view: MonthView,
        dataset: Option<&AttendanceDataset>,
    ) -> Result<bool, OutOfTimeError> {
        match hit {
            CalendarHit::PreviousMonth => Ok(self.change_view(view.previous()?)),
            CalendarHit::NextMonth => Ok(self.change_view(view.next()?)),
            CalendarHit::Day(cell) => {
                let active = resolve_active_record(view, dataset);
                let interactive = is_interactive(cell, active, self.has_click_handler());
                match (self.on_date_click.as_mut(), u8::try_from(cell.day)) {
                    (Some(on_date_click), Ok(day)) if interactive => {
                        log::debug!("date clicked: day {day} of {view}");
                        on_date_click(day, view.month_index(), view.year());
                        Ok(true)
                    }
                    _ => {
                        log::debug!("ignoring click on non-interactive day {}", cell.day);
                        Ok(false)
                    }
                }
            }
        }
    }

    fn change_view(&mut self, next: MonthView) -> bool {
        log::debug!("requesting view change to {next}");
        (self.on_change_view)(next);
        true
    }
}

impl fmt::Debug for CalendarCallbacks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarCallbacks")
            .field("has_click_handler", &self.has_click_handler())
            .finish_non_exhaustive()
    }
}
