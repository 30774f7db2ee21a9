//! A themeable month calendar widget for [`ratatui`] that shows, for each day
//! of a month, whether someone was present, absent, or has no record.
//!
//! The pieces are usable on their own:
//!
//! - [`build_month_grid()`] lays out a month as a padded grid of [`DayCell`]s.
//! - [`decide_columns()`] picks a one- or two-week-wide grid for a container
//!   width, and [`WidthNotifier`] carries width measurements from the host to
//!   a [`CalendarState`].
//! - [`classify_day()`] and [`is_interactive()`] decide how each day looks
//!   and whether it reacts to clicks, given the month's
//!   [`MonthAttendanceRecord`].
//! - [`AttendanceCalendar`] draws all of it, and [`CalendarCallbacks`] turns
//!   clicks into navigation requests and date-click notifications for the
//!   host, which owns the displayed [`MonthView`].
pub mod attendance;
pub mod calendar;
pub mod theme;
pub use crate::attendance::{AttendanceDataset, MonthAttendanceRecord};
pub use crate::calendar::*;
pub use crate::theme::{CalendarTheme, ParseThemeError, StyleOverrides};
