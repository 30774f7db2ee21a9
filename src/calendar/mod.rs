mod controller;
mod grid;
mod layout;
mod view;
mod widget;
pub use self::controller::{
    classify_day, is_interactive, resolve_active_record, CalendarCallbacks, CalendarHit, DayStatus,
};
pub use self::grid::{build_month_grid, DayCell};
pub use self::layout::{
    decide_columns, Columns, Subscription, WidthNotifier, GAP_WIDTH, MIN_CELL_WIDTH,
    WIDE_LAYOUT_MIN_WIDTH,
};
pub use self::view::{MonthView, MonthViewError, OutOfTimeError, ParseMonthViewError};
pub use self::widget::{AttendanceCalendar, CalendarState};
