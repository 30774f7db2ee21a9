use super::view::MonthView;
use std::num::NonZeroUsize;

/// One position in a month grid.
///
/// `day` is the day number within whichever month the cell belongs to: the
/// displayed month, or the month before or after it for padding cells.
/// Trailing padding keeps counting past the end of the following month when
/// the grid is wide enough to need it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DayCell {
    pub day: u16,
    pub in_current_month: bool,
}

impl DayCell {
    pub fn in_month(day: u8) -> DayCell {
        DayCell {
            day: u16::from(day),
            in_current_month: true,
        }
    }

    pub fn padding(day: u16) -> DayCell {
        DayCell {
            day,
            in_current_month: false,
        }
    }

    /// Render the day number centered in a field `width` columns wide
    pub(crate) fn show(self, width: usize) -> String {
        let number = format!("{:2}", self.day);
        format!("{number:^width$}")
    }
}

/// Lay out the days of `view` as a grid `columns` cells wide, in row-major
/// order, starting on a Sunday.
///
/// The grid opens with the last days of the previous month up to the weekday
/// of the 1st, continues with every day of the month, and is then padded with
/// the days of the following month (numbered from 1) until its length is a
/// multiple of `columns`.  Only the trailing padding depends on `columns`.
///
/// Trailing day numbers wrap around after 65535, which can only happen with
/// more than 65536 columns.
pub fn build_month_grid(view: MonthView, columns: NonZeroUsize) -> Vec<DayCell> {
    let columns = columns.get();
    let lead = usize::from(view.first_weekday().number_days_from_sunday());
    let prev_len = view.days_in_previous_month();
    let mut cells = Vec::with_capacity(lead + 31 + columns);
    cells.extend(
        (1..=u16::from(prev_len))
            .skip(usize::from(prev_len).saturating_sub(lead))
            .map(DayCell::padding),
    );
    cells.extend(view.days().map(|d| DayCell::in_month(d.day())));
    let trail = (columns - cells.len() % columns) % columns;
    cells.extend((1..=u16::MAX).cycle().take(trail).map(DayCell::padding));
    cells
}
