use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month, OffsetDateTime, Weekday};

const MONTHS_IN_YEAR: i64 = 12;

/// A displayed month: a year together with one of its twelve months.
///
/// A `MonthView` is stored as the first day of its month, so every value is a
/// month that lies within the range of dates supported by [`time`].  Views are
/// plain values; navigation produces a new view rather than mutating one.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MonthView {
    first: Date,
}

impl MonthView {
    pub fn new(year: i32, month: Month) -> Result<MonthView, OutOfTimeError> {
        Date::from_calendar_date(year, month, 1)
            .map(|first| MonthView { first })
            .map_err(|_| OutOfTimeError)
    }

    /// Construct a view from a zero-based month index, where 0 is January and
    /// 11 is December
    pub fn from_index(year: i32, month_index: u8) -> Result<MonthView, MonthViewError> {
        let month = month_index
            .checked_add(1)
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(MonthViewError::MonthIndex(month_index))?;
        Ok(MonthView::new(year, month)?)
    }

    /// Returns the view of the month containing `date`
    pub fn containing(date: Date) -> MonthView {
        // Day 1 exists in every month, so replace_day() cannot fail here.
        MonthView {
            first: date.replace_day(1).unwrap_or(date),
        }
    }

    /// Returns the view of the current month in the local timezone, falling
    /// back to UTC when the local offset cannot be determined.
    ///
    /// The result is a snapshot; it does not follow the clock afterwards.
    pub fn current() -> MonthView {
        let now = OffsetDateTime::now_local().unwrap_or_else(|e| {
            log::warn!("failed to determine local date, falling back to UTC: {e}");
            OffsetDateTime::now_utc()
        });
        MonthView::containing(now.date())
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> Month {
        self.first.month()
    }

    /// Zero-based index of the month (0 = January)
    pub fn month_index(self) -> u8 {
        u8::from(self.first.month()) - 1
    }

    pub fn first_day(self) -> Date {
        self.first
    }

    pub fn first_weekday(self) -> Weekday {
        self.first.weekday()
    }

    pub fn days_in_month(self) -> u8 {
        self.days().last().map_or(1, |d| d.day())
    }

    /// Returns the view `delta` months after this one (or before it, if
    /// `delta` is negative), rolling over year boundaries.
    ///
    /// Fails only when the result would lie outside the supported range of
    /// dates.
    pub fn advance(self, delta: i32) -> Result<MonthView, OutOfTimeError> {
        let total = i64::from(self.year()) * MONTHS_IN_YEAR
            + i64::from(self.month_index())
            + i64::from(delta);
        let year = i32::try_from(total.div_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        let index = u8::try_from(total.rem_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        MonthView::from_index(year, index).map_err(|_| OutOfTimeError)
    }

    pub fn previous(self) -> Result<MonthView, OutOfTimeError> {
        self.advance(-1)
    }

    pub fn next(self) -> Result<MonthView, OutOfTimeError> {
        self.advance(1)
    }

    /// Iterate over the dates of the month in order
    pub(crate) fn days(self) -> impl Iterator<Item = Date> {
        let month = self.first.month();
        successors(Some(self.first), |&d| d.next_day()).take_while(move |d| d.month() == month)
    }

    /// Number of days in the month before this one
    pub(crate) fn days_in_previous_month(self) -> u8 {
        // Only January of the first supported year has no previous day, and
        // December always has 31 days.
        self.first.previous_day().map_or(31, |d| d.day())
    }
}

impl fmt::Display for MonthView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

impl FromStr for MonthView {
    type Err = ParseMonthViewError;

    /// Parse a month of the form `YYYY-MM`.  The year may be negative.
    fn from_str(s: &str) -> Result<MonthView, ParseMonthViewError> {
        let (year, month) = s.rsplit_once('-').ok_or(ParseMonthViewError::Syntax)?;
        if month.is_empty() || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseMonthViewError::Syntax);
        }
        let year = year
            .parse::<i32>()
            .map_err(|_| ParseMonthViewError::Syntax)?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(ParseMonthViewError::Month)?;
        Ok(MonthView::new(year, month)?)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub enum MonthViewError {
    #[error("month index {0} is not in the range 0 through 11")]
    MonthIndex(u8),
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseMonthViewError {
    #[error("expected a month of the form YYYY-MM")]
    Syntax,
    #[error("month must be a number from 01 through 12")]
    Month,
    #[error("year is outside the supported range")]
    OutOfTime(#[from] OutOfTimeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn view(year: i32, month: Month) -> MonthView {
        MonthView::new(year, month).unwrap()
    }

    #[test]
    fn test_advance_within_year() {
        assert_eq!(
            view(2024, Month::March).advance(1),
            Ok(view(2024, Month::April))
        );
        assert_eq!(
            view(2024, Month::March).advance(-2),
            Ok(view(2024, Month::January))
        );
    }

    #[test]
    fn test_advance_across_years() {
        assert_eq!(
            view(2024, Month::December).next(),
            Ok(view(2025, Month::January))
        );
        assert_eq!(
            view(2024, Month::January).previous(),
            Ok(view(2023, Month::December))
        );
        assert_eq!(
            view(2024, Month::May).advance(-29),
            Ok(view(2021, Month::December))
        );
        assert_eq!(
            view(-1, Month::December).next(),
            Ok(view(0, Month::January))
        );
    }

    #[test]
    fn test_advance_is_invertible() {
        let mut v = view(1999, Month::January);
        for _ in 0..60 {
            assert_eq!(v.next().and_then(MonthView::previous), Ok(v));
            assert_eq!(v.previous().and_then(MonthView::next), Ok(v));
            v = v.next().unwrap();
        }
    }

    #[test]
    fn test_advance_out_of_time() {
        assert_eq!(view(9999, Month::December).next(), Err(OutOfTimeError));
        assert_eq!(view(-9999, Month::January).previous(), Err(OutOfTimeError));
        assert_eq!(view(2024, Month::January).advance(i32::MAX), Err(OutOfTimeError));
    }

    #[test]
    fn test_from_index() {
        let v = MonthView::from_index(2024, 0).unwrap();
        assert_eq!(v.month(), Month::January);
        assert_eq!(v.month_index(), 0);
        assert_eq!(MonthView::from_index(2024, 11).unwrap().month(), Month::December);
        assert_eq!(
            MonthView::from_index(2024, 12),
            Err(MonthViewError::MonthIndex(12))
        );
        assert_eq!(
            MonthView::from_index(2024, u8::MAX),
            Err(MonthViewError::MonthIndex(u8::MAX))
        );
        assert_eq!(
            MonthView::from_index(12345, 0),
            Err(MonthViewError::OutOfTime(OutOfTimeError))
        );
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(view(2024, Month::February).days_in_month(), 29);
        assert_eq!(view(2023, Month::February).days_in_month(), 28);
        assert_eq!(view(1900, Month::February).days_in_month(), 28);
        assert_eq!(view(2000, Month::February).days_in_month(), 29);
        assert_eq!(view(2024, Month::April).days_in_month(), 30);
        assert_eq!(view(2024, Month::December).days_in_month(), 31);
        assert_eq!(view(9999, Month::December).days_in_month(), 31);
    }

    #[test]
    fn test_days_in_previous_month() {
        assert_eq!(view(2024, Month::March).days_in_previous_month(), 29);
        assert_eq!(view(2024, Month::January).days_in_previous_month(), 31);
        assert_eq!(view(-9999, Month::January).days_in_previous_month(), 31);
    }

    #[test]
    fn test_first_weekday() {
        assert_eq!(view(2024, Month::January).first_weekday(), Weekday::Monday);
        assert_eq!(view(2023, Month::October).first_weekday(), Weekday::Sunday);
        assert_eq!(view(2022, Month::January).first_weekday(), Weekday::Saturday);
    }

    #[test]
    fn test_containing() {
        assert_eq!(
            MonthView::containing(date!(2024 - 02 - 29)),
            view(2024, Month::February)
        );
        assert_eq!(
            MonthView::containing(date!(2024 - 02 - 29)).first_day(),
            date!(2024 - 02 - 01)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(view(2024, Month::January).to_string(), "January 2024");
        assert_eq!(view(1999, Month::September).to_string(), "September 1999");
    }

    #[test]
    fn test_parse() {
        assert_eq!("2024-01".parse::<MonthView>(), Ok(view(2024, Month::January)));
        assert_eq!("1999-12".parse::<MonthView>(), Ok(view(1999, Month::December)));
        assert_eq!("-0044-03".parse::<MonthView>(), Ok(view(-44, Month::March)));
        assert_eq!("2024-13".parse::<MonthView>(), Err(ParseMonthViewError::Month));
        assert_eq!("2024-00".parse::<MonthView>(), Err(ParseMonthViewError::Month));
        assert_eq!("2024".parse::<MonthView>(), Err(ParseMonthViewError::Syntax));
        assert_eq!("2024-".parse::<MonthView>(), Err(ParseMonthViewError::Syntax));
        assert_eq!("2024-+1".parse::<MonthView>(), Err(ParseMonthViewError::Syntax));
        assert_eq!("twenty-01".parse::<MonthView>(), Err(ParseMonthViewError::Syntax));
        assert_eq!(
            "12345-01".parse::<MonthView>(),
            Err(ParseMonthViewError::OutOfTime(OutOfTimeError))
        );
    }
}
