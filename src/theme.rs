use crate::calendar::DayStatus;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use thiserror::Error;

// Defaults are taken from the Tailwind palette.

/// emerald-500
pub const DEFAULT_PRESENT: Color = Color::Rgb(0x10, 0xb9, 0x81);

/// amber-500
pub const DEFAULT_ABSENT: Color = Color::Rgb(0xf5, 0x9e, 0x0b);

/// slate-700
pub const DEFAULT_TEXT: Color = Color::Rgb(0x33, 0x41, 0x55);

/// slate-200
pub const DEFAULT_BORDER: Color = Color::Rgb(0xe2, 0xe8, 0xf0);

/// slate-400
pub const DEFAULT_MUTED_TEXT: Color = Color::Rgb(0x94, 0xa3, 0xb8);

/// slate-100
pub const DEFAULT_HOVER: Color = Color::Rgb(0xf1, 0xf5, 0xf9);

pub const DEFAULT_BACKGROUND: Color = Color::Rgb(0xff, 0xff, 0xff);

/// The colour tokens used to draw the calendar.  Fields that are not set
/// explicitly keep their defaults:
///
/// ```
/// # use attendance_cal::CalendarTheme;
/// # use ratatui::style::Color;
/// let theme = CalendarTheme {
///     present: Color::Green,
///     ..CalendarTheme::default()
/// };
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarTheme {
    /// Fill colour for days marked present; the theme's primary colour
    pub present: Color,
    /// Fill colour for days marked absent
    pub absent: Color,
    pub text: Color,
    pub border: Color,
    /// Colour for padding days and weekday labels
    pub muted_text: Color,
    /// Fill colour for the selected day
    pub hover: Color,
    pub background: Color,
}

impl CalendarTheme {
    /// A darker emerald and amber variant on the default slate palette
    pub const fn modern() -> CalendarTheme {
        CalendarTheme {
            present: Color::Rgb(0x05, 0x96, 0x69),
            absent: Color::Rgb(0xd9, 0x77, 0x06),
            text: Color::Rgb(0x0f, 0x17, 0x2a),
            border: DEFAULT_BORDER,
            muted_text: Color::Rgb(0x64, 0x74, 0x8b),
            hover: DEFAULT_HOVER,
            background: DEFAULT_BACKGROUND,
        }
    }

    pub(crate) fn resolve(&self, overrides: &StyleOverrides) -> SlotStyles {
        let base = Style::new().fg(self.text).bg(self.background);
        let cell = Style::new().add_modifier(Modifier::BOLD).patch(overrides.cell);
        SlotStyles {
            container: base.patch(overrides.container),
            navigation_button: Style::new()
                .fg(self.text)
                .bg(self.border)
                .add_modifier(Modifier::BOLD)
                .patch(overrides.navigation_button),
            month_title: Style::new()
                .fg(self.text)
                .add_modifier(Modifier::BOLD)
                .patch(overrides.month_title),
            weekday_header: Style::new()
                .fg(self.muted_text)
                .add_modifier(Modifier::BOLD)
                .patch(overrides.weekday_header),
            rule: Style::new().fg(self.border),
            padding_cell: cell.fg(self.muted_text),
            neutral_cell: cell.fg(self.text),
            present_cell: cell
                .fg(self.background)
                .bg(self.present)
                .patch(overrides.present_cell),
            absent_cell: cell
                .fg(self.background)
                .bg(self.absent)
                .patch(overrides.absent_cell),
            hover: self.hover,
        }
    }
}

impl Default for CalendarTheme {
    fn default() -> CalendarTheme {
        CalendarTheme {
            present: DEFAULT_PRESENT,
            absent: DEFAULT_ABSENT,
            text: DEFAULT_TEXT,
            border: DEFAULT_BORDER,
            muted_text: DEFAULT_MUTED_TEXT,
            hover: DEFAULT_HOVER,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl FromStr for CalendarTheme {
    type Err = ParseThemeError;

    /// Look up a built-in theme by name
    fn from_str(s: &str) -> Result<CalendarTheme, ParseThemeError> {
        match s {
            "default" => Ok(CalendarTheme::default()),
            "modern" => Ok(CalendarTheme::modern()),
            _ => Err(ParseThemeError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown theme {0:?}; expected \"default\" or \"modern\"")]
pub struct ParseThemeError(String);

/// Per-part style adjustments.
///
/// Each slot is patched on top of the style the theme gives that part of the
/// calendar, so an empty `Style` leaves the part unchanged and a slot only
/// needs to set what it wants to differ.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct StyleOverrides {
    pub navigation_button: Style,
    pub weekday_header: Style,
    pub month_title: Style,
    /// Applied to every day cell before the present/absent slots
    pub cell: Style,
    pub present_cell: Style,
    pub absent_cell: Style,
    pub container: Style,
}

/// Fully resolved styles for each part of the calendar
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SlotStyles {
    pub(crate) container: Style,
    pub(crate) navigation_button: Style,
    pub(crate) month_title: Style,
    pub(crate) weekday_header: Style,
    pub(crate) rule: Style,
    pub(crate) padding_cell: Style,
    pub(crate) neutral_cell: Style,
    pub(crate) present_cell: Style,
    pub(crate) absent_cell: Style,
    hover: Color,
}

impl SlotStyles {
    pub(crate) fn for_day(&self, status: DayStatus, selected: bool) -> Style {
        let style = match status {
            DayStatus::Present => self.present_cell,
            DayStatus::Absent => self.absent_cell,
            DayStatus::Neutral => self.neutral_cell,
            DayStatus::Padding => self.padding_cell,
        };
        match (selected, status) {
            (false, _) => style,
            // Keep the attendance fill visible under the selection
            (true, DayStatus::Present | DayStatus::Absent) => {
                style.add_modifier(Modifier::UNDERLINED)
            }
            (true, DayStatus::Neutral | DayStatus::Padding) => {
                style.bg(self.hover).add_modifier(Modifier::UNDERLINED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let styles = CalendarTheme::default().resolve(&StyleOverrides::default());
        assert_eq!(
            styles.container,
            Style::new().fg(DEFAULT_TEXT).bg(DEFAULT_BACKGROUND)
        );
        assert_eq!(styles.present_cell.bg, Some(DEFAULT_PRESENT));
        assert_eq!(styles.present_cell.fg, Some(DEFAULT_BACKGROUND));
        assert_eq!(styles.absent_cell.bg, Some(DEFAULT_ABSENT));
        assert_eq!(styles.padding_cell.fg, Some(DEFAULT_MUTED_TEXT));
        assert_eq!(styles.neutral_cell.fg, Some(DEFAULT_TEXT));
        assert_eq!(styles.rule.fg, Some(DEFAULT_BORDER));
    }

    #[test]
    fn test_overrides_patch_slots_independently() {
        let overrides = StyleOverrides {
            present_cell: Style::new().bg(Color::Blue),
            cell: Style::new().add_modifier(Modifier::ITALIC),
            month_title: Style::new().fg(Color::Red),
            ..StyleOverrides::default()
        };
        let styles = CalendarTheme::default().resolve(&overrides);
        assert_eq!(styles.present_cell.bg, Some(Color::Blue));
        assert_eq!(styles.present_cell.fg, Some(DEFAULT_BACKGROUND));
        assert!(styles.present_cell.add_modifier.contains(Modifier::ITALIC));
        assert!(styles.padding_cell.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(styles.absent_cell.bg, Some(DEFAULT_ABSENT));
        assert_eq!(styles.month_title.fg, Some(Color::Red));
        assert!(styles.month_title.add_modifier.contains(Modifier::BOLD));
        assert_eq!(styles.weekday_header.fg, Some(DEFAULT_MUTED_TEXT));
    }

    #[test]
    fn test_selected_day() {
        let styles = CalendarTheme::default().resolve(&StyleOverrides::default());
        let neutral = styles.for_day(DayStatus::Neutral, true);
        assert_eq!(neutral.bg, Some(DEFAULT_HOVER));
        let present = styles.for_day(DayStatus::Present, true);
        assert_eq!(present.bg, Some(DEFAULT_PRESENT));
        assert!(present.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(styles.for_day(DayStatus::Absent, false), styles.absent_cell);
    }

    #[test]
    fn test_parse() {
        assert_eq!("default".parse::<CalendarTheme>(), Ok(CalendarTheme::default()));
        assert_eq!("modern".parse::<CalendarTheme>(), Ok(CalendarTheme::modern()));
        assert_eq!(
            "neon".parse::<CalendarTheme>(),
            Err(ParseThemeError(String::from("neon")))
        );
    }
}
