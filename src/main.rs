mod app;
mod help;
use crate::app::{demo_attendance, App, Options};
use anyhow::Context;
use attendance_cal::{CalendarTheme, MonthView};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::{style::Color, DefaultTerminal};
use std::io;
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        start: Option<MonthView>,
        options: Options,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut start = None;
        let mut theme = None;
        let mut colors = Vec::new();
        let mut options = Options::default();
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("theme") => theme = Some(parser.value()?.parse::<CalendarTheme>()?),
                Arg::Long("no-navigation") => options.hide_navigation = true,
                Arg::Long("no-weekdays") => options.hide_weekday_headers = true,
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Long(name) => match ColorToken::from_option(name) {
                    Some(token) => colors.push((token, parser.value()?.parse::<Color>()?)),
                    None => return Err(arg.unexpected()),
                },
                Arg::Value(value) if start.is_none() => {
                    start = Some(value.parse::<MonthView>()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        // Colour options apply on top of the chosen preset regardless of order
        options.theme = theme.unwrap_or_default();
        for (token, color) in colors {
            token.apply(&mut options.theme, color);
        }
        Ok(Command::Run {
            start,
            options,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                start,
                options,
                log_file,
            } => {
                let _logger = init_logging(log_file)?;
                let start = start.unwrap_or_else(MonthView::current);
                log::info!("starting at {start}");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(start, demo_attendance(), options).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: attendance-cal [OPTIONS] [YYYY-MM]");
                println!();
                println!("Terminal calendar showing per-day attendance");
                println!();
                println!("Options:");
                println!("  --theme <default|modern>  Colour preset to start from");
                println!("  --present-color <COLOR>   Fill for days marked present");
                println!("  --absent-color <COLOR>    Fill for days marked absent");
                println!("  --text-color <COLOR>      Main text colour");
                println!("  --border-color <COLOR>    Colour of rules and buttons");
                println!("  --muted-color <COLOR>     Colour of labels and padding days");
                println!("  --hover-color <COLOR>     Fill for the selected day");
                println!("  --background-color <COLOR>");
                println!("                            Background colour");
                println!("  --no-navigation           Hide the month navigation header");
                println!("  --no-weekdays             Hide the weekday labels");
                println!("  --log-file <PATH>         Write log messages to PATH");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                println!();
                println!("Colours may be names like \"green\" or hex codes like \"#10b981\".");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// A theme colour that can be set from the command line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ColorToken {
    Present,
    Absent,
    Text,
    Border,
    Muted,
    Hover,
    Background,
}

impl ColorToken {
    fn from_option(name: &str) -> Option<ColorToken> {
        match name {
            "present-color" => Some(ColorToken::Present),
            "absent-color" => Some(ColorToken::Absent),
            "text-color" => Some(ColorToken::Text),
            "border-color" => Some(ColorToken::Border),
            "muted-color" => Some(ColorToken::Muted),
            "hover-color" => Some(ColorToken::Hover),
            "background-color" => Some(ColorToken::Background),
            _ => None,
        }
    }

    fn apply(self, theme: &mut CalendarTheme, color: Color) {
        let slot = match self {
            ColorToken::Present => &mut theme.present,
            ColorToken::Absent => &mut theme.absent,
            ColorToken::Text => &mut theme.text,
            ColorToken::Border => &mut theme.border,
            ColorToken::Muted => &mut theme.muted_text,
            ColorToken::Hover => &mut theme.hover,
            ColorToken::Background => &mut theme.background,
        };
        *slot = color;
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

// Logging goes to a file or nowhere, as anything written to stderr would
// garble the display.
fn init_logging(log_file: Option<PathBuf>) -> anyhow::Result<Option<LoggerHandle>> {
    let Some(path) = log_file else {
        return Ok(None);
    };
    let handle = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(path).context("invalid log file path")?)
        .start()
        .context("failed to start logger")?;
    Ok(Some(handle))
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = crossterm::execute!(io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = crossterm::execute!(io::stdout(), DisableMouseCapture) {
        log::warn!("failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}
