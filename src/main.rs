mod app;
mod calendar;
mod help;
mod theme;
use crate::app::App;
use crate::calendar::{ViewState, DEFAULT_ANCHOR};
use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        anchor: Date,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut anchor = DEFAULT_ANCHOR;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('a') | Arg::Long("anchor") => {
                    anchor = parser.value()?.parse_with(parse_date)?;
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    date = Some(value.parse_with(parse_date)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            date,
            anchor,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                anchor,
                log_file,
            } => {
                let _logger = log_file.map(start_logging).transpose()?;
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                log::info!("Today is {today}; market days are counted from {anchor}");
                let mut view = ViewState::new(today, anchor).with_context(|| {
                    format!("today ({today}) or anchor ({anchor}) is outside the supported range")
                })?;
                if let Some(date) = date {
                    view.jump_to_date(date)
                        .with_context(|| format!("cannot display calendar around {date}"))?;
                    view.set_selected_date(Some(date));
                }
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(view).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: marketday [<options>] [YYYY-MM-DD]");
                println!();
                println!("Terminal month calendar marking every third day as a market day");
                println!();
                println!("Options:");
                println!("  -a, --anchor YYYY-MM-DD");
                println!("                    Count market days from this date");
                println!("                    [default: {DEFAULT_ANCHOR}]");
                println!();
                println!("  --log-file PATH   Write log messages to this file; the level is");
                println!("                    taken from RUST_LOG [default: {DEFAULT_LOG_LEVEL}]");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, &YMD_FMT)
}

fn start_logging(path: PathBuf) -> anyhow::Result<LoggerHandle> {
    Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(&path).context("invalid log file path")?)
        .start()
        .with_context(|| format!("failed to start logging to {}", path.display()))
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse_args(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("marketday").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(
            parse_args(&[]).unwrap(),
            Command::Run {
                date: None,
                anchor: DEFAULT_ANCHOR,
                log_file: None,
            }
        );
    }

    #[test]
    fn test_all_args() {
        assert_eq!(
            parse_args(&[
                "--anchor",
                "2025-12-30",
                "--log-file",
                "cal.log",
                "2026-03-01"
            ])
            .unwrap(),
            Command::Run {
                date: Some(date!(2026 - 03 - 01)),
                anchor: date!(2025 - 12 - 30),
                log_file: Some(PathBuf::from("cal.log")),
            }
        );
    }

    #[test]
    fn test_short_anchor() {
        assert_eq!(
            parse_args(&["-a", "2026-02-05"]).unwrap(),
            Command::Run {
                date: None,
                anchor: date!(2026 - 02 - 05),
                log_file: None,
            }
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse_args(&["2026-03-01", "-h"]).unwrap(), Command::Help);
        assert_eq!(parse_args(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_date() {
        assert!(parse_args(&["2026-02-30"]).is_err());
        assert!(parse_args(&["--anchor", "tomorrow"]).is_err());
        assert!(parse_args(&["--anchor"]).is_err());
    }

    #[test]
    fn test_extra_arg() {
        assert!(parse_args(&["2026-03-01", "2026-04-01"]).is_err());
        assert!(parse_args(&["--bogus"]).is_err());
    }
}
