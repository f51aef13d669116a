//! saavy-waves - audition the morphing wavetable oscillator in a terminal
//!
//! Run with: cargo run -- [--verbose] [--note <0-151>]

mod app;
mod ui;

use std::fs::File;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use saavy_waves::pitch::MAX_NOTE;

/// Middle C
const DEFAULT_NOTE: u8 = 60;

struct Args {
    verbose: bool,
    note: u8,
}

fn parse_args() -> EyreResult<Args> {
    let mut args = Args {
        verbose: false,
        note: DEFAULT_NOTE,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "--note" => {
                let value = iter.next().ok_or_else(|| eyre!("--note needs a value"))?;
                let note: u8 = value
                    .parse()
                    .wrap_err_with(|| format!("invalid note {value:?}"))?;
                args.note = note.min(MAX_NOTE);
            }
            other => return Err(eyre!("unknown argument {other:?}")),
        }
    }

    Ok(args)
}

/// The TUI owns the terminal, so logs go to a file.
fn init_logging(verbose: bool) -> EyreResult<()> {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let log_path = std::env::temp_dir().join("saavy-waves.log");
    let log_file = File::create(&log_path)
        .wrap_err_with(|| format!("cannot create log file {}", log_path.display()))?;

    WriteLogger::init(log_level, Config::default(), log_file)
        .wrap_err("failed to initialize logger")?;

    log::info!("saavy-waves starting (log level: {:?})", log_level);
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = parse_args()?;
    init_logging(args.verbose)?;

    let audition = app::Audition::start(args.note)?;

    let mut terminal = ratatui::init();
    let res = audition.run(&mut terminal);
    ratatui::restore();
    res
}
