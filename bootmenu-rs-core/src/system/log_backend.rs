//! A [`log`] backend that prints to the UEFI console.
//!
//! Every record is printed with the file and line it came from, so a warning about a skipped boot entry always
//! says where it was raised. Errors and warnings have their level colored so they stand out from the menu.

use alloc::format;
use core::fmt::Write;

use log::{Level, LevelFilter, Metadata, Record};
use uefi::{
    proto::console::text::Color,
    runtime,
    system::with_stdout,
};

use crate::system::helper::to_console_text;

/// A logging backend for UEFI.
#[derive(Default)]
pub struct UefiLogger;

impl UefiLogger {
    /// Constructs a new [`UefiLogger`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self
    }

    /// Installs a logger as the global logger, with a maximum level.
    ///
    /// If a logger is already installed, only the maximum level is changed.
    pub fn install(logger: &'static Self, level: LevelFilter) {
        let _ = log::set_logger(logger);
        log::set_max_level(level);
    }
}

/// Returns the color used for the level of a record.
const fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::LightRed,
        Level::Warn => Color::Yellow,
        Level::Info | Level::Debug | Level::Trace => Color::LightGray,
    }
}

impl log::Log for UefiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let time = runtime::get_time().unwrap_or(runtime::Time::invalid());
        let level = record.level();
        let file = record.file().unwrap_or_default();
        let line = record.line().unwrap_or_default();
        let message = to_console_text(&format!("{}", record.args()));
        with_stdout(|stdout| {
            let _ = write!(stdout, "[{time} ");
            let _ = stdout.set_color(level_color(level), Color::Black);
            let _ = write!(stdout, "{level}");
            let _ = stdout.set_color(Color::LightGray, Color::Black);
            let _ = writeln!(stdout, " {file}:{line}] - {message}");
        });
    }

    fn flush(&self) {}
}
