use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
    sync::{LazyLock, Mutex},
};

use chrono::{Datelike, Timelike};

pub struct LoggingState {
    writer: BufWriter<std::fs::File>,
}

impl LoggingState {
    /// Opens a fresh log file in `<launcher_dir>/logs/`,
    /// named after the current date and time.
    #[must_use]
    pub fn create(launcher_dir: &Path) -> Option<LoggingState> {
        let logs_dir = launcher_dir.join("logs");
        std::fs::create_dir_all(&logs_dir).ok()?;

        let now = chrono::Local::now();
        let log_file_name = format!(
            "{}-{}-{}-{}-{}-{}.log",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        );
        let log_file_path = logs_dir.join(log_file_name);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)
            .ok()?;

        Some(LoggingState {
            writer: BufWriter::new(file),
        })
    }

    pub fn write_str(&mut self, s: &str) {
        _ = self.writer.write_all(s.as_bytes());
    }

    pub fn flush(&mut self) {
        _ = self.writer.flush();
    }
}

/// The log file shared by the [`info!`], [`err!`] and [`pt!`] macros.
///
/// Stays `None` (console-only logging) until [`logger_init`] is called.
pub static LOGGER: LazyLock<Mutex<Option<LoggingState>>> = LazyLock::new(|| Mutex::new(None));

/// Starts mirroring log output into a file under `launcher_dir`.
pub fn logger_init(launcher_dir: &Path) {
    if let Ok(mut logger) = LOGGER.lock() {
        *logger = LoggingState::create(launcher_dir);
    }
}

/// Flushes the log file. Call before exiting.
pub fn logger_finish() {
    if let Ok(mut logger) = LOGGER.lock() {
        if let Some(logger) = &mut *logger {
            logger.flush();
        }
    }
}

#[doc(hidden)]
pub fn write_to_log(s: &str) {
    if let Ok(mut logger) = LOGGER.lock() {
        if let Some(logger) = &mut *logger {
            logger.write_str(s);
        }
    }
}

/// Print an informational message.
/// Saved to a log file.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        let plain_text = format!("[info] {}\n", format_args!($($arg)*));

        if cfg!(windows) {
            print!("{plain_text}");
        } else {
            println!("{} {}", $crate::colored::Colorize::yellow("[info]"), format_args!($($arg)*));
        }

        $crate::print::write_to_log(&plain_text);
    }};
}

/// Print an error message.
/// Saved to a log file.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {{
        let plain_text = format!("[error] {}\n", format_args!($($arg)*));

        if cfg!(windows) {
            eprint!("{plain_text}");
        } else {
            eprintln!("{} {}", $crate::colored::Colorize::red("[error]"), format_args!($($arg)*));
        }

        $crate::print::write_to_log(&plain_text);
    }};
}

/// Print a point message, ie. a small step in some process.
/// Saved to a log file.
#[macro_export]
macro_rules! pt {
    ($($arg:tt)*) => {{
        let plain_text = format!("[plain] {}\n", format_args!($($arg)*));

        if cfg!(windows) {
            println!("- {}", format_args!($($arg)*));
        } else {
            println!("{} {}", $crate::colored::Colorize::bold("-"), format_args!($($arg)*));
        }

        $crate::print::write_to_log(&plain_text);
    }};
}
