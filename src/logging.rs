//! Per-stage logger writing to the console and to a log file.
//!
//! Each entry point calls [`init`] once and threads the returned
//! [`StageLogger`] through the stage. Nothing is registered globally.
//!
//! Line format: `timestamp-loggername-LEVEL-message`, e.g.
//! `2024-03-01 12:00:00,123-train-DEBUG-model saved in models/linear.bin`.
//! Warnings are labelled `WARNING`.

use chrono::Local;
use log::{Level, LevelFilter};
use parking_lot::Mutex;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Level label as written in log lines.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Warn => "WARNING",
        other => other.as_str(),
    }
}

/// Logger owned by one stage invocation.
#[derive(Debug)]
pub struct StageLogger {
    name: String,
    level: LevelFilter,
    path: PathBuf,
    file: Mutex<File>,
}

/// Create the log directory if needed and open `<log_dir>/<name>.log` for appending.
pub fn init(name: &str, log_dir: &Path, level: LevelFilter) -> io::Result<StageLogger> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!("{name}.log"));
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok(StageLogger {
        name: name.to_string(),
        level,
        path,
        file: Mutex::new(file),
    })
}

impl StageLogger {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the log file (useful for tests).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    fn format_line(&self, level: Level, message: &dyn Display) -> String {
        format!(
            "{}-{}-{}-{}",
            Local::now().format(TIMESTAMP_FORMAT),
            self.name,
            level_name(level),
            message
        )
    }

    /// Emit one record. Write failures on either sink are ignored.
    pub fn log(&self, level: Level, message: impl Display) {
        if !self.enabled(level) {
            return;
        }
        let line = self.format_line(level, &message);
        let _ = writeln!(io::stderr().lock(), "{line}");
        let mut file = self.file.lock();
        let _ = writeln!(file, "{line}");
        let _ = file.flush();
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }
}
