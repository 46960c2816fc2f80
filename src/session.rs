//! User-facing session log.
//!
//! Every message the installer shows is printed immediately with a
//! timestamp, a level symbol and a level color, and kept so the whole run
//! can be saved to a log file at the end.

use anyhow::{Context, Result};
use chrono::Local;
use console::Style;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::runtime::Runtime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILENAME_TIMESTAMP_FORMAT: &str = "%m-%d-%y_%H-%M.%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Critical,
    Error,
    Warn,
    Comment,
    User,
    Ok,
}

impl Level {
    pub fn symbol(&self) -> &'static str {
        match self {
            Level::Critical => "✖",
            Level::Error => "✘",
            Level::Warn => "⚠",
            Level::Comment => "•",
            Level::User => "➜",
            Level::Ok => "✔",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Level::Critical => Style::new().red().bright(),
            Level::Error => Style::new().color256(208),
            Level::Warn => Style::new().yellow().bright(),
            Level::Comment => Style::new().white().bright(),
            Level::User => Style::new().cyan().bright(),
            Level::Ok => Style::new().green().bright(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Critical => write!(f, "CRITICAL"),
            Level::Error => write!(f, "ERROR"),
            Level::Warn => write!(f, "WARN"),
            Level::Comment => write!(f, "COMMENT"),
            Level::User => write!(f, "USER"),
            Level::Ok => write!(f, "OK"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl Entry {
    fn console_line(&self) -> String {
        let line = format!("{} {} {}", self.timestamp, self.level.symbol(), self.message);
        self.level.style().apply_to(line).to_string()
    }

    fn file_line(&self) -> String {
        format!("{}\t{}\t{}", self.timestamp, self.level, self.message)
    }
}

#[derive(Default)]
pub struct SessionLog {
    entries: Mutex<Vec<Entry>>,
    quiet: bool,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that records entries without printing them.
    pub fn quiet() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            quiet: true,
        }
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        let entry = Entry {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level,
            message: message.into(),
        };
        debug!("[{}] {}", entry.level, entry.message);
        if !self.quiet {
            println!("{}", entry.console_line());
        }
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message)
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message)
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message)
    }

    pub fn comment(&self, message: impl Into<String>) {
        self.log(Level::Comment, message)
    }

    pub fn user(&self, message: impl Into<String>) {
        self.log(Level::User, message)
    }

    pub fn ok(&self, message: impl Into<String>) {
        self.log(Level::Ok, message)
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Write the session to `<dir>/OFFinstaller-[<timestamp>].txt` and return its path.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&self, runtime: &R, dir: &Path) -> Result<PathBuf> {
        runtime
            .create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

        let path = dir.join(format!(
            "OFFinstaller-[{}].txt",
            Local::now().format(FILENAME_TIMESTAMP_FORMAT)
        ));

        let mut contents = String::new();
        for entry in self.entries() {
            contents.push_str(&entry.file_line());
            contents.push('\n');
        }

        runtime
            .write(&path, contents.as_bytes())
            .with_context(|| format!("Failed to write log file {}", path.display()))?;
        Ok(path)
    }
}

/// Print a fatal error in the critical style. Used for errors that end the process.
pub fn print_fatal(error: &anyhow::Error) {
    let entry = Entry {
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        level: Level::Critical,
        message: format!("{:#}", error),
    };
    println!("{}", entry.console_line());
}

/// `1 file`, `2 files`.
pub fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::{always, eq};

    #[test]
    fn test_entries_are_recorded_in_order() {
        let log = SessionLog::quiet();
        log.comment("Starting");
        log.user("Picked 2");
        log.ok("Done");

        let levels: Vec<Level> = log.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![Level::Comment, Level::User, Level::Ok]);
        assert_eq!(log.entries()[1].message, "Picked 2");
    }

    #[test]
    fn test_file_line_is_tab_separated() {
        let entry = Entry {
            timestamp: "2026-01-02 03:04:05".into(),
            level: Level::Warn,
            message: "Launcher not detected".into(),
        };
        assert_eq!(
            entry.file_line(),
            "2026-01-02 03:04:05\tWARN\tLauncher not detected"
        );
    }

    #[test]
    fn test_save_writes_one_line_per_entry() {
        let log = SessionLog::quiet();
        log.comment("one");
        log.critical("two");

        let dir = PathBuf::from("/logs");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_dir_all()
            .with(eq(dir.clone()))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .with(always(), always())
            .times(1)
            .returning(|path, contents| {
                let name = path.file_name().unwrap().to_string_lossy().to_string();
                assert!(name.starts_with("OFFinstaller-["));
                assert!(name.ends_with("].txt"));
                let text = String::from_utf8(contents.to_vec()).unwrap();
                let lines: Vec<&str> = text.lines().collect();
                assert_eq!(lines.len(), 2);
                assert!(lines[0].ends_with("\tCOMMENT\tone"));
                assert!(lines[1].ends_with("\tCRITICAL\ttwo"));
                Ok(())
            });

        let path = log.save(&runtime, &dir).unwrap();
        assert!(path.starts_with("/logs"));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "file"), "1 file");
        assert_eq!(pluralize(0, "file"), "0 files");
        assert_eq!(pluralize(3, "version"), "3 versions");
    }
}
