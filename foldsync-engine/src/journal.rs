//! Timestamped action journal: stdout plus an append-only log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Appends `"<yyyy-MM-dd HH:mm:ss> - <message>"` lines to stdout and to a
/// log file.
///
/// Holds only the destination path; the file is opened in append mode for
/// each write. A failed append never propagates to the caller — it is
/// reported on stderr so a full disk cannot abort a mirroring pass.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one action line on stdout and in the log file.
    pub fn log(&self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{stamp} - {message}");
        println!("{line}");
        if let Err(err) = self.append(&line) {
            eprintln!(
                "foldsync: failed to append to {}: {err}",
                self.path.display()
            );
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn lines_are_appended_in_order_with_timestamp_prefix() {
        let dir = TempDir::new().expect("tempdir");
        let journal = Journal::new(dir.path().join("sync.log"));

        journal.log("first action");
        journal.log("second action");

        let content = fs::read_to_string(journal.path()).expect("read log");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        for (line, expected) in lines.iter().zip(["first action", "second action"]) {
            let (stamp, message) = line.split_once(" - ").expect("separator");
            NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").expect("timestamp");
            assert_eq!(message, expected);
        }
    }

    #[test]
    fn log_file_is_created_on_first_write() {
        let dir = TempDir::new().expect("tempdir");
        let journal = Journal::new(dir.path().join("fresh.log"));
        assert!(!journal.path().exists());

        journal.log("hello");
        assert!(journal.path().exists());
    }

    #[test]
    fn unwritable_destination_does_not_panic() {
        let dir = TempDir::new().expect("tempdir");
        // Parent directory missing: every append fails, log must swallow it.
        let journal = Journal::new(dir.path().join("no-such-dir").join("sync.log"));
        journal.log("dropped on the floor");
        assert!(!journal.path().exists());
    }
}
