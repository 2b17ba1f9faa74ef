//! Log file resolution and appending

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::level::LogMode;
use crate::error::Result;

/// File name used by [`LogMode::SingleFile`]
pub const SINGLE_FILE_NAME: &str = "log.txt";

/// Resolve (creating if absent) the file a session should log to.
///
/// Returns `None` for [`LogMode::ConsoleOnly`]; nothing is created then.
pub fn resolve_log_file(mode: LogMode, log_dir: &Path, now: DateTime<Local>) -> Result<Option<PathBuf>> {
    let name = match mode {
        LogMode::SingleFile => SINGLE_FILE_NAME.to_string(),
        LogMode::NewFile => session_file_name(now),
        LogMode::ConsoleOnly => return Ok(None),
    };
    let path = log_dir.join(name);
    ensure_file(&path)?;
    Ok(Some(path))
}

/// Timestamped name for a per-session file, e.g. `2026-10-18T09-30-log.txt`
pub fn session_file_name(now: DateTime<Local>) -> String {
    format!("{}-log.txt", now.format("%Y-%m-%dT%H-%M"))
}

fn ensure_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

/// Append lines to a file in one batch, one per line
pub fn append_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut buf = String::new();
    for line in lines {
        buf.push_str(line.as_ref());
        buf.push('\n');
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buf.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_single_file_is_created() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        let path = resolve_log_file(LogMode::SingleFile, &dir, Local::now()).unwrap().unwrap();
        assert_eq!(path, dir.join("log.txt"));
        assert!(path.exists());
    }

    #[test]
    fn test_single_file_resolution_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let first = resolve_log_file(LogMode::SingleFile, temp.path(), Local::now()).unwrap().unwrap();
        append_lines(&first, &["kept"]).unwrap();
        let second = resolve_log_file(LogMode::SingleFile, temp.path(), Local::now()).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(second).unwrap(), "kept\n");
    }

    #[test]
    fn test_session_file_name() {
        let now = Local.with_ymd_and_hms(2026, 10, 18, 9, 5, 42).unwrap();
        assert_eq!(session_file_name(now), "2026-10-18T09-05-log.txt");
    }

    #[test]
    fn test_new_file_mode_creates_timestamped_file() {
        let temp = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let path = resolve_log_file(LogMode::NewFile, temp.path(), now).unwrap().unwrap();
        assert_eq!(path, temp.path().join("2026-01-02T03-04-log.txt"));
        assert!(path.exists());
    }

    #[test]
    fn test_console_only_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        let path = resolve_log_file(LogMode::ConsoleOnly, &dir, Local::now()).unwrap();
        assert!(path.is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn test_append_lines_batches() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.txt");
        append_lines(&path, &["one", "two"]).unwrap();
        append_lines(&path, &["three".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
    }

    #[test]
    fn test_append_nothing_does_not_create() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("never.txt");
        append_lines::<&str>(&path, &[]).unwrap();
        assert!(!path.exists());
    }
}
