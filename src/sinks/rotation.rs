//! Rotation policy and the numbered backup chain
//!
//! `app.log` is always the live file. Rotation shifts `app.log.1` (newest
//! backup) towards `app.log.<max_files - 1>` (oldest) and deletes anything
//! that would fall past the cap.

use crate::core::error::{LoggerError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// When a file sink rolls over and how many files it keeps
///
/// `max_files` counts the live file, so `max_files: 2` keeps the current file
/// plus `.1`.
///
/// # Examples
///
/// ```
/// use interlaced_logger::RotationPolicy;
/// use std::time::Duration;
///
/// // Roll over at 10 MB, keep the live file and four backups
/// let by_size = RotationPolicy::BySize { max_bytes: 10 * 1024 * 1024, max_files: 5 };
///
/// // Roll over every hour, keep one backup
/// let by_time = RotationPolicy::ByInterval { interval: Duration::from_secs(3600), max_files: 2 };
///
/// assert!(by_size.validate().is_ok());
/// assert_eq!(by_time.max_files(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RotationPolicy {
    /// Never rotate; the file grows unbounded
    #[default]
    None,

    /// Rotate after a write brings the file to `max_bytes` or more
    BySize { max_bytes: u64, max_files: usize },

    /// Rotate before the first write once `interval` has elapsed
    ByInterval { interval: Duration, max_files: usize },
}

impl RotationPolicy {
    #[must_use]
    pub fn by_size(max_bytes: u64, max_files: usize) -> Self {
        RotationPolicy::BySize { max_bytes, max_files }
    }

    #[must_use]
    pub fn by_interval(interval: Duration, max_files: usize) -> Self {
        RotationPolicy::ByInterval { interval, max_files }
    }

    /// Reject zero sizes, zero intervals and a zero file count
    pub fn validate(&self) -> Result<()> {
        match self {
            RotationPolicy::None => Ok(()),
            RotationPolicy::BySize { max_bytes, max_files } => {
                if *max_bytes == 0 {
                    return Err(LoggerError::config("rotation", "max_bytes must be greater than zero"));
                }
                validate_max_files(*max_files)
            }
            RotationPolicy::ByInterval { interval, max_files } => {
                if interval.is_zero() {
                    return Err(LoggerError::config("rotation", "interval must be greater than zero"));
                }
                validate_max_files(*max_files)
            }
        }
    }

    /// Number of files retained, live file included
    #[must_use]
    pub fn max_files(&self) -> Option<usize> {
        match self {
            RotationPolicy::None => None,
            RotationPolicy::BySize { max_files, .. }
            | RotationPolicy::ByInterval { max_files, .. } => Some(*max_files),
        }
    }

    /// Interval-based check, consulted before a write
    pub(crate) fn due_before_write(&self, last_rotation: Instant) -> bool {
        match self {
            RotationPolicy::ByInterval { interval, .. } => last_rotation.elapsed() >= *interval,
            _ => false,
        }
    }

    /// Size-based check, consulted after a write
    pub(crate) fn due_after_write(&self, bytes_written: u64) -> bool {
        match self {
            RotationPolicy::BySize { max_bytes, .. } => bytes_written >= *max_bytes,
            _ => false,
        }
    }
}

fn validate_max_files(max_files: usize) -> Result<()> {
    if max_files == 0 {
        Err(LoggerError::config("rotation", "max_files must be at least 1"))
    } else {
        Ok(())
    }
}

/// `<path>.<index>`
pub fn backup_path(base: &Path, index: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoggerError::file_rotation(
            path.display().to_string(),
            format!("Failed to remove old backup: {}", e),
        )),
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoggerError::file_rotation(
            from.display().to_string(),
            format!("Failed to rename to '{}': {}", to.display(), e),
        )),
    }
}

/// Shift the backup chain and move the live file to `.1`
///
/// The live file must already be closed. With `max_files == 1` there are no
/// backups and the live file is deleted instead.
pub(crate) fn shift_backups(base: &Path, max_files: usize) -> Result<()> {
    if max_files <= 1 {
        return remove_if_exists(base);
    }

    let oldest = max_files - 1;
    remove_if_exists(&backup_path(base, oldest))?;

    for index in (1..oldest).rev() {
        rename_if_exists(&backup_path(base, index), &backup_path(base, index + 1))?;
    }

    rename_if_exists(base, &backup_path(base, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate() {
        assert!(RotationPolicy::None.validate().is_ok());
        assert!(RotationPolicy::by_size(1, 1).validate().is_ok());

        let err = RotationPolicy::by_size(0, 2).validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(RotationPolicy::by_size(100, 0).validate().is_err());
        assert!(RotationPolicy::by_interval(Duration::ZERO, 2).validate().is_err());
        assert!(RotationPolicy::by_interval(Duration::from_secs(1), 0).validate().is_err());
    }

    #[test]
    fn test_due_checks() {
        let size = RotationPolicy::by_size(100, 2);
        assert!(!size.due_after_write(99));
        assert!(size.due_after_write(100));
        assert!(!size.due_before_write(Instant::now()));

        let hourly = RotationPolicy::by_interval(Duration::from_secs(3600), 2);
        assert!(!hourly.due_before_write(Instant::now()));
        assert!(!hourly.due_after_write(u64::MAX));

        assert!(!RotationPolicy::None.due_after_write(u64::MAX));
    }

    #[test]
    fn test_backup_path() {
        let path = backup_path(Path::new("/var/log/app.log"), 3);
        assert_eq!(path, PathBuf::from("/var/log/app.log.3"));
    }

    #[test]
    fn test_shift_keeps_cap() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");

        fs::write(&base, "current").unwrap();
        fs::write(backup_path(&base, 1), "one").unwrap();
        fs::write(backup_path(&base, 2), "two").unwrap();

        shift_backups(&base, 3).unwrap();

        assert!(!base.exists());
        assert_eq!(fs::read_to_string(backup_path(&base, 1)).unwrap(), "current");
        assert_eq!(fs::read_to_string(backup_path(&base, 2)).unwrap(), "one");
        assert!(!backup_path(&base, 3).exists());
    }

    #[test]
    fn test_shift_single_file_discards_current() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        fs::write(&base, "current").unwrap();

        shift_backups(&base, 1).unwrap();

        assert!(!base.exists());
        assert!(!backup_path(&base, 1).exists());
    }

    #[test]
    fn test_shift_with_missing_backups() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        fs::write(&base, "current").unwrap();

        shift_backups(&base, 5).unwrap();

        assert_eq!(fs::read_to_string(backup_path(&base, 1)).unwrap(), "current");
    }
}
