//! Per-entry predicates: name, age and size.
//!
//! Each predicate reads what it needs at call time; nothing is cached between
//! calls so an entry's attributes are as fresh as the moment it is judged.

use glob::Pattern;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::params::TimestampKind;

/// The three timestamps of an entry, in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamps {
    pub accessed: f64,
    pub modified: f64,
    pub changed: f64,
}

impl Timestamps {
    #[cfg(unix)]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        let secs = |s: i64, ns: i64| s as f64 + ns as f64 / 1e9;
        Timestamps {
            accessed: secs(metadata.atime(), metadata.atime_nsec()),
            modified: secs(metadata.mtime(), metadata.mtime_nsec()),
            changed: secs(metadata.ctime(), metadata.ctime_nsec()),
        }
    }

    // No status change time off Unix; creation time is the closest stand-in.
    #[cfg(not(unix))]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        let secs = |t: io::Result<SystemTime>| t.map(epoch_seconds).unwrap_or(0.0);
        Timestamps {
            accessed: secs(metadata.accessed()),
            modified: secs(metadata.modified()),
            changed: secs(metadata.created()),
        }
    }

    pub fn get(&self, kind: TimestampKind) -> f64 {
        match kind {
            TimestampKind::Access => self.accessed,
            TimestampKind::Modify => self.modified,
            TimestampKind::Change => self.changed,
        }
    }
}

/// Read all timestamps of `path`, following symlinks.
pub fn read_timestamps(path: &Path) -> io::Result<Timestamps> {
    fs::metadata(path).map(|m| Timestamps::from_metadata(&m))
}

fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// True when no patterns are given or `name` matches at least one of them.
pub fn name_matches(name: &str, patterns: Option<&[Pattern]>) -> bool {
    match patterns {
        None | Some([]) => true,
        Some(patterns) => patterns.iter().any(|p| p.matches(name)),
    }
}

/// True when the age filter is off or the selected timestamp of `path` is at
/// least `age_seconds` in the past.
pub fn age_matches(path: &Path, age_seconds: u64, kind: TimestampKind) -> bool {
    if age_seconds == 0 {
        return true;
    }

    match read_timestamps(path) {
        Ok(timestamps) => {
            let now = epoch_seconds(SystemTime::now());
            now - timestamps.get(kind) >= age_seconds as f64
        }
        Err(err) => {
            log::debug!("Cannot read timestamps of {}: {}", path.display(), err);
            false
        }
    }
}

/// True when the size filter is off or `path` is at least `size_bytes` long.
pub fn size_matches(path: &Path, size_bytes: u64) -> bool {
    if size_bytes == 0 {
        return true;
    }

    match fs::metadata(path) {
        Ok(metadata) => metadata.len() >= size_bytes,
        Err(err) => {
            log::debug!("Cannot read size of {}: {}", path.display(), err);
            false
        }
    }
}
