//! Loading timetable documents from disk.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::error::LoadError;
use super::parser::parse_timetable;
use super::schedule::Schedule;

/// Default timetable location, relative to the configuration directory.
pub const DEFAULT_CONFIG_PATH: &str = "custom_components/subway_timing/config/info.conf";

/// Resolves and reads timetable files relative to a base configuration
/// directory.
#[derive(Debug, Clone)]
pub struct TimetableSource {
    base_dir: PathBuf,
}

impl TimetableSource {
    /// Create a source rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base configuration directory that relative paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path: absolute paths are used as-is, relative
    /// ones are joined onto the base directory.
    ///
    /// ```
    /// use std::path::Path;
    /// use subway_timing::timetable::TimetableSource;
    ///
    /// let source = TimetableSource::new("/config");
    /// assert_eq!(source.resolve("info.conf"), Path::new("/config/info.conf"));
    /// assert_eq!(source.resolve("/etc/info.conf"), Path::new("/etc/info.conf"));
    /// ```
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Read a timetable file as UTF-8 text.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        let path = self.resolve(path);
        if !path.is_file() {
            return Err(LoadError::NotFound { path });
        }

        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        String::from_utf8(bytes).map_err(|_| LoadError::Decode { path })
    }

    /// Read and parse a timetable file.
    ///
    /// A file that parses to no stations is rejected so callers don't set
    /// up sensors that can never show anything.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Schedule, LoadError> {
        let text = self.read(&path)?;
        let schedule = parse_timetable(&text);

        if schedule.is_empty() {
            return Err(LoadError::NoStations {
                path: self.resolve(path),
            });
        }

        info!(
            path = %self.resolve(&path).display(),
            stations = schedule.station_count(),
            "loaded timetable"
        );
        Ok(schedule)
    }

    /// Like [`load`](Self::load), but logs the error and returns an empty
    /// schedule instead.
    pub fn load_or_empty(&self, path: impl AsRef<Path>) -> Schedule {
        match self.load(path) {
            Ok(schedule) => schedule,
            Err(e) => {
                error!(error = %e, "failed to load timetable");
                Schedule::new()
            }
        }
    }
}

impl Default for TimetableSource {
    fn default() -> Self {
        Self::new(".")
    }
}
