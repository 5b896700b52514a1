//! Timetable loading and parsing errors.

use std::path::PathBuf;

/// A structural error that stops the parse.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A direction line appeared before any station line.
    #[error("line {line}: direction before any station")]
    NoOpenStation { line: usize },

    /// A weekday-set line appeared while the open direction doesn't exist
    /// under the open station.
    #[error("line {line}: weekday set before any direction")]
    NoOpenDirection { line: usize },

    /// An hour row appeared while the open weekday set doesn't exist under
    /// the open station and direction.
    #[error("line {line}: hour row before any weekday set")]
    NoOpenWeekdaySet { line: usize },
}

/// Errors from loading a timetable file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The resolved path is not a regular file.
    #[error("timetable file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading the file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("timetable file is not valid UTF-8: {}", path.display())]
    Decode { path: PathBuf },

    /// The file parsed but contains no stations.
    #[error("no stations found in {}", path.display())]
    NoStations { path: PathBuf },
}

impl LoadError {
    /// Short machine-readable reason, suitable for a setup form.
    pub fn reason(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "file_not_found",
            LoadError::Io { .. } | LoadError::Decode { .. } => "parse_error",
            LoadError::NoStations { .. } => "no_stations_found",
        }
    }
}
