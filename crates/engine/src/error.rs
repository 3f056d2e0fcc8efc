use std::fmt;
use std::path::PathBuf;

use sheetfit_core::RangeError;

/// Failure while turning text into a width.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementError {
    /// Family name has no known TrueType file mapping.
    UnknownFont { family: String },
    /// Mapping exists but the file is not in the font search path.
    FontFileMissing { family: String, path: PathBuf },
    /// File exists but could not be read or parsed.
    FontLoad { path: PathBuf, message: String },
}

impl fmt::Display for MeasurementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFont { family } => {
                write!(f, "unknown font '{family}': cannot map to a TrueType file")
            }
            Self::FontFileMissing { family, path } => {
                write!(f, "font '{family}': file not found at {}", path.display())
            }
            Self::FontLoad { path, message } => {
                write!(f, "cannot load font {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for MeasurementError {}

#[derive(Debug)]
pub enum LayoutError {
    Range(RangeError),
    /// Measuring a cell in `column` failed; no width was written for it.
    Measurement { column: String, source: MeasurementError },
    /// The worksheet model rejected a write.
    Worksheet(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(e) => write!(f, "{e}"),
            Self::Measurement { column, source } => {
                write!(f, "column {column}: {source}")
            }
            Self::Worksheet(msg) => write!(f, "worksheet error: {msg}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Range(e) => Some(e),
            Self::Measurement { source, .. } => Some(source),
            Self::Worksheet(_) => None,
        }
    }
}

impl From<RangeError> for LayoutError {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}
