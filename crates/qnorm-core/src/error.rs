use std::error::Error;
use std::fmt;
use std::io;

/// Errors raised while loading, validating or writing a feature grid.
///
/// `line` values are 1-based positions in the input file.
#[derive(Debug)]
pub enum GridError {
    Io(io::Error),
    Csv(csv::Error),
    MissingLabel { line: u64 },
    MissingQueryId { line: u64 },
    MissingDocno { line: u64 },
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },
    /// Row has a different number of feature fields than the first row declared.
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    Allocation {
        what: &'static str,
        requested: usize,
    },
    InvalidGroups(String),
    /// Fitted extrema and matrix disagree on the number of feature columns.
    WidthMismatch {
        expected: usize,
        found: usize,
    },
    ShapeMismatch {
        metadata_rows: usize,
        feature_rows: usize,
    },
    InvalidConfig(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::Io(e) => write!(f, "I/O error: {}", e),
            GridError::Csv(e) => write!(f, "Failed to read record: {}", e),
            GridError::MissingLabel { line } => write!(f, "Missing label at line {}", line),
            GridError::MissingQueryId { line } => {
                write!(f, "Missing query id at line {}", line)
            }
            GridError::MissingDocno { line } => write!(f, "Missing docno at line {}", line),
            GridError::InvalidNumber { line, column, value } => write!(
                f,
                "Invalid numeric value '{}' in column {} at line {}",
                value,
                column + 1,
                line
            ),
            GridError::MalformedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "Malformed row at line {}: expected {} feature fields, found {}",
                line, expected, found
            ),
            GridError::Allocation { what, requested } => write!(
                f,
                "Failed to allocate {} ({} elements)",
                what, requested
            ),
            GridError::InvalidGroups(msg) => write!(f, "Invalid group ranges: {}", msg),
            GridError::WidthMismatch { expected, found } => write!(
                f,
                "Extrema cover {} feature columns but the matrix has {}",
                found, expected
            ),
            GridError::ShapeMismatch {
                metadata_rows,
                feature_rows,
            } => write!(
                f,
                "Metadata has {} rows but feature matrix has {}",
                metadata_rows, feature_rows
            ),
            GridError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GridError::Io(e) => Some(e),
            GridError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GridError {
    fn from(e: io::Error) -> Self {
        GridError::Io(e)
    }
}

impl From<csv::Error> for GridError {
    fn from(e: csv::Error) -> Self {
        GridError::Csv(e)
    }
}
