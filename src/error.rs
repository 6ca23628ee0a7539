//! # Record Errors
//!
//! Every fallible operation in rowdef returns `eyre::Result`. When the failure
//! belongs to one of the four categories callers routinely branch on, the
//! report carries a [`RowError`] payload raised through `bail!`, so it can be
//! recovered with `downcast_ref` even after context has been attached:
//!
//! ```ignore
//! match report.downcast_ref::<RowError>().map(RowError::kind) {
//!     Some(ErrorKind::Format) => skip_line(),
//!     Some(ErrorKind::Schema) => abort(),
//!     _ => return Err(report),
//! }
//! ```
//!
//! | Kind    | Raised when                                              |
//! |---------|----------------------------------------------------------|
//! | Schema  | unknown, duplicate or missing column; type or kind mismatch |
//! | Format  | token parse failure, token count, truncated binary input |
//! | Range   | setter value exceeds the declared SQL width              |
//! | Backend | underlying I/O or SQLite failure                         |

use std::fmt;

/// Coarse category of a [`RowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Schema,
    Format,
    Range,
    Backend,
}

#[derive(Debug)]
pub enum RowError {
    UnknownColumn {
        kind: String,
        column: String,
    },
    DuplicateColumn {
        kind: String,
        column: String,
    },
    MissingMandatoryColumn {
        kind: String,
        column: String,
    },
    /// A value, sentinel or SQL type does not match the column's field type.
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
    KindMismatch {
        expected: String,
        actual: String,
    },
    InvalidDefinition {
        kind: String,
        reason: String,
    },
    ValueCount {
        kind: String,
        expected: usize,
        actual: usize,
    },
    InvalidToken {
        column: String,
        token: String,
        expected: &'static str,
    },
    TokenCount {
        expected: usize,
        actual: usize,
    },
    Truncated {
        needed: usize,
        available: usize,
    },
    UnexpectedEof {
        column: String,
    },
    BufferTooSmall {
        needed: usize,
        available: usize,
    },
    TextTooLong {
        column: String,
        length: usize,
        limit: usize,
    },
    InvalidUtf8 {
        column: String,
    },
    /// Text that no quote mark can protect from the whitespace tokenizer.
    Unquotable {
        column: String,
        value: String,
    },
    OutOfRange {
        column: String,
        value: String,
        bound: String,
    },
    Io {
        source: std::io::Error,
    },
    Sql {
        sql: String,
        source: rusqlite::Error,
    },
    ColumnRead {
        column: String,
        position: usize,
        source: rusqlite::Error,
    },
}

impl RowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowError::UnknownColumn { .. }
            | RowError::DuplicateColumn { .. }
            | RowError::MissingMandatoryColumn { .. }
            | RowError::TypeMismatch { .. }
            | RowError::KindMismatch { .. }
            | RowError::InvalidDefinition { .. }
            | RowError::ValueCount { .. } => ErrorKind::Schema,
            RowError::InvalidToken { .. }
            | RowError::TokenCount { .. }
            | RowError::Truncated { .. }
            | RowError::UnexpectedEof { .. }
            | RowError::BufferTooSmall { .. }
            | RowError::TextTooLong { .. }
            | RowError::InvalidUtf8 { .. }
            | RowError::Unquotable { .. } => ErrorKind::Format,
            RowError::OutOfRange { .. } => ErrorKind::Range,
            RowError::Io { .. } | RowError::Sql { .. } | RowError::ColumnRead { .. } => {
                ErrorKind::Backend
            }
        }
    }

    pub(crate) fn sql(sql: impl Into<String>, source: rusqlite::Error) -> Self {
        RowError::Sql {
            sql: sql.into(),
            source,
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::UnknownColumn { kind, column } => {
                write!(f, "'{}' is not a column of {}", column, kind)
            }
            RowError::DuplicateColumn { kind, column } => {
                write!(f, "column '{}' appears more than once in {}", column, kind)
            }
            RowError::MissingMandatoryColumn { kind, column } => {
                write!(f, "mandatory column '{}' of {} is missing", column, kind)
            }
            RowError::TypeMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column '{}' expects {} but was given {}",
                column, expected, actual
            ),
            RowError::KindMismatch { expected, actual } => {
                write!(f, "expected a {} record but found {}", expected, actual)
            }
            RowError::InvalidDefinition { kind, reason } => {
                write!(f, "invalid definition of {}: {}", kind, reason)
            }
            RowError::ValueCount {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} columns but {} values were supplied",
                kind, expected, actual
            ),
            RowError::InvalidToken {
                column,
                token,
                expected,
            } => write!(
                f,
                "cannot parse '{}' as {} for column '{}'",
                token, expected, column
            ),
            RowError::TokenCount { expected, actual } => write!(
                f,
                "expected {} tokens but found {}",
                expected, actual
            ),
            RowError::Truncated { needed, available } => write!(
                f,
                "binary input truncated: needed {} bytes but only {} available",
                needed, available
            ),
            RowError::UnexpectedEof { column } => {
                write!(f, "binary stream ended inside column '{}'", column)
            }
            RowError::BufferTooSmall { needed, available } => write!(
                f,
                "output buffer too small: needed {} bytes but only {} available",
                needed, available
            ),
            RowError::TextTooLong {
                column,
                length,
                limit,
            } => write!(
                f,
                "text length {} for column '{}' exceeds limit {}",
                length, column, limit
            ),
            RowError::InvalidUtf8 { column } => {
                write!(f, "column '{}' holds invalid UTF-8", column)
            }
            RowError::Unquotable { column, value } => write!(
                f,
                "text {:?} for column '{}' cannot be quoted for whitespace-delimited output",
                value, column
            ),
            RowError::OutOfRange {
                column,
                value,
                bound,
            } => write!(
                f,
                "value {} for column '{}' is out of range ({})",
                value, column, bound
            ),
            RowError::Io { source } => write!(f, "i/o failure: {}", source),
            RowError::Sql { sql, source } => write!(f, "{}\n{}", source, sql),
            RowError::ColumnRead {
                column,
                position,
                source,
            } => write!(
                f,
                "cannot read column '{}' at result position {}: {}",
                column, position, source
            ),
        }
    }
}

impl std::error::Error for RowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RowError::Io { source } => Some(source),
            RowError::Sql { source, .. } => Some(source),
            RowError::ColumnRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RowError {
    fn from(source: std::io::Error) -> Self {
        RowError::Io { source }
    }
}

/// Returns the [`ErrorKind`] of a report if it carries a [`RowError`].
pub fn error_kind(report: &eyre::Report) -> Option<ErrorKind> {
    report.downcast_ref::<RowError>().map(RowError::kind)
}
