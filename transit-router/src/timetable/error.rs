//! Timetable loading error types.

use std::path::PathBuf;

use crate::domain::ParseError;

/// Errors that abort a timetable load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The timetable file could not be opened
    #[error("cannot open timetable {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream itself is unreadable (header or I/O failure mid-file)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not present in the header row
    #[error("timetable is missing required column {column:?}")]
    MissingColumn { column: String },
}

/// Why a single timetable record was skipped.
///
/// These never abort a load; the loader logs them and counts the record.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RecordError {
    #[error("field {0:?} is empty")]
    EmptyField(&'static str),

    #[error("field {field:?}: {source}")]
    BadTime {
        field: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("field {field:?} is not a number: {value:?}")]
    BadNumber { field: &'static str, value: String },

    #[error("only one of latitude/longitude given for {0}")]
    IncompleteCoordinates(&'static str),

    #[error("malformed row: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LoadError::MissingColumn {
            column: "departure".into(),
        };
        assert_eq!(
            err.to_string(),
            "timetable is missing required column \"departure\""
        );

        let err = LoadError::Io {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot open timetable missing.csv: not found");

        let err = RecordError::EmptyField("line");
        assert_eq!(err.to_string(), "field \"line\" is empty");

        let err = RecordError::IncompleteCoordinates("source");
        assert_eq!(
            err.to_string(),
            "only one of latitude/longitude given for source"
        );
    }
}
