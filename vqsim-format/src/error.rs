//! Fatal, loader-level errors: a single `thiserror`-derived enum,
//! `#[from]` conversions for the underlying I/O / JSON errors, and a
//! crate-local `Result<T>` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("failed to read circuit file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse circuit JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported circuit file version {found:?} (expected \"1.0\")")]
    UnsupportedVersion { found: String },

    #[error("malformed angle expression {expr:?}: {reason}")]
    MalformedAngleExpression { expr: String, reason: String },

    #[error("malformed custom matrix for gate {label:?}: expected a 2x2 matrix of {{re, im}} pairs")]
    MalformedMatrix { label: String },

    #[error("cell at row {row}, column {col} has a span with start_row > end_row ({start} > {end})")]
    InvalidSpan {
        row: usize,
        col: usize,
        start: usize,
        end: usize,
    },

    #[error("circuit declares {declared_rows}x{declared_cols} but the grid array has {actual_rows} rows (row {bad_row} has {actual_cols} columns)")]
    GridShapeMismatch {
        declared_rows: usize,
        declared_cols: usize,
        actual_rows: usize,
        bad_row: usize,
        actual_cols: usize,
    },

    #[error(transparent)]
    Core(#[from] vqsim_core::CoreError),
}

pub type Result<T> = std::result::Result<T, FormatError>;
