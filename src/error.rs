//! Typed failure taxonomy for configuration, row shape, and cell conversion.
//!
//! Scan-level orchestration wraps these in `anyhow` chains that add row and
//! column context; callers that need to branch on the category can downcast.

use thiserror::Error;

use crate::kind::TypeMask;

/// Invalid or contradictory scan configuration. Raised before any row is
/// consumed and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("data start row {data_start} must come strictly after header row {header}")]
    DataStartNotAfterHeader { header: usize, data_start: usize },
    #[error("row source was exhausted before yielding any rows; no columns to describe")]
    NoColumns,
}

/// Row width inconsistency. Aborts the scan in progress; no partial
/// descriptor list is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("row supplies {found} cell(s) but the table established {expected} column(s)")]
    RowWidth { expected: usize, found: usize },
    #[error("header row names {headers} column(s) but the first data row has {columns}")]
    HeaderWidth { headers: usize, columns: usize },
}

/// A cell failed to convert under a caller-supplied restricted mask. Local to
/// one conversion call; the unconstrained path cannot raise this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{text}' does not convert to any kind in {allowed}")]
pub struct ConversionError {
    pub text: String,
    pub allowed: TypeMask,
}
