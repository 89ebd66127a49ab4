#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! End-to-end residency audit.
//!
//! Wires the pipeline together: read export files, extract points,
//! classify days against the national boundary, and score the audit
//! year. Also renders the results as text and writes the day ledger as
//! CSV.

pub mod export;
pub mod pipeline;
pub mod render;

use thiserror::Error;

/// Errors that abort an audit run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The national boundary could not be obtained; no day can be
    /// classified without it.
    #[error("Boundary unavailable: {0}")]
    BoundaryUnavailable(#[from] residency_boundary::BoundaryError),

    /// An input or output file could not be accessed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A manual correction was out of range.
    #[error("Invalid adjustment: {0}")]
    Adjustment(#[from] residency_audit::AdjustmentError),
}
