//! Client-side core for the Scanomaly MRI tumor-classification viewer.
//!
//! The modules hold the wire records exchanged with the prediction and
//! persistence services, and the pure session state machines behind the GUI:
//! the current analysis, the saved-result browser, the bulk-delete selection
//! and the transient notification banner. Everything here is toolkit-free so
//! the request-lifecycle guards can be tested without a running event loop.

pub mod records;
pub mod session;

pub use records::{PersistedResult, Prediction};
pub use session::{AnalysisSession, DatabaseSession, NoticeBoard, SelectionSet};

use serde::{Deserialize, Serialize};

/// Which top-level workflow the viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Scan,
    Database,
}

/// Failure raised by one backend exchange.
///
/// Each operation maps to its own variant so the viewer can phrase the
/// notification per operation. Every failure is terminal for that request;
/// the session it belongs to stays re-attemptable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("prediction request failed: {0}")]
    Prediction(String),
    #[error("save request failed: {0}")]
    Save(String),
    #[error("fetch request failed: {0}")]
    Fetch(String),
    #[error("delete request failed: {0}")]
    Delete(String),
}

impl ApiError {
    /// Short user-facing message for the notification banner.
    pub fn notice(&self) -> &'static str {
        match self {
            ApiError::Prediction(_) => "Prediction error",
            ApiError::Save(_) => "Saving error",
            ApiError::Fetch(_) => "Error fetching results",
            ApiError::Delete(_) => "Delete error",
        }
    }
}
