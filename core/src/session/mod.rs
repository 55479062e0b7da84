//! Pure session state behind the viewer.
//!
//! Each submodule owns exactly one piece of mutable state: the scan
//! workflow, the saved-result browser, the bulk-delete selection and the
//! notification banner. All mutations are synchronous; asynchronous
//! settlements hand back a token so that superseded responses and expired
//! timers can be recognized and discarded.

pub mod analysis;
pub mod database;
pub mod notice;
pub mod selection;

pub use analysis::AnalysisSession;
pub use database::DatabaseSession;
pub use notice::{Notice, NoticeBoard, Severity, NOTICE_TTL};
pub use selection::SelectionSet;
