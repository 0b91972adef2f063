//! Job data model
//!
//! Types describing a single unit of provider-tracked work: the job kinds,
//! the status state machine, and the immutable job handle returned at
//! submission time.

mod status;
mod types;

pub use status::JobStatus;
pub use types::{CrawlJob, JobContent, JobKind, PageResult, StatusSnapshot};
