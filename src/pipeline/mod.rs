//! Crawl-job pipeline
//!
//! The temporal core of the crate: polling a submitted job to a terminal
//! state under a deadline, materializing its content into staged blobs,
//! uploading them with partial-failure accounting, and assembling the final
//! report. The supervisor is the single entry point the tool-calling layer
//! drives.

mod cancel;
mod materializer;
mod poller;
mod slug;
mod supervisor;
mod uploader;

pub use cancel::CancelFlag;
pub use materializer::{materialize, Blob, TEXT_BLOB_NAME};
pub use poller::{poll_until_terminal, PollConfig, PollOutcome};
pub use supervisor::{CancelAck, Supervisor};
pub use uploader::{upload_batch, CrawlReport, UploadOutcome};
