//! Object store client
//!
//! This module handles the destination side of the pipeline:
//! - Parsing and validating `s3://bucket/prefix` destination URIs
//! - The `ObjectStore` trait the upload aggregator writes through
//! - An HTTP binding for S3-compatible stores

mod http;
mod traits;
mod uri;

pub use http::HttpObjectStore;
pub use traits::ObjectStore;
pub use uri::StoreUri;
