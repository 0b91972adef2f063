//! Content materializer
//!
//! Turns a completed job's content into named blobs staged on local disk,
//! ready for upload. Materialization performs no network I/O toward the
//! destination; its only failure modes are propagated content-fetch or
//! staging-IO errors.

use crate::job::JobContent;
use crate::pipeline::slug::unique_slugs;
use crate::NethaulError;
use std::path::{Path, PathBuf};

/// Fixed blob name for text-extraction jobs
pub const TEXT_BLOB_NAME: &str = "extracted_text.txt";

/// A staged byte payload awaiting upload
#[derive(Debug, Clone)]
pub struct Blob {
    /// Object-safe name, unique within the job's upload set
    pub name: String,

    /// Location of the staged bytes
    pub path: PathBuf,
}

/// Stages a job's content as named blobs under `staging_dir`
///
/// Page-crawl content yields one `<slug>.html` blob per page with the raw
/// payload written unmodified; text-extraction content yields exactly one
/// fixed-name blob. The staging directory is owned by the caller and is
/// expected to be released unconditionally once the upload batch finishes.
pub fn materialize(
    job_id: &str,
    content: &JobContent,
    staging_dir: &Path,
) -> Result<Vec<Blob>, NethaulError> {
    let stage = |name: String, payload: &str| -> Result<Blob, NethaulError> {
        let path = staging_dir.join(&name);
        std::fs::write(&path, payload).map_err(|e| NethaulError::MaterializationFailed {
            job_id: job_id.to_string(),
            message: format!("failed to stage {}: {}", name, e),
        })?;
        Ok(Blob { name, path })
    };

    match content {
        JobContent::Pages(pages) => {
            let slugs = unique_slugs(pages.iter().map(|p| p.url.as_str()));
            let blobs = pages
                .iter()
                .zip(slugs)
                .map(|(page, slug)| stage(format!("{}.html", slug), &page.content))
                .collect::<Result<Vec<_>, _>>()?;

            tracing::info!("Staged {} pages for job {}", blobs.len(), job_id);
            Ok(blobs)
        }
        JobContent::Text(text) => {
            let blob = stage(TEXT_BLOB_NAME.to_string(), text)?;
            tracing::info!("Staged extracted text for job {}", job_id);
            Ok(vec![blob])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::PageResult;

    fn page(url: &str, content: &str) -> PageResult {
        PageResult {
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_materialize_pages_one_blob_each() {
        let staging = tempfile::tempdir().unwrap();
        let content = JobContent::Pages(vec![
            page("https://example.com/", "<html>root</html>"),
            page("https://example.com/page1", "<html>one</html>"),
            page("https://example.com/page2", "<html>two</html>"),
        ]);

        let blobs = materialize("job-1", &content, staging.path()).unwrap();

        assert_eq!(blobs.len(), 3);
        for blob in &blobs {
            assert!(blob.name.ends_with(".html"));
            assert!(blob.path.exists());
        }

        // Payload is written byte-for-byte
        let first = std::fs::read_to_string(&blobs[0].path).unwrap();
        assert_eq!(first, "<html>root</html>");
    }

    #[test]
    fn test_materialize_text_single_fixed_blob() {
        let staging = tempfile::tempdir().unwrap();
        let content = JobContent::Text("the full extract".to_string());

        let blobs = materialize("job-2", &content, staging.path()).unwrap();

        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].name, TEXT_BLOB_NAME);
        let text = std::fs::read_to_string(&blobs[0].path).unwrap();
        assert_eq!(text, "the full extract");
    }

    #[test]
    fn test_materialize_colliding_urls_stage_distinct_files() {
        let staging = tempfile::tempdir().unwrap();
        let content = JobContent::Pages(vec![
            page("https://example.com/a?b", "<html>query</html>"),
            page("https://example.com/a#b", "<html>fragment</html>"),
        ]);

        let blobs = materialize("job-3", &content, staging.path()).unwrap();

        assert_eq!(blobs.len(), 2);
        assert_ne!(blobs[0].name, blobs[1].name);
        assert_ne!(
            std::fs::read_to_string(&blobs[0].path).unwrap(),
            std::fs::read_to_string(&blobs[1].path).unwrap()
        );
    }

    #[test]
    fn test_materialize_bad_staging_dir_fails() {
        let content = JobContent::Text("x".to_string());
        let err = materialize("job-4", &content, Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, NethaulError::MaterializationFailed { .. }));
    }
}
