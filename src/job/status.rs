//! Job status state machine

use serde::{Deserialize, Serialize};

/// Lifecycle state of a crawl or text-extraction job
///
/// `Pending` and `Running` may alternate while the provider is still
/// enumerating work. The remaining four states are terminal: once one of
/// them is reached the job never transitions again and polling stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
}

impl JobStatus {
    /// Returns whether this status is terminal
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled | JobStatus::TimedOut
        )
    }

    /// Parses a provider status string into a `JobStatus`
    ///
    /// Providers report a handful of spellings for the non-terminal states
    /// ("scraping", "active", "queued", ...). Anything unrecognized is
    /// treated as `Pending` so an unexpected string never ends a poll loop
    /// early; the deadline remains the only bound in that case.
    pub fn parse_provider(status: &str) -> Self {
        match status {
            "pending" | "queued" | "waiting" => JobStatus::Pending,
            "running" | "scraping" | "active" | "processing" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" | "error" => JobStatus::Failed,
            "cancelled" | "canceled" => JobStatus::Cancelled,
            other => {
                tracing::warn!("Unrecognized provider status '{}', treating as pending", other);
                JobStatus::Pending
            }
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::TimedOut => "timed_out",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::TimedOut.is_terminal());
    }

    #[test]
    fn test_parse_provider_spellings() {
        assert_eq!(JobStatus::parse_provider("scraping"), JobStatus::Running);
        assert_eq!(JobStatus::parse_provider("queued"), JobStatus::Pending);
        assert_eq!(JobStatus::parse_provider("completed"), JobStatus::Completed);
        assert_eq!(JobStatus::parse_provider("canceled"), JobStatus::Cancelled);
        assert_eq!(JobStatus::parse_provider("error"), JobStatus::Failed);
    }

    #[test]
    fn test_parse_provider_unknown_is_pending() {
        // An unknown status must stay non-terminal so only the deadline
        // bounds the poll loop.
        assert_eq!(JobStatus::parse_provider("warming-up"), JobStatus::Pending);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(JobStatus::TimedOut.to_string(), "timed_out");
        assert_eq!(JobStatus::Completed.to_string(), "completed");
    }
}
