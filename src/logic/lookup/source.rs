//! Artifact Sources - where lookup tables come from
//!
//! Blocking fetch with a per-attempt timeout and a bounded number of retries.
//! Exhausting the attempts is fatal for the caller.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::GOOGLE_DRIVE_BASE_URL;
use crate::logic::error::PredictorError;

// ============================================================================
// FETCH POLICY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Per-attempt timeout (seconds)
    pub timeout_secs: u64,
    /// Total attempts before giving up
    pub max_attempts: u32,
    /// Pause between attempts (milliseconds), doubled each retry
    pub backoff_ms: u64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: 3,
            backoff_ms: 500,
        }
    }
}

impl FetchPolicy {
    /// Single attempt, no waiting
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
            ..Default::default()
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(6);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

// ============================================================================
// ARTIFACT SOURCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum ArtifactSource {
    File(PathBuf),
    Url(String),
}

impl ArtifactSource {
    /// Google Drive file addressed by its stable file id
    pub fn google_drive(file_id: &str) -> Self {
        ArtifactSource::Url(format!("{}{}", GOOGLE_DRIVE_BASE_URL, file_id))
    }

    /// Fetch the raw bytes, retrying per `policy`
    pub fn fetch(&self, policy: &FetchPolicy) -> Result<Vec<u8>, PredictorError> {
        let attempts = policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.fetch_once(policy) {
                Ok(bytes) => {
                    log::debug!("Fetched {} ({} bytes, attempt {})", self, bytes.len(), attempt);
                    return Ok(bytes);
                }
                Err(e) => {
                    log::warn!("Fetch {} failed (attempt {}/{}): {}", self, attempt, attempts, e);
                    last_error = e;
                    if attempt < attempts {
                        std::thread::sleep(policy.backoff(attempt));
                    }
                }
            }
        }

        Err(PredictorError::LookupUnavailable(format!(
            "{} unreachable after {} attempts: {}",
            self, attempts, last_error
        )))
    }

    fn fetch_once(&self, policy: &FetchPolicy) -> Result<Vec<u8>, String> {
        match self {
            ArtifactSource::File(path) => std::fs::read(path).map_err(|e| e.to_string()),
            ArtifactSource::Url(url) => {
                let response = ureq::get(url)
                    .timeout(Duration::from_secs(policy.timeout_secs))
                    .call()
                    .map_err(|e| e.to_string())?;

                let mut bytes = Vec::new();
                std::io::Read::read_to_end(&mut response.into_reader(), &mut bytes)
                    .map_err(|e| e.to_string())?;
                Ok(bytes)
            }
        }
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::File(path) => write!(f, "file:{}", path.display()),
            ArtifactSource::Url(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_google_drive_url() {
        let source = ArtifactSource::google_drive("abc123");
        assert_eq!(
            source,
            ArtifactSource::Url("https://drive.google.com/uc?id=abc123".to_string())
        );
    }

    #[test]
    fn test_fetch_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "dest,dest_cluster\nATL,2\n").unwrap();

        let bytes = ArtifactSource::File(file.path().to_path_buf())
            .fetch(&FetchPolicy::once())
            .unwrap();
        assert!(bytes.starts_with(b"dest,dest_cluster"));
    }

    #[test]
    fn test_missing_file_exhausts_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let policy = FetchPolicy {
            max_attempts: 2,
            backoff_ms: 1,
            ..Default::default()
        };

        let result = ArtifactSource::File(dir.path().join("missing.csv")).fetch(&policy);
        match result {
            Err(PredictorError::LookupUnavailable(msg)) => assert!(msg.contains("2 attempts")),
            other => panic!("expected LookupUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = FetchPolicy { backoff_ms: 100, ..Default::default() };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
    }
}
