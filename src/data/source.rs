//! Model acquisition
//!
//! The exported model is fetched once and cached at a local path. Two remote
//! variants exist: a Google Drive file id and a plain HTTP URL.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::with_retry;
use crate::{FetchConfig, Result, ScoreError};

/// Where the model file comes from when it is not on disk yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSource {
    /// Google Drive shared file
    DriveApi { file_id: String },
    /// Direct download URL
    HttpGet { url: String },
    /// Already on disk; never downloaded
    Local,
}

impl ModelSource {
    /// Download URL, or `None` for local models
    pub fn url(&self) -> Option<String> {
        match self {
            ModelSource::DriveApi { file_id } => Some(format!(
                "https://drive.google.com/uc?export=download&id={}",
                file_id
            )),
            ModelSource::HttpGet { url } => Some(url.clone()),
            ModelSource::Local => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ModelSource::DriveApi { file_id } => format!("Google Drive ({})", file_id),
            ModelSource::HttpGet { url } => format!("HTTP ({})", url),
            ModelSource::Local => "local file".to_string(),
        }
    }
}

/// Upper bound on configured download attempts
pub const MAX_FETCH_ATTEMPTS: u32 = 10;

/// Downloads model files with retry
pub struct ModelFetcher {
    client: reqwest::blocking::Client,
    max_attempts: u32,
}

impl ModelFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(ModelFetcher {
            client,
            max_attempts: config.max_attempts.clamp(1, MAX_FETCH_ATTEMPTS),
        })
    }

    /// Make sure the model exists at `path`, downloading it if needed.
    ///
    /// An existing file is never re-downloaded.
    pub fn ensure<P: AsRef<Path>>(&self, source: &ModelSource, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.exists() {
            log::debug!("Model already present at {}", path.display());
            return Ok(path.to_path_buf());
        }

        let url = source.url().ok_or_else(|| {
            ScoreError::ModelUnavailable(format!(
                "no model at {} and source is local",
                path.display()
            ))
        })?;

        log::info!("Downloading model from {}", source.describe());
        let bytes = with_retry(|| self.download(&url), self.max_attempts)?;
        write_atomic(path, &bytes)?;
        log::info!("Saved model ({} bytes) to {}", bytes.len(), path.display());

        if !path.exists() {
            return Err(ScoreError::ModelUnavailable(
                "model download failed; check the file id or permissions".to_string(),
            ));
        }
        Ok(path.to_path_buf())
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(ScoreError::ModelUnavailable(format!(
                "empty response from {}",
                url
            )));
        }
        Ok(bytes.to_vec())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
