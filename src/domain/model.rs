use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::StatusCode;

use crate::metrics::SessionMetrics;
use crate::utils::derive_filename;

/// The single download in flight for one invocation.
///
/// The filename is derived once in [`TransferSession::new`] and never recomputed.
#[derive(Debug)]
pub struct TransferSession {
    url: String,
    filename: String,
    path: PathBuf,
    metrics: Arc<SessionMetrics>,
}

impl TransferSession {
    pub fn new(url: impl Into<String>, output_dir: &Path) -> Self {
        let url = url.into();
        let filename = derive_filename(&url);
        Self::with_filename(url, filename, output_dir)
    }

    pub fn with_filename(url: String, filename: String, output_dir: &Path) -> Self {
        let path = output_dir.join(&filename);
        Self {
            url,
            filename,
            path,
            metrics: Arc::new(SessionMetrics::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.metrics
    }
}

/// What the executor reports once the request is done.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub filename: String,
    pub path: PathBuf,
    pub status: StatusCode,
    /// False when the status was not 200 and the body was skipped.
    pub downloaded: bool,
    pub bytes: u64,
    /// Mean transfer rate in KB/s.
    pub mean_rate: f64,
}
