use tracing::{debug, info};

use crate::application::DownloadExecutor;
use crate::config::Settings;
use crate::domain::{AppError, DownloadSummary, TransferSession};
use crate::metrics::MetricsReporter;
use crate::ui::{non_blank, InputProvider, PROMPT_TITLE};

/// Ask for a URL and download it.
///
/// Returns `Ok(None)` when the input was blank or cancelled; in that case no
/// runtime is built and no metrics are started.
pub fn run(
    settings: &Settings,
    input: &mut dyn InputProvider,
) -> Result<Option<DownloadSummary>, AppError> {
    let Some(url) = non_blank(input.request_url(PROMPT_TITLE)?) else {
        info!("No URL entered, nothing to do");
        return Ok(None);
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(download(settings, url)).map(Some)
}

/// Run one transfer session for `url`, reporting metrics while it lasts.
pub async fn download(settings: &Settings, url: String) -> Result<DownloadSummary, AppError> {
    let session = TransferSession::new(url, &settings.output_dir);
    debug!("Downloading {} to {}", session.url(), session.path().display());

    let reporter = MetricsReporter::start(session.metrics().clone(), settings.report_options());
    let result = DownloadExecutor::new(settings.chunk_size)
        .execute(&session)
        .await;
    reporter.stop().await;

    result
}
