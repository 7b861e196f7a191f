use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::{
    api::{ApiError, DownloadClient, FetchedResponse},
    domain::{AppError, DownloadSummary, TransferSession},
};

pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Performs the GET for a session and writes a 200 body to the session's file.
#[derive(Debug, Clone)]
pub struct DownloadExecutor {
    chunk_size: usize,
}

impl Default for DownloadExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl DownloadExecutor {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Any status other than 200 is logged and skipped without error; no file is written.
    pub async fn execute(&self, session: &TransferSession) -> Result<DownloadSummary, AppError> {
        let client = DownloadClient::new();
        let response = client.get(session.url()).await?;

        let head = response.head();
        let status = head.status;
        info!("HTTP response status: {}", head.status_line());
        for (name, value) in &head.headers {
            info!("HEADER {}: {}", name, value);
        }

        let downloaded = status == StatusCode::OK;
        if downloaded {
            let entity = response.entity();
            info!("Response entity info:");
            info!("    - chunked  : {}", entity.chunked);
            info!("    - streaming: {}", entity.streaming);
            info!("    - length   : {}", entity.length());

            self.write_body(response, session).await?;
        } else {
            debug!("Status {} is not 200, skipping body", status.as_u16());
        }

        let metrics = session.metrics();
        let summary = DownloadSummary {
            filename: session.filename().to_string(),
            path: session.path().to_path_buf(),
            status,
            downloaded,
            bytes: metrics.bytes_transferred(),
            mean_rate: metrics.transfer_rate().mean_rate(),
        };

        info!(
            "Finished downloading {}, read a total of {} bytes ({} KB/s)",
            summary.filename, summary.bytes, summary.mean_rate
        );

        Ok(summary)
    }

    async fn write_body(
        &self,
        response: FetchedResponse,
        session: &TransferSession,
    ) -> Result<(), AppError> {
        let metrics = session.metrics();
        let mut body = response.into_body_reader();
        let mut file = tokio::fs::File::create(session.path()).await?;
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = body
                .read(&mut buffer)
                .await
                .map_err(|e| AppError::Transport(ApiError::BodyError(e)))?;
            if read == 0 {
                break;
            }

            metrics.record_bytes(read);
            file.write_all(&buffer[..read]).await?;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn sample_body(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_ok_response_is_written_to_file() {
        let body = sample_body(200_000);
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/files/data\.bin(\?.*)?$".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(&body)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = TransferSession::new(
            format!("{}/files/data.bin?token=abc", server.url()),
            dir.path(),
        );
        assert_eq!(session.filename(), "data.bin");

        let summary = DownloadExecutor::default().execute(&session).await.unwrap();
        mock.assert_async().await;

        assert!(summary.downloaded);
        assert_eq!(summary.status, StatusCode::OK);
        assert_eq!(summary.bytes, body.len() as u64);
        assert_eq!(session.metrics().bytes_transferred(), body.len() as u64);
        assert_eq!(std::fs::read(dir.path().join("data.bin")).unwrap(), body);
    }

    #[tokio::test]
    async fn test_small_chunks_still_copy_everything() {
        let body = sample_body(10_007);
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/odd.bin")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = TransferSession::new(format!("{}/odd.bin", server.url()), dir.path());

        let summary = DownloadExecutor::new(7).execute(&session).await.unwrap();
        assert_eq!(summary.bytes, 10_007);
        assert_eq!(std::fs::read(session.path()).unwrap(), body);
    }

    #[tokio::test]
    async fn test_existing_file_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/notes.txt")
            .with_status(200)
            .with_body("short")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "a much longer previous content").unwrap();

        let session = TransferSession::new(format!("{}/notes.txt", server.url()), dir.path());
        DownloadExecutor::default().execute(&session).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "short"
        );
    }

    #[tokio::test]
    async fn test_empty_body_creates_empty_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/empty")
            .with_status(200)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = TransferSession::new(format!("{}/empty", server.url()), dir.path());
        let summary = DownloadExecutor::default().execute(&session).await.unwrap();

        assert!(summary.downloaded);
        assert_eq!(summary.bytes, 0);
        assert_eq!(std::fs::metadata(session.path()).unwrap().len(), 0);
    }

    // Non-200 responses are accepted silently rather than reported as failures.
    // This pins the current lenient behaviour so a change to it is a visible decision.
    #[tokio::test]
    async fn test_non_ok_status_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing.zip")
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = TransferSession::new(format!("{}/missing.zip", server.url()), dir.path());

        let summary = DownloadExecutor::default().execute(&session).await.unwrap();
        mock.assert_async().await;

        assert!(!summary.downloaded);
        assert_eq!(summary.status, StatusCode::NOT_FOUND);
        assert_eq!(summary.bytes, 0);
        assert_eq!(session.metrics().bytes_transferred(), 0);
        assert!(!dir.path().join("missing.zip").exists());
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let mut server = mockito::Server::new_async().await;
        let _redirect = server
            .mock("GET", "/old.txt")
            .with_status(302)
            .with_header("location", "/new.txt")
            .create_async()
            .await;
        let _target = server
            .mock("GET", "/new.txt")
            .with_status(200)
            .with_body("moved")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = TransferSession::new(format!("{}/old.txt", server.url()), dir.path());
        let summary = DownloadExecutor::default().execute(&session).await.unwrap();

        // The filename comes from the requested URL, not the final one.
        assert_eq!(summary.filename, "old.txt");
        assert_eq!(std::fs::read_to_string(session.path()).unwrap(), "moved");
    }

    #[tokio::test]
    async fn test_body_failure_mid_stream() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\n")
                .await
                .unwrap();
            socket.write_all(&[7u8; 1000]).await.unwrap();
            socket.flush().await.unwrap();
            // Closing here leaves the promised body incomplete.
        });

        let dir = tempfile::tempdir().unwrap();
        let session = TransferSession::new(format!("http://{}/partial.bin", addr), dir.path());

        let result = DownloadExecutor::default().execute(&session).await;
        assert!(matches!(result, Err(AppError::Transport(_))));

        assert!(session.metrics().bytes_transferred() <= 1000);
        if let Ok(meta) = std::fs::metadata(session.path()) {
            assert!(meta.len() <= 1000);
        }
    }
}
