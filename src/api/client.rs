use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::TRANSFER_ENCODING;
use reqwest::{Client, Response};
use thiserror::Error;
use tokio_util::io::StreamReader;

use super::models::{EntityInfo, ResponseHead};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to read response body: {0}")]
    BodyError(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

pub type BodyReader = StreamReader<BoxStream<'static, std::io::Result<Bytes>>, Bytes>;

/// HTTP client used for a single download. Dropping it releases its connections.
pub struct DownloadClient {
    client: Client,
}

impl Default for DownloadClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Issue a plain GET. Any status is returned as-is; only transport failures are errors.
    pub async fn get(&self, url: &str) -> Result<FetchedResponse> {
        let response = self.client.get(url).send().await?;
        Ok(FetchedResponse::new(response))
    }
}

/// A response whose head has been received and whose body is still unread.
pub struct FetchedResponse {
    head: ResponseHead,
    response: Response,
}

impl FetchedResponse {
    fn new(response: Response) -> Self {
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let head = ResponseHead {
            version: response.version(),
            status: response.status(),
            headers,
        };

        Self { head, response }
    }

    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    pub fn entity(&self) -> EntityInfo {
        let chunked = self
            .response
            .headers()
            .get_all(TRANSFER_ENCODING)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.to_ascii_lowercase().contains("chunked"));

        EntityInfo {
            chunked,
            // reqwest never buffers the body up front
            streaming: true,
            content_length: self.response.content_length(),
        }
    }

    /// Consume the response and expose its body as a byte reader.
    pub fn into_body_reader(self) -> BodyReader {
        let stream = self
            .response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();
        StreamReader::new(stream)
    }
}
