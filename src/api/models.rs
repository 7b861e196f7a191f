use reqwest::{StatusCode, Version};

/// Status line and headers of a response, captured before the body is read.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub version: Version,
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// e.g. `HTTP/1.1 200 OK`
    pub fn status_line(&self) -> String {
        format!("{:?} {}", self.version, self.status)
    }
}

/// Metadata about the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityInfo {
    pub chunked: bool,
    pub streaming: bool,
    pub content_length: Option<u64>,
}

impl EntityInfo {
    /// Declared length, `-1` when unknown.
    pub fn length(&self) -> i64 {
        self.content_length
            .and_then(|len| i64::try_from(len).ok())
            .unwrap_or(-1)
    }
}
