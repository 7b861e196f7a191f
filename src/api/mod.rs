pub mod client;
pub mod models;

pub use client::{ApiError, BodyReader, DownloadClient, FetchedResponse};
pub use models::{EntityInfo, ResponseHead};
