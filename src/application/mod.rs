pub mod download_executor;

pub use download_executor::{DownloadExecutor, DEFAULT_CHUNK_SIZE};
