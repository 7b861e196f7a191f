use chrono::{Local, NaiveDate};
use sha1::{Digest, Sha1};

/// Derive the local filename for `url` using today's date for the fallback name.
pub fn derive_filename(url: &str) -> String {
    derive_filename_on(url, Local::now().date_naive())
}

/// Last path segment of `url` with the query string cut off.
///
/// When that segment is blank the name becomes `yyyy-MM-dd__<sha1 of url>`.
/// Characters that are illegal on the local filesystem are passed through as-is.
pub fn derive_filename_on(url: &str, date: NaiveDate) -> String {
    let segment = url.rsplit_once('/').map(|(_, tail)| tail).unwrap_or("");
    let segment = segment.split('?').next().unwrap_or("");

    if segment.trim().is_empty() {
        format!("{}__{}", date.format("%Y-%m-%d"), sha1_hex(url))
    } else {
        segment.to_string()
    }
}

fn sha1_hex(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}
