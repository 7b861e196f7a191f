use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::application::DEFAULT_CHUNK_SIZE;
use crate::metrics::{NumberFormat, ReportOptions};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Dialog,
    Console,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub log_level: String,
    pub prompt: PromptKind,
    pub report_interval_secs: u64,
    pub number_locale: String,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            // Config file (optional)
            .add_source(File::with_name("urlgrab").required(false))
            // Environment variables (e.g. URLGRAB_PROMPT=console)
            .add_source(Environment::with_prefix("URLGRAB"));

        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("prompt", "dialog")?
            .set_default("report_interval_secs", 5)?
            .set_default("number_locale", "de-DE")?
            .set_default("output_dir", ".")?
            .set_default("chunk_size", DEFAULT_CHUNK_SIZE as i64)
    }

    /// Unknown locales fall back to plain formatting.
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::from_locale(&self.number_locale).unwrap_or_else(|| {
            warn!(
                "Unknown number locale {:?}, using plain formatting",
                self.number_locale
            );
            NumberFormat::PLAIN
        })
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            interval: Duration::from_secs(self.report_interval_secs.max(1)),
            format: self.number_format(),
        }
    }
}
