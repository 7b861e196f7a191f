use std::error::Error as _;

use tracing::{error, info};

use urlgrab::{app, config::Settings, ui};

fn main() {
    dotenvy::dotenv().ok();
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(&settings.log_level)
        .init();

    let mut input = ui::provider_for(settings.prompt);
    match app::run(&settings, input.as_mut()) {
        Ok(Some(summary)) => info!(
            "Session finished: {} ({}, {} bytes)",
            summary.path.display(),
            summary.status,
            summary.bytes
        ),
        Ok(None) => {}
        Err(e) => {
            let mut causes = Vec::new();
            let mut source = e.source();
            while let Some(cause) = source {
                causes.push(cause.to_string());
                source = cause.source();
            }
            error!("Download failed: {} {:?}", e, causes);
        }
    }
}
