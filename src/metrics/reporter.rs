use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{MeterSnapshot, NumberFormat, SessionMetrics, BYTES_TRANSFERRED, TRANSFER_RATE};

const CONSOLE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub interval: Duration,
    pub format: NumberFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            format: NumberFormat::default(),
        }
    }
}

/// Periodically prints the session metrics to stdout until stopped.
pub struct MetricsReporter {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<usize>,
}

impl MetricsReporter {
    /// Spawn the reporting task. The first report is printed one interval after start.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(metrics: Arc<SessionMetrics>, options: ReportOptions) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + options.interval;
            let mut interval = tokio::time::interval_at(start, options.interval);
            let mut reports = 0usize;

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {
                        let report = render_report(&metrics, &options.format, Local::now());
                        let mut stdout = std::io::stdout().lock();
                        if let Err(e) = stdout.write_all(report.as_bytes()).and_then(|_| stdout.flush()) {
                            warn!("Failed to print metrics report: {}", e);
                        }
                        reports += 1;
                    }
                }
            }

            reports
        });

        debug!("Metrics reporter started, interval {:?}", options.interval);
        Self { stop_tx, task }
    }

    /// Signal the task to stop and wait for it. Returns how many reports were printed.
    pub async fn stop(self) -> usize {
        let _ = self.stop_tx.send(true);
        match self.task.await {
            Ok(reports) => {
                debug!("Metrics reporter stopped after {} reports", reports);
                reports
            }
            Err(e) => {
                warn!("Metrics reporter task failed: {}", e);
                0
            }
        }
    }
}

/// Render one console report block.
pub fn render_report(
    metrics: &SessionMetrics,
    format: &NumberFormat,
    now: DateTime<Local>,
) -> String {
    let mut out = String::new();
    let meter = metrics.transfer_rate().snapshot();

    banner(&mut out, &now.format("%Y-%m-%d %H:%M:%S").to_string(), '=');
    out.push('\n');

    banner(&mut out, "-- Counters", '-');
    let _ = writeln!(out, "{}", BYTES_TRANSFERRED);
    let _ = writeln!(
        out,
        "{:>18} = {}",
        "count",
        format.integer(metrics.bytes_transferred())
    );
    out.push('\n');

    banner(&mut out, "-- Meters", '-');
    let _ = writeln!(out, "{}", TRANSFER_RATE);
    write_meter(&mut out, &meter, format);
    out.push('\n');

    out
}

fn write_meter(out: &mut String, meter: &MeterSnapshot, format: &NumberFormat) {
    let _ = writeln!(out, "{:>18} = {}", "count", format.integer(meter.count));
    let rates = [
        ("mean rate", meter.mean_rate),
        ("1-minute rate", meter.one_minute_rate),
        ("5-minute rate", meter.five_minute_rate),
        ("15-minute rate", meter.fifteen_minute_rate),
    ];
    for (label, rate) in rates {
        let _ = writeln!(
            out,
            "{:>18} = {} events/second",
            label,
            format.decimal(rate, 2)
        );
    }
}

fn banner(out: &mut String, title: &str, fill: char) {
    out.push_str(title);
    out.push(' ');
    let used = title.chars().count() + 1;
    for _ in used..CONSOLE_WIDTH {
        out.push(fill);
    }
    out.push('\n');
}
