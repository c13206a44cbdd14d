use crate::log::LogFile;
use crate::model::{Config, Outcome, WorkerReport};
use console::truncate_str;
use indicatif::ProgressBar;
use std::sync::Arc;

// width of the last-outcome text shown next to a worker's bar
const TEXT_WIDTH: usize = 50;

pub async fn worker(
    rank: usize,
    iterations: usize,
    config: Arc<Config>,
    log: LogFile,
    pb: ProgressBar,
) -> WorkerReport {
    let client = reqwest::Client::new();
    let mut report = WorkerReport {
        rank,
        ..WorkerReport::default()
    };

    for ite in 0..iterations {
        let outcome = send(&client, &config).await;
        report.requests += 1;
        match &outcome {
            Outcome::Response { status, .. } => {
                pb.suspend(|| tracing::debug!(rank, ite, status, "response received"));
                pb.set_message(format!("{status}"));
            }
            Outcome::Error(message) => {
                pb.suspend(|| tracing::debug!(rank, ite, error = %message, "request failed"));
                report.errors += 1;
                pb.set_message(format!(
                    "error: {}",
                    truncate_str(message, TEXT_WIDTH, "...")
                ));
            }
        }

        if let Err(e) = log.append(&outcome).await {
            pb.abandon_with_message("log write failed");
            report.failure = Some(e);
            return report;
        }
        pb.inc(1);
    }

    pb.finish_with_message("finished");
    report
}

/// Performs one authenticated GET. Transport failures, including a body that
/// cannot be read to the end, come back as [`Outcome::Error`].
pub async fn send(client: &reqwest::Client, config: &Config) -> Outcome {
    let response = match client
        .get(&config.url)
        .bearer_auth(&config.token)
        .send()
        .await
    {
        Ok(res) => res,
        Err(e) => return Outcome::Error(describe(&e)),
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => Outcome::Response { status, body },
        Err(e) => Outcome::Error(describe(&e)),
    }
}

fn describe(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    if message.is_empty() {
        message.push_str("unknown transport error");
    }
    message
}
