use crate::error::Error;
use crate::log::LogFile;
use crate::model::{Config, Summary};
use crate::worker::worker;
use chrono::Utc;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::task::JoinSet;

const WORKER_TEMPLATE: &str = "{spinner} worker {prefix:>3} [{bar:30}] {pos}/{len} {msg}";
const TOTAL_TEMPLATE: &str = "{spinner} {elapsed_precise} total [{bar:30}] {pos}/{len}";

/// Runs every scheduled request and waits for all workers.
///
/// Only a failure to create the log file is returned as an error. A worker
/// that stops early is logged and counted in [`Summary::failed_workers`], and
/// the requests it already sent still count towards the totals.
pub async fn run(config: Config, m: MultiProgress) -> Result<Summary, Error> {
    let log = LogFile::create(&config.log_path).await?;
    let per_worker = config.per_worker();
    let dropped = config.total_requests - config.scheduled();
    if dropped > 0 {
        tracing::warn!(
            dropped,
            total = config.total_requests,
            workers = config.workers,
            "request count does not divide evenly, remainder will not be sent"
        );
    }
    tracing::info!(
        url = %config.url,
        workers = config.workers,
        per_worker,
        log = %config.log_path.display(),
        "test started"
    );

    let worker_sty = ProgressStyle::with_template(WORKER_TEMPLATE)?;
    let total = m.add(ProgressBar::new(config.scheduled() as u64));
    total.set_style(ProgressStyle::with_template(TOTAL_TEMPLATE)?);

    let begin = Utc::now();
    let config = Arc::new(config);
    let mut set = JoinSet::new();
    for rank in 0..config.workers {
        let pb = m.add(ProgressBar::new(per_worker as u64));
        pb.set_style(worker_sty.clone());
        pb.set_prefix(rank.to_string());
        set.spawn(worker(rank, per_worker, config.clone(), log.clone(), pb));
    }

    let mut requests = 0;
    let mut errors = 0;
    let mut failed_workers = 0;
    while let Some(res) = set.join_next().await {
        match res {
            Ok(report) => {
                requests += report.requests;
                errors += report.errors;
                total.inc(report.requests as u64);
                match &report.failure {
                    None => m.suspend(|| {
                        tracing::debug!(
                            rank = report.rank,
                            requests = report.requests,
                            errors = report.errors,
                            "worker finished"
                        )
                    }),
                    Some(e) => {
                        failed_workers += 1;
                        m.suspend(|| {
                            tracing::error!(
                                rank = report.rank,
                                requests = report.requests,
                                error = %e,
                                "worker stopped"
                            )
                        });
                    }
                }
            }
            Err(e) => {
                failed_workers += 1;
                m.suspend(|| tracing::error!(error = %e, "worker task aborted"));
            }
        }
    }
    total.finish();

    let summary = Summary {
        workers: config.workers,
        per_worker,
        requests,
        errors,
        failed_workers,
        begin,
        end: Utc::now(),
        log_path: config.log_path.clone(),
    };
    tracing::info!(
        requests = summary.requests,
        errors = summary.errors,
        failed_workers = summary.failed_workers,
        elapsed_ms = summary.elapsed().num_milliseconds(),
        "test finished"
    );
    Ok(summary)
}
