use barrage::*;

use clap::Parser;
use console::style;
use indicatif::{MultiProgress, ProgressDrawTarget};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fires a fixed batch of authenticated GET requests and logs every response.
///
/// Target, token, request count and worker count are built in.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hide the progress bars
    #[arg(short, long)]
    quiet: bool,
}

fn seconds_to_hms(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barrage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let m = if args.quiet {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };

    let summary = run(Config::default(), m).await?;

    let finished = log::LogFile::finished_message(&summary.log_path);
    println!("{}", style(finished).green().bold());
    println!(
        "{} zahtjeva, {} grešaka, {} neuspjelih niti, trajanje {}",
        summary.requests,
        summary.errors,
        summary.failed_workers,
        seconds_to_hms(summary.elapsed().num_seconds())
    );

    Ok(())
}
