//! wxtreme - posts a notification when today's weather is extreme
//!
//! One run is one cycle; schedule it with cron or a timer unit. Exit status
//! is 0 whenever the cycle completes, whether or not anything was posted.

use anyhow::{Context, Result};
use chrono::Utc;
use std::process::ExitCode;
use tracing::{error, info, warn};

use wxtreme_config::AppConfig;
use wxtreme_core::{iso_to_epoch, Publisher, SourceFetcher};
use wxtreme_daemon::{load_env_file, run_cycle, usage, CliArgs, CycleOutcome, CyclePlan};
use wxtreme_ingest::{FixtureFetcher, HttpFetcher};
use wxtreme_sinks::webhook::WebhookPublisher;
use wxtreme_sinks::{FsSink, StdoutPublisher};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage());
            return ExitCode::from(2);
        }
    };
    if args.help {
        eprintln!("{}", usage());
        return ExitCode::SUCCESS;
    }

    let env_file = load_env_file(None);
    wxtreme_obs::init("wxtreme");
    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded environment file");
    }

    match run(args).await {
        Ok(outcome) => {
            info!(?outcome, "cycle finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = ?e, "cycle failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<CycleOutcome> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let settings = config.settings().context("Invalid configuration")?;
    let plan = CyclePlan::from_settings(&settings)?;

    let fetcher: Box<dyn SourceFetcher> = match &args.fixtures {
        Some(dir) => Box::new(
            FixtureFetcher::from_dir(dir)
                .with_context(|| format!("Failed to load fixtures from {}", dir.display()))?,
        ),
        None => {
            let urls = config.source_urls().context("Invalid source configuration")?;
            Box::new(HttpFetcher::new(urls).context("Failed to build HTTP client")?)
        }
    };

    let mut publisher: Box<dyn Publisher> = if args.dry_run {
        Box::new(StdoutPublisher)
    } else if let Some(dir) = &args.out {
        Box::new(FsSink::new(dir)?)
    } else if let Some(url) = &settings.webhook {
        Box::new(WebhookPublisher::new(url.to_string())?)
    } else {
        warn!("no webhook configured; printing notifications");
        Box::new(StdoutPublisher)
    };

    let now = match &args.at {
        Some(at) => iso_to_epoch(at).with_context(|| format!("Invalid --at time: {at}"))?,
        None => Utc::now().timestamp_millis(),
    };

    info!(
        language = %settings.language,
        timezone = %settings.timezone,
        window_days = settings.window_days,
        "starting cycle"
    );
    run_cycle(fetcher.as_ref(), publisher.as_mut(), &plan, now).await
}
