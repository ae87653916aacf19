//! A single fetch, analyse, and publish pass

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};
use wxtreme_config::Settings;
use wxtreme_core::{day_key, Metric, Publisher, SourceFetcher, Timestamp};
use wxtreme_ingest::fetch_all;
use wxtreme_notify::{MessageComposer, TemplateTable};
use wxtreme_rollup::{aggregate, estimate, merge, RollingWindow};

/// What a cycle ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No records fell on today's date
    NoData,
    /// Nothing was extreme enough to report
    Quiet,
    Published(String),
}

/// Everything a cycle needs besides its collaborators
#[derive(Debug, Clone)]
pub struct CyclePlan {
    pub window: RollingWindow,
    pub percentile: f64,
    pub composer: MessageComposer,
}

impl CyclePlan {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let table = match &settings.templates {
            Some(path) => TemplateTable::load(path)
                .with_context(|| format!("Failed to load templates from {}", path.display()))?,
            None => TemplateTable::builtin(),
        };
        let templates = table
            .language(&settings.language)
            .with_context(|| {
                let available: Vec<&str> = table.languages().collect();
                format!("Unsupported notification language; available: {}", available.join(", "))
            })?
            .clone();
        let enabled: BTreeSet<Metric> = settings.enabled_metrics.clone();

        Ok(Self {
            window: RollingWindow::new(settings.window_days, settings.timezone),
            percentile: settings.percentile,
            composer: MessageComposer::new(templates, enabled, settings.timezone, &*settings.tag),
        })
    }
}

/// Run one notification cycle as of `now`.
#[instrument(skip_all, fields(now = now))]
pub async fn run_cycle<F, P>(
    fetcher: &F,
    publisher: &mut P,
    plan: &CyclePlan,
    now: Timestamp,
) -> Result<CycleOutcome>
where
    F: SourceFetcher + ?Sized,
    P: Publisher + ?Sized,
{
    let bundle = fetch_all(fetcher).await?;

    let cutoff = plan.window.forecast_cutoff(now)?;
    let records = merge(&bundle, cutoff)?;

    let window_start = plan.window.start(now)?;
    let days = aggregate(&records, window_start)?;
    debug!(
        window_days = plan.window.days(),
        window_start,
        summaries = days.len(),
        "window aggregated"
    );
    let thresholds = estimate(days.values(), plan.percentile);

    let today_key = day_key(now)?;
    let Some(today) = days.get(&today_key) else {
        warn!(day = %today_key, "no records for today");
        return Ok(CycleOutcome::NoData);
    };
    debug!(day = %today_key, ?today, "today's summary");

    let Some(text) = plan.composer.compose(today, &thresholds, now, &records) else {
        info!(day = %today_key, "nothing extreme today");
        return Ok(CycleOutcome::Quiet);
    };

    publisher
        .publish(&text)
        .await
        .context("Failed to publish notification")?;
    info!(day = %today_key, chars = text.chars().count(), "notification published");
    Ok(CycleOutcome::Published(text))
}
