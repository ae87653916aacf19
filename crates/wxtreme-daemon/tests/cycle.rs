use serde_json::{json, Value};
use std::collections::BTreeSet;
use wxtreme_core::{iso_to_epoch, Metric, Publisher, SourceKind, Timestamp};
use wxtreme_daemon::{run_cycle, CycleOutcome, CyclePlan};
use wxtreme_ingest::FixtureFetcher;
use wxtreme_notify::{MessageComposer, TemplateTable};
use wxtreme_rollup::RollingWindow;

const DAY_MS: Timestamp = 86_400_000;

#[derive(Default)]
struct Capture {
    sent: Vec<String>,
}

#[async_trait::async_trait]
impl Publisher for Capture {
    async fn publish(&mut self, text: &str) -> anyhow::Result<()> {
        self.sent.push(text.to_string());
        Ok(())
    }
}

fn at(iso: &str) -> Timestamp {
    iso_to_epoch(iso).unwrap()
}

fn now() -> Timestamp {
    at("2024-06-15T13:00:00Z")
}

fn plan() -> CyclePlan {
    let tz = chrono_tz::Europe::Stockholm;
    let table = TemplateTable::builtin();
    let sv = table.language("sv").unwrap().clone();
    let enabled: BTreeSet<Metric> = Metric::ALL.into_iter().collect();
    CyclePlan {
        window: RollingWindow::new(28, tz),
        percentile: 20.0,
        composer: MessageComposer::new(sv, enabled, tz, "#wx"),
    }
}

fn station(points: &[(Timestamp, f64)]) -> Value {
    let points: Vec<Value> = points
        .iter()
        .map(|(date, value)| json!({"date": date, "value": value}))
        .collect();
    json!({ "value": points })
}

/// 28 ordinary days at noon, 15 to 19 °C, followed by `today`
fn fixtures(today: &[(Timestamp, f64)]) -> FixtureFetcher {
    let noon = at("2024-06-15T10:00:00Z");
    let mut temps: Vec<(Timestamp, f64)> = (1..=28)
        .map(|i| (noon - i * DAY_MS, 15.0 + (i % 5) as f64))
        .collect();
    temps.extend_from_slice(today);
    let winds: Vec<(Timestamp, f64)> = temps.iter().map(|(date, _)| (*date, 2.0)).collect();

    FixtureFetcher::new()
        .with(SourceKind::Temperature, station(&temps))
        .with(SourceKind::Rain, json!({"value": []}))
        .with(SourceKind::Humidity, json!({"value": []}))
        .with(SourceKind::Wind, station(&winds))
        .with(
            SourceKind::Forecast,
            json!({"timeSeries": [{
                "validTime": "2024-06-16T12:00:00Z",
                "parameters": [
                    {"name": "t", "values": [40.0]},
                    {"name": "pmedian", "values": [0.0]}
                ]
            }]}),
        )
}

#[tokio::test]
async fn test_hot_afternoon_is_published() {
    let fetcher = fixtures(&[
        (at("2024-06-15T06:00:00Z"), 16.0),
        (at("2024-06-15T11:00:00Z"), 30.0),
    ]);
    let mut publisher = Capture::default();

    let outcome = run_cycle(&fetcher, &mut publisher, &plan(), now())
        .await
        .unwrap();

    let text = match outcome {
        CycleOutcome::Published(text) => text,
        other => panic!("expected a notification, got {other:?}"),
    };
    insta::assert_snapshot!(&text, @r###"
    #wx 🔥 Det var extremt varmt idag!
    Högsta temperatur: 30 °C uppmättes kl. 13:00
    "###);
    assert_eq!(publisher.sent, vec![text]);
}

#[tokio::test]
async fn test_ordinary_day_is_quiet() {
    let fetcher = fixtures(&[
        (at("2024-06-15T06:00:00Z"), 16.0),
        (at("2024-06-15T11:00:00Z"), 17.0),
    ]);
    let mut publisher = Capture::default();

    let outcome = run_cycle(&fetcher, &mut publisher, &plan(), now())
        .await
        .unwrap();
    assert_eq!(outcome, CycleOutcome::Quiet);
    assert!(publisher.sent.is_empty());
}

#[tokio::test]
async fn test_no_records_today() {
    let fetcher = fixtures(&[]);
    let mut publisher = Capture::default();

    let outcome = run_cycle(&fetcher, &mut publisher, &plan(), now())
        .await
        .unwrap();
    assert_eq!(outcome, CycleOutcome::NoData);
    assert!(publisher.sent.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_aborts_cycle() {
    let fetcher = FixtureFetcher::new().with(SourceKind::Temperature, json!({"value": []}));
    let mut publisher = Capture::default();

    assert!(run_cycle(&fetcher, &mut publisher, &plan(), now())
        .await
        .is_err());
    assert!(publisher.sent.is_empty());
}
