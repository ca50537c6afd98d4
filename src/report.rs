use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::aggregate::{Aggregate, LatencyAggregate, PageSample};

/// A `Report` derives final statistics from an [`Aggregate`]. All the lossy
/// math (means, percentiles) happens here, not in the aggregate.
pub trait Report<A>
where
    Self: Send + Sync + Debug + From<A> + Serialize + DeserializeOwned,
    A: Aggregate,
{
}

/// Consumes a [`Report`] and sends it somewhere: stdout, a file, a metrics
/// sink. Reporters are free to format or enrich as needed.
#[async_trait]
pub trait Reporter<A: Aggregate, R: Report<A>> {
    async fn report(&self, report: R) -> Result<(), Box<dyn std::error::Error>>;
}

/// Latency distribution of one target, derived from its retained samples.
#[derive(Debug, Serialize, Deserialize)]
pub struct TargetSummary {
    pub count: usize,
    pub min: Duration,
    pub mean: Duration,
    pub max: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

/// Per-target pagination latency summaries, comparable across backends at
/// equivalent depths.
#[derive(Debug, Serialize, Deserialize)]
pub struct LatencyReport {
    pub targets: BTreeMap<String, TargetSummary>,
}

/// Nearest-rank percentile over an elapsed-sorted slice.
fn percentile(sorted: &[PageSample], q: f64) -> Duration {
    let index = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[index].elapsed
}

impl From<LatencyAggregate> for LatencyReport {
    fn from(value: LatencyAggregate) -> Self {
        let targets = value
            .series
            .into_iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(target, mut samples)| {
                samples.sort_by_key(|s| s.elapsed);
                let count = samples.len();
                let total: Duration = samples.iter().map(|s| s.elapsed).sum();
                let summary = TargetSummary {
                    count,
                    min: samples[0].elapsed,
                    mean: total.div_f64(count as f64),
                    max: samples[count - 1].elapsed,
                    p50: percentile(&samples, 0.50),
                    p95: percentile(&samples, 0.95),
                    p99: percentile(&samples, 0.99),
                };
                (target, summary)
            })
            .collect();
        Self { targets }
    }
}

impl Report<LatencyAggregate> for LatencyReport {}

/// Debug-prints the report; good enough for interactive runs.
pub struct StdoutReporter;

#[async_trait]
impl Reporter<LatencyAggregate, LatencyReport> for StdoutReporter {
    async fn report(&self, report: LatencyReport) -> Result<(), Box<dyn std::error::Error>> {
        println!("{report:#?}");
        Ok(())
    }
}

/// Serializes the report to JSON on stdout, for piping into other tooling.
pub struct JsonReporter;

#[async_trait]
impl Reporter<LatencyAggregate, LatencyReport> for JsonReporter {
    async fn report(&self, report: LatencyReport) -> Result<(), Box<dyn std::error::Error>> {
        let value = serde_json::to_string_pretty(&report)?;
        println!("{value}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::PageLatency;

    fn aggregate_with(millis: &[u64]) -> LatencyAggregate {
        let mut agg = LatencyAggregate::new();
        for (page, ms) in millis.iter().enumerate() {
            agg.consume(&PageLatency {
                target: "postgres".to_string(),
                page: page as u64,
                elapsed: Duration::from_millis(*ms),
            });
        }
        agg
    }

    #[test]
    fn summary_derives_expected_statistics() {
        let report = LatencyReport::from(aggregate_with(&[30, 10, 20, 40, 100]));
        let summary = &report.targets["postgres"];

        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, Duration::from_millis(10));
        assert_eq!(summary.max, Duration::from_millis(100));
        assert_eq!(summary.mean, Duration::from_millis(40));
        assert_eq!(summary.p50, Duration::from_millis(30));
        assert_eq!(summary.p99, Duration::from_millis(100));
    }

    #[test]
    fn empty_series_produces_no_summary() {
        let report = LatencyReport::from(LatencyAggregate::new());
        assert!(report.targets.is_empty());
    }
}
