use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::metric::{Metric, PageLatency};

/// The `Aggregate` trait defines how raw [`Metric`] values are collected and
/// combined into an intermediate, mergeable representation.
///
/// Aggregates store raw data, not statistics: averages and percentiles belong
/// in a [`crate::Report`], which is converted from an `Aggregate` and performs
/// the final derivation. Keeping the aggregate raw means every report format
/// can derive what it needs without losing information.
///
/// Implementor notes:
/// - `merge` must be associative and commutative; worker-local aggregates are
///   merged in arbitrary order.
/// - Implement [`Serialize`] and [`DeserializeOwned`] so aggregates can be
///   persisted or shipped across processes.
pub trait Aggregate
where
    Self: Serialize + DeserializeOwned + PartialOrd + PartialEq + Send + Sync + Debug + Clone,
{
    /// The metric type this aggregate summarizes.
    type Metric: Metric;

    /// Create a new, empty instance of the aggregate.
    fn new() -> Self;

    /// Aggregate multiple metrics into the current instance.
    ///
    /// This default implementation calls [`Aggregate::consume`] for each metric.
    fn aggregate(&mut self, metrics: &[Self::Metric]) {
        metrics.iter().for_each(|m| self.consume(m));
    }

    /// Incorporate a single metric into the aggregate.
    fn consume(&mut self, metric: &Self::Metric);

    /// Combine two different aggregates into one.
    fn merge(&mut self, other: Self);
}

/// One retained sample within a target's series.
#[derive(Serialize, Deserialize, PartialOrd, PartialEq, Debug, Clone)]
pub struct PageSample {
    pub page: u64,
    pub elapsed: Duration,
}

/// Append-only latency series keyed by target name.
///
/// Every sample is retained with its page depth so reports can derive exact
/// percentiles, or slice by depth, after the run. Sample order within a
/// series is arbitrary once worker aggregates are merged; reports sort before
/// deriving statistics.
#[derive(Serialize, Deserialize, PartialOrd, PartialEq, Debug, Clone, Default)]
pub struct LatencyAggregate {
    pub series: BTreeMap<String, Vec<PageSample>>,
}

impl Aggregate for LatencyAggregate {
    type Metric = PageLatency;

    fn new() -> Self {
        Self::default()
    }

    fn consume(&mut self, metric: &Self::Metric) {
        self.series.entry(metric.target.clone()).or_default().push(PageSample {
            page: metric.page,
            elapsed: metric.elapsed,
        });
    }

    fn merge(&mut self, other: Self) {
        for (target, samples) in other.series {
            self.series.entry(target).or_default().extend(samples);
        }
    }
}

impl LatencyAggregate {
    /// Total number of samples across all targets.
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(target: &str, page: u64, millis: u64) -> PageLatency {
        PageLatency {
            target: target.to_string(),
            page,
            elapsed: Duration::from_millis(millis),
        }
    }

    #[test]
    fn consume_appends_per_target() {
        let mut agg = LatencyAggregate::new();
        agg.consume(&sample("postgres", 0, 12));
        agg.consume(&sample("postgres", 1, 14));
        agg.consume(&sample("valkey", 0, 3));

        assert_eq!(agg.series["postgres"].len(), 2);
        assert_eq!(agg.series["valkey"].len(), 1);
        assert_eq!(agg.len(), 3);
    }

    #[test]
    fn merge_is_commutative_over_contents() {
        let mut a = LatencyAggregate::new();
        a.consume(&sample("mysql", 0, 5));
        let mut b = LatencyAggregate::new();
        b.consume(&sample("mysql", 1, 7));
        b.consume(&sample("postgres", 0, 9));

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(ab.len(), 3);
        assert_eq!(ba.len(), 3);
        for (target, samples) in &ab.series {
            let mut lhs: Vec<u64> = samples.iter().map(|s| s.page).collect();
            let mut rhs: Vec<u64> = ba.series[target].iter().map(|s| s.page).collect();
            lhs.sort_unstable();
            rhs.sort_unstable();
            assert_eq!(lhs, rhs);
        }
    }
}
