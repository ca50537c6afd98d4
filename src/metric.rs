use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A `Metric` is a single observed measurement produced while exercising a
/// target. Metrics are the most granular level of data the harness handles;
/// they are collected by an [`crate::Aggregate`] and summarized by a
/// [`crate::Report`].
pub trait Metric
where
    Self: Serialize + DeserializeOwned + PartialOrd + PartialEq + Send + Sync + Debug + Clone,
{
}

/// One latency observation for one page of one walk: which backend, how deep
/// into the listing, and how long the request took.
///
/// Append-only once emitted; nothing downstream mutates or removes samples.
#[derive(Serialize, Deserialize, PartialOrd, PartialEq, Debug, Clone)]
pub struct PageLatency {
    pub target: String,
    /// 0-based page depth within the walk that produced this sample.
    pub page: u64,
    pub elapsed: Duration,
}

impl Metric for PageLatency {}
