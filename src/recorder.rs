//! The shared latency-recording pipeline.
//!
//! This is the one place the harness needs shared mutable state: every
//! concurrent walker appends samples to the same distribution. Appends are
//! serialized through an mpsc channel — walkers hold a cheap cloneable
//! [`Recorder`] handle, and a single [`aggregator_task`] drains the channel
//! into an [`Aggregate`]. No sample is lost as long as the channel is drained,
//! and no walker ever sees another walker's state.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::aggregate::Aggregate;
use crate::metric::{Metric, PageLatency};

/// Sending half of the recording pipeline. Clone one per walker.
#[derive(Debug, Clone)]
pub struct Recorder<M: Metric> {
    tx: mpsc::Sender<M>,
}

impl<M: Metric> Recorder<M> {
    /// Create a recorder and the receiving end to hand to [`aggregator_task`].
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<M>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Append one metric. A send only fails once the aggregator has shut
    /// down, at which point the run is already over.
    pub async fn send(&self, metric: M) {
        if self.tx.send(metric).await.is_err() {
            tracing::debug!("recorder channel closed, sample dropped");
        }
    }
}

impl Recorder<PageLatency> {
    /// Append one page-latency observation for `target` at depth `page`.
    pub async fn record(&self, target: &str, page: u64, elapsed: Duration) {
        self.send(PageLatency {
            target: target.to_string(),
            page,
            elapsed,
        })
        .await;
    }
}

/// Tokio task for efficient metric aggregation.
///
/// Waits for the first available metric, then opportunistically drains up to
/// `batch_size` more before aggregating, so bursts from many walkers are
/// folded in batches instead of one lock-step message at a time. Returns the
/// final aggregate when every [`Recorder`] handle has been dropped.
pub async fn aggregator_task<A: Aggregate>(
    mut rx: mpsc::Receiver<A::Metric>,
    batch_size: usize,
) -> A {
    let mut agg = A::new();
    let mut batch = Vec::with_capacity(batch_size);

    loop {
        // Receive the first metric or end the loop once all senders are gone
        match rx.recv().await {
            Some(metric) => batch.push(metric),
            None => break,
        }

        // Drain whatever else is already queued
        while batch.len() < batch_size {
            match rx.try_recv() {
                Ok(metric) => batch.push(metric),
                Err(_) => break,
            }
        }

        if !batch.is_empty() {
            agg.aggregate(&batch);
            batch.clear();
        }
    }
    agg
}
