//! The per-VU-iterations executor.
//!
//! # High-level flow
//! 1. Open the recording channel and spawn the aggregator task.
//! 2. Spawn `vus` virtual-user tasks. Each runs `iterations` sequential
//!    invocations of the scenario action, handing every invocation a clone of
//!    the recorder; the returned [`WalkSummary`] is logged per walk.
//! 3. Before starting an iteration, the task checks the shared deadline.
//!    `max_duration` is a soft cutoff: once it passes, no new iteration
//!    starts, but the iteration in flight finishes on its own terms (the
//!    transport's timeout policy bounds any hung request).
//! 4. Join all virtual users, drop the last recorder handle to close the
//!    channel, and return the aggregator's final result.
//!
//! Virtual users share nothing but the recorder handle and the deadline;
//! every walk's cursor state lives inside its own action invocation.

use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::task::JoinHandle;
use typed_builder::TypedBuilder;

use super::Executor;
use crate::aggregate::Aggregate;
use crate::recorder::{Recorder, aggregator_task};
use crate::scenario::Scenario;
use crate::walk::{WalkOutcome, WalkSummary};

/// Fixed pool of virtual users, each running a fixed number of sequential
/// iterations, bounded by a soft wall-clock deadline.
///
/// Defaults mirror a deep-pagination comparison run: 10 virtual users, one
/// walk each, at most 10 minutes.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct PerVuIterations {
    #[builder(default = 10)]
    pub vus: usize,
    #[builder(default = 1)]
    pub iterations: usize,
    #[builder(default = Duration::from_secs(600))]
    pub max_duration: Duration,
    /// Recorder channel capacity; also the aggregator's drain batch size.
    #[builder(default = 256)]
    pub channel_capacity: usize,
}

impl<A, F, Fut> Executor<A, F, Fut> for PerVuIterations
where
    A: Aggregate + 'static,
    F: Fn(Recorder<A::Metric>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = WalkSummary> + Send,
{
    async fn exec(
        &self,
        scenario: &Scenario<A, Self, F, Fut>,
    ) -> Result<A, Box<dyn std::error::Error>> {
        let (recorder, rx) = Recorder::channel(self.channel_capacity);
        let aggregator = tokio::spawn(aggregator_task::<A>(rx, self.channel_capacity));
        let deadline = Instant::now() + self.max_duration;
        let iterations = self.iterations;

        tracing::info!(
            scenario = %scenario.name,
            vus = self.vus,
            iterations,
            max_duration_secs = self.max_duration.as_secs(),
            "spawning virtual users"
        );
        let handles: Vec<JoinHandle<()>> = (0..self.vus)
            .map(|vu| {
                let action = scenario.action.clone();
                let recorder = recorder.clone();
                let scenario_name = scenario.name.clone();
                tokio::spawn(async move {
                    for iteration in 0..iterations {
                        if Instant::now() >= deadline {
                            tracing::warn!(
                                scenario = %scenario_name,
                                vu,
                                iteration,
                                "max duration reached, not starting further walks"
                            );
                            break;
                        }
                        let summary = action(recorder.clone()).await;
                        match summary.outcome {
                            WalkOutcome::Failed => tracing::error!(
                                scenario = %scenario_name,
                                vu,
                                iteration,
                                backend = %summary.target,
                                pages = summary.pages,
                                "walk failed"
                            ),
                            outcome => tracing::info!(
                                scenario = %scenario_name,
                                vu,
                                iteration,
                                backend = %summary.target,
                                pages = summary.pages,
                                ?outcome,
                                "walk finished"
                            ),
                        }
                    }
                })
            })
            .collect();

        for joined in join_all(handles).await {
            joined.expect("virtual user task panicked");
        }
        // Last sender gone; the aggregator drains what is queued and returns
        drop(recorder);
        let aggregate = aggregator.await?;

        tracing::info!(scenario = %scenario.name, "done running scenario");
        Ok(aggregate)
    }
}
