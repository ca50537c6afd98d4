//! Executor — orchestration of scenario execution.
//!
//! The `Executor` trait is the runtime hook that executes a `Scenario`.
//! Executors own concurrency and scheduling; the walk action stays oblivious
//! to how many copies of it run or when. The built-in [`PerVuIterations`]
//! executor reproduces the classic per-VU-iterations model: a fixed pool of
//! virtual users, each performing a fixed number of sequential walk
//! iterations under a soft wall-clock deadline.

pub mod per_vu;
pub use per_vu::PerVuIterations;

use std::future::Future;

use crate::aggregate::Aggregate;
use crate::recorder::Recorder;
use crate::scenario::Scenario;
use crate::walk::WalkSummary;

pub trait Executor<A, F, Fut>
where
    Self: Send + Sync + Sized,
    A: Aggregate,
    F: Fn(Recorder<A::Metric>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = WalkSummary> + Send,
{
    /// Execute the scenario and return the final aggregate.
    fn exec(
        &self,
        scenario: &Scenario<A, Self, F, Fut>,
    ) -> impl Future<Output = Result<A, Box<dyn std::error::Error>>> + Send;
}
