use std::future::Future;
use std::marker::PhantomData;

use typed_builder::TypedBuilder;

use crate::aggregate::Aggregate;
use crate::executor::Executor;
use crate::recorder::Recorder;
use crate::walk::WalkSummary;

/// Glue that ties one benchmarked backend together: a name, the walk action
/// to measure, and the executor that schedules it.
///
/// The action receives a [`Recorder`] handle on every invocation and emits
/// its per-page samples through it; the [`WalkSummary`] it returns is the
/// walk's terminal classification, logged by the executor.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Scenario<A, E, F, Fut>
where
    A: Aggregate,
    E: Executor<A, F, Fut> + Send + Sync,
    F: Fn(Recorder<A::Metric>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = WalkSummary> + Send,
{
    #[builder(setter(into))]
    pub name: String,
    pub action: F,
    pub executor: E,
    #[builder(default, setter(skip))]
    aggregator: PhantomData<A>,
}

impl<A, E, F, Fut> Scenario<A, E, F, Fut>
where
    A: Aggregate,
    E: Executor<A, F, Fut> + Send + Sync,
    F: Fn(Recorder<A::Metric>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = WalkSummary> + Send,
{
    pub async fn run(&mut self) -> Result<A, Box<dyn std::error::Error>> {
        self.executor.exec(self).await
    }
}
