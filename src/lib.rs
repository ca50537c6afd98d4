//! Pagewalk — a comparative load-testing harness for deep, cursor-based
//! pagination.
//!
//! Pagewalk measures how listing endpoints behave as pagination gets deep.
//! For each configured backend target it repeatedly fetches successive pages
//! of a listing endpoint — carrying the server-issued continuation token from
//! one request into the next — until the server runs out of pages, a page
//! fails, or a depth ceiling is hit, and records per-page latency so backends
//! can be compared at equivalent depths.
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`TargetRegistry`](target::TargetRegistry): named backends and their base
//!   URLs. Pure data.
//! - [`PageSource`](fetch::PageSource): the transport seam. The built-in
//!   [`HttpPageSource`](fetch::HttpPageSource) issues the paginated GETs;
//!   tests substitute scripted sources.
//! - [`Walk`](walk::Walk): the core — a strictly sequential traversal that
//!   threads the opaque continuation token, records per-page latency, and
//!   classifies how it ended ([`WalkOutcome`](walk::WalkOutcome)).
//! - [`Recorder`](recorder::Recorder) + [`Aggregate`]: the concurrency-safe
//!   append path. Walkers send samples through a channel; one aggregator task
//!   folds them into a mergeable aggregate.
//! - [`Scenario`] + [`Executor`]: glue and scheduling. The built-in
//!   [`PerVuIterations`] executor runs N virtual users × M sequential walk
//!   iterations per target under a soft deadline.
//! - [`Report`] / [`Reporter`]: derive and emit per-target latency summaries.
//!
//! Concurrency comes only from running independent walks in parallel; inside
//! a walk every request depends on the previous response's token, so the
//! sequence cannot be reordered, batched, or prefetched.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pagewalk::{
//!     PerVuIterations, Reporter, Scenario,
//!     aggregate::LatencyAggregate,
//!     fetch::HttpPageSource,
//!     metric::PageLatency,
//!     recorder::Recorder,
//!     report::{LatencyReport, StdoutReporter},
//!     target::Target,
//!     walk::Walk,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     // Build the client once and share it; constructing one per walk
//!     // would distort the measurements.
//!     let source = Arc::new(HttpPageSource::new());
//!     let target = Target::new("postgres", "http://localhost:8081");
//!     let walk = Walk::builder().build();
//!
//!     let action = move |recorder: Recorder<PageLatency>| {
//!         let source = Arc::clone(&source);
//!         let target = target.clone();
//!         async move { walk.run(source.as_ref(), &target, &recorder).await }
//!     };
//!
//!     let results = Scenario::<LatencyAggregate, _, _, _>::builder()
//!         .name("postgres")
//!         .action(action)
//!         .executor(PerVuIterations::builder().vus(10).build())
//!         .build()
//!         .run()
//!         .await
//!         .unwrap();
//!
//!     let report = LatencyReport::from(results);
//!     StdoutReporter {}.report(report).await.unwrap();
//! }
//! ```

/// Metric aggregators
pub mod aggregate;
/// Run configuration: targets and per-target scenario settings
pub mod config;
/// Orchestrators that define how walks actually run
pub mod executor;
/// One paginated request at a time, all failures as data
pub mod fetch;
/// Single metrics
pub mod metric;
/// The channel-backed latency recording pipeline
pub mod recorder;
/// Reports and Reporters
pub mod report;
/// Main module that glues everything together
pub mod scenario;
/// Named backends under measurement
pub mod target;
/// The pagination walker state machine
pub mod walk;

pub use aggregate::Aggregate;
pub use executor::{Executor, PerVuIterations};
pub use metric::Metric;
pub use report::{Report, Reporter};
pub use scenario::Scenario;
