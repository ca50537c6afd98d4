use std::sync::Arc;

use reqwest::Client;
use tracing_subscriber::EnvFilter;

use pagewalk::aggregate::{Aggregate, LatencyAggregate};
use pagewalk::config::HarnessConfig;
use pagewalk::executor::PerVuIterations;
use pagewalk::fetch::HttpPageSource;
use pagewalk::metric::PageLatency;
use pagewalk::recorder::Recorder;
use pagewalk::report::{JsonReporter, LatencyReport, Reporter, StdoutReporter};
use pagewalk::scenario::Scenario;
use pagewalk::walk::Walk;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagewalk=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => HarnessConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => HarnessConfig::default(),
    };
    let registry = config.registry();

    // One client for the whole process, cloned into every walk
    let source = Arc::new(HttpPageSource::with_client(Client::new()));
    let walk = Walk::builder().build();

    let mut runs = Vec::new();
    for scenario_config in &config.scenarios {
        // Unknown targets are fatal before any walk starts
        let target = registry.resolve(&scenario_config.target)?.clone();
        let source = Arc::clone(&source);

        let action = move |recorder: Recorder<PageLatency>| {
            let source = Arc::clone(&source);
            let target = target.clone();
            async move { walk.run(source.as_ref(), &target, &recorder).await }
        };

        runs.push(
            Scenario::<LatencyAggregate, _, _, _>::builder()
                .name(scenario_config.target.clone())
                .action(action)
                .executor(
                    PerVuIterations::builder()
                        .vus(scenario_config.vus)
                        .iterations(scenario_config.iterations)
                        .max_duration(scenario_config.max_duration())
                        .build(),
                )
                .build(),
        );
    }

    // Scenarios run in parallel; walks only ever compete with walks
    let results = futures::future::join_all(runs.iter_mut().map(|scenario| scenario.run())).await;
    let mut merged = LatencyAggregate::new();
    for result in results {
        merged.merge(result?);
    }

    let report = LatencyReport::from(merged);
    if std::env::var_os("PAGEWALK_JSON").is_some() {
        JsonReporter {}.report(report).await?;
    } else {
        StdoutReporter {}.report(report).await?;
    }
    Ok(())
}
