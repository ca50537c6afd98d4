//! The pagination walker — the harness core.
//!
//! A walk is one stateful traversal of one target's listing endpoint: fetch a
//! page, record its latency, carry the server-issued continuation token into
//! the next request, repeat. The walk is strictly sequential — request N+1
//! cannot be issued until request N's token has been extracted, so this is a
//! hard data dependency, not a scheduling choice. Concurrency comes from
//! running many independent walks, never from parallelism inside one walk.
//!
//! # State machine
//!
//! ```text
//! Start → Fetching → Continuing ──→ Fetching (cursor updated)
//!                  ├→ Exhausted        (no continuation token)
//!                  ├→ PageLimitReached (ceiling hit, token still present)
//!                  └→ Failed           (non-success page; fail-fast)
//! ```
//!
//! A failed page invalidates the cursor chain — there is no safe way to skip
//! it and continue — so the walk stops on the first non-success result with
//! no retry. The failed page contributes no latency sample.
//!
//! # Cursor handling
//!
//! The continuation token is an opaque blob owned by exactly one walk at a
//! time. It is threaded by value from one response into the next request and
//! never parsed, constructed, or shared across walks; every walk starts its
//! own traversal from the empty cursor.

use typed_builder::TypedBuilder;

use crate::fetch::{PageRequest, PageSource};
use crate::metric::PageLatency;
use crate::recorder::Recorder;
use crate::target::Target;

/// Items requested per page for the life of a walk.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Walk ceiling: up to 100_000 items deep at the default page size.
pub const DEFAULT_PAGE_LIMIT: u64 = 2000;

/// Terminal classification of a completed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The server stopped issuing continuation tokens: the full depth of the
    /// listing was measured.
    Exhausted,
    /// The page ceiling was hit while a token was still present. A
    /// bounded-effort cutoff, not an error; reported distinctly so consumers
    /// can tell "measured to the true end" from "measured up to the cap".
    PageLimitReached,
    /// A page came back non-success and ended the walk.
    Failed,
}

/// What a finished walk hands back to its caller: the classification plus how
/// many pages were successfully measured. Logging and metrics are call-site
/// concerns driven off this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSummary {
    pub target: String,
    pub outcome: WalkOutcome,
    /// Number of pages that recorded a latency sample. Page indices are
    /// contiguous from 0, so this is also one past the deepest sampled page.
    pub pages: u64,
}

/// One bounded pagination traversal, generic over the transport seam.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct Walk {
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
    #[builder(default = DEFAULT_PAGE_LIMIT)]
    pub page_limit: u64,
}

impl Walk {
    /// Run the traversal to one of its three terminal states, recording one
    /// latency sample per successful page.
    pub async fn run<S: PageSource + ?Sized>(
        &self,
        source: &S,
        target: &Target,
        recorder: &Recorder<PageLatency>,
    ) -> WalkSummary {
        let mut cursor = String::new();
        let mut page: u64 = 0;

        while page < self.page_limit {
            let result = source
                .fetch_page(PageRequest {
                    target,
                    page_size: self.page_size,
                    cursor: &cursor,
                })
                .await;

            if !result.status_ok {
                tracing::error!(
                    backend = %target.name,
                    page,
                    status = result.http_status,
                    body = result.body.as_deref().unwrap_or(""),
                    "page request failed, ending walk"
                );
                return WalkSummary {
                    target: target.name.clone(),
                    outcome: WalkOutcome::Failed,
                    pages: page,
                };
            }

            recorder.record(&target.name, page, result.elapsed).await;

            match result.next_cursor {
                Some(next) => {
                    cursor = next;
                    page += 1;
                }
                None => {
                    tracing::info!(backend = %target.name, page, "no more pages");
                    return WalkSummary {
                        target: target.name.clone(),
                        outcome: WalkOutcome::Exhausted,
                        pages: page + 1,
                    };
                }
            }
        }

        tracing::info!(
            backend = %target.name,
            pages = page,
            "page limit reached with continuation token still present"
        );
        WalkSummary {
            target: target.name.clone(),
            outcome: WalkOutcome::PageLimitReached,
            pages: page,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::fetch::PageResult;

    /// Replays a fixed list of page results and records every cursor it was
    /// handed, so tests can check the token threading exactly.
    struct ScriptedSource {
        pages: Vec<PageResult>,
        cursors_seen: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<PageResult>) -> Self {
            Self { pages, cursors_seen: Mutex::new(Vec::new()) }
        }

        fn cursors_seen(&self) -> Vec<String> {
            self.cursors_seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, request: PageRequest<'_>) -> PageResult {
            let mut seen = self.cursors_seen.lock().unwrap();
            let call = seen.len();
            seen.push(request.cursor.to_string());
            self.pages[call].clone()
        }
    }

    fn ok_page(token: Option<&str>, millis: u64) -> PageResult {
        PageResult {
            status_ok: true,
            http_status: Some(200),
            elapsed: Duration::from_millis(millis),
            next_cursor: token.map(str::to_string),
            body: None,
        }
    }

    fn failed_page(status: u16) -> PageResult {
        PageResult {
            status_ok: false,
            http_status: Some(status),
            elapsed: Duration::from_millis(1),
            next_cursor: None,
            body: Some("boom".to_string()),
        }
    }

    fn test_target() -> Target {
        Target::new("scripted", "http://unused.invalid")
    }

    async fn drain(mut rx: mpsc::Receiver<PageLatency>) -> Vec<PageLatency> {
        let mut samples = Vec::new();
        while let Some(sample) = rx.recv().await {
            samples.push(sample);
        }
        samples
    }

    #[tokio::test]
    async fn exhausted_walk_records_contiguous_pages_and_threads_cursors() {
        let source = ScriptedSource::new(vec![
            ok_page(Some("a"), 10),
            ok_page(Some("b"), 11),
            ok_page(None, 12),
        ]);
        let (recorder, rx) = Recorder::channel(64);
        let target = test_target();

        let summary = Walk::builder().build().run(&source, &target, &recorder).await;
        drop(recorder);

        assert_eq!(summary.outcome, WalkOutcome::Exhausted);
        assert_eq!(summary.pages, 3);
        assert_eq!(source.cursors_seen(), vec!["", "a", "b"]);

        let samples = drain(rx).await;
        let pages: Vec<u64> = samples.iter().map(|s| s.page).collect();
        assert_eq!(pages, vec![0, 1, 2]);
        assert!(samples.iter().all(|s| s.target == "scripted"));
    }

    #[tokio::test]
    async fn empty_token_page_still_gets_a_sample() {
        // A single page with no token: one fetch, one sample, exhausted
        let source = ScriptedSource::new(vec![ok_page(None, 5)]);
        let (recorder, rx) = Recorder::channel(16);

        let summary = Walk::builder().build().run(&source, &test_target(), &recorder).await;
        drop(recorder);

        assert_eq!(summary.outcome, WalkOutcome::Exhausted);
        assert_eq!(summary.pages, 1);
        assert_eq!(drain(rx).await.len(), 1);
    }

    #[tokio::test]
    async fn failed_page_ends_walk_without_a_sample_for_it() {
        let source = ScriptedSource::new(vec![
            ok_page(Some("a"), 10),
            ok_page(Some("b"), 11),
            failed_page(500),
        ]);
        let (recorder, rx) = Recorder::channel(64);

        let summary = Walk::builder().build().run(&source, &test_target(), &recorder).await;
        drop(recorder);

        assert_eq!(summary.outcome, WalkOutcome::Failed);
        assert_eq!(summary.pages, 2);
        let samples = drain(rx).await;
        assert_eq!(samples.iter().map(|s| s.page).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[tokio::test]
    async fn failure_on_first_page_records_nothing() {
        let source = ScriptedSource::new(vec![failed_page(404)]);
        let (recorder, rx) = Recorder::channel(16);

        let summary = Walk::builder().build().run(&source, &test_target(), &recorder).await;
        drop(recorder);

        assert_eq!(summary.outcome, WalkOutcome::Failed);
        assert_eq!(summary.pages, 0);
        assert!(drain(rx).await.is_empty());
    }

    #[tokio::test]
    async fn page_limit_cuts_off_an_endless_token_chain() {
        let limit = 5;
        let source = ScriptedSource::new(
            (0..limit).map(|i| ok_page(Some(&format!("t{i}")), 1)).collect(),
        );
        let (recorder, rx) = Recorder::channel(64);

        let summary = Walk::builder()
            .page_limit(limit as u64)
            .build()
            .run(&source, &test_target(), &recorder)
            .await;
        drop(recorder);

        assert_eq!(summary.outcome, WalkOutcome::PageLimitReached);
        assert_eq!(summary.pages, limit as u64);
        // exactly `limit` fetches, every one sampled
        assert_eq!(source.cursors_seen().len(), limit);
        assert_eq!(drain(rx).await.len(), limit);
    }

    #[tokio::test]
    async fn concurrent_walks_keep_cursors_isolated() {
        // Two walks over sources issuing different token chains; each walk
        // must see only its own chain.
        let chain_a = ScriptedSource::new(vec![ok_page(Some("a1"), 1), ok_page(None, 1)]);
        let chain_b = ScriptedSource::new(vec![
            ok_page(Some("b1"), 1),
            ok_page(Some("b2"), 1),
            ok_page(None, 1),
        ]);
        let (recorder, rx) = Recorder::channel(64);
        let target = test_target();

        let walk = Walk::builder().build();
        let (a, b) = tokio::join!(
            walk.run(&chain_a, &target, &recorder),
            walk.run(&chain_b, &target, &recorder),
        );
        drop(recorder);

        assert_eq!(a.outcome, WalkOutcome::Exhausted);
        assert_eq!(b.outcome, WalkOutcome::Exhausted);
        assert_eq!(chain_a.cursors_seen(), vec!["", "a1"]);
        assert_eq!(chain_b.cursors_seen(), vec!["", "b1", "b2"]);
        assert_eq!(drain(rx).await.len(), 5);
    }
}
