//! One paginated request against one target.
//!
//! The fetcher is stateless across calls and never fails with an `Err`: every
//! outcome — success, unexpected status, transport error, malformed body — is
//! represented as data in [`PageResult`] so the walker can classify it. The
//! continuation token is treated as an opaque blob: extracted from the body,
//! passed back verbatim on the next request, never inspected.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::target::Target;

/// One page request, constructed fresh each walk iteration.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub target: &'a Target,
    pub page_size: u32,
    /// Opaque continuation token from the previous page; empty at the start
    /// of a sequence.
    pub cursor: &'a str,
}

/// Normalized result of one page request. Consumed immediately by the walker,
/// never retained.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub status_ok: bool,
    /// HTTP status when a response arrived; `None` on transport failure.
    pub http_status: Option<u16>,
    /// Wall-clock time for the full call (send through body read), measured
    /// regardless of outcome.
    pub elapsed: Duration,
    /// Continuation token for the next page. `None` means the listing is
    /// exhausted; absent and empty-string tokens are both normalized to
    /// `None` here so the walker sees one representation.
    pub next_cursor: Option<String>,
    /// Raw body, kept for diagnostics where available.
    pub body: Option<String>,
}

/// Seam between the walker and the transport. Walkers are generic over this,
/// so the state machine is testable without a network.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: PageRequest<'_>) -> PageResult;
}

/// The only field the harness reads out of a listing response. Items are
/// carried but not inspected.
#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    continuation_token: String,
}

/// reqwest-backed [`PageSource`] issuing
/// `GET {base_url}/stores?page_size=N[&continuation_token=...]`.
#[derive(Debug, Clone, Default)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client. Build the client once per process and share
    /// it; constructing one per walk would distort the measurements.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, request: PageRequest<'_>) -> PageResult {
        let url = format!("{}/stores", request.target.base_url);
        let mut get = self
            .client
            .get(&url)
            .query(&[("page_size", request.page_size.to_string())]);
        if !request.cursor.is_empty() {
            get = get.query(&[("continuation_token", request.cursor)]);
        }

        let start = Instant::now();
        let response = match get.send().await {
            Ok(response) => response,
            Err(err) => {
                return PageResult {
                    status_ok: false,
                    http_status: err.status().map(|s| s.as_u16()),
                    elapsed: start.elapsed(),
                    next_cursor: None,
                    body: None,
                };
            }
        };

        let status = response.status();
        let body = response.text().await;
        let elapsed = start.elapsed();

        match body {
            Ok(body) if status == StatusCode::OK => {
                match serde_json::from_str::<ListingPage>(&body) {
                    Ok(page) => PageResult {
                        status_ok: true,
                        http_status: Some(status.as_u16()),
                        elapsed,
                        next_cursor: (!page.continuation_token.is_empty())
                            .then_some(page.continuation_token),
                        body: Some(body),
                    },
                    // A 200 we cannot parse is as dead an end as a 500
                    Err(_) => PageResult {
                        status_ok: false,
                        http_status: Some(status.as_u16()),
                        elapsed,
                        next_cursor: None,
                        body: Some(body),
                    },
                }
            }
            Ok(body) => PageResult {
                status_ok: false,
                http_status: Some(status.as_u16()),
                elapsed,
                next_cursor: None,
                body: Some(body),
            },
            Err(_) => PageResult {
                status_ok: false,
                http_status: Some(status.as_u16()),
                elapsed,
                next_cursor: None,
                body: None,
            },
        }
    }
}
