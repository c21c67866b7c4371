use async_trait::async_trait;
use bytes::Bytes;
use interfaces_github_issue_comments::models::IssueComment;
use tracing::{debug, info, warn};

use crate::tally::Tally;

/// What a single page request produced.
#[derive(Debug)]
pub enum PageOutcome {
    Success(Vec<IssueComment>),
    TransportFailure { reason: String },
    DecodeFailure { reason: String, raw: Bytes },
}

#[async_trait]
pub trait PageSource {
    /// Pages are numbered from 1.
    async fn fetch_page(&mut self, page: u32) -> PageOutcome;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminationPolicy {
    /// Upper bound on requests issued, failed ones included.
    pub max_pages: Option<u32>,
    /// Consecutive failed pages skipped before giving up.
    pub max_failures: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with zero comments.
    Exhausted,
    PageLimit,
    TooManyFailures,
}

#[derive(Debug)]
pub struct RunSummary {
    pub tally: Tally,
    pub pages_requested: u32,
    pub failures: u32,
    pub stop_reason: StopReason,
}

/// Fetches pages 1, 2, ... folding every comment into a fresh tally until an
/// empty page arrives or `policy` says to stop.
pub async fn run<S>(source: &mut S, policy: TerminationPolicy) -> RunSummary
where
    S: PageSource + ?Sized + Send,
{
    run_from(source, policy, 1).await
}

async fn run_from<S>(source: &mut S, policy: TerminationPolicy, first_page: u32) -> RunSummary
where
    S: PageSource + ?Sized + Send,
{
    let mut tally = Tally::new();
    let mut pages_requested = 0u32;
    let mut failures = 0u32;
    let mut consecutive_failures = 0u32;
    let mut page = first_page;

    let stop_reason = loop {
        if policy.max_pages.is_some_and(|max| pages_requested >= max) {
            warn!(pages_requested, "Page limit reached before an empty page");
            break StopReason::PageLimit;
        }

        let outcome = source.fetch_page(page).await;
        pages_requested = pages_requested.saturating_add(1);

        match outcome {
            PageOutcome::Success(comments) if comments.is_empty() => {
                debug!(page, "Empty page");
                break StopReason::Exhausted;
            }
            PageOutcome::Success(comments) => {
                debug!(page, comments = comments.len(), "Folding page");
                tally.fold(&comments);
                consecutive_failures = 0;
            }
            PageOutcome::TransportFailure { reason } => {
                warn!(page, %reason, "Page request failed");
                failures += 1;
                consecutive_failures += 1;
            }
            PageOutcome::DecodeFailure { reason, raw } => {
                warn!(page, %reason, bytes = raw.len(), "Page could not be decoded");
                failures += 1;
                consecutive_failures += 1;
            }
        }

        if consecutive_failures > policy.max_failures {
            warn!(page, consecutive_failures, "Giving up after failed pages");
            break StopReason::TooManyFailures;
        }

        page = match page.checked_add(1) {
            Some(next) => next,
            None => {
                warn!(page, "Page numbers exhausted");
                break StopReason::PageLimit;
            }
        };
    };

    info!(
        pages_requested,
        failures,
        ?stop_reason,
        authors = tally.len(),
        comments = tally.total(),
        "Pagination finished"
    );

    RunSummary {
        tally,
        pages_requested,
        failures,
        stop_reason,
    }
}
