//! Caller-owned view state for a case list.
//!
//! Each refresh is an independent one-shot fetch. Nothing orders concurrent
//! refreshes: whichever result is applied last is what the view shows.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::case::{CaseRecord, CaseStatus, Urgency};
use crate::error::PortalResult;
use crate::placeholder::placeholder_cases;
use crate::session::Session;

/// Anything that can produce the session's case list.
#[async_trait]
pub trait CaseSource: Send + Sync {
    async fn fetch_cases(&self, session: &Session) -> PortalResult<Vec<CaseRecord>>;
}

/// Outcome of a fetch that never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseFeed {
    /// Cases from the backend.
    Live(Vec<CaseRecord>),

    /// The backend failed; demo cases stand in.
    Placeholder {
        cases: Vec<CaseRecord>,
        /// User-displayable reason for the fallback.
        reason: String,
    },
}

impl CaseFeed {
    /// Turn a fetch result into a feed, substituting placeholders on failure.
    pub fn from_result(result: PortalResult<Vec<CaseRecord>>) -> Self {
        match result {
            Ok(cases) => Self::Live(cases),
            Err(e) => {
                info!(error = %e, "falling back to placeholder cases");
                Self::Placeholder {
                    cases: placeholder_cases(),
                    reason: e.user_message(),
                }
            }
        }
    }

    pub fn cases(&self) -> &[CaseRecord] {
        match self {
            Self::Live(cases) | Self::Placeholder { cases, .. } => cases,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Where the currently shown cases came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    #[default]
    None,
    Live,
    Placeholder,
}

/// Identifies one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Dashboard summary numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CaseCounts {
    pub total: usize,
    pub uploaded: usize,
    pub processed: usize,
    pub validated: usize,
    pub urgent: usize,
}

impl CaseCounts {
    /// Tally `cases` by status and urgency.
    pub fn of(cases: &[CaseRecord]) -> Self {
        let mut counts = Self {
            total: cases.len(),
            ..Default::default()
        };
        for case in cases {
            match case.status {
                CaseStatus::Uploaded => counts.uploaded += 1,
                CaseStatus::Processed => counts.processed += 1,
                CaseStatus::Validated => counts.validated += 1,
            }
            if case.urgency() == Urgency::Urgent {
                counts.urgent += 1;
            }
        }
        counts
    }
}

/// Case list as shown on a dashboard.
#[derive(Debug, Clone, Default)]
pub struct CaseView {
    cases: Vec<CaseRecord>,
    error: Option<String>,
    source: FeedSource,
    generation: u64,
    last_applied: Option<RefreshTicket>,
}

impl CaseView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh; the ticket goes back into [`CaseView::apply`].
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket(self.generation)
    }

    /// Install a result. Always overwrites, whatever order tickets arrive in.
    pub fn apply(&mut self, ticket: RefreshTicket, feed: CaseFeed) {
        if let Some(previous) = self.last_applied {
            if previous > ticket {
                debug!(
                    applied = ticket.0,
                    previous = previous.0,
                    "older refresh resolved last and replaces newer result"
                );
            }
        }

        match feed {
            CaseFeed::Live(cases) => {
                self.cases = cases;
                self.error = None;
                self.source = FeedSource::Live;
            }
            CaseFeed::Placeholder { cases, reason } => {
                self.cases = cases;
                self.error = Some(reason);
                self.source = FeedSource::Placeholder;
            }
        }
        self.last_applied = Some(ticket);
    }

    /// Fetch from `source` and apply, falling back to placeholders.
    pub async fn refresh(&mut self, source: &dyn CaseSource, session: &Session) {
        let ticket = self.begin_refresh();
        let feed = CaseFeed::from_result(source.fetch_cases(session).await);
        self.apply(ticket, feed);
    }

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    /// Message for the error panel, if the last refresh failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> FeedSource {
        self.source
    }

    pub fn last_applied(&self) -> Option<RefreshTicket> {
        self.last_applied
    }

    pub fn urgent(&self) -> impl Iterator<Item = &CaseRecord> {
        self.cases
            .iter()
            .filter(|c| c.urgency() == Urgency::Urgent)
    }

    pub fn routine(&self) -> impl Iterator<Item = &CaseRecord> {
        self.cases
            .iter()
            .filter(|c| c.urgency() == Urgency::Routine)
    }

    pub fn counts(&self) -> CaseCounts {
        CaseCounts::of(&self.cases)
    }
}
