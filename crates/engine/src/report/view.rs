//! Output slot of a report screen.
//!
//! Refreshes are not cancelled: a slow load can finish after a newer one.
//! Every refresh takes a [`Ticket`] carrying a generation number, and only the
//! newest generation may write the slot. Older completions are dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use super::{Reconciler, Report, ReportRow};
use crate::{MoneyCents, ResultEngine};

/// Generation tag of one refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// User-visible message about a failed refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// What happened to a completed refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// New rows and total are displayed.
    Applied,
    /// The refresh failed; previous rows stay and a notice is set.
    Failed,
    /// A newer refresh was started meanwhile; the result was dropped.
    Stale,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub rows: Vec<ReportRow>,
    pub total: MoneyCents,
    pub loading: bool,
    pub notice: Option<Notice>,
    /// Generation of the refresh that produced `rows`, 0 before the first one.
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct ReportView {
    latest: AtomicU64,
    state: RwLock<ReportSnapshot>,
}

impl ReportView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh and marks the view as loading.
    pub async fn begin(&self) -> Ticket {
        let mut state = self.state.write().await;
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        state.loading = true;
        Ticket(generation)
    }

    /// Stores the outcome of the refresh identified by `ticket`.
    pub async fn complete(&self, ticket: Ticket, result: ResultEngine<Report>) -> Completion {
        let mut state = self.state.write().await;
        if ticket.0 != self.latest.load(Ordering::SeqCst) {
            tracing::debug!(
                generation = ticket.0,
                latest = self.latest.load(Ordering::SeqCst),
                "dropping stale report result"
            );
            return Completion::Stale;
        }

        state.loading = false;
        match result {
            Ok(report) => {
                state.rows = report.rows;
                state.total = report.total;
                state.notice = None;
                state.generation = ticket.0;
                Completion::Applied
            }
            Err(err) => {
                tracing::error!(generation = ticket.0, "failed to load report: {err}");
                state.notice = Some(Notice {
                    message: format!("Could not load the report: {err}"),
                });
                Completion::Failed
            }
        }
    }

    /// Runs one full refresh through `reconciler`.
    pub async fn refresh(&self, reconciler: &Reconciler<'_>) -> Completion {
        let ticket = self.begin().await;
        let result = reconciler.load().await;
        self.complete(ticket, result).await
    }

    pub async fn snapshot(&self) -> ReportSnapshot {
        self.state.read().await.clone()
    }
}
