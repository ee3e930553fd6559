use tokio::sync::mpsc;
use tracing::error;

use crate::data::{Outcome, Report};

/// Obligation to report the outcome of one submitted zone.
///
/// A ticket travels with its zone from stage to stage and settles exactly
/// once. Dropping it unsettled, for instance when a worker panics, reports
/// [`Outcome::Abandoned`] so the run can still complete.
#[derive(Debug)]
pub struct Ticket {
    url: String,
    reports: Option<mpsc::UnboundedSender<Report>>,
}

impl Ticket {
    pub fn new(url: impl Into<String>, reports: mpsc::UnboundedSender<Report>) -> Self {
        Self {
            url: url.into(),
            reports: Some(reports),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn settle(mut self, outcome: Outcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: Outcome) {
        if let Some(reports) = self.reports.take() {
            let report = Report {
                url: std::mem::take(&mut self.url),
                outcome,
            };
            if reports.send(report).is_err() {
                error!("report collector gone; outcome lost");
            }
        }
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if self.reports.is_some() {
            error!(url = %self.url, "zone dropped without an outcome");
            self.send(Outcome::Abandoned);
        }
    }
}
