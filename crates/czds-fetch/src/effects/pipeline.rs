use std::sync::Arc;
use std::time::Instant;

use czds_api::Session;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::data::{FetchOptions, Outcome, Report, RunSummary, Stage, WorkItem};
use crate::effects::pool::WorkerPool;
use crate::effects::probe::probe;
use crate::effects::ticket::Ticket;
use crate::effects::transfer::transfer;
use crate::error::FetchError;

type Observer = Arc<dyn Fn(&Report) + Send + Sync>;

/// Two-stage fetch coordinator.
///
/// Zones are probed by `probe_workers` tasks and downloaded by
/// `transfer_workers` tasks, connected by bounded queues. A run returns once
/// every submitted zone has settled.
///
/// # Examples
///
/// ```ignore
/// let pipeline = Pipeline::new(Arc::new(session), FetchOptions::default())
///     .on_report(|report| println!("{}: {:?}", report.url, report.outcome));
/// let summary = pipeline.run(urls).await;
/// assert_eq!(summary.outstanding(), 0);
/// ```
pub struct Pipeline<S> {
    session: Arc<S>,
    options: FetchOptions,
    observer: Option<Observer>,
}

impl<S: Session + 'static> Pipeline<S> {
    pub fn new(session: Arc<S>, options: FetchOptions) -> Self {
        Self {
            session,
            options,
            observer: None,
        }
    }

    /// Call `observer` for every report as it settles.
    pub fn on_report(mut self, observer: impl Fn(&Report) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Fetch every zone URL and wait for all of them to settle.
    pub async fn run<I>(&self, urls: I) -> RunSummary
    where
        I: IntoIterator<Item = String>,
    {
        self.run_until_cancelled(urls, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), stopping early once `cancel` fires.
    ///
    /// Zones not yet transferred settle as [`Outcome::Cancelled`]; their
    /// staging files are removed.
    pub async fn run_until_cancelled<I>(&self, urls: I, cancel: CancellationToken) -> RunSummary
    where
        I: IntoIterator<Item = String>,
    {
        let started = Instant::now();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel::<Report>();

        let observer = self.observer.clone();
        let collector = tokio::spawn(async move {
            let mut reports = Vec::new();
            while let Some(report) = report_rx.recv().await {
                if let Some(observer) = &observer {
                    observer(&report);
                }
                reports.push(report);
            }
            reports
        });

        let session = Arc::clone(&self.session);
        let token = cancel.clone();
        let (transfer_tx, transfers) = WorkerPool::spawn(
            "transfer",
            self.options.transfer_workers,
            self.options.queue_capacity,
            move |(ticket, item): (Ticket, WorkItem)| {
                let session = Arc::clone(&session);
                let cancel = token.clone();
                async move { transfer_one(session.as_ref(), ticket, item, &cancel).await }
            },
        );

        // The probe handler owns the only transfer sender: once the probe
        // workers exit, the transfer queue closes.
        let session = Arc::clone(&self.session);
        let options = Arc::new(self.options.clone());
        let token = cancel.clone();
        let (probe_tx, probes) = WorkerPool::spawn(
            "probe",
            self.options.probe_workers,
            self.options.queue_capacity,
            move |ticket: Ticket| {
                let session = Arc::clone(&session);
                let options = Arc::clone(&options);
                let transfers = transfer_tx.clone();
                let cancel = token.clone();
                async move { probe(session.as_ref(), ticket, &options, &transfers, &cancel).await }
            },
        );

        let mut submitted = 0;
        for url in urls {
            submitted += 1;
            let ticket = Ticket::new(url, report_tx.clone());
            if cancel.is_cancelled() {
                ticket.settle(Outcome::Cancelled);
                continue;
            }
            if let Err(mpsc::error::SendError(ticket)) = probe_tx.send(ticket).await {
                ticket.settle(Outcome::Failed {
                    stage: Stage::Probe,
                    error: FetchError::QueueClosed,
                });
            }
        }
        drop(probe_tx);
        drop(report_tx);

        probes.join().await;
        transfers.join().await;
        let reports = match collector.await {
            Ok(reports) => reports,
            Err(e) => {
                error!("report collector failed: {e}");
                Vec::new()
            }
        };

        let summary = RunSummary { submitted, reports };
        info!(
            submitted,
            transferred = summary.transferred(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            cancelled = summary.cancelled(),
            bytes = summary.bytes(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetch run finished"
        );
        summary
    }
}

async fn transfer_one<S: Session>(
    session: &S,
    ticket: Ticket,
    item: WorkItem,
    cancel: &CancellationToken,
) {
    match transfer(session, &item, cancel).await {
        Ok(bytes) => ticket.settle(Outcome::Transferred { bytes }),
        Err(FetchError::Cancelled) => ticket.settle(Outcome::Cancelled),
        Err(e) => {
            warn!(
                url = %item.url,
                expected = ?item.api_length,
                "unable to transfer zone: {e}"
            );
            ticket.settle(Outcome::Failed {
                stage: Stage::Transfer,
                error: e,
            });
        }
    }
}
