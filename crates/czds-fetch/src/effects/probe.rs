use std::io::ErrorKind;

use czds_api::Session;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::data::{Decision, FetchOptions, LocalFileState, Outcome, Stage, WorkItem};
use crate::effects::ticket::Ticket;
use crate::error::FetchError;
use crate::plan;

/// Look up one zone and either settle it as skipped or queue it for transfer.
pub(crate) async fn probe<S: Session>(
    session: &S,
    ticket: Ticket,
    options: &FetchOptions,
    transfers: &mpsc::Sender<(Ticket, WorkItem)>,
    cancel: &CancellationToken,
) {
    if cancel.is_cancelled() {
        ticket.settle(Outcome::Cancelled);
        return;
    }

    let url = ticket.url().to_owned();
    let details = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            ticket.settle(Outcome::Cancelled);
            return;
        }
        result = session.details(&url) => result,
    };
    let details = match details {
        Ok(details) => details,
        Err(e) => {
            warn!(url = %url, kind = ?e.kind(), "unable to fetch zone details: {e}");
            ticket.settle(Outcome::Failed {
                stage: Stage::Probe,
                error: e.into(),
            });
            return;
        }
    };

    let Some(destination) = plan::destination_path(&options.destination_dir, &url) else {
        warn!(url = %url, "no TLD in zone URL");
        ticket.settle(Outcome::Failed {
            stage: Stage::Probe,
            error: FetchError::UnrecognizedUrl(url),
        });
        return;
    };

    let local = match tokio::fs::metadata(&destination).await {
        Ok(metadata) => Some(LocalFileState::from_metadata(&destination, &metadata)),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %destination.display(), "unable to stat local zone, fetching anyway: {e}");
            None
        }
    };

    match plan::decide(&details, local.as_ref(), options.force, options.length_check()) {
        Decision::Skip => {
            debug!(
                url = %url,
                remote = ?details.last_modified,
                local = ?local.as_ref().and_then(|l| l.modified),
                "local zone is up to date, skipping"
            );
            ticket.settle(Outcome::Skipped);
        }
        Decision::Fetch(check) => {
            // The ticket lives inside the send future; never race it.
            if cancel.is_cancelled() {
                ticket.settle(Outcome::Cancelled);
                return;
            }
            let item = WorkItem {
                url,
                destination,
                api_length: details.content_length,
                check,
                local,
            };
            if let Err(mpsc::error::SendError((ticket, _))) = transfers.send((ticket, item)).await {
                ticket.settle(Outcome::Failed {
                    stage: Stage::Probe,
                    error: FetchError::QueueClosed,
                });
            }
        }
    }
}
