use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use czds_api::{HttpSession, Session, tld_from_url};
use czds_fetch::WorkerPool;
use czds_fetch::data::DEFAULT_QUEUE_CAPACITY;
use tracing::{debug, warn};

use crate::auth;
use crate::cli::GlobalArgs;
use crate::config::Settings;

pub const DEFAULT_INFO_WORKERS: usize = 4;

#[derive(Args, Clone, Debug)]
pub struct LsArg {
    /// List TLD names rather than zone URLs; wins over --details
    #[arg(short, long)]
    pub zones_only: bool,
    /// Print zone details as JSON, one object per line
    #[arg(short = 'l', long)]
    pub details: bool,
    /// Parallel detail lookups [default: 4]
    #[arg(short = 'n', long)]
    pub info_workers: Option<usize>,
    /// TLDs to list instead of every authorized zone
    pub tlds: Vec<String>,
}

pub async fn run(arg: LsArg, settings: &Settings, global: &GlobalArgs) -> Result<()> {
    let session = auth::authenticate(settings, global.auth_file.as_deref()).await?;
    let urls = zone_urls(&session, &arg.tlds).await?;

    if arg.zones_only {
        for url in &urls {
            println!("{}", tld_from_url(url));
        }
        return Ok(());
    }
    if !arg.details {
        for url in &urls {
            println!("{url}");
        }
        return Ok(());
    }

    let workers = info_workers(arg.info_workers, settings, DEFAULT_INFO_WORKERS)?;
    let session = Arc::new(session);
    let handler = {
        let session = Arc::clone(&session);
        move |url: String| {
            let session = Arc::clone(&session);
            async move {
                debug!(url = %url, "fetching zone details");
                match session.details(&url).await {
                    Ok(details) => println!("{details}"),
                    Err(e) => warn!(url = %url, "{e}"),
                }
            }
        }
    };
    let (tx, pool) = WorkerPool::spawn("details", workers, DEFAULT_QUEUE_CAPACITY, handler);
    for url in urls {
        if tx.send(url).await.is_err() {
            break;
        }
    }
    drop(tx);
    pool.join().await;
    Ok(())
}

/// URLs for the given TLDs, or the account's full list when none are given.
pub async fn zone_urls(session: &HttpSession, tlds: &[String]) -> Result<Vec<String>> {
    if tlds.is_empty() {
        debug!("fetching list of zone URLs");
        return Ok(session.list().await?);
    }
    debug!(count = tlds.len(), "using TLDs given on the command line");
    let endpoints = session.endpoints();
    Ok(tlds.iter().map(|tld| endpoints.zone_url(tld)).collect())
}

/// Flag, then config, then the command's own default.
pub fn info_workers(flag: Option<usize>, settings: &Settings, default: usize) -> Result<usize> {
    match flag.or(settings.api.info_workers).unwrap_or(default) {
        0 => anyhow::bail!("--info-workers must be at least 1"),
        n => Ok(n),
    }
}
