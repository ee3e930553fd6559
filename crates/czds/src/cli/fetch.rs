use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use czds_fetch::{FetchOptions, Pipeline};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::auth;
use crate::cli::GlobalArgs;
use crate::cli::ls::{info_workers, zone_urls};
use crate::config::Settings;
use crate::ui::tracker::ZoneTracker;

pub const DEFAULT_INFO_WORKERS: usize = 2;

#[derive(Args, Clone, Debug)]
#[command(long_about = "Download zone files into the destination directory as <tld>.zone.gz.\n\
    A zone is skipped when the local file is at least as new as the remote one.")]
pub struct FetchArg {
    /// Parallel detail lookups [default: 2]
    #[arg(short = 'n', long)]
    pub info_workers: Option<usize>,
    /// Parallel downloads [default: 4]
    #[arg(short = 'N', long)]
    pub fetch_workers: Option<usize>,
    /// Destination for fetched zone files [default: ./]
    #[arg(short = 'D', long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub destination_dir: Option<PathBuf>,
    /// Fetch regardless of file modification times
    #[arg(short = 'F', long)]
    pub force: bool,
    /// Keep downloads whose size differs from the API's
    #[arg(short = 'K', long)]
    pub keep_anyway: bool,
    /// Show a progress bar
    #[arg(short = 'P', long)]
    pub progress: bool,
    /// TLDs to fetch instead of every authorized zone
    pub tlds: Vec<String>,
}

impl FetchArg {
    /// Merge flags over the loaded settings.
    pub fn options(&self, settings: &Settings) -> Result<FetchOptions> {
        let fetch_workers = self.fetch_workers.unwrap_or(settings.api.fetch_workers);
        if fetch_workers == 0 {
            anyhow::bail!("--fetch-workers must be at least 1");
        }
        let destination = self
            .destination_dir
            .clone()
            .unwrap_or_else(|| settings.download.destination_dir.clone());

        Ok(FetchOptions::default()
            .probe_workers(info_workers(self.info_workers, settings, DEFAULT_INFO_WORKERS)?)
            .transfer_workers(fetch_workers)
            .destination_dir(destination)
            .force(self.force)
            .keep_anyway(self.keep_anyway))
    }
}

pub async fn run(arg: FetchArg, settings: &Settings, global: &GlobalArgs) -> Result<()> {
    let options = arg.options(settings)?;
    let session = auth::authenticate(settings, global.auth_file.as_deref()).await?;
    debug!(?options, "beginning fetch process");
    let urls = zone_urls(&session, &arg.tlds).await?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling outstanding zones");
            interrupt.cancel();
        }
    });

    let mut pipeline = Pipeline::new(Arc::new(session), options);
    let tracker = arg.progress.then(|| ZoneTracker::new(urls.len() as u64));
    if let Some(tracker) = tracker.clone() {
        pipeline = pipeline.on_report(move |report| tracker.observe(report));
    }

    let summary = pipeline.run_until_cancelled(urls, cancel).await;
    if let Some(tracker) = tracker {
        tracker.finish();
    }
    debug!(outstanding = summary.outstanding(), "fetch process finished");
    Ok(())
}
