use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use czds_api::Session;
use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::data::{LengthCheck, WorkItem};
use crate::error::{FetchError, Result};
use crate::plan;

/// Download one work item into `<destination>.tmp` and rename it into place.
///
/// The destination is only ever replaced by a complete download. On any
/// failure, including cancellation, the staging file is removed and a
/// previously existing destination is left untouched.
///
/// Returns the number of bytes written.
pub async fn transfer<S: Session>(
    session: &S,
    item: &WorkItem,
    cancel: &CancellationToken,
) -> Result<u64> {
    let started = Instant::now();
    let mut body = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        result = session.download(&item.url) => result?,
    };

    let mut staged = StagedFile::create(plan::staging_path(&item.destination)).await?;
    let mut copied = 0u64;
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            chunk = body.next() => chunk,
        };
        match chunk {
            Some(Ok(bytes)) => {
                staged.write(&bytes).await?;
                copied += bytes.len() as u64;
            }
            Some(Err(source)) => return Err(FetchError::Interrupted { copied, source }),
            None => break,
        }
    }

    if item.check == LengthCheck::Enforce {
        if let Some(expected) = item.api_length {
            if expected != copied {
                return Err(FetchError::LengthMismatch {
                    expected,
                    actual: copied,
                });
            }
        }
    }

    staged.commit(&item.destination).await?;
    debug!(
        url = %item.url,
        bytes = copied,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "zone transferred"
    );
    Ok(copied)
}

/// A staging file removed on drop unless committed.
struct StagedFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl StagedFile {
    async fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)
            .await
            .map_err(FetchError::local("create", &path))?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer
            .write_all(bytes)
            .await
            .map_err(FetchError::local("write", &self.path))
    }

    async fn commit(mut self, destination: &Path) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .await
                .map_err(FetchError::local("flush", &self.path))?;
            writer
                .get_ref()
                .sync_all()
                .await
                .map_err(FetchError::local("sync", &self.path))?;
        }
        tokio::fs::rename(&self.path, destination)
            .await
            .map_err(FetchError::local("rename", destination))?;
        // Renamed away; nothing left to clean up.
        self.path = PathBuf::new();
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        drop(self.writer.take());
        if self.path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), "failed to remove staging file: {e}");
            }
        }
    }
}
