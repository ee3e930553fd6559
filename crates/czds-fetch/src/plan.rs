//! Pure decisions of the probe stage.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use czds_api::{ZoneDetails, tld_from_url};

use crate::data::{Decision, LengthCheck, LocalFileState};

/// Suffix of published zone files.
pub const ZONE_SUFFIX: &str = ".zone.gz";
/// Suffix of in-flight downloads.
pub const STAGING_SUFFIX: &str = ".tmp";

/// `<dir>/<tld>.zone.gz` for a zone URL, or `None` if the URL names no TLD.
pub fn destination_path(dir: &Path, url: &str) -> Option<PathBuf> {
    let tld = tld_from_url(url);
    if tld.is_empty() {
        return None;
    }
    Some(dir.join(format!("{tld}{ZONE_SUFFIX}")))
}

/// Private staging name of a destination: `<destination>.tmp`.
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

/// Whether the remote copy is strictly newer than the local one.
///
/// A missing remote timestamp never counts as newer; a missing local one
/// always loses.
pub fn is_stale(remote: Option<DateTime<Utc>>, local: Option<DateTime<Utc>>) -> bool {
    match (remote, local) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(remote), Some(local)) => remote > local,
    }
}

/// Decide whether a zone needs downloading.
pub fn decide(
    details: &ZoneDetails,
    local: Option<&LocalFileState>,
    force: bool,
    check: LengthCheck,
) -> Decision {
    match local {
        Some(local) if !force && !is_stale(details.last_modified, local.modified) => Decision::Skip,
        _ => Decision::Fetch(check),
    }
}
