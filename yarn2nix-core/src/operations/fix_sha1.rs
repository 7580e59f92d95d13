use crate::backfill;
use crate::lockfile::Lockfile;
use crate::{Result, console};
use reqwest::Client;
use std::path::Path;
use std::time::Instant;

/// Reads `lockfile_path`, fills in missing sha1 hashes and returns the
/// re-encoded lock file. The file on disk is left alone.
pub async fn fix_sha1(client: &Client, lockfile_path: &Path) -> Result<String> {
    let started = Instant::now();
    let mut lockfile = Lockfile::read(lockfile_path)?;

    let summary = backfill::backfill_hashes(client, &mut lockfile).await?;

    console::verbose(&format!(
        "fix-sha1: {} entries, {} fetched, {} already hashed, {} local in {:.3}s",
        lockfile.entries.len(),
        summary.fetched,
        summary.already_hashed,
        summary.local,
        started.elapsed().as_secs_f64()
    ));

    Ok(lockfile.encode())
}
