//! Fills in the `#<sha1>` suffix of `resolved` URLs that yarn left without
//! one (codeload.github.com tarballs, for example).

use crate::lockfile::Lockfile;
use crate::source::split_resolved;
use crate::{Result, Yarn2NixError, console};
use futures::StreamExt;
use futures::future::try_join_all;
use reqwest::Client;
use sha1::{Digest, Sha1};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub fetched: usize,
    pub already_hashed: usize,
    pub local: usize,
}

/// Fetches every entry whose `resolved` URL has no hash, concurrently, and
/// appends the sha1 of the downloaded payload.
///
/// The lock file is only modified once every fetch has succeeded. The first
/// failure is returned and the other requests are dropped.
pub async fn backfill_hashes(client: &Client, lockfile: &mut Lockfile) -> Result<BackfillSummary> {
    let mut summary = BackfillSummary::default();
    let mut pending = Vec::new();

    for (idx, entry) in lockfile.entries.iter().enumerate() {
        let Some(resolved) = entry.dependency.resolved() else {
            summary.local += 1;
            continue;
        };

        match split_resolved(resolved) {
            (_, Some(_)) => summary.already_hashed += 1,
            (url, None) => pending.push((idx, url.to_string())),
        }
    }

    if pending.is_empty() {
        console::verbose("backfill: every resolved entry already has a hash");
        return Ok(summary);
    }

    console::step_with_count("Fetching missing hashes", pending.len());

    let fetches = pending.iter().map(|(idx, url)| async move {
        let sha1 = fetch_sha1(client, url).await?;
        Ok::<_, Yarn2NixError>((*idx, format!("{url}#{sha1}")))
    });

    let fixed = try_join_all(fetches).await?;
    summary.fetched = fixed.len();

    for (idx, resolved) in fixed {
        lockfile.entries[idx].dependency.set_resolved(resolved);
    }

    Ok(summary)
}

/// Streams the body of `url` through sha1 and returns the hex digest.
pub async fn fetch_sha1(client: &Client, url: &str) -> Result<String> {
    console::verbose(&format!("fetch: {}", url));
    let started = Instant::now();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| Yarn2NixError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Yarn2NixError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut hasher = Sha1::new();
    let mut size = 0usize;
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|source| Yarn2NixError::Http {
            url: url.to_string(),
            source,
        })?;
        size += chunk.len();
        hasher.update(&chunk);
    }

    let digest = hex::encode(hasher.finalize());

    if console::is_logging_enabled() {
        console::verbose(&format!(
            "fetch: {} ({} bytes) sha1={} in {:.3}s",
            url,
            size,
            digest,
            started.elapsed().as_secs_f64()
        ));
    }

    Ok(digest)
}
