use crate::{Result, Yarn2NixError, console};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Computes the whole-tree content hash of a git checkout.
pub trait ContentAddresser {
    fn address(&self, url: &str, rev: &str) -> Result<String>;
}

impl<F> ContentAddresser for F
where
    F: Fn(&str, &str) -> Result<String>,
{
    fn address(&self, url: &str, rev: &str) -> Result<String> {
        self(url, rev)
    }
}

/// Runs `nix-prefetch-git <url> <rev>` and reads `sha256` from its JSON output.
#[derive(Debug, Clone)]
pub struct NixPrefetchGit {
    pub program: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PrefetchOutput {
    sha256: Option<String>,
}

impl NixPrefetchGit {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        NixPrefetchGit {
            program: program.into(),
        }
    }
}

impl ContentAddresser for NixPrefetchGit {
    fn address(&self, url: &str, rev: &str) -> Result<String> {
        console::verbose(&format!(
            "prefetch: {} {} {}",
            self.program.display(),
            url,
            rev
        ));
        let started = Instant::now();

        let output = Command::new(&self.program)
            .arg(url)
            .arg(rev)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| Yarn2NixError::PrefetchSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Yarn2NixError::PrefetchFailed {
                program: self.program.clone(),
                url: url.to_string(),
                rev: rev.to_string(),
                status: output.status,
            });
        }

        let parsed: PrefetchOutput =
            serde_json::from_slice(&output.stdout).map_err(|e| Yarn2NixError::PrefetchOutput {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let sha256 = parsed
            .sha256
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| Yarn2NixError::PrefetchOutput {
                url: url.to_string(),
                reason: "missing \"sha256\" field".to_string(),
            })?;

        if console::is_logging_enabled() {
            console::verbose(&format!(
                "prefetch: {} at {} -> {} in {:.3}s",
                url,
                rev,
                sha256,
                started.elapsed().as_secs_f64()
            ));
        }

        Ok(sha256)
    }
}
