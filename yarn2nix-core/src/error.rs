use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Yarn2NixError {
    #[error("Failed to read file {path:?}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("yarn.lock parse error on line {line}: {reason}")]
    LockParse { line: usize, reason: String },

    #[error("Failed to build HTTP client: {source}")]
    HttpClient { source: reqwest::Error },

    #[error("HTTP request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request to {url} failed with status code {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unknown url type: {resolved}")]
    UnknownSourceScheme { resolved: String },

    #[error("Lock entry {key} has no hash in its resolved field")]
    MissingHash { key: String },

    #[error("Failed to run {program:?}: {source}")]
    PrefetchSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{program:?} failed for {url} at {rev} ({status})")]
    PrefetchFailed {
        program: PathBuf,
        url: String,
        rev: String,
        status: std::process::ExitStatus,
    },

    #[error("Unexpected prefetch output for {url}: {reason}")]
    PrefetchOutput { url: String, reason: String },

    #[error("Failed to write output: {source}")]
    WriteOutput { source: std::io::Error },
}
