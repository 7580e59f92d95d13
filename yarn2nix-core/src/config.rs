use crate::{Result, Yarn2NixError};
use reqwest::Client;
use std::env;
use std::path::PathBuf;

const DEFAULT_PREFETCH_GIT: &str = "nix-prefetch-git";

#[derive(Debug, Clone)]
pub struct Yarn2NixConfig {
    /// Executable used to compute the tree hash of git sources.
    pub prefetch_git: PathBuf,
    pub user_agent: String,
    pub verbose: bool,
}

impl Yarn2NixConfig {
    pub fn from_env() -> Self {
        let prefetch_git = env::var("YARN2NIX_PREFETCH_GIT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_prefetch_git);

        let user_agent = env::var("YARN2NIX_USER_AGENT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("yarn2nix/{}", env!("CARGO_PKG_VERSION")));

        let verbose = match env::var("YARN2NIX_VERBOSE") {
            Ok(value) => {
                let v = value.trim().to_ascii_lowercase();
                matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on")
            }
            Err(_) => false,
        };

        Yarn2NixConfig {
            prefetch_git,
            user_agent,
            verbose,
        }
    }

    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|source| Yarn2NixError::HttpClient { source })
    }
}

// Packaging bakes the store path of nix-prefetch-git in at build time.
fn default_prefetch_git() -> PathBuf {
    match option_env!("NIX_PREFETCH_GIT") {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => PathBuf::from(DEFAULT_PREFETCH_GIT),
    }
}
