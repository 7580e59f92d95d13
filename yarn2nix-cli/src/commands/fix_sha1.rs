use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use yarn2nix_core::{Yarn2NixConfig, operations};

#[derive(Parser, Debug)]
#[command(
    name = "yarn2nix-fix-sha1",
    about = "Print a yarn.lock with the missing sha1 of every resolved url filled in",
    version,
    color = clap::ColorChoice::Auto
)]
pub struct FixSha1Args {
    /// Lock file to read; it is not modified
    #[arg(value_name = "LOCKFILE", default_value = "yarn.lock")]
    pub lockfile: PathBuf,
}

pub async fn run(args: FixSha1Args, config: &Yarn2NixConfig) -> Result<()> {
    let client = config.http_client()?;

    let fixed = operations::fix_sha1(&client, &args.lockfile)
        .await
        .with_context(|| format!("cannot fix {}", args.lockfile.display()))?;

    operations::emit(&fixed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockfile_defaults_to_yarn_lock() {
        let args = FixSha1Args::try_parse_from(["yarn2nix-fix-sha1"]).unwrap();
        assert_eq!(args.lockfile, PathBuf::from("yarn.lock"));
    }

    #[test]
    fn test_single_positional_only() {
        assert!(FixSha1Args::try_parse_from(["yarn2nix-fix-sha1", "a.lock", "b.lock"]).is_err());
    }
}
