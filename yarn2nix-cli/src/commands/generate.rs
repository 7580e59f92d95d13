use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use yarn2nix_core::{NixPrefetchGit, Yarn2NixConfig, operations};

#[derive(Parser, Debug)]
#[command(
    name = "yarn2nix",
    about = "Generate a Nix expression fetching every source in a yarn.lock",
    version,
    color = clap::ColorChoice::Auto
)]
pub struct GenerateArgs {
    /// Lock file to read
    #[arg(value_name = "LOCKFILE", default_value = "yarn.lock")]
    pub lockfile: PathBuf,
}

pub fn run(args: GenerateArgs, config: &Yarn2NixConfig) -> Result<()> {
    let prefetch = NixPrefetchGit::new(&config.prefetch_git);

    let nix = operations::generate_nix(&args.lockfile, &prefetch)
        .with_context(|| format!("cannot generate Nix for {}", args.lockfile.display()))?;

    operations::emit(&nix)?;
    Ok(())
}
