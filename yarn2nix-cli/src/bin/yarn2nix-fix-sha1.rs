use clap::Parser;
use std::process::ExitCode;
use yarn2nix_cli::commands::fix_sha1::{self, FixSha1Args};
use yarn2nix_core::Yarn2NixConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let args = FixSha1Args::parse();
    let config = Yarn2NixConfig::from_env();
    yarn2nix_cli::init_tracing(&config);

    yarn2nix_cli::exit_code(fix_sha1::run(args, &config).await)
}
