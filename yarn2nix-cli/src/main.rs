use clap::Parser;
use std::process::ExitCode;
use yarn2nix_cli::commands::generate::{self, GenerateArgs};
use yarn2nix_core::Yarn2NixConfig;

fn main() -> ExitCode {
    let args = GenerateArgs::parse();
    let config = Yarn2NixConfig::from_env();
    yarn2nix_cli::init_tracing(&config);

    yarn2nix_cli::exit_code(generate::run(args, &config))
}
