pub mod commands;

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use yarn2nix_core::{Yarn2NixConfig, console};

/// Logs go to stderr; stdout is reserved for the command's result.
pub fn init_tracing(config: &Yarn2NixConfig) {
    let default = if config.verbose {
        "warn,yarn2nix_core=debug,yarn2nix_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            console::error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_exits_zero() {
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
    }

    #[test]
    fn test_error_exits_with_failure() {
        let err = anyhow::anyhow!("yarn.lock parse error on line 1: expected a dependency key");
        assert_eq!(exit_code(Err(err)), ExitCode::FAILURE);
    }
}
