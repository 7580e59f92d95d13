pub mod fix_sha1;
pub mod generate;

pub use fix_sha1::fix_sha1;
pub use generate::generate_nix;

use crate::{Result, Yarn2NixError};
use std::io::{self, Write};

/// Writes a finished result to stdout in one piece.
pub fn emit(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|source| Yarn2NixError::WriteOutput { source })
}
