use crate::lockfile::Lockfile;
use crate::nix;
use crate::prefetch::ContentAddresser;
use crate::{Result, console};
use std::path::Path;

/// Reads `lockfile_path` and renders the Nix expression for its sources.
pub fn generate_nix(lockfile_path: &Path, addresser: &impl ContentAddresser) -> Result<String> {
    let lockfile = Lockfile::read(lockfile_path)?;
    let descriptors = nix::generate(&lockfile, addresser)?;

    console::verbose(&format!(
        "generate: {} entries, {} unique sources",
        lockfile.entries.len(),
        descriptors.len()
    ));

    Ok(nix::render(&descriptors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Yarn2NixError;
    use std::fs;

    #[test]
    fn test_generates_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yarn.lock");
        fs::write(
            &path,
            "a@^1.0.0:\n  resolved \"https://reg/a-1.0.0.tgz#0001\"\n",
        )
        .unwrap();

        let no_git = |_url: &str, _rev: &str| -> Result<String> { unreachable!() };
        let nix = generate_nix(&path, &no_git).unwrap();

        assert!(nix.starts_with("{fetchurl, fetchgit, linkFarm}: rec {\n"));
        assert!(nix.contains("        url  = \"https://reg/a-1.0.0.tgz\";\n"));
        assert!(nix.ends_with("  ];\n}\n"));
    }

    #[test]
    fn test_parse_error_produces_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yarn.lock");
        fs::write(&path, "a@^1.0.0:\n\tresolved \"https://reg/a.tgz#1\"\n").unwrap();

        let no_git = |_url: &str, _rev: &str| -> Result<String> { unreachable!() };

        assert!(matches!(
            generate_nix(&path, &no_git),
            Err(Yarn2NixError::LockParse { line: 2, .. })
        ));
    }
}
