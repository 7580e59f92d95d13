use crate::lockfile::{LockEntry, Lockfile};
use crate::prefetch::ContentAddresser;
use crate::source::{self, SourceKind};
use crate::{Result, Yarn2NixError, console};
use std::collections::HashMap;

const HEAD: &str = "{fetchurl, fetchgit, linkFarm}: rec {
  offline_cache = linkFarm \"offline\" packages;
  packages = [
";

const FOOT: &str = "  ];
}
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Url { url: String, sha1: String },
    Git { url: String, rev: String, sha256: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDescriptor {
    pub name: String,
    pub fetch: Fetch,
}

/// Accumulator for [`generate`]: names already emitted (with the URL that
/// claimed them) and the descriptors in emission order.
#[derive(Debug, Default)]
struct Generation {
    seen: HashMap<String, String>,
    descriptors: Vec<FetchDescriptor>,
}

/// Builds one fetch descriptor per distinct package name, in lock file order.
///
/// When several entries map to the same name, the first one wins and the
/// rest are dropped. A warning is printed if a dropped entry points at a
/// different URL. Git sources are resolved through `addresser`, one at a
/// time.
pub fn generate(
    lockfile: &Lockfile,
    addresser: &impl ContentAddresser,
) -> Result<Vec<FetchDescriptor>> {
    let generation = lockfile
        .entries
        .iter()
        .try_fold(Generation::default(), |acc, entry| {
            visit(acc, entry, addresser)
        })?;

    Ok(generation.descriptors)
}

fn visit(
    mut acc: Generation,
    entry: &LockEntry,
    addresser: &impl ContentAddresser,
) -> Result<Generation> {
    let Some(resolved) = entry.dependency.resolved() else {
        console::verbose(&format!(
            "generate: {} has no resolved url, skipping",
            entry.display_key()
        ));
        return Ok(acc);
    };

    let source = source::classify(resolved)?;

    if let Some(kept) = acc.seen.get(&source.name) {
        if *kept != source.url {
            console::warn(&format!(
                "{} resolves to {} but {} was already emitted from {}; keeping the first",
                entry.display_key(),
                source.url,
                source.name,
                kept
            ));
        }
        return Ok(acc);
    }
    acc.seen.insert(source.name.clone(), source.url.clone());

    let hash = source.hash.ok_or_else(|| Yarn2NixError::MissingHash {
        key: entry.display_key(),
    })?;

    let fetch = match source.kind {
        SourceKind::Archive => Fetch::Url {
            url: source.url,
            sha1: hash,
        },
        SourceKind::Git => {
            let sha256 = addresser.address(&source.url, &hash)?;
            Fetch::Git {
                url: source.url,
                rev: hash,
                sha256,
            }
        }
    };

    acc.descriptors.push(FetchDescriptor {
        name: source.name,
        fetch,
    });

    Ok(acc)
}

pub fn render(descriptors: &[FetchDescriptor]) -> String {
    let mut out = String::from(HEAD);

    for descriptor in descriptors {
        let name = nix_string(&descriptor.name);

        let path = match &descriptor.fetch {
            Fetch::Url { url, sha1 } => format!(
                "fetchurl {{
        name = {name};
        url  = {url};
        sha1 = {sha1};
      }}",
                url = nix_string(url),
                sha1 = nix_string(sha1),
            ),
            Fetch::Git { url, rev, sha256 } => format!(
                "fetchgit {{
        name   = {name};
        url    = {url};
        rev    = {rev};
        sha256 = {sha256};
      }}",
                url = nix_string(url),
                rev = nix_string(rev),
                sha256 = nix_string(sha256),
            ),
        };

        out.push_str(&format!(
            "
    {{
      name = {name};
      path = {path};
    }}
"
        ));
    }

    out.push_str(FOOT);
    out
}

/// Quotes `value` as a Nix string literal.
pub fn nix_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }

    out.push('"');
    out
}
