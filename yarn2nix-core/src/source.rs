use crate::{Result, Yarn2NixError};
use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Tarball downloaded over HTTP(S); the hash is its sha1.
    Archive,
    /// Git checkout; the hash is a commit-ish.
    Git,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub name: String,
    pub url: String,
    pub hash: Option<String>,
}

/// Splits a `resolved` value into its URL and the hash after `#`, if any.
pub fn split_resolved(resolved: &str) -> (&str, Option<&str>) {
    let mut parts = resolved.split('#');
    let url = parts.next().unwrap_or(resolved);
    let hash = parts.next().filter(|hash| !hash.is_empty());
    (url, hash)
}

pub fn classify(resolved: &str) -> Result<SourceDescriptor> {
    let (raw_url, hash) = split_resolved(resolved);
    let mut url = raw_url.to_string();
    let mut kind = SourceKind::Archive;

    if let Some(rest) = url.strip_prefix("git:") {
        url = format!("git+https:{rest}");
    }

    if let Some(rest) = url.strip_prefix("git+http:") {
        url = format!("git+https:{rest}");
    }

    if let Some(rest) = url.strip_prefix("git+https:") {
        url = format!("https:{rest}");
        kind = SourceKind::Git;
    }

    if !(url.starts_with("https:") || url.starts_with("http:")) {
        return Err(unknown_scheme(resolved));
    }

    let name = derive_name(&url).ok_or_else(|| unknown_scheme(resolved))?;

    Ok(SourceDescriptor {
        kind,
        name,
        url,
        hash: hash.map(str::to_string),
    })
}

/// Last non-empty path segment, falling back to the host for bare origins.
fn derive_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string);

    segment.or_else(|| parsed.host_str().map(str::to_string))
}

fn unknown_scheme(resolved: &str) -> Yarn2NixError {
    Yarn2NixError::UnknownSourceScheme {
        resolved: resolved.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_schemes_normalize_to_https() {
        for resolved in [
            "git://example.com/x.git#abc123",
            "git+http://example.com/x.git#abc123",
            "git+https://example.com/x.git#abc123",
        ] {
            let source = classify(resolved).unwrap();
            assert_eq!(source.kind, SourceKind::Git, "{resolved}");
            assert_eq!(source.url, "https://example.com/x.git", "{resolved}");
            assert_eq!(source.hash.as_deref(), Some("abc123"), "{resolved}");
            assert_eq!(source.name, "x.git", "{resolved}");
        }
    }

    #[test]
    fn test_registry_tarball_is_archive() {
        let source = classify(
            "https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.0.tgz#5b8a3a7765dfe001261dde915589e782f8c94d1e",
        )
        .unwrap();

        assert_eq!(source.kind, SourceKind::Archive);
        assert_eq!(source.name, "left-pad-1.3.0.tgz");
        assert_eq!(
            source.url,
            "https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.0.tgz"
        );
        assert_eq!(
            source.hash.as_deref(),
            Some("5b8a3a7765dfe001261dde915589e782f8c94d1e")
        );
    }

    #[test]
    fn test_plain_http_is_archive_without_hash() {
        let source = classify("http://reg/a-1.0.0.tgz").unwrap();
        assert_eq!(source.kind, SourceKind::Archive);
        assert_eq!(source.name, "a-1.0.0.tgz");
        assert_eq!(source.hash, None);
    }

    #[test]
    fn test_name_ignores_query_and_trailing_slash() {
        let source = classify("https://example.com/pkgs/b-2.0.0.tgz?token=x#ff").unwrap();
        assert_eq!(source.name, "b-2.0.0.tgz");

        let source = classify("https://example.com/pkgs/c/").unwrap();
        assert_eq!(source.name, "c");
    }

    #[test]
    fn test_scoped_package_name() {
        let source =
            classify("https://registry.yarnpkg.com/@babel/core/-/core-7.11.0.tgz#deadbeef").unwrap();
        assert_eq!(source.name, "core-7.11.0.tgz");
    }

    #[test]
    fn test_unknown_schemes_are_rejected() {
        for resolved in [
            "git+ssh://git@github.com/user/repo.git#abc",
            "file:../local-package",
            "ftp://example.com/a.tgz",
        ] {
            assert!(
                matches!(
                    classify(resolved),
                    Err(Yarn2NixError::UnknownSourceScheme { .. })
                ),
                "{resolved}"
            );
        }
    }

    #[test]
    fn test_split_resolved() {
        assert_eq!(split_resolved("https://a/b.tgz"), ("https://a/b.tgz", None));
        assert_eq!(split_resolved("https://a/b.tgz#"), ("https://a/b.tgz", None));
        assert_eq!(
            split_resolved("https://a/b.tgz#abc"),
            ("https://a/b.tgz", Some("abc"))
        );
    }
}
