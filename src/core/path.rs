//! Route path type for site-relative page paths.
//!
//! - Internal representation: Always decoded (human-readable)
//! - Output boundary: encoded for canonical URLs and navigation

use std::borrow::Borrow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters kept verbatim in an encoded path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Decoded page path relative to the site root
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts and ends with `/`
/// - No empty, `.` or `..` segments
/// - Never carries a query string, fragment or build-tool base prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(Arc<str>);

impl RoutePath {
    /// The site root, `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Normalize a page path. Strips query and fragment, decodes percent
    /// escapes and adds leading/trailing slashes.
    pub fn new(raw: &str) -> Self {
        let path = raw.trim().split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string());

        let segments: Vec<&str> = decoded
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();

        if segments.is_empty() {
            return Self::root();
        }
        Self(Arc::from(format!("/{}/", segments.join("/"))))
    }

    /// Join a single segment onto this path.
    pub fn join(&self, segment: &str) -> Self {
        Self::new(&format!("{}{}", self.0, segment))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Path segments, excluding the empty ones at both ends.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Encode for URLs (percent-encode non-ASCII and reserved characters).
    pub fn to_encoded(&self) -> String {
        self.0
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Absolute canonical URL under `origin`.
    ///
    /// `origin` may carry a trailing slash; the result never has a doubled one.
    pub fn canonical(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.to_encoded())
    }

    /// Location of this route's document inside the output directory.
    ///
    /// `/` -> `<dist>/index.html`, `/a/b/` -> `<dist>/a/b/index.html`
    pub fn output_file(&self, dist: &Path) -> PathBuf {
        let mut path = dist.to_path_buf();
        path.extend(self.segments());
        path.join("index.html")
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for RoutePath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoutePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoutePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<&str> for RoutePath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for RoutePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoutePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}
