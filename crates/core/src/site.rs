//! Site base prefix and relative asset resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Path prefix that relative assets (specimen images, data files) hang off.
///
/// Always starts and ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SiteBase(String);

impl Default for SiteBase {
    fn default() -> Self {
        Self("/".to_string())
    }
}

impl SiteBase {
    /// Normalize a configured prefix: `repo`, `/repo` and `/repo/` all become `/repo/`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(format!("/{trimmed}/"))
        }
    }

    /// Pick the prefix for a page served from `host` at `path`.
    ///
    /// Local dev hosts serve from `/src/`. An explicit repo marker wins next.
    /// GitHub Pages project sites use the first path segment. Everything else is `/`.
    #[must_use]
    pub fn detect(host: &str, path: &str, repo_marker: Option<&str>) -> Self {
        if host == "127.0.0.1" || host == "localhost" {
            return Self("/src/".to_string());
        }

        if let Some(marker) = repo_marker.filter(|m| !m.is_empty()) {
            return Self::new(marker);
        }

        if host.ends_with("github.io") {
            return path
                .split('/')
                .find(|segment| !segment.is_empty())
                .map_or_else(Self::default, Self::new);
        }

        Self::default()
    }

    /// [`SiteBase::detect`] from a full page URL. Unparseable URLs fall back to `/`.
    #[must_use]
    pub fn from_page_url(page: &str, repo_marker: Option<&str>) -> Self {
        match Url::parse(page) {
            Ok(url) => Self::detect(url.host_str().unwrap_or_default(), url.path(), repo_marker),
            Err(_) => Self::default(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute `http(s)://` references pass through; anything else is joined
    /// onto the prefix with one leading `/` stripped.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if is_absolute_http(path) {
            return path.to_string();
        }
        let relative = path.strip_prefix('/').unwrap_or(path);
        format!("{}{relative}", self.0)
    }
}

impl From<String> for SiteBase {
    fn from(prefix: String) -> Self {
        Self::new(&prefix)
    }
}

impl From<SiteBase> for String {
    fn from(base: SiteBase) -> Self {
        base.0
    }
}

impl fmt::Display for SiteBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_absolute_http(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_hosts_use_src() {
        assert_eq!(SiteBase::detect("localhost", "/x", Some("repo")).as_str(), "/src/");
        assert_eq!(SiteBase::detect("127.0.0.1", "/", None).as_str(), "/src/");
    }

    #[test]
    fn repo_marker_beats_pages_path() {
        let base = SiteBase::detect("me.github.io", "/other/index.html", Some("/wonder/"));
        assert_eq!(base.as_str(), "/wonder/");
    }

    #[test]
    fn github_pages_uses_first_segment() {
        assert_eq!(
            SiteBase::detect("me.github.io", "/wonder/quiz.html", None).as_str(),
            "/wonder/"
        );
        assert_eq!(SiteBase::detect("me.github.io", "/", None).as_str(), "/");
        assert_eq!(SiteBase::detect("example.org", "/a/b", None).as_str(), "/");
    }

    #[test]
    fn page_url_detection() {
        let base = SiteBase::from_page_url("https://me.github.io/wonder/index.html", None);
        assert_eq!(base.as_str(), "/wonder/");
        assert_eq!(SiteBase::from_page_url("not a url", None).as_str(), "/");
    }

    #[test]
    fn deserializing_normalizes_the_prefix() {
        let base: SiteBase = serde_json::from_str("\"wonder\"").unwrap();
        assert_eq!(base.as_str(), "/wonder/");
        assert_eq!(serde_json::to_string(&base).unwrap(), "\"/wonder/\"");
    }

    #[test]
    fn resolve_joins_relative_paths() {
        let base = SiteBase::new("wonder");
        assert_eq!(base.resolve("images/fox.jpg"), "/wonder/images/fox.jpg");
        assert_eq!(base.resolve("/images/fox.jpg"), "/wonder/images/fox.jpg");
        assert_eq!(base.resolve(""), "/wonder/");
        assert_eq!(
            base.resolve("HTTPS://cdn.example.com/fox.jpg"),
            "HTTPS://cdn.example.com/fox.jpg"
        );
        assert_eq!(SiteBase::default().resolve("a.png"), "/a.png");
    }
}
