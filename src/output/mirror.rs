//! Mirror tree writer
//!
//! Maps fetched URLs onto `{root}/{host}/{path}` and writes the bytes there
//! unmodified.

use crate::url::host_key;
use crate::{MirrorError, Result, UrlError};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use url::Url;

const INDEX_FILE: &str = "index.html";

/// Writes fetched content into the local mirror tree
#[derive(Debug, Clone)]
pub struct MirrorWriter {
    root: PathBuf,
}

impl MirrorWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the output root
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::OutputDir` if the directory cannot be created.
    /// A crawl cannot run without it.
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| MirrorError::OutputDir {
                path: self.root.clone(),
                source,
            })
    }

    /// Computes the local file path for a URL
    ///
    /// # Mapping Rules
    ///
    /// 1. The host key (host plus any non-default port) is the first directory
    /// 2. Path segments follow, percent-decoded; empty, `.` and `..` segments
    ///    are dropped so a URL can never escape the host directory. A segment
    ///    that decodes to a path separator keeps its encoded form
    /// 3. `index.html` is appended when the path ends in `/`, or when the last
    ///    segment has no extension and the content is HTML
    /// 4. Query strings and fragments never appear in the path
    ///
    /// # Returns
    ///
    /// * `Some(PathBuf)` - Where the content belongs
    /// * `None` - If the URL has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mirror::output::MirrorWriter;
    /// use std::path::Path;
    /// use url::Url;
    ///
    /// let writer = MirrorWriter::new("out");
    /// let url = Url::parse("http://a.com/page?x=1").unwrap();
    /// assert_eq!(
    ///     writer.local_path(&url, "text/html").unwrap(),
    ///     Path::new("out/a.com/page/index.html")
    /// );
    /// ```
    pub fn local_path(&self, url: &Url, content_type: &str) -> Option<PathBuf> {
        let host = host_key(url)?;
        let mut path = self.root.join(host);

        let url_path = url.path();
        let segments: Vec<Cow<'_, str>> = url_path
            .split('/')
            .map(decode_segment)
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();

        for segment in &segments {
            path.push(segment.as_ref());
        }

        let is_html = content_type.contains("text/html");
        let has_extension = segments
            .last()
            .map(|last| Path::new(last.as_ref()).extension().is_some())
            .unwrap_or(false);

        if segments.is_empty() || url_path.ends_with('/') || (!has_extension && is_html) {
            path.push(INDEX_FILE);
        }

        Some(path)
    }

    /// Writes `content` to the mirror path for `url`, creating parent directories
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The file that was written
    /// * `Err(MirrorError)` - The URL has no local mapping, or a directory or
    ///   file could not be written
    pub async fn save(&self, url: &str, content: &[u8], content_type: &str) -> Result<PathBuf> {
        let parsed = Url::parse(url)?;
        let path = self
            .local_path(&parsed, content_type)
            .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| MirrorError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| MirrorError::WriteFile {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

/// Percent-decodes one path segment for use as a file name
///
/// Invalid UTF-8 or a decoded path separator leaves the segment encoded.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    match urlencoding::decode(segment) {
        Ok(decoded) if !decoded.contains(['/', '\\']) => decoded,
        _ => Cow::Borrowed(segment),
    }
}
