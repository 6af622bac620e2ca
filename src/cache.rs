//! On-disk document cache
//!
//! Layout, relative to the data directory:
//!
//! ```text
//! <site>/pages/<page_no>.txt            one identity per line
//! <site>/coaches/<identity>/<artifact>  raw fetched body
//! ```
//!
//! A file's presence means "already fetched". Files are written once and
//! never refreshed or removed; failed fetches leave nothing behind so they
//! are retried on the next run.

use crate::site::Site;
use std::io;
use std::path::{Path, PathBuf};

/// Cache subtree for one site
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at `<data_dir>/<site>`
    pub fn new(data_dir: impl AsRef<Path>, site: Site) -> Self {
        Self {
            root: data_dir.as_ref().join(site.as_str()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    pub fn page_path(&self, page_no: u32) -> PathBuf {
        self.pages_dir().join(format!("{}.txt", page_no))
    }

    pub fn coaches_dir(&self) -> PathBuf {
        self.root.join("coaches")
    }

    pub fn coach_dir(&self, identity: &str) -> PathBuf {
        self.coaches_dir().join(identity)
    }

    pub fn artifact_path(&self, identity: &str, artifact: &str) -> PathBuf {
        self.coach_dir(identity).join(artifact)
    }

    pub async fn has_artifact(&self, identity: &str, artifact: &str) -> bool {
        tokio::fs::metadata(self.artifact_path(identity, artifact))
            .await
            .is_ok_and(|metadata| metadata.is_file())
    }

    /// Reads a cached artifact; unreadable or missing files are `None`
    pub fn read_artifact(&self, identity: &str, artifact: &str) -> Option<String> {
        std::fs::read_to_string(self.artifact_path(identity, artifact)).ok()
    }

    /// Reads a cached listing page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(identities))` - The page was cached (possibly empty)
    /// * `Ok(None)` - The page has not been cached yet
    /// * `Err(io::Error)` - The file exists but could not be read
    pub async fn read_page(&self, page_no: u32) -> io::Result<Option<Vec<String>>> {
        match tokio::fs::read_to_string(self.page_path(page_no)).await {
            Ok(content) => Ok(Some(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Caches a listing page, one newline-terminated identity per line
    pub async fn write_page(&self, page_no: u32, identities: &[String]) -> io::Result<()> {
        let mut content = String::new();
        for identity in identities {
            content.push_str(identity);
            content.push('\n');
        }
        write_complete(&self.page_path(page_no), content.as_bytes()).await
    }

    /// Caches a fetched artifact body
    pub async fn write_artifact(&self, identity: &str, artifact: &str, body: &str) -> io::Result<()> {
        write_complete(&self.artifact_path(identity, artifact), body.as_bytes()).await
    }
}

/// Writes via a sibling `.part` file so a cached path only ever holds a
/// complete body.
async fn write_complete(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    tokio::fs::write(&partial, content).await?;
    tokio::fs::rename(&partial, path).await
}
