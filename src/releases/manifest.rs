//! Release manifest model and the swappable snapshot store.
//!
//! The manifest lists release groups, each with the versions currently
//! published on its stability channels:
//!
//! ```yaml
//! groups:
//!   - name: "1.2"
//!     channels:
//!       - name: stable
//!         version: v1.2.3+fix6
//! ```

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::observability::metrics;

/// A stability channel and the version it currently points at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Channel {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Version")]
    pub version: String,
}

/// A release group (`v1`, `1.2`) with its channels.
///
/// Serialized with capitalized keys, the shape `/status` consumers read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Release {
    #[serde(rename(serialize = "Name"), alias = "Name")]
    pub name: String,
    #[serde(default, rename(serialize = "Channels"), alias = "Channels")]
    pub channels: Vec<Channel>,
}

impl Release {
    /// Version recorded for `channel`, if the group carries that channel.
    pub fn channel_version(&self, channel: &str) -> Option<&str> {
        self.channels
            .iter()
            .find(|c| c.name == channel)
            .map(|c| c.version.as_str())
    }
}

/// The whole manifest. Immutable once loaded; replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ReleasesStatus {
    #[serde(default, alias = "Groups")]
    pub groups: Vec<Release>,
}

impl ReleasesStatus {
    /// Look up a group by exact name.
    pub fn group(&self, name: &str) -> Option<&Release> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Errors raised while loading the manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("channels file {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("can't open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't unmarshal {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to decode channels file {}: unsupported format", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("channels file reload task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// On-disk encodings, chosen by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// Detect the format from the file name; `None` for anything unrecognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.to_str()?;
        if name.ends_with(".json") {
            Some(Self::Json)
        } else if name.ends_with(".yaml") || name.ends_with(".yml") {
            Some(Self::Yaml)
        } else {
            None
        }
    }

    /// Parse manifest content in this format.
    pub fn parse(self, content: &str) -> Result<ReleasesStatus, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Read and parse a manifest file.
pub fn load(path: &Path) -> Result<ReleasesStatus, ManifestError> {
    let format = ManifestFormat::from_path(path).ok_or_else(|| ManifestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ManifestError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ManifestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    format.parse(&content).map_err(|message| ManifestError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Holds the current manifest snapshot for the whole process.
///
/// Readers grab an `Arc` to a complete snapshot; a refresh swaps the pointer,
/// so a concurrent reader sees either the old or the new manifest, never a mix.
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    snapshot: ArcSwap<ReleasesStatus>,
}

impl ManifestStore {
    /// Create a store with an empty snapshot. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: ArcSwap::from_pointee(ReleasesStatus::default()),
        }
    }

    /// Create a store and perform the initial load.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let store = Self::new(path);
        store.refresh()?;
        Ok(store)
    }

    /// Create a store around an already built manifest.
    pub fn from_releases(path: impl Into<PathBuf>, releases: ReleasesStatus) -> Self {
        Self {
            path: path.into(),
            snapshot: ArcSwap::from_pointee(releases),
        }
    }

    /// Path of the channels file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ReleasesStatus> {
        self.snapshot.load_full()
    }

    /// Replace the snapshot.
    pub fn replace(&self, releases: ReleasesStatus) {
        self.snapshot.store(Arc::new(releases));
    }

    /// Re-read the channels file and swap in the result.
    ///
    /// On failure the previous snapshot stays in place and the error is returned.
    pub fn refresh(&self) -> Result<Arc<ReleasesStatus>, ManifestError> {
        match load(&self.path) {
            Ok(releases) => {
                let releases = Arc::new(releases);
                self.snapshot.store(releases.clone());
                metrics::record_manifest_reload(true);
                Ok(releases)
            }
            Err(e) => {
                metrics::record_manifest_reload(false);
                Err(e)
            }
        }
    }

    /// Refresh, logging and ignoring failures; returns whatever snapshot is current.
    pub fn refresh_or_stale(&self) -> Arc<ReleasesStatus> {
        if let Err(e) = self.refresh() {
            tracing::error!(error = %e, "Failed to refresh channels file, serving previous snapshot");
        }
        self.snapshot()
    }

    /// `refresh` on the blocking pool, so a slow disk never stalls an async worker.
    pub async fn refresh_async(self: &Arc<Self>) -> Result<Arc<ReleasesStatus>, ManifestError> {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || store.refresh()).await?
    }

    /// `refresh_or_stale` on the blocking pool.
    pub async fn refresh_or_stale_async(self: &Arc<Self>) -> Arc<ReleasesStatus> {
        if let Err(e) = self.refresh_async().await {
            tracing::error!(error = %e, "Failed to refresh channels file, serving previous snapshot");
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
groups:
  - name: "1.2"
    channels:
      - name: stable
        version: v1.2.3+fix6
      - name: beta
        version: v1.2.4
  - name: v1
    channels:
      - name: alpha
        version: v1.3.0
"#;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ManifestFormat::from_path(Path::new("a.json")), Some(ManifestFormat::Json));
        assert_eq!(ManifestFormat::from_path(Path::new("a.yaml")), Some(ManifestFormat::Yaml));
        assert_eq!(ManifestFormat::from_path(Path::new("a.yml")), Some(ManifestFormat::Yaml));
        assert_eq!(ManifestFormat::from_path(Path::new("a.toml")), None);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "channels.yaml", YAML);

        let releases = load(&path).unwrap();
        assert_eq!(releases.groups.len(), 2);
        let group = releases.group("1.2").unwrap();
        assert_eq!(group.channel_version("stable"), Some("v1.2.3+fix6"));
        assert_eq!(group.channel_version("ea"), None);
    }

    #[test]
    fn test_load_json_with_capitalized_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "channels.json",
            r#"{"Groups":[{"Name":"v1","Channels":[{"name":"stable","version":"v1.1.0"}]}]}"#,
        );

        let releases = load(&path).unwrap();
        assert_eq!(releases.group("v1").unwrap().channel_version("stable"), Some("v1.1.0"));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(load(&missing), Err(ManifestError::NotFound { .. })));

        let unsupported = write_file(&dir, "channels.txt", YAML);
        assert!(matches!(load(&unsupported), Err(ManifestError::UnsupportedFormat { .. })));

        let broken = write_file(&dir, "broken.json", "{not json");
        assert!(matches!(load(&broken), Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_failed_refresh_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "channels.yaml", YAML);

        let store = ManifestStore::open(&path).unwrap();
        assert_eq!(store.snapshot().groups.len(), 2);

        write_file(&dir, "channels.yaml", "groups: [ : broken");
        assert!(store.refresh().is_err());
        assert_eq!(store.snapshot().groups.len(), 2);

        write_file(&dir, "channels.yaml", "groups: []");
        store.refresh().unwrap();
        assert!(store.snapshot().groups.is_empty());
    }

    #[test]
    fn test_release_serializes_with_capitalized_keys() {
        let releases: ReleasesStatus = serde_yaml::from_str(YAML).unwrap();
        let json = serde_json::to_value(&releases.groups).unwrap();
        assert_eq!(json[0]["Name"], "1.2");
        assert_eq!(json[0]["Channels"][0]["name"], "stable");
        assert_eq!(json[0]["Channels"][0]["version"], "v1.2.3+fix6");
        assert!(json[0].get("name").is_none());
    }

    #[tokio::test]
    async fn test_async_refresh_keeps_snapshot_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "channels.yaml", YAML);
        let store = Arc::new(ManifestStore::new(&path));

        assert_eq!(store.refresh_async().await.unwrap().groups.len(), 2);

        write_file(&dir, "channels.yaml", "groups: [ : broken");
        assert!(matches!(store.refresh_async().await, Err(ManifestError::Parse { .. })));
        assert_eq!(store.refresh_or_stale_async().await.groups.len(), 2);
    }
}
