//! Platform-aware data storage directory management
//!
//! ## Platform Paths
//!
//! | Type | Windows | macOS | Linux |
//! |------|---------|-------|-------|
//! | Data | `%APPDATA%\HRDesk\` | `~/Library/Application Support/HRDesk/` | `$XDG_DATA_HOME/hrdesk/` |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::config::AppConfig;
use super::constants::{APP_DOT_FOLDER, APP_NAME, ENV_DATA_DIR};
use crate::utils::file::expand_path;

/// Data subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSubdir {
    Sqlite,
    Search,
}

impl DataSubdir {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataSubdir::Sqlite => "sqlite",
            DataSubdir::Search => "search",
        }
    }

    /// Returns subdirectories that should always be created.
    /// Search is excluded - it's only created when the mirror is enabled.
    pub const fn all() -> &'static [DataSubdir] {
        &[DataSubdir::Sqlite]
    }
}

/// Application storage manager
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Initialize storage with platform-appropriate data directory
    pub async fn init(config: &AppConfig) -> Result<Self> {
        let data_dir = Self::resolve_data_dir();

        // Create directories first (canonicalize requires path to exist)
        Self::ensure_directories(&data_dir, config.search.enabled).await?;

        // Now canonicalize to get clean path for logging
        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        tracing::debug!(data_dir = %data_dir.display(), "Storage initialized");

        if config.search.enabled {
            let search_path = data_dir.join(DataSubdir::Search.as_str());
            tracing::debug!(path = %search_path.display(), "Search mirror storage enabled");
        }

        Ok(Self { data_dir })
    }

    /// Resolve data directory from env var or platform default
    pub fn resolve_data_dir() -> PathBuf {
        // Check env var override first
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            return expand_path(&dir);
        }

        // Use platform-specific directory
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.data_dir().to_path_buf();
        }

        // Fallback to local .hrdesk
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(APP_DOT_FOLDER)
    }

    /// Create data directory and subdirectories
    async fn ensure_directories(data_dir: &Path, search_enabled: bool) -> Result<()> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let extra: &[DataSubdir] = if search_enabled {
            &[DataSubdir::Search]
        } else {
            &[]
        };
        for subdir in DataSubdir::all().iter().chain(extra) {
            let path = data_dir.join(subdir.as_str());
            tokio::fs::create_dir_all(&path).await.with_context(|| {
                format!(
                    "Failed to create {} directory: {}",
                    subdir.as_str(),
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to a subdirectory (canonicalized)
    pub fn subdir(&self, subdir: DataSubdir) -> PathBuf {
        let path = self.data_dir.join(subdir.as_str());
        path.canonicalize().unwrap_or(path)
    }

    /// Create AppStorage for testing with a specific data directory
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        for subdir in [DataSubdir::Sqlite, DataSubdir::Search] {
            std::fs::create_dir_all(data_dir.join(subdir.as_str()))
                .expect("create test data subdirectory");
        }
        Self { data_dir }
    }
}
