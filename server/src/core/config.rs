use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    MAX_PAGE_SIZE,
};

// =============================================================================
// File Config Structs (all fields optional for merging)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Search mirror configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchFileConfig {
    pub enabled: Option<bool>,
}

/// Query limits configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QueryFileConfig {
    pub default_page_size: Option<u32>,
    pub max_page_size: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub search: Option<SearchFileConfig>,
    pub query: Option<QueryFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(search) = other.search {
            let current = self.search.get_or_insert_with(SearchFileConfig::default);
            if search.enabled.is_some() {
                tracing::trace!(enabled = ?search.enabled, "Merging search.enabled");
                current.enabled = search.enabled;
            }
        }

        if let Some(query) = other.query {
            let current = self.query.get_or_insert_with(QueryFileConfig::default);
            if query.default_page_size.is_some() {
                current.default_page_size = query.default_page_size;
            }
            if query.max_page_size.is_some() {
                current.max_page_size = query.max_page_size;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Search mirror configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub enabled: bool,
}

/// Paging limits for list and search endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub query: QueryConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.hrdesk/hrdesk.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.hrdesk/hrdesk.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            search_enabled = config.search.enabled,
            default_page_size = config.query.default_page_size,
            max_page_size = config.query.max_page_size,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_search = file_config.search.unwrap_or_default();
        let file_query = file_config.query.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let search_enabled = cli.search.or(file_search.enabled).unwrap_or(true);

        let query = QueryConfig {
            default_page_size: cli
                .page_size
                .or(file_query.default_page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: cli
                .max_page_size
                .or(file_query.max_page_size)
                .unwrap_or(MAX_PAGE_SIZE),
        };

        Self {
            server: ServerConfig { host, port },
            search: SearchConfig {
                enabled: search_enabled,
            },
            query,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would cause bind failure
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.query.default_page_size == 0 {
            anyhow::bail!("Configuration error: query.default_page_size must be greater than 0");
        }
        if self.query.default_page_size > self.query.max_page_size {
            anyhow::bail!(
                "Configuration error: query.default_page_size ({}) exceeds query.max_page_size ({})",
                self.query.default_page_size,
                self.query.max_page_size
            );
        }

        // The API has no authentication of its own
        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Binding to all network interfaces exposes HR records to your network"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.hrdesk/hrdesk.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
