// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "HRDesk";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "hrdesk";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".hrdesk";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "hrdesk.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "HRDESK_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "HRDESK_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "HRDESK_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "HRDESK_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Default request body limit (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Graceful shutdown timeout
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Response header carrying non-fatal warnings (degraded search mirror)
pub const WARNING_HEADER: &str = "x-hrdesk-warning";

/// Warning sent when the mirror failure message cannot be carried in a header
pub const MIRROR_DEGRADED: &str = "search index not updated";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "HRDESK_DATA_DIR";

// =============================================================================
// SQLite
// =============================================================================

pub const SQLITE_DB_FILENAME: &str = "hrdesk.db";

pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// Negative value = KiB (64 MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Search Mirror
// =============================================================================

/// Environment variable to enable/disable the search mirror
pub const ENV_SEARCH_ENABLED: &str = "HRDESK_SEARCH_ENABLED";

pub const SEARCH_DB_FILENAME: &str = "search.db";

pub const SEARCH_MAX_CONNECTIONS: u32 = 2;

// =============================================================================
// Query Limits
// =============================================================================

/// Environment variable for the default page size
pub const ENV_PAGE_SIZE: &str = "HRDESK_PAGE_SIZE";

/// Environment variable for the largest accepted page size
pub const ENV_MAX_PAGE_SIZE: &str = "HRDESK_MAX_PAGE_SIZE";

pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const MAX_PAGE_SIZE: u32 = 500;

/// Maximum values accepted by one `in`/`notIn` filter
pub const MAX_FILTER_VALUES: usize = 500;
