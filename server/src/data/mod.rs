//! Data storage layer
//!
//! - `sqlite` - Primary store for the HR entities
//! - `search` - Full-text search mirror (SQLite FTS5 or disabled)
//! - `types` - Entity row types
//! - `traits` - Repository traits implemented by the primary store
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod search;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use search::{SearchError, SearchService};
pub use sqlite::{SqliteRepository, SqliteService};
pub use traits::{EntityRepository, RelationalProvider};
