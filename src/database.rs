//! Database initialization and table definitions
//!
//! The embedded redb file plays the role of the browser's local storage:
//! a flat map of named slots to text values.

use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::config::Config;
use crate::service::LinkService;
use crate::storage::RedbSlotStore;

/// Local storage table
///
/// Key: slot name (`linkly_last_link`, `linkly_errors`)
/// Value: JSON text, exactly as written by the storage layer
///
/// Example:
/// - Key: "linkly_last_link"
/// - Value: '{"link":"example.com","params":[...],"url":"example.com/?...","timestamp":1705501234567}'
pub const TABLE_SLOTS: TableDefinition<&str, &str> = TableDefinition::new("local_storage_v1");

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Link builder wired to the persistent slots
    pub service: Arc<LinkService>,

    /// Expected `Authorization` header value, if the API is protected
    pub auth_token: Option<String>,
}

impl AppState {
    /// Builds state over an opened database with the given configuration.
    pub fn new(db: Database, config: &Config) -> Self {
        let store = Arc::new(RedbSlotStore::new(Arc::new(db)));
        Self {
            service: Arc::new(LinkService::new(store)),
            auth_token: config.auth_token.clone(),
        }
    }
}

/// Initializes the embedded database and creates the slot table
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "linkly.db")
///
/// # Example
///
/// ```no_run
/// # use linkly::database::init_db;
/// let db = init_db("linkly.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        // Open (or create if not exists) the slot table
        write_txn.open_table(TABLE_SLOTS)?;
    }
    write_txn.commit()?;

    Ok(db)
}
