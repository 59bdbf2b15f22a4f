//! Database access layer with connection pooling and migrations
//!
//! - `transactions` - Transaction insert/list and the analytics store implementation
//!
//! Connections are checked out of the pool per operation and returned when the
//! guard drops, on success and error paths alike. Nothing here is process-global:
//! callers hold a `Database` handle and pass it where it is needed.

use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "FINFLOW_DB_KEY";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this invalidates every existing encrypted database
    const APP_SALT: &[u8; 16] = b"finflow-salt-v01";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
    // Declared after `pool` so connections close before the directory is removed
    temp_dir: Option<Arc<tempfile::TempDir>>,
}

impl Database {
    /// Open an encrypted database
    ///
    /// Requires the `FINFLOW_DB_KEY` environment variable. Use `new_unencrypted()`
    /// for development/testing without encryption.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases.",
                DB_KEY_ENV
            ))),
        }
    }

    /// Open an unencrypted database
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open a database with an explicit (optional) passphrase
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            // The key has to be set on every new pooled connection
            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                Ok(())
            });

            Pool::builder().max_size(10).build(manager)?
        } else {
            Pool::builder().max_size(10).build(manager)?
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
            temp_dir: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because each pooled connection
    /// would otherwise see its own empty database. The file lives in a private
    /// temp directory that is removed, WAL files included, when the last clone drops.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("finflow_test_").tempdir()?;
        let path = dir.path().join("finflow.db");
        let path = path
            .to_str()
            .ok_or_else(|| Error::InvalidData("Temp path is not valid UTF-8".to_string()))?
            .to_string();

        let mut db = Self::new_unencrypted(&path)?;
        db.temp_dir = Some(Arc::new(dir));
        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the single writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Transactions are immutable once stored; category is assigned at insert time
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                date DATE NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                amount REAL NOT NULL,
                currency TEXT NOT NULL DEFAULT 'INR',
                category TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);
            "#,
        )?;

        info!(path = %self.db_path, "Database schema initialized");
        Ok(())
    }
}
