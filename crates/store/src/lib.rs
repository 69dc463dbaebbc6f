//! SQLite persistence and media storage for stockroom.
//!
//! [`Store`] owns one connection behind a mutex and a media root on disk.
//! Reads return the bundles `stockroom_api::views` builds JSON from; writes
//! validate references and uniqueness, then run inside a single transaction
//! together with their side effects (availability updates, manufacturer
//! links, image and attachment files).

mod attachments;
mod catalog;
mod companies;
mod manufacturer_parts;
mod media;
mod parameters;
mod price_breaks;
mod rows;
mod sql;
mod supplier_parts;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use stockroom_api::db::migrations::{MIGRATIONS, MIGRATIONS_TABLE};
use stockroom_api::ServiceError;

pub use stockroom_api::db::attachments::AttachmentKind;
pub use sql::values_to_params;

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "stockroom.db";

/// Media directory name inside the data directory.
pub const MEDIA_DIR_NAME: &str = "media";

pub type StoreResult<T> = std::result::Result<T, ServiceError>;

/// Thread-safe store; share it via `Arc<Store>`.
pub struct Store {
    conn: Mutex<Connection>,
    media_root: PathBuf,
}

impl Store {
    /// Open (or create) `stockroom.db` and `media/` under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        Self::open_path(&data_dir.join(DB_FILE_NAME), &data_dir.join(MEDIA_DIR_NAME))
    }

    /// Open (or create) the database at `db_path`, storing files under
    /// `media_root`.
    pub fn open_path(db_path: &Path, media_root: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir for {}", db_path.display()))?;
        }
        std::fs::create_dir_all(media_root)
            .with_context(|| format!("create media dir {}", media_root.display()))?;

        let conn = Connection::open(db_path)
            .with_context(|| format!("open db {}", db_path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            media_root: media_root.to_path_buf(),
        })
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` inside a transaction, committing only when it succeeds.
    fn write<T>(
        &self,
        context: &str,
        f: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .map_err(ServiceError::from_db(context))?;
        let out = f(&tx)?;
        tx.commit().map_err(ServiceError::from_db(context))?;
        Ok(out)
    }
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(MIGRATIONS_TABLE)?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;

        if !already_applied {
            conn.execute_batch(sql)
                .with_context(|| format!("running migration {name}"))?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("Applied migration: {name}");
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_runs_migrations_once() {
        let dir = tempfile::tempdir().unwrap();
        drop(Store::open(dir.path()).unwrap());
        let store = Store::open(dir.path()).unwrap();
        let applied: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
        assert!(store.media_root().ends_with(MEDIA_DIR_NAME));
    }
}
