//! Shared store handle.
//!
//! A `Store` is built once at startup and cloned into every component that
//! needs the directory. Each unit of work acquires the connection through
//! [`Store::acquire`]; the returned guard releases it when dropped, on every
//! exit path.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Database, DbError, DbResult};

/// Cloneable, thread-safe handle to the directory database.
#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<Database>>,
}

impl Store {
    /// Wrap an already-opened database.
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Acquire the connection for one unit of work.
    ///
    /// Blocks while another unit of work holds it. A poisoned lock means an
    /// earlier holder panicked mid-query; it is reported as unavailable.
    pub fn acquire(&self) -> DbResult<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|e| DbError::Unavailable(format!("Lock poisoned: {}", e)))
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let store = Store::open_in_memory().unwrap();

        {
            let db = store.acquire().unwrap();
            db.ping().unwrap();
        }

        // Released on drop; a second acquisition must not deadlock
        let db = store.acquire().unwrap();
        assert!(db.ping().is_ok());
    }

    #[test]
    fn test_clones_share_connection() {
        let store = Store::open_in_memory().unwrap();
        let other = store.clone();

        store
            .acquire()
            .unwrap()
            .conn()
            .execute(
                "INSERT INTO problem_specialty_map (problem, specialty) VALUES ('rash', 'dermatologist')",
                [],
            )
            .unwrap();

        let count: i64 = other
            .acquire()
            .unwrap()
            .conn()
            .query_row("SELECT COUNT(*) FROM problem_specialty_map", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_poisoned_lock_is_unavailable() {
        let store = Store::open_in_memory().unwrap();
        let poisoner = store.clone();

        let _ = std::thread::spawn(move || {
            let _guard = poisoner.acquire().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(store.acquire(), Err(DbError::Unavailable(_))));
    }
}
