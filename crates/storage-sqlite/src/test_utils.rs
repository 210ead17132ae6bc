//! Temporary databases for repository tests.

use std::sync::Arc;

use tempfile::TempDir;

use crate::db::{self, DbPool, WriteHandle};

/// Creates a migrated database in a temp dir. Keep the `TempDir` alive for
/// the duration of the test.
pub fn setup_db() -> (TempDir, Arc<DbPool>, WriteHandle) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db_path = db::init(path.to_str().unwrap()).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    db::run_migrations(&pool).unwrap();
    let writer = db::spawn_writer((*pool).clone());
    (dir, pool, writer)
}
