use paprika_bot::adapter::outbound::sqlite::{self, DbPool};
use tempfile::TempDir;

/// Scratch SQLite database with migrations applied.
///
/// The directory, and the database with it, is removed when dropped.
pub struct TempDb {
    pub pool: DbPool,
    pub path: String,
    _dir: TempDir,
}

impl TempDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("bot.db").to_string_lossy().into_owned();
        let pool = sqlite::open(&path).expect("open temp database");
        Self {
            pool,
            path,
            _dir: dir,
        }
    }
}
