//! SQLite storage for persisted panel settings.

mod migrations;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

/// Handle to the settings database.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open the database at [`Database::default_path`].
    pub fn open() -> anyhow::Result<Self> {
        Self::open_at(Self::default_path()?)
    }

    /// Open (or create) the database at `path`.
    ///
    /// Parent directories are created as needed. On Unix the file is
    /// restricted to 0600 since it stores API keys.
    pub fn open_at(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(path = %path.display(), error = %e, "Failed to restrict database permissions");
            }
        }

        Ok(Self { conn, path })
    }

    /// `<data dir>/modelpanel/modelpanel.db`
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("modelpanel").join("modelpanel.db"))
    }

    /// Apply pending migrations. Safe to call repeatedly.
    pub fn migrate(&self) -> anyhow::Result<()> {
        migrations::run_migrations(&self.conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Settings Storage
    // =========================================================================

    /// Upsert a setting.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, unixepoch())
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            [key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
    }
}
