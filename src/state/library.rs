use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result as SqlResult};

use crate::api::Photo;

/// The Library is the local photo catalog, a small SQLite database.
/// It keeps the last successfully fetched photo metadata and the paths
/// of generated thumbnails, so the gallery renders immediately on
/// startup and stays usable offline.
pub struct Library {
    conn: Connection,
}

impl Library {
    /// Create a Library instance over the default catalog database.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/milepost/catalog.db
    /// - macOS: ~/Library/Application Support/milepost/catalog.db
    /// - Windows: %APPDATA%\milepost\catalog.db
    pub fn new() -> SqlResult<Self> {
        let db_path = Self::get_db_path();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create application data directory");
        }

        let conn = Connection::open(&db_path)?;
        println!("📁 Catalog opened at: {}", db_path.display());

        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> SqlResult<Self> {
        let mut library = Library { conn };
        library.init_schema()?;
        Ok(library)
    }

    /// Get the path where the catalog should be stored
    fn get_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("milepost");
        path.push("catalog.db");
        path
    }

    /// Initialize the catalog schema.
    fn init_schema(&mut self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                id                    INTEGER PRIMARY KEY,
                image_url             TEXT NOT NULL,
                topic                 TEXT NOT NULL,
                description           TEXT NOT NULL,
                upload_date           TEXT NOT NULL,
                tagged_milestone_ids  TEXT NOT NULL,
                thumbnail_path        TEXT,
                fetched_at            INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_topic ON photos(topic)",
            [],
        )?;

        Ok(())
    }

    /// Get a count of cached photos
    pub fn photo_count(&self) -> SqlResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Swap the cached catalog for a freshly fetched photo list.
    ///
    /// Runs inside a transaction so a crash mid-replace never leaves a
    /// half-written catalog. Thumbnail paths of photos that survived the
    /// refresh are carried over.
    pub fn replace_photos(&mut self, photos: &[Photo]) -> SqlResult<()> {
        let now = Utc::now().timestamp();
        let tx = self.conn.transaction()?;

        let existing_thumbs: HashMap<i64, String> = {
            let mut stmt = tx.prepare(
                "SELECT id, thumbnail_path FROM photos WHERE thumbnail_path IS NOT NULL",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.filter_map(|r| r.ok()).collect()
        };

        tx.execute("DELETE FROM photos", [])?;

        for photo in photos {
            let tagged = serde_json::to_string(&photo.tagged_milestone_ids)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

            tx.execute(
                "INSERT INTO photos
                    (id, image_url, topic, description, upload_date,
                     tagged_milestone_ids, thumbnail_path, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    photo.id,
                    photo.image_url,
                    photo.topic,
                    photo.description,
                    photo.upload_date.to_rfc3339(),
                    tagged,
                    existing_thumbs.get(&photo.id),
                    now,
                ],
            )?;
        }

        tx.commit()
    }

    /// Load the cached photo list, newest upload first.
    pub fn load_photos(&self) -> SqlResult<Vec<Photo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, image_url, topic, description, upload_date, tagged_milestone_ids
             FROM photos ORDER BY upload_date DESC",
        )?;

        let photo_iter = stmt.query_map([], |row| {
            let upload_date: String = row.get(4)?;
            let upload_date = DateTime::parse_from_rfc3339(&upload_date)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;

            let tagged: String = row.get(5)?;

            Ok(Photo {
                id: row.get(0)?,
                image_url: row.get(1)?,
                topic: row.get(2)?,
                description: row.get(3)?,
                upload_date,
                tagged_milestone_ids: serde_json::from_str(&tagged).unwrap_or_default(),
            })
        })?;

        let mut photos = Vec::new();
        for photo in photo_iter {
            photos.push(photo?);
        }

        Ok(photos)
    }

    /// Record a generated thumbnail for a photo.
    pub fn set_thumbnail(&self, photo_id: i64, thumbnail_path: &str) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE photos SET thumbnail_path = ?1 WHERE id = ?2",
            rusqlite::params![thumbnail_path, photo_id],
        )?;
        Ok(())
    }

    /// All recorded thumbnails, keyed by photo ID.
    pub fn thumbnails(&self) -> SqlResult<HashMap<i64, String>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, thumbnail_path FROM photos WHERE thumbnail_path IS NOT NULL",
        )?;

        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut thumbnails = HashMap::new();
        for row in rows {
            let (id, path): (i64, String) = row?;
            thumbnails.insert(id, path);
        }

        Ok(thumbnails)
    }

    /// IDs of every cached photo, for the thumbnail cache sweep.
    pub fn photo_ids(&self) -> SqlResult<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT id FROM photos")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut ids = Vec::new();
        for id in rows {
            ids.push(id?);
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn in_memory() -> Library {
        Library::with_connection(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn photo(id: i64, topic: &str, day: u32) -> Photo {
        Photo {
            id,
            image_url: format!("https://cdn.example/p/{}.jpg", id),
            topic: topic.to_string(),
            description: format!("photo {}", id),
            upload_date: Utc.with_ymd_and_hms(2024, 11, day, 12, 0, 0).unwrap(),
            tagged_milestone_ids: vec![id * 10],
        }
    }

    #[test]
    fn test_replace_and_load_round_trips() {
        let mut library = in_memory();
        let photos = vec![photo(1, "Hiking", 3), photo(2, "Baking", 5)];

        library.replace_photos(&photos).unwrap();

        let loaded = library.load_photos().unwrap();
        assert_eq!(loaded.len(), 2);
        // Newest upload first
        assert_eq!(loaded[0].id, 2);
        assert_eq!(loaded[1], photos[0]);
        assert_eq!(library.photo_count().unwrap(), 2);
    }

    #[test]
    fn test_replace_discards_photos_gone_from_the_backend() {
        let mut library = in_memory();
        library
            .replace_photos(&[photo(1, "Hiking", 3), photo(2, "Baking", 5)])
            .unwrap();
        library.replace_photos(&[photo(2, "Baking", 5)]).unwrap();

        let loaded = library.load_photos().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 2);
    }

    #[test]
    fn test_thumbnail_paths_survive_a_refresh() {
        let mut library = in_memory();
        library.replace_photos(&[photo(1, "Hiking", 3)]).unwrap();
        library.set_thumbnail(1, "/cache/1.jpg").unwrap();

        library
            .replace_photos(&[photo(1, "Hiking", 3), photo(2, "Baking", 5)])
            .unwrap();

        let thumbnails = library.thumbnails().unwrap();
        assert_eq!(thumbnails.get(&1).map(String::as_str), Some("/cache/1.jpg"));
        assert!(!thumbnails.contains_key(&2));
    }

    #[test]
    fn test_photo_ids_lists_every_cached_photo() {
        let mut library = in_memory();
        library
            .replace_photos(&[photo(1, "Hiking", 3), photo(2, "Baking", 5)])
            .unwrap();

        let mut ids = library.photo_ids().unwrap();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }
}
