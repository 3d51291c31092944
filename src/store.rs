//! SQLite persistence for scraped tracks and their audio features.
//!
//! The schema keys tracks by (title, artist, release date); re-scraping a
//! chart is idempotent. Feature rows reference a track id and are unique
//! per track, so a re-run of the feature pipeline never duplicates work.
//! Unresolved tracks are persisted as all-null feature rows to mark them
//! "looked up, not found" as opposed to "never attempted".

use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};

use crate::types::{AudioFeatures, ChartTrack};

/// Upper bound on rows handed to one feature batch, independent of worker
/// count.
pub const BATCH_CAP: u32 = 1000;

/// A stored track still missing its feature row, carrying the correlation
/// key used to re-associate the asynchronous match result.
#[derive(Debug, Clone)]
pub struct PendingTrack {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: i32,
}

/// Track-selection mode for playlist building.
#[derive(Debug, Clone)]
pub enum Selection {
    Chart(String),
    Author(String),
    Artist(String),
    Genre(String),
}

impl Selection {
    pub fn describe(&self) -> String {
        match self {
            Selection::Chart(name) => format!("chart {}", name),
            Selection::Author(name) => format!("charts by {}", name),
            Selection::Artist(name) => format!("tracks by {}", name),
            Selection::Genre(name) => format!("{} tracks", name),
        }
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (and migrates) the database, creating parent directories as
    /// needed.
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )?;
        migrate(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Inserts a scraped track unless the (title, artist, release date) key
    /// already exists. Returns whether a row was inserted.
    pub fn upsert_track(&self, track: &ChartTrack) -> Result<bool, rusqlite::Error> {
        let artists = track.artists.join(", ");
        let remixers = if track.remixers.is_empty() {
            None
        } else {
            Some(track.remixers.join(", "))
        };

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO tracks (
                chart_name, chart_author, chart_date,
                track_title, track_artist, track_label, track_remixer,
                track_genre, track_bpm, track_key, track_date, track_length_ms
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                track.chart_name,
                track.chart_author,
                track.chart_date,
                track.title,
                artists,
                track.label,
                remixers,
                track.genre,
                track.bpm,
                track.key,
                track.release_date,
                track.length_ms,
            ],
        )?;

        Ok(inserted > 0)
    }

    /// Tracks without a feature row, ordered by id, capped at [`BATCH_CAP`].
    ///
    /// Rows already marked with an all-null feature row do not reappear;
    /// that is what makes the overall job restart-safe per track.
    pub fn tracks_missing_features(&self, limit: u32) -> Result<Vec<PendingTrack>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.track_title, t.track_artist,
                    CAST(substr(t.track_date, 1, 4) AS INTEGER)
             FROM tracks t
             WHERE NOT EXISTS (
                 SELECT 1 FROM features f WHERE f.track_id = t.id
             )
             ORDER BY t.id
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit.min(BATCH_CAP)], |row| {
            Ok(PendingTrack {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
                year: row.get(3)?,
            })
        })?;

        rows.collect()
    }

    /// Inserts one feature row. `None` persists an all-null row for an
    /// unresolved track. One statement per call; a failing row rolls back
    /// alone and never aborts the batch.
    pub fn insert_features(
        &self,
        track_id: i64,
        features: Option<&AudioFeatures>,
    ) -> Result<(), rusqlite::Error> {
        let empty = AudioFeatures::default();
        let f = features.unwrap_or(&empty);

        self.conn.execute(
            "INSERT INTO features (
                track_id, acousticness, danceability, energy, instrumentalness,
                liveness, loudness, speechiness, tempo, time_signature, valence
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                track_id,
                f.acousticness,
                f.danceability,
                f.energy,
                f.instrumentalness,
                f.liveness,
                f.loudness,
                f.speechiness,
                f.tempo,
                f.time_signature,
                f.valence,
            ],
        )?;

        Ok(())
    }

    /// Tracks matching a playlist selection mode.
    pub fn select_tracks(&self, selection: &Selection) -> Result<Vec<PendingTrack>, rusqlite::Error> {
        let (filter, value) = match selection {
            Selection::Chart(name) => ("t.chart_name = ?1", name.clone()),
            Selection::Author(name) => ("t.chart_author = ?1", name.clone()),
            Selection::Artist(name) => ("t.track_artist LIKE ?1", format!("%{}%", name)),
            Selection::Genre(name) => ("t.track_genre = ?1", name.clone()),
        };

        let sql = format!(
            "SELECT t.id, t.track_title, t.track_artist,
                    CAST(substr(t.track_date, 1, 4) AS INTEGER)
             FROM tracks t
             WHERE {}
             ORDER BY t.id",
            filter
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![value], |row| {
            Ok(PendingTrack {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
                year: row.get(3)?,
            })
        })?;

        rows.collect()
    }

    pub fn count_tracks(&self) -> Result<i64, rusqlite::Error> {
        self.conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))
    }

    pub fn count_feature_rows(&self) -> Result<i64, rusqlite::Error> {
        self.conn
            .query_row("SELECT COUNT(*) FROM features", [], |row| row.get(0))
    }

    /// Feature rows where every feature column is null, i.e. tracks looked
    /// up but not found in the catalog.
    pub fn count_unresolved(&self) -> Result<i64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM features
             WHERE acousticness IS NULL AND danceability IS NULL AND energy IS NULL
               AND instrumentalness IS NULL AND liveness IS NULL AND loudness IS NULL
               AND speechiness IS NULL AND tempo IS NULL AND time_signature IS NULL
               AND valence IS NULL",
            [],
            |row| row.get(0),
        )
    }
}

fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY,
            chart_name TEXT,
            chart_author TEXT,
            chart_date TEXT,
            track_title TEXT NOT NULL,
            track_artist TEXT NOT NULL,
            track_label TEXT,
            track_remixer TEXT DEFAULT NULL,
            track_genre TEXT,
            track_bpm INTEGER,
            track_key TEXT,
            track_date TEXT,
            track_length_ms INTEGER,
            UNIQUE (track_title, track_artist, track_date)
         );
         CREATE TABLE IF NOT EXISTS features (
            id INTEGER PRIMARY KEY,
            track_id INTEGER NOT NULL UNIQUE,
            acousticness REAL,
            danceability REAL,
            energy REAL,
            instrumentalness REAL,
            liveness REAL,
            loudness REAL,
            speechiness REAL,
            tempo REAL,
            time_signature INTEGER,
            valence REAL,
            FOREIGN KEY (track_id) REFERENCES tracks(id)
         );",
    )
}
