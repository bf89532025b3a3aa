// src/database.rs

use crate::error::{CatalogError, Result};
use crate::models::{Catalog, ContentKind, ParamValue, SeedCatalog};
use log::{debug, info};
use rusqlite::{params, Connection};

const SEED_CATALOG: &str = include_str!("data/catalog.json");

/// Opens an in-memory catalog seeded with the bundled content.
pub fn open_catalog() -> Result<Catalog> {
    let conn = Connection::open_in_memory()?;
    init_db(&conn, SEED_CATALOG)?;
    Ok(Catalog::new(conn))
}

/// Opens an in-memory catalog seeded from the given JSON document.
pub fn open_catalog_from_json(seed: &str) -> Result<Catalog> {
    let conn = Connection::open_in_memory()?;
    init_db(&conn, seed)?;
    Ok(Catalog::new(conn))
}

pub fn init_db(conn: &Connection, seed: &str) -> Result<()> {
    debug!("init_db: Checking catalog schema...");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS videos (
            position INTEGER PRIMARY KEY,
            id INTEGER UNIQUE NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            duration TEXT NOT NULL,
            subject TEXT NOT NULL,
            tag TEXT NOT NULL CHECK (tag IN ('concept','topic','past')),
            lesson_number INTEGER NOT NULL,
            url TEXT
        );
        CREATE TABLE IF NOT EXISTS documents (
            position INTEGER PRIMARY KEY,
            id TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('notes','past-questions')),
            subject TEXT NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            description TEXT,
            UNIQUE (kind, id)
        );
        CREATE INDEX IF NOT EXISTS idx_videos_subject ON videos (subject, position);
        CREATE INDEX IF NOT EXISTS idx_documents_subject_kind
            ON documents (subject, kind, position);
        ",
    )?;

    let count: i64 = conn.query_row(
        "SELECT (SELECT count(*) FROM videos) + (SELECT count(*) FROM documents)",
        [],
        |row| row.get(0),
    )?;
    if count == 0 {
        debug!("init_db: Catalog empty. Seeding data...");
        seed_data(conn, seed)?;
    }

    Ok(())
}

fn seed_data(conn: &Connection, seed: &str) -> Result<()> {
    let catalog: SeedCatalog = serde_json::from_str(seed)?;

    // Positions follow declaration order in the seed document.
    let mut v_stmt = conn.prepare(
        "INSERT INTO videos
            (position, id, title, description, duration, subject, tag, lesson_number, url)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?;
    for (position, v) in catalog.videos.iter().enumerate() {
        v_stmt.execute(params![
            position as i64,
            v.id,
            v.title,
            v.description,
            v.duration,
            v.subject.as_str(),
            v.tag.as_str(),
            v.lesson_number,
            v.url,
        ])?;
    }

    let mut d_stmt = conn.prepare(
        "INSERT INTO documents (position, id, kind, subject, title, url, description)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )?;
    for (position, d) in catalog.documents.iter().enumerate() {
        if d.kind == ContentKind::Video {
            return Err(CatalogError::InvalidSeed {
                id: d.id.clone(),
                reason: "documents must be notes or past-questions".to_string(),
            });
        }
        d_stmt.execute(params![
            position as i64,
            d.id,
            d.kind.as_str(),
            d.subject.as_str(),
            d.title,
            d.url,
            d.description,
        ])?;
    }

    info!(
        "Seeded catalog: {} videos, {} documents",
        catalog.videos.len(),
        catalog.documents.len()
    );
    Ok(())
}
