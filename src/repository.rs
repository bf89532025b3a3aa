// src/repository.rs

use crate::error::{CatalogError, Result};
use crate::models::{ContentItem, ContentKind, Document, ParamValue, Subject, TabCounts, Video};
use log::debug;
use rusqlite::{params, Connection};
use std::str::FromStr;

// The list and count queries share these predicates so badge counts can
// never drift from the lists they describe.
const VIDEO_SOURCE: &str = "FROM videos WHERE subject = ?1";
const DOCUMENT_SOURCE: &str = "FROM documents WHERE subject = ?1 AND kind = ?2";

/// All items of one kind for a subject, in declaration order.
pub fn list_by_subject_and_kind(
    conn: &Connection,
    subject: Subject,
    kind: ContentKind,
) -> Result<Vec<ContentItem>> {
    let items: Vec<ContentItem> = match kind {
        ContentKind::Video => list_videos(conn, subject)?
            .into_iter()
            .map(ContentItem::Video)
            .collect(),
        ContentKind::Notes => list_documents(conn, subject, kind)?
            .into_iter()
            .map(ContentItem::Notes)
            .collect(),
        ContentKind::PastQuestions => list_documents(conn, subject, kind)?
            .into_iter()
            .map(ContentItem::PastQuestions)
            .collect(),
    };
    debug!(
        "[DB] {} {} item(s) for {}",
        items.len(),
        kind.as_str(),
        subject.as_str()
    );
    Ok(items)
}

/// Cardinality of [`list_by_subject_and_kind`] for the same arguments.
pub fn count_by_subject_and_kind(
    conn: &Connection,
    subject: Subject,
    kind: ContentKind,
) -> Result<usize> {
    let count: i64 = match kind {
        ContentKind::Video => conn.query_row(
            &format!("SELECT count(*) {VIDEO_SOURCE}"),
            [subject.as_str()],
            |r| r.get(0),
        )?,
        _ => conn.query_row(
            &format!("SELECT count(*) {DOCUMENT_SOURCE}"),
            params![subject.as_str(), kind.as_str()],
            |r| r.get(0),
        )?,
    };
    Ok(count as usize)
}

/// Badge counts for every tab of a subject.
pub fn tab_counts(conn: &Connection, subject: Subject) -> Result<TabCounts> {
    Ok(TabCounts {
        videos: count_by_subject_and_kind(conn, subject, ContentKind::Video)?,
        notes: count_by_subject_and_kind(conn, subject, ContentKind::Notes)?,
        past_questions: count_by_subject_and_kind(conn, subject, ContentKind::PastQuestions)?,
    })
}

fn list_videos(conn: &Connection, subject: Subject) -> Result<Vec<Video>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, title, description, duration, subject, tag, lesson_number, url
         {VIDEO_SOURCE}
         ORDER BY position ASC"
    ))?;

    let rows = stmt
        .query_map([subject.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, u32>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(
            |(id, title, description, duration, subject, tag, lesson_number, url)| {
                Ok(Video {
                    id,
                    title,
                    description,
                    duration,
                    subject: parse_token("subject", subject)?,
                    tag: parse_token("tag", tag)?,
                    lesson_number,
                    url,
                })
            },
        )
        .collect()
}

fn list_documents(
    conn: &Connection,
    subject: Subject,
    kind: ContentKind,
) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, subject, title, url, description
         {DOCUMENT_SOURCE}
         ORDER BY position ASC"
    ))?;

    let rows = stmt
        .query_map(params![subject.as_str(), kind.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(id, subject, title, url, description)| {
            Ok(Document {
                id,
                subject: parse_token("subject", subject)?,
                title,
                url,
                description,
            })
        })
        .collect()
}

fn parse_token<T: FromStr>(field: &'static str, value: String) -> Result<T> {
    T::from_str(&value).map_err(|_| CatalogError::CorruptRow { field, value })
}
