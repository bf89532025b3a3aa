// src/lib.rs

//! Catalog filtering and URL-synchronized view state for the study library.
//!
//! The catalog is an immutable in-memory store seeded once at start-up
//! ([`database::open_catalog`]). The page's query string is the only source
//! of view state: [`query::decode`] projects it into a [`ViewState`],
//! [`query::patch`] writes changes back as minimal edits, and
//! [`library::render_library`] turns a state into the items and badge
//! counts to display.

pub mod constants;
pub mod database;
pub mod error;
pub mod library;
pub mod models;
pub mod query;
pub mod repository;

pub use error::{CatalogError, Result};
pub use models::{
    Catalog, ContentItem, ContentKind, LibraryView, Param, Subject, Tab, TabCounts, VideoFilter,
    VideoTag, ViewState,
};
