// src/constants.rs

// --- Query Parameter Keys ---
pub const PARAM_SUBJECT: &str = "subject";
pub const PARAM_TAB: &str = "tab";
pub const PARAM_VIDEO_FILTER: &str = "vfilter";
pub const PARAM_QUERY: &str = "q";

// --- View Defaults ---
pub const DEFAULT_SUBJECT: &str = "core-maths";
pub const DEFAULT_TAB: &str = "videos";
pub const DEFAULT_VIDEO_FILTER: &str = "all";

// --- Routing ---
pub const LIBRARY_PATH: &str = "/library";
pub const FALLBACK_HREF: &str = "#";

// --- Empty States ---
pub const EMPTY_VIDEOS: &str = "No videos yet.";
pub const EMPTY_NOTES: &str = "No notes yet.";
pub const EMPTY_PAST_QUESTIONS: &str = "No past questions yet.";
pub const EMPTY_UNKNOWN: &str = "Nothing to show for this view.";
