// src/models.rs

use crate::constants::*;
use rusqlite::Connection;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// --- Catalog Handle ---

/// Read-only handle over the seeded catalog connection.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn new(conn: Connection) -> Self {
        Catalog { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

// --- Closed Enumerations ---

/// A value that travels through the query string as a fixed token.
pub trait ParamValue: FromStr + Copy + PartialEq {
    fn as_str(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    CoreMaths,
    IntegratedScience,
    Physics,
    Chemistry,
    Biology,
    WebDev,
}

impl Subject {
    /// Display order used by the subject row.
    pub const ALL: [Subject; 6] = [
        Subject::CoreMaths,
        Subject::IntegratedScience,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::WebDev,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::CoreMaths => "Core Mathematics",
            Subject::IntegratedScience => "Integrated Science",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::WebDev => "Web Development",
        }
    }
}

impl ParamValue for Subject {
    fn as_str(&self) -> &'static str {
        match self {
            Subject::CoreMaths => "core-maths",
            Subject::IntegratedScience => "integrated-science",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
            Subject::WebDev => "web-dev",
        }
    }
}

impl FromStr for Subject {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| format!("unknown subject: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Video,
    Notes,
    PastQuestions,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Video,
        ContentKind::Notes,
        ContentKind::PastQuestions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Notes => "notes",
            ContentKind::PastQuestions => "past-questions",
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ContentKind::Video),
            "notes" => Ok(ContentKind::Notes),
            "past-questions" => Ok(ContentKind::PastQuestions),
            _ => Err(format!("unknown content kind: {s}")),
        }
    }
}

/// Pedagogical tag carried by every video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoTag {
    Concept,
    Topic,
    Past,
}

impl VideoTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoTag::Concept => "concept",
            VideoTag::Topic => "topic",
            VideoTag::Past => "past",
        }
    }
}

impl FromStr for VideoTag {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concept" => Ok(VideoTag::Concept),
            "topic" => Ok(VideoTag::Topic),
            "past" => Ok(VideoTag::Past),
            _ => Err(format!("unknown video tag: {s}")),
        }
    }
}

/// Content tab shown on the library page. Note the plural `videos` token,
/// which differs from the `video` content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    Videos,
    Notes,
    PastQuestions,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Videos, Tab::Notes, Tab::PastQuestions];

    pub fn kind(&self) -> ContentKind {
        match self {
            Tab::Videos => ContentKind::Video,
            Tab::Notes => ContentKind::Notes,
            Tab::PastQuestions => ContentKind::PastQuestions,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Videos => "Watch",
            Tab::Notes => "Study",
            Tab::PastQuestions => "Practice",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Tab::Videos => EMPTY_VIDEOS,
            Tab::Notes => EMPTY_NOTES,
            Tab::PastQuestions => EMPTY_PAST_QUESTIONS,
        }
    }
}

impl ParamValue for Tab {
    fn as_str(&self) -> &'static str {
        match self {
            Tab::Videos => "videos",
            Tab::Notes => "notes",
            Tab::PastQuestions => "past-questions",
        }
    }
}

impl FromStr for Tab {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "videos" => Ok(Tab::Videos),
            "notes" => Ok(Tab::Notes),
            "past-questions" => Ok(Tab::PastQuestions),
            _ => Err(format!("unknown tab: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFilter {
    All,
    Concept,
    Topic,
    Past,
}

impl VideoFilter {
    pub const ALL: [VideoFilter; 4] = [
        VideoFilter::All,
        VideoFilter::Concept,
        VideoFilter::Topic,
        VideoFilter::Past,
    ];

    /// The tag this filter restricts to, `None` for `All`.
    pub fn tag(&self) -> Option<VideoTag> {
        match self {
            VideoFilter::All => None,
            VideoFilter::Concept => Some(VideoTag::Concept),
            VideoFilter::Topic => Some(VideoTag::Topic),
            VideoFilter::Past => Some(VideoTag::Past),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoFilter::All => "All",
            VideoFilter::Concept => "Concept",
            VideoFilter::Topic => "Topic",
            VideoFilter::Past => "Past Qs",
        }
    }
}

impl ParamValue for VideoFilter {
    fn as_str(&self) -> &'static str {
        match self {
            VideoFilter::All => "all",
            VideoFilter::Concept => "concept",
            VideoFilter::Topic => "topic",
            VideoFilter::Past => "past",
        }
    }
}

impl FromStr for VideoFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| format!("unknown video filter: {s}"))
    }
}

// --- Decoded Query Values ---

/// A query-string value decoded against a closed set. Anything outside the
/// set is kept verbatim so it can be reported or re-encoded unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param<T> {
    Known(T),
    Unknown(String),
}

impl<T: ParamValue> Param<T> {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<T>() {
            Ok(value) => Param::Known(value),
            Err(_) => Param::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Param::Known(value) => value.as_str(),
            Param::Unknown(raw) => raw,
        }
    }

    pub fn known(&self) -> Option<T> {
        match self {
            Param::Known(value) => Some(*value),
            Param::Unknown(_) => None,
        }
    }

    pub fn is(&self, value: T) -> bool {
        self.known() == Some(value)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Param::Unknown(_))
    }
}

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Param::Known(value)
    }
}

impl<T: ParamValue> fmt::Display for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: ParamValue> Serialize for Param<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// --- Content Items ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub subject: Subject,
    pub tag: VideoTag,
    pub lesson_number: u32,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub subject: Subject,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ContentItem {
    Video(Video),
    Notes(Document),
    PastQuestions(Document),
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Video(_) => ContentKind::Video,
            ContentItem::Notes(_) => ContentKind::Notes,
            ContentItem::PastQuestions(_) => ContentKind::PastQuestions,
        }
    }

    pub fn subject(&self) -> Subject {
        match self {
            ContentItem::Video(v) => v.subject,
            ContentItem::Notes(d) | ContentItem::PastQuestions(d) => d.subject,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Video(v) => &v.title,
            ContentItem::Notes(d) | ContentItem::PastQuestions(d) => &d.title,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ContentItem::Video(v) => Some(&v.description),
            ContentItem::Notes(d) | ContentItem::PastQuestions(d) => d.description.as_deref(),
        }
    }

    pub fn video_tag(&self) -> Option<VideoTag> {
        match self {
            ContentItem::Video(v) => Some(v.tag),
            _ => None,
        }
    }

    /// Link target for the rendered card; videos without a URL point at `#`.
    pub fn href(&self) -> &str {
        match self {
            ContentItem::Video(v) => v.url.as_deref().unwrap_or(FALLBACK_HREF),
            ContentItem::Notes(d) | ContentItem::PastQuestions(d) => &d.url,
        }
    }
}

// Used for seeding
#[derive(Deserialize)]
pub struct SeedCatalog {
    pub videos: Vec<Video>,
    pub documents: Vec<SeedDocument>,
}

#[derive(Deserialize)]
pub struct SeedDocument {
    pub id: String,
    pub subject: Subject,
    pub kind: ContentKind,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

// --- View State ---

/// The four-field record that fully determines what the library renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub subject: Param<Subject>,
    pub tab: Param<Tab>,
    pub video_filter: Param<VideoFilter>,
    pub query: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            subject: Param::parse(DEFAULT_SUBJECT),
            tab: Param::parse(DEFAULT_TAB),
            video_filter: Param::parse(DEFAULT_VIDEO_FILTER),
            query: String::new(),
        }
    }
}

impl ViewState {
    /// True when a video sub-filter is left over on a non-video tab.
    pub fn needs_filter_reset(&self) -> bool {
        !self.tab.is(Tab::Videos) && !self.video_filter.is(VideoFilter::All)
    }

    /// Query parameters whose value fell outside their closed set.
    pub fn unknown_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.subject.is_unknown() {
            fields.push(PARAM_SUBJECT);
        }
        if self.tab.is_unknown() {
            fields.push(PARAM_TAB);
        }
        if self.video_filter.is_unknown() {
            fields.push(PARAM_VIDEO_FILTER);
        }
        fields
    }

    /// A search made only of whitespace counts as no search.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Clears a stale video sub-filter; see [`ViewState::needs_filter_reset`].
    pub fn with_filter_reset(mut self) -> Self {
        if self.needs_filter_reset() {
            self.video_filter = Param::Known(VideoFilter::All);
        }
        self
    }
}

// --- Rendered Output ---

/// Badge counts per tab; independent of the video sub-filter and search.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct TabCounts {
    pub videos: usize,
    pub notes: usize,
    pub past_questions: usize,
}

impl TabCounts {
    pub fn for_tab(&self, tab: Tab) -> usize {
        match tab {
            Tab::Videos => self.videos,
            Tab::Notes => self.notes,
            Tab::PastQuestions => self.past_questions,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LibraryView {
    pub state: ViewState,
    pub items: Vec<ContentItem>,
    pub counts: TabCounts,
    pub empty_message: Option<&'static str>,
    pub unknown_params: Vec<&'static str>,
}
