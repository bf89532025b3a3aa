// src/library.rs

use crate::constants::*;
use crate::error::Result;
use crate::models::{Catalog, ContentItem, LibraryView, Param, TabCounts, VideoFilter, ViewState};
use crate::query;
use crate::repository;
use log::{debug, warn};

// --- Public Interface ---

/// Decodes `query_string` against `defaults` and renders the resulting view.
/// A stale video sub-filter is cleared before rendering.
pub fn render_query(
    catalog: &Catalog,
    query_string: &str,
    defaults: &ViewState,
) -> Result<LibraryView> {
    let state = query::decode(query_string, defaults).with_filter_reset();
    render_library(catalog, &state)
}

/// Everything the library page needs for one state: the filtered items,
/// the badge counts and the empty-state message.
pub fn render_library(catalog: &Catalog, state: &ViewState) -> Result<LibraryView> {
    let unknown_params = state.unknown_fields();
    if !unknown_params.is_empty() {
        warn!("Unrecognized view parameter(s): {:?}", unknown_params);
    }

    let items = filter_catalog(catalog, state)?;
    let counts = match state.subject.known() {
        Some(subject) => repository::tab_counts(catalog.conn(), subject)?,
        None => TabCounts::default(),
    };

    let empty_message = items.is_empty().then(|| match state.tab.known() {
        Some(tab) => tab.empty_message(),
        None => EMPTY_UNKNOWN,
    });

    Ok(LibraryView {
        state: state.clone(),
        items,
        counts,
        empty_message,
        unknown_params,
    })
}

/// The items shown for the active tab after every filter has run.
pub fn filter_catalog(catalog: &Catalog, state: &ViewState) -> Result<Vec<ContentItem>> {
    let (Some(subject), Some(tab)) = (state.subject.known(), state.tab.known()) else {
        return Ok(Vec::new());
    };

    let items = repository::list_by_subject_and_kind(catalog.conn(), subject, tab.kind())?;
    Ok(filter_items(items, state))
}

// --- Filter Pipeline ---

/// Applies the video sub-filter and the search to items already narrowed
/// to one subject and kind. Order is preserved.
pub fn filter_items(items: Vec<ContentItem>, state: &ViewState) -> Vec<ContentItem> {
    // Only the emptiness check trims; matching uses the search as typed.
    let searching = state.has_query();
    let query = state.query.to_lowercase();
    let before = items.len();

    let filtered: Vec<ContentItem> = items
        .into_iter()
        .filter(|item| matches_video_filter(item, &state.video_filter))
        .filter(|item| !searching || matches_query(item, &query))
        .collect();

    debug!(
        "Filter: {} -> {} item(s) (vfilter '{}', q '{}')",
        before,
        filtered.len(),
        state.video_filter,
        query
    );
    filtered
}

/// Documents ignore the sub-filter. An unrecognized filter matches no video.
pub fn matches_video_filter(item: &ContentItem, filter: &Param<VideoFilter>) -> bool {
    let Some(tag) = item.video_tag() else {
        return true;
    };
    match filter {
        Param::Known(VideoFilter::All) => true,
        Param::Known(f) => f.tag() == Some(tag),
        Param::Unknown(_) => false,
    }
}

/// Case-insensitive substring match over title and description.
/// `needle` must already be lowercase.
pub fn matches_query(item: &ContentItem, needle: &str) -> bool {
    item.title().to_lowercase().contains(needle)
        || item
            .description()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, Subject, Tab, Video, VideoTag};

    fn video(id: i64, title: &str, description: &str, tag: VideoTag) -> ContentItem {
        ContentItem::Video(Video {
            id,
            title: title.to_string(),
            description: description.to_string(),
            duration: "10:00".to_string(),
            subject: Subject::Physics,
            tag,
            lesson_number: id as u32,
            url: None,
        })
    }

    fn note(id: &str, title: &str, description: Option<&str>) -> ContentItem {
        ContentItem::Notes(Document {
            id: id.to_string(),
            subject: Subject::Physics,
            title: title.to_string(),
            url: "#".to_string(),
            description: description.map(str::to_string),
        })
    }

    fn state(filter: Param<VideoFilter>, query: &str) -> ViewState {
        ViewState {
            subject: Subject::Physics.into(),
            tab: Tab::Videos.into(),
            video_filter: filter,
            query: query.to_string(),
        }
    }

    #[test]
    fn test_tag_filter_keeps_order() {
        let items = vec![
            video(1, "Waves", "", VideoTag::Topic),
            video(2, "Optics", "", VideoTag::Concept),
            video(3, "Forces", "", VideoTag::Topic),
        ];
        let out = filter_items(items, &state(VideoFilter::Topic.into(), ""));
        let titles: Vec<&str> = out.iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["Waves", "Forces"]);
    }

    #[test]
    fn test_query_matches_description_case_insensitively() {
        let items = vec![
            video(1, "Motion", "Speed vs velocity", VideoTag::Topic),
            video(2, "Optics", "Lenses", VideoTag::Concept),
        ];
        let out = filter_items(items, &state(VideoFilter::All.into(), "VELOCITY"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title(), "Motion");
    }

    #[test]
    fn test_whitespace_query_is_treated_as_empty() {
        let items = vec![video(1, "Motion", "", VideoTag::Topic)];
        let out = filter_items(items, &state(VideoFilter::All.into(), "   "));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_query_padding_is_matched_as_typed() {
        let items = vec![note("n1", "Motion & Forces — Speed Sheet", None)];
        let out = filter_items(items.clone(), &state(VideoFilter::All.into(), "  speed"));
        assert!(out.is_empty());

        let out = filter_items(items, &state(VideoFilter::All.into(), "forces "));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_document_without_description_matches_on_title_only() {
        let items = vec![
            note("n1", "Cells", None),
            note("n2", "Tissue", Some("cells and organs")),
        ];
        let out = filter_items(items, &state(VideoFilter::All.into(), "organ"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title(), "Tissue");
    }

    #[test]
    fn test_unknown_video_filter_matches_no_video() {
        let items = vec![video(1, "Motion", "", VideoTag::Topic)];
        let out = filter_items(items, &state(Param::Unknown("weird".to_string()), ""));
        assert!(out.is_empty());
    }

    #[test]
    fn test_documents_ignore_video_filter() {
        let items = vec![note("n1", "Cells", None)];
        let out = filter_items(items, &state(VideoFilter::Past.into(), ""));
        assert_eq!(out.len(), 1);
    }
}
