//! The uniform searchable record shared by every view.
//!
//! `ContentRecord` flattens the three content collections of a [`Payload`]
//! (featured items, videos, resources) into one shape so that searching,
//! listing and selection don't need to know which collection an item came
//! from.  [`build_index`] performs the flattening.
//!
//! ## Optional fields
//!
//! Kind-specific fields (`difficulty`, `duration`, `view_count`,
//! `download_count`) are `None` when the source cell was empty.  Views must
//! treat `None` as "do not display", never as zero.

use std::fmt;

use super::payload::{Difficulty, Payload};

/// Which content collection a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Featured,
    Video,
    Resource,
}

impl SourceKind {
    /// Lower-case tag, also matched by the search engine.
    pub fn tag(self) -> &'static str {
        match self {
            SourceKind::Featured => "featured",
            SourceKind::Video => "video",
            SourceKind::Resource => "resource",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One featured item, video or resource, normalised for search and display.
///
/// `id` is only unique within its collection; `(source_kind, id)` is the
/// identity of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub source_kind: SourceKind,
    /// Category label; for featured items this is the badge type.
    pub category: String,
    /// Opened on selection.  Empty means selection is a no-op.
    pub url: String,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<String>,
    /// Lesson number within a course (videos).
    pub lesson: Option<u64>,
    pub view_count: Option<u64>,
    pub download_count: Option<u64>,
    /// Human-readable file size (resources).
    pub file_size: Option<String>,
    /// Format badge such as "PDF" (resources).
    pub resource_type: Option<String>,
}

impl ContentRecord {
    fn new(source_kind: SourceKind, id: u64, title: &str, description: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            source_kind,
            category: String::new(),
            url: String::new(),
            difficulty: None,
            duration: None,
            lesson: None,
            view_count: None,
            download_count: None,
            file_size: None,
            resource_type: None,
        }
    }

    /// Whether the record's difficulty, resource type or category equals
    /// `label` (case-insensitive).  Used by the video tabs and resource groups.
    pub fn matches_label(&self, label: &str) -> bool {
        self.difficulty
            .is_some_and(|d| d.label().eq_ignore_ascii_case(label))
            || self
                .resource_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(label))
            || self.category.eq_ignore_ascii_case(label)
    }
}

/// Flatten a payload into the ordered search index.
///
/// Order is featured items, then videos, then resources, each in source
/// order.  The index is always rebuilt from scratch; it is never patched.
pub fn build_index(payload: &Payload) -> Vec<ContentRecord> {
    let featured = payload.featured_content.iter().map(|item| ContentRecord {
        category: item.kind.clone(),
        url: item.link_url.clone(),
        ..ContentRecord::new(SourceKind::Featured, item.id, &item.title, &item.description)
    });

    let videos = payload.learning_videos.iter().map(|video| ContentRecord {
        category: video.category.clone(),
        url: video.video_url.clone(),
        difficulty: video.difficulty,
        duration: video.duration.clone(),
        lesson: video.lesson_number,
        view_count: video.views,
        ..ContentRecord::new(SourceKind::Video, video.id, &video.title, &video.description)
    });

    let resources = payload.learning_resources.iter().map(|resource| ContentRecord {
        category: resource.category.clone(),
        url: resource.target_url().to_string(),
        download_count: resource.downloads,
        file_size: resource.file_size.clone(),
        resource_type: resource.resource_type.clone(),
        ..ContentRecord::new(
            SourceKind::Resource,
            resource.id,
            &resource.title,
            &resource.description,
        )
    });

    featured.chain(videos).chain(resources).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
