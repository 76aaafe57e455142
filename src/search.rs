//! Free-text search over the content index.
//!
//! Matching is a plain case-insensitive substring test against a record's
//! title, description, category, source tag and difficulty.  There is no
//! tokenisation and no fuzziness: `"arr"` finds "Intro to Arrays", `"video"`
//! finds every video by its tag.
//!
//! Results come in two tiers: records whose title matches, then the rest.
//! Within a tier the index order is kept.

use crate::source::ContentRecord;

/// Search `index` for `query`.
///
/// An empty or whitespace-only query yields no results; "no query" means
/// "show nothing", not "show everything".  The full matching sequence is
/// returned; callers cap it for display.
pub fn search<'a>(index: &'a [ContentRecord], query: &str) -> Vec<&'a ContentRecord> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut hits: Vec<&ContentRecord> = index
        .iter()
        .filter(|record| matches(record, &needle))
        .collect();

    // `sort_by_key` is stable, so each tier keeps index order.
    hits.sort_by_key(|record| !title_matches(record, &needle));
    hits
}

fn title_matches(record: &ContentRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
}

fn matches(record: &ContentRecord, needle: &str) -> bool {
    title_matches(record, needle)
        || record.description.to_lowercase().contains(needle)
        || record.category.to_lowercase().contains(needle)
        || record.source_kind.tag().contains(needle)
        || record
            .difficulty
            .is_some_and(|d| d.label().to_lowercase().contains(needle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Difficulty, SourceKind};

    fn record(kind: SourceKind, id: u64, title: &str) -> ContentRecord {
        ContentRecord {
            id,
            title: title.to_string(),
            description: String::new(),
            source_kind: kind,
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

    fn ids(results: &[&ContentRecord]) -> Vec<(SourceKind, u64)> {
        results.iter().map(|r| (r.source_kind, r.id)).collect()
    }

    fn mixed_index() -> Vec<ContentRecord> {
        vec![
            ContentRecord {
                description: "Start here with arrays".into(),
                ..record(SourceKind::Featured, 1, "Welcome")
            },
            ContentRecord {
                difficulty: Some(Difficulty::Basic),
                ..record(SourceKind::Video, 1, "Intro to Arrays")
            },
            ContentRecord {
                category: "Arrays".into(),
                ..record(SourceKind::Video, 2, "Loops")
            },
            record(SourceKind::Resource, 1, "Array Tips"),
            record(SourceKind::Resource, 2, "Glossary"),
        ]
    }

    #[test]
    fn blank_queries_return_nothing() {
        let index = mixed_index();
        for query in ["", " ", "\t", "  \n "] {
            assert!(search(&index, query).is_empty(), "query {query:?}");
        }
    }

    #[test]
    fn tag_query_selects_by_source_kind() {
        let index = vec![
            record(SourceKind::Featured, 1, "One"),
            record(SourceKind::Video, 2, "Two"),
            record(SourceKind::Resource, 3, "Three"),
        ];

        let results = search(&index, "video");
        assert_eq!(ids(&results), vec![(SourceKind::Video, 2)]);
    }

    #[test]
    fn title_matches_keep_index_order() {
        let index = vec![
            ContentRecord {
                difficulty: Some(Difficulty::Basic),
                ..record(SourceKind::Video, 1, "Intro to Arrays")
            },
            record(SourceKind::Resource, 1, "Array Tips"),
        ];

        let results = search(&index, "array");
        assert_eq!(
            ids(&results),
            vec![(SourceKind::Video, 1), (SourceKind::Resource, 1)]
        );
    }

    #[test]
    fn title_matches_precede_other_matches() {
        let index = mixed_index();
        let results = search(&index, "array");

        assert_eq!(
            ids(&results),
            vec![
                (SourceKind::Video, 1),
                (SourceKind::Resource, 1),
                (SourceKind::Featured, 1),
                (SourceKind::Video, 2),
            ]
        );
    }

    #[test]
    fn every_result_contains_the_query_somewhere() {
        let index = mixed_index();
        for query in ["a", "ARR", "basic", "tips", "resource", "o"] {
            let needle = query.to_lowercase();
            for r in search(&index, query) {
                let haystacks = [
                    r.title.to_lowercase(),
                    r.description.to_lowercase(),
                    r.category.to_lowercase(),
                    r.source_kind.tag().to_string(),
                    r.difficulty.map(|d| d.label().to_lowercase()).unwrap_or_default(),
                ];
                assert!(
                    haystacks.iter().any(|h| h.contains(&needle)),
                    "{:?} does not contain {query:?}",
                    r.title
                );
            }
        }
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(search(&mixed_index(), "zzz-no-match").is_empty());
    }

    #[test]
    fn difficulty_is_searchable() {
        let index = mixed_index();
        let results = search(&index, "BASIC");
        assert_eq!(ids(&results), vec![(SourceKind::Video, 1)]);
    }

    #[test]
    fn query_is_not_tokenised() {
        // The whole query, spaces included, must appear as one substring.
        assert_eq!(
            ids(&search(&mixed_index(), "to arr")),
            vec![(SourceKind::Video, 1)]
        );
        assert!(search(&mixed_index(), "arrays intro").is_empty());
    }

    #[test]
    fn results_are_not_capped() {
        let index: Vec<_> = (0..20)
            .map(|i| record(SourceKind::Video, i, &format!("Lesson {i}")))
            .collect();
        assert_eq!(search(&index, "lesson").len(), 20);
    }
}
