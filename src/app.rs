use ratatui::widgets::ListState;

use crate::poll::PollMsg;
use crate::search::search;
use crate::source::{ContentRecord, CounterKind, CounterUpdate, Difficulty, SourceKind};
use crate::store::{CacheState, Store};

/// The four top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Featured,
    Videos,
    Resources,
    Search,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Featured,
        Section::Videos,
        Section::Resources,
        Section::Search,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Featured => "Featured",
            Section::Videos => "Videos",
            Section::Resources => "Resources",
            Section::Search => "Search",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// Whether keystrokes go to the search box or to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Filter tabs above the video list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoTab {
    All,
    Level(Difficulty),
}

impl VideoTab {
    pub const ALL: [VideoTab; 4] = [
        VideoTab::All,
        VideoTab::Level(Difficulty::Basic),
        VideoTab::Level(Difficulty::Intermediate),
        VideoTab::Level(Difficulty::Advanced),
    ];

    pub fn label(self) -> &'static str {
        match self {
            VideoTab::All => "All",
            VideoTab::Level(d) => d.label(),
        }
    }

    pub fn keeps(self, record: &ContentRecord) -> bool {
        match self {
            VideoTab::All => true,
            VideoTab::Level(_) => record.matches_label(self.label()),
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

/// The fixed top-level groups of the resources view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceGroup {
    WeeklyTips,
    FreeCourses,
    BlogArticles,
}

impl ResourceGroup {
    pub const ALL: [ResourceGroup; 3] = [
        ResourceGroup::WeeklyTips,
        ResourceGroup::FreeCourses,
        ResourceGroup::BlogArticles,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResourceGroup::WeeklyTips => "Weekly Tips",
            ResourceGroup::FreeCourses => "Free Courses",
            ResourceGroup::BlogArticles => "Blog Articles",
        }
    }

    /// The resource `Category` value belonging to this group.
    pub fn category(self) -> &'static str {
        match self {
            ResourceGroup::WeeklyTips => "Tips",
            ResourceGroup::FreeCourses => "Courses",
            ResourceGroup::BlogArticles => "Articles",
        }
    }

    pub fn contains(self, record: &ContentRecord) -> bool {
        record.source_kind == SourceKind::Resource && record.matches_label(self.category())
    }
}

/// One row of the main list.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<'a> {
    Record(&'a ContentRecord),
    Group {
        group: ResourceGroup,
        count: usize,
        description: Option<&'a str>,
    },
}

/// What the main area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    /// Nothing has been fetched yet.
    Placeholder,
    /// The last fetch failed.
    Error(&'a str),
    Entries(Vec<Entry<'a>>),
}

/// What selecting a record asks the outside world to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Opened after the counter is recorded.  May be empty.
    pub url: String,
    pub counter: Option<CounterUpdate>,
}

impl Selection {
    fn of(record: &ContentRecord) -> Self {
        Self {
            url: record.url.trim().to_string(),
            counter: CounterKind::for_source(record.source_kind)
                .map(|kind| CounterUpdate::new(kind, record.id)),
        }
    }
}

/// Side effects requested by input handling; performed by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Open(Selection),
    Refresh,
}

enum Target {
    Open(Selection),
    DrillInto(ResourceGroup),
}

/// Search results computed for one (payload, query) pair.
#[derive(Debug, Default)]
struct SearchHits {
    generation: u64,
    query: String,
    /// Total number of matches, before the display cap.
    total: usize,
    shown: Vec<ContentRecord>,
}

pub struct App {
    /// The cached payload and its index.
    pub store: Store,
    pub section: Section,
    pub mode: InputMode,
    /// Text in the search box.
    pub query: String,
    pub video_tab: VideoTab,
    /// `Some` while drilled into one resource group.
    pub resource_group: Option<ResourceGroup>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Cap on displayed search results.
    pub max_results: usize,
    hits: SearchHits,
}

impl App {
    pub fn new(max_results: usize) -> Self {
        Self {
            store: Store::new(),
            section: Section::Featured,
            mode: InputMode::Normal,
            query: String::new(),
            video_tab: VideoTab::All,
            resource_group: None,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            max_results,
            hits: SearchHits::default(),
        }
    }

    /// Apply one message from the poller.
    pub fn apply(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Loading => {
                self.store.begin_loading();
                self.status = "Refreshing…".into();
            }
            PollMsg::Loaded(payload) => {
                self.store.apply_payload(payload);
                self.refresh_search();
                self.clamp_selection();
                let count = self.store.snapshot().map_or(0, |s| s.index.len());
                let at = self
                    .store
                    .refreshed_at()
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_default();
                self.status = format!("Updated {at} · {count} items");
            }
            PollMsg::Failed(message) => {
                self.status = format!("Error: {message}");
                self.store.apply_error(message);
            }
        }
    }

    // -- what to show --------------------------------------------------------

    pub fn view(&self) -> View<'_> {
        match self.store.state() {
            CacheState::Errored(message) => View::Error(message.as_str()),
            _ => match self.store.current() {
                Some(_) => View::Entries(self.entries()),
                None => View::Placeholder,
            },
        }
    }

    /// Rows of the current section, in display order.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        let of_kind = |kind: SourceKind| {
            self.records()
                .iter()
                .filter(move |r| r.source_kind == kind)
        };

        match self.section {
            Section::Search => self.hits.shown.iter().map(Entry::Record).collect(),
            Section::Featured => of_kind(SourceKind::Featured).map(Entry::Record).collect(),
            Section::Videos => of_kind(SourceKind::Video)
                .filter(|r| self.video_tab.keeps(r))
                .map(Entry::Record)
                .collect(),
            Section::Resources => match self.resource_group {
                Some(group) => self
                    .records()
                    .iter()
                    .filter(|r| group.contains(r))
                    .map(Entry::Record)
                    .collect(),
                None => ResourceGroup::ALL
                    .into_iter()
                    .map(|group| Entry::Group {
                        group,
                        count: self.records().iter().filter(|r| group.contains(r)).count(),
                        description: self
                            .store
                            .current()
                            .and_then(|s| s.payload.category_description(group.category())),
                    })
                    .collect(),
            },
        }
    }

    /// The current index, empty before the first successful fetch.
    fn records(&self) -> &[ContentRecord] {
        self.store.current().map_or(&[], |s| s.index.as_slice())
    }

    /// Total search matches before the display cap.
    pub fn total_hits(&self) -> usize {
        self.hits.total
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    // -- sections and filters ------------------------------------------------

    pub fn set_section(&mut self, section: Section) {
        if self.section != section {
            self.section = section;
            self.reset_selection();
        }
    }

    pub fn next_section(&mut self) {
        let next = (self.section.position() + 1) % Section::ALL.len();
        self.set_section(Section::ALL[next]);
    }

    pub fn previous_section(&mut self) {
        let len = Section::ALL.len();
        let previous = (self.section.position() + len - 1) % len;
        self.set_section(Section::ALL[previous]);
    }

    pub fn next_video_tab(&mut self) {
        let next = (self.video_tab.position() + 1) % VideoTab::ALL.len();
        self.video_tab = VideoTab::ALL[next];
        self.reset_selection();
    }

    pub fn previous_video_tab(&mut self) {
        let len = VideoTab::ALL.len();
        self.video_tab = VideoTab::ALL[(self.video_tab.position() + len - 1) % len];
        self.reset_selection();
    }

    /// Leave a drilled-in resource group.  Returns `false` if there was
    /// nothing to leave.
    pub fn back(&mut self) -> bool {
        match self.resource_group.take() {
            Some(group) if self.section == Section::Resources => {
                let position = ResourceGroup::ALL.iter().position(|g| *g == group);
                self.list_state.select(position);
                true
            }
            previous => {
                self.resource_group = previous;
                false
            }
        }
    }

    // -- search box ----------------------------------------------------------

    pub fn start_search(&mut self) {
        self.set_section(Section::Search);
        self.mode = InputMode::Editing;
    }

    pub fn finish_search(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refresh_search();
        self.reset_selection();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refresh_search();
            self.reset_selection();
        }
    }

    /// Re-run the search if the payload or query changed since last time.
    fn refresh_search(&mut self) {
        let generation = self.store.generation();
        if self.hits.generation == generation && self.hits.query == self.query {
            return;
        }

        let (total, shown) = match self.store.current() {
            Some(snapshot) => {
                let results = search(&snapshot.index, &self.query);
                let shown = results
                    .iter()
                    .take(self.max_results)
                    .map(|r| (*r).clone())
                    .collect();
                (results.len(), shown)
            }
            None => (0, Vec::new()),
        };

        self.hits = SearchHits {
            generation,
            query: self.query.clone(),
            total,
            shown,
        };
    }

    // -- selection -----------------------------------------------------------

    /// Act on the selected row: drill into a resource group, or hand back
    /// the record's counter and URL for the main loop to deal with.
    pub fn activate(&mut self) -> Option<Action> {
        let index = self.list_state.selected()?;
        let target = match self.entries().get(index)? {
            Entry::Record(record) => Target::Open(Selection::of(record)),
            Entry::Group { group, .. } => Target::DrillInto(*group),
        };

        match target {
            Target::Open(selection) => Some(Action::Open(selection)),
            Target::DrillInto(group) => {
                self.resource_group = Some(group);
                self.reset_selection();
                None
            }
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    fn reset_selection(&mut self) {
        let first = (self.len() > 0).then_some(0);
        self.list_state.select(first);
    }

    /// Keep the selection inside the list after the payload changed.
    fn clamp_selection(&mut self) {
        let len = self.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Payload;

    fn sample_payload() -> Payload {
        serde_json::from_value(serde_json::json!({
            "featured_content": [
                {"ID": 1, "Title": "Video of the Week", "Type": "Hot", "Link_URL": "https://f/1"},
                {"ID": 2, "Title": "Best Course", "Type": "New"},
                {"ID": 3, "Title": "Popular Tip", "Type": "Top"}
            ],
            "learning_videos": [
                {"ID": 1, "Title": "Getting Started", "Difficulty_Level": "Basic",
                 "Video_URL": "https://v/1", "Views": 5},
                {"ID": 2, "Title": "Basic Concepts", "Difficulty_Level": "Basic"},
                {"ID": 3, "Title": "Expert Tips", "Difficulty_Level": "Advanced"},
                {"ID": 4, "Title": "Tafsir", "Category": "Intermediate"}
            ],
            "learning_resources": [
                {"ID": 1, "Title": "Tip 1", "Category": "Tips", "Link_URL": "https://r/1"},
                {"ID": 2, "Title": "Tip 2", "Category": "tips"},
                {"ID": 3, "Title": "Course A", "Category": "Courses"},
                {"ID": 4, "Title": "Misc", "Category": "Other"}
            ],
            "categories": [
                {"Category_Name": "Courses", "Description": "Free structured courses"}
            ]
        }))
        .unwrap()
    }

    fn loaded_app() -> App {
        let mut app = App::new(8);
        app.apply(PollMsg::Loading);
        app.apply(PollMsg::Loaded(sample_payload()));
        app
    }

    fn titles(app: &App) -> Vec<String> {
        app.entries()
            .into_iter()
            .map(|e| match e {
                Entry::Record(r) => r.title.clone(),
                Entry::Group { group, .. } => group.label().to_string(),
            })
            .collect()
    }

    // -- construction and cache state ----------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let app = App::new(8);
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
        assert_eq!(app.view(), View::Placeholder);
    }

    #[test]
    fn loading_without_payload_shows_placeholder() {
        let mut app = App::new(8);
        app.apply(PollMsg::Loading);
        assert_eq!(app.view(), View::Placeholder);
        assert_eq!(app.status, "Refreshing…");
    }

    #[test]
    fn loaded_payload_shows_featured_first() {
        let app = loaded_app();
        assert_eq!(
            titles(&app),
            vec!["Video of the Week", "Best Course", "Popular Tip"]
        );
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.status.contains("11 items"), "status was {:?}", app.status);
    }

    #[test]
    fn failure_shows_error_view() {
        let mut app = App::new(8);
        app.apply(PollMsg::Loading);
        app.apply(PollMsg::Failed("quota exceeded".into()));

        assert_eq!(app.view(), View::Error("quota exceeded"));
        assert_eq!(app.status, "Error: quota exceeded");
    }

    #[test]
    fn refresh_keeps_showing_previous_payload() {
        let mut app = loaded_app();
        app.apply(PollMsg::Loading);
        assert!(matches!(app.view(), View::Entries(e) if e.len() == 3));
    }

    #[test]
    fn error_after_success_recovers_on_next_load() {
        let mut app = loaded_app();
        app.apply(PollMsg::Failed("boom".into()));
        assert_eq!(app.view(), View::Error("boom"));

        app.apply(PollMsg::Loaded(sample_payload()));
        assert!(matches!(app.view(), View::Entries(_)));
    }

    // -- sections ------------------------------------------------------------

    #[test]
    fn sections_cycle_both_ways() {
        let mut app = loaded_app();
        app.next_section();
        assert_eq!(app.section, Section::Videos);
        app.previous_section();
        app.previous_section();
        assert_eq!(app.section, Section::Search);
    }

    #[test]
    fn video_tabs_filter_by_difficulty_or_category() {
        let mut app = loaded_app();
        app.set_section(Section::Videos);
        assert_eq!(titles(&app).len(), 4);

        app.next_video_tab();
        assert_eq!(app.video_tab, VideoTab::Level(Difficulty::Basic));
        assert_eq!(titles(&app), vec!["Getting Started", "Basic Concepts"]);

        app.next_video_tab();
        assert_eq!(titles(&app), vec!["Tafsir"], "category equal to tab label");

        app.next_video_tab();
        assert_eq!(titles(&app), vec!["Expert Tips"]);

        app.next_video_tab();
        assert_eq!(app.video_tab, VideoTab::All);
        app.previous_video_tab();
        assert_eq!(app.video_tab, VideoTab::Level(Difficulty::Advanced));
    }

    #[test]
    fn resources_drill_down_and_back() {
        let mut app = loaded_app();
        app.set_section(Section::Resources);

        let groups = app.entries();
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0],
            Entry::Group {
                group: ResourceGroup::WeeklyTips,
                count: 2,
                description: None,
            }
        );
        assert!(matches!(
            groups[1],
            Entry::Group { count: 1, description: Some("Free structured courses"), .. }
        ));
        assert!(matches!(groups[2], Entry::Group { count: 0, .. }));

        assert_eq!(app.activate(), None, "drilling in has no side effect");
        assert_eq!(app.resource_group, Some(ResourceGroup::WeeklyTips));
        assert_eq!(titles(&app), vec!["Tip 1", "Tip 2"]);

        assert!(app.back());
        assert_eq!(app.resource_group, None);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(!app.back(), "nothing left to leave");
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn typing_updates_results() {
        let mut app = loaded_app();
        app.start_search();
        assert_eq!(app.mode, InputMode::Editing);
        assert_eq!(app.section, Section::Search);
        assert!(app.entries().is_empty(), "no query, no results");

        for c in "tip".chars() {
            app.push_char(c);
        }
        assert_eq!(
            titles(&app),
            vec!["Popular Tip", "Expert Tips", "Tip 1", "Tip 2"]
        );
        assert_eq!(app.list_state.selected(), Some(0));

        app.pop_char();
        app.pop_char();
        app.pop_char();
        assert!(app.entries().is_empty());

        app.finish_search();
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn search_results_are_capped_for_display() {
        let mut app = App::new(2);
        app.apply(PollMsg::Loaded(sample_payload()));
        app.start_search();
        app.push_char('t');

        assert_eq!(app.entries().len(), 2);
        assert!(app.total_hits() > 2);
    }

    #[test]
    fn search_reruns_when_payload_changes() {
        let mut app = App::new(8);
        app.start_search();
        app.push_char('b');
        assert!(app.entries().is_empty());

        app.apply(PollMsg::Loaded(sample_payload()));
        assert!(!app.entries().is_empty());
    }

    // -- activation ----------------------------------------------------------

    #[test]
    fn activating_video_records_views_and_opens_url() {
        let mut app = loaded_app();
        app.set_section(Section::Videos);
        app.select_first();

        assert_eq!(
            app.activate(),
            Some(Action::Open(Selection {
                url: "https://v/1".into(),
                counter: Some(CounterUpdate::new(CounterKind::Views, 1)),
            }))
        );
    }

    #[test]
    fn activating_featured_has_no_counter() {
        let mut app = loaded_app();
        assert_eq!(
            app.activate(),
            Some(Action::Open(Selection {
                url: "https://f/1".into(),
                counter: None,
            }))
        );
    }

    #[test]
    fn activating_resource_records_downloads_even_without_url() {
        let mut app = loaded_app();
        app.set_section(Section::Resources);
        app.activate();
        app.select_last();

        assert_eq!(
            app.activate(),
            Some(Action::Open(Selection {
                url: String::new(),
                counter: Some(CounterUpdate::new(CounterKind::Downloads, 2)),
            }))
        );
    }

    #[test]
    fn activate_without_selection_does_nothing() {
        let mut app = App::new(8);
        assert_eq!(app.activate(), None);
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn select_next_on_empty_is_noop() {
        let mut app = App::new(8);
        app.select_next();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_previous_on_empty_is_noop() {
        let mut app = App::new(8);
        app.select_previous();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_first_and_last_on_empty_are_noops() {
        let mut app = App::new(8);
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_clamps_at_last_item() {
        let mut app = loaded_app();
        app.select_last();
        assert_eq!(app.list_state.selected(), Some(2));
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = loaded_app();
        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_previous_moves_up() {
        let mut app = loaded_app();
        app.select_last();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn selection_is_clamped_when_payload_shrinks() {
        let mut app = loaded_app();
        app.select_last();

        app.apply(PollMsg::Loaded(
            serde_json::from_value(serde_json::json!({
                "featured_content": [{"ID": 9, "Title": "Only"}]
            }))
            .unwrap(),
        ));
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
