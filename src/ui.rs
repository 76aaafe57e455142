//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching business logic.
//!
//! ## For contributors
//!
//! * The layout is five rows: site header, section tabs, search box, the
//!   main list and a one-line status bar.
//! * Rows are built as owned [`ListItem`]s before rendering because the
//!   list widget needs `&mut app.list_state` while the rows borrow `app`.
//! * Counts and durations are only drawn when the source provided them.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Entry, InputMode, Section, VideoTab, View};
use crate::source::{ContentRecord, SourceKind};

const DEFAULT_TITLE: &str = "Markaz Academy";
const DEFAULT_SUBTITLE: &str = "Baycho Asani Se";

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, tabs_area, search_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(app, frame, header_area);
    draw_tabs(app, frame, tabs_area);
    draw_search_box(app, frame, search_area);
    draw_main(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

/// Site title and subtitle, taken from the payload's site settings.
fn draw_header(app: &App, frame: &mut Frame, area: Rect) {
    let (title, subtitle) = match app.store.current() {
        Some(snapshot) => (
            snapshot.payload.setting("site_title", DEFAULT_TITLE),
            snapshot.payload.setting("hero_subtitle", DEFAULT_SUBTITLE),
        ),
        None => (DEFAULT_TITLE, DEFAULT_SUBTITLE),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title}"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(subtitle, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", i + 1, s.title()));
    let selected = Section::ALL
        .iter()
        .position(|s| *s == app.section)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, area);
}

fn draw_search_box(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.mode == InputMode::Editing;
    let border = if editing { Color::Yellow } else { Color::DarkGray };

    let text = if app.query.is_empty() && !editing {
        Span::styled(
            "Search courses, videos... (press /)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.query.as_str())
    };

    let search = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, area);

    if editing {
        let typed = u16::try_from(app.query.chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// What [`draw_main`] renders, detached from the borrow of `app`.
enum Body {
    Message(Line<'static>),
    Rows(Vec<ListItem<'static>>),
}

/// Render the main area: placeholder, error banner or the current list.
fn draw_main(app: &mut App, frame: &mut Frame, area: Rect) {
    let title = main_title(app);
    let body = match app.view() {
        View::Placeholder => Body::Message(Line::styled(
            "Loading content…",
            Style::default().fg(Color::DarkGray),
        )),
        View::Error(message) => Body::Message(Line::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        View::Entries(entries) if entries.is_empty() => Body::Message(empty_hint(app)),
        View::Entries(entries) => {
            let show_kind = app.section == Section::Search;
            Body::Rows(
                entries
                    .iter()
                    .map(|entry| entry_item(entry, show_kind))
                    .collect(),
            )
        }
    };

    let block = Block::default().title(title).borders(Borders::ALL);
    match body {
        Body::Message(line) => {
            let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        Body::Rows(items) => {
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .bg(Color::DarkGray),
                )
                .highlight_symbol("▸ ");
            frame.render_stateful_widget(list, area, &mut app.list_state);
        }
    }
}

fn main_title(app: &App) -> Line<'static> {
    match app.section {
        Section::Featured => Line::from(" Featured Content "),
        Section::Videos => {
            let mut spans = vec![Span::raw(" Learning Videos  ")];
            for tab in VideoTab::ALL {
                let style = if tab == app.video_tab {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                spans.push(Span::styled(format!("[{}]", tab.label()), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        }
        Section::Resources => match app.resource_group {
            Some(group) => Line::from(format!(" Learning Resources › {} ", group.label())),
            None => Line::from(" Learning Resources "),
        },
        Section::Search => {
            let shown = app.entries().len();
            let total = app.total_hits();
            if total > shown {
                Line::from(format!(" Results ({shown} of {total}) "))
            } else {
                Line::from(format!(" Results ({total}) "))
            }
        }
    }
}

fn empty_hint(app: &App) -> Line<'static> {
    let text = match app.section {
        Section::Search if app.query.trim().is_empty() => "Type / to search courses, videos…",
        Section::Search => "No matches",
        Section::Videos if app.video_tab != VideoTab::All => "No videos for this level yet",
        _ => "Nothing here yet",
    };
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

fn entry_item(entry: &Entry<'_>, show_kind: bool) -> ListItem<'static> {
    match entry {
        Entry::Record(record) => record_item(record, show_kind),
        Entry::Group {
            group,
            count,
            description,
        } => {
            let mut lines = vec![Line::from(vec![
                Span::styled(group.label(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(format!("{count} available"), Style::default().fg(Color::Green)),
            ])];
            if let Some(description) = description {
                lines.push(Line::styled(
                    format!("  {description}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(lines)
        }
    }
}

/// One list row: headline with kind-specific details, then the description.
fn record_item(record: &ContentRecord, show_kind: bool) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled(
        record.title.clone(),
        Style::default().fg(Color::White),
    )];

    if show_kind {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("[{}]", record.source_kind),
            Style::default().fg(Color::Cyan),
        ));
    }

    let mut details: Vec<String> = Vec::new();
    match record.source_kind {
        SourceKind::Featured => {
            if !record.category.is_empty() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    record.category.clone(),
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                ));
            }
        }
        SourceKind::Video => {
            details.extend(record.lesson.map(|n| format!("Lesson {n}")));
            details.extend(record.duration.clone());
            details.extend(record.difficulty.map(|d| d.to_string()));
            details.extend(record.view_count.map(|n| format!("{n} views")));
        }
        SourceKind::Resource => {
            details.extend(record.resource_type.clone());
            details.extend(record.file_size.clone());
            details.extend(record.download_count.map(|n| format!("{n} downloads")));
        }
    }
    if !details.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(details.join(" • "), dim));
    }

    let mut lines = vec![Line::from(spans)];
    if !record.description.is_empty() {
        lines.push(Line::styled(format!("  {}", record.description), dim));
    }
    ListItem::new(lines)
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.mode {
        InputMode::Editing => "  Enter/Esc: done  ↑/↓: move",
        InputMode::Normal => "  q: quit  Tab/1-4: section  /: search  Enter: open  r: refresh",
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
