//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! Keys either mutate `App` directly (navigation, tabs, search box) or yield
//! an [`Action`] for side effects the main loop owns: opening a link,
//! bumping a counter, asking the poller for a refresh.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{Action, App, InputMode, Section};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match app.mode {
        InputMode::Editing => handle_editing(app, key),
        InputMode::Normal => handle_normal(app, key),
    }
}

/// Keys while the search box has focus.
fn handle_editing(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.finish_search(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
    None
}

fn handle_normal(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => {
            if !app.back() {
                app.quit = true;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Tab => app.next_section(),
        KeyCode::BackTab => app.previous_section(),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.set_section(Section::ALL[index]);
        }
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('r') => return Some(Action::Refresh),
        KeyCode::Enter => return app.activate(),
        KeyCode::Right | KeyCode::Char('l') if app.section == Section::Videos => {
            app.next_video_tab()
        }
        KeyCode::Left | KeyCode::Char('h') if app.section == Section::Videos => {
            app.previous_video_tab()
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
            app.back();
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::PollMsg;
    use crate::source::{CounterKind, CounterUpdate};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> App {
        let mut app = App::new(8);
        app.apply(PollMsg::Loaded(
            serde_json::from_value(serde_json::json!({
                "featured_content": [{"ID": 1, "Title": "Hot Pick", "Link_URL": "https://f/1"}],
                "learning_videos": [
                    {"ID": 4, "Title": "Lesson", "Difficulty_Level": "Basic", "Video_URL": "https://v/4"}
                ],
                "learning_resources": [{"ID": 5, "Title": "Tip", "Category": "Tips"}]
            }))
            .unwrap(),
        ));
        app
    }

    #[test]
    fn q_quits() {
        let mut app = App::new(8);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = App::new(8);
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }

    #[test]
    fn esc_leaves_drill_down_before_quitting() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Char('3')));
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(app.resource_group.is_some());

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.resource_group.is_none());
        assert!(!app.quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[test]
    fn slash_focuses_search_and_typing_goes_to_query() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        assert_eq!(app.mode, InputMode::Editing);

        for c in ['q', 'r', '1'] {
            handle_key_event(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.query, "qr1");
        assert!(!app.quit, "q is text while editing");
        assert_eq!(app.section, Section::Search);

        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.query, "qr");

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn r_requests_refresh() {
        let mut app = App::new(8);
        assert_eq!(
            handle_key_event(&mut app, press(KeyCode::Char('r'))),
            Some(Action::Refresh)
        );
    }

    #[test]
    fn enter_on_video_yields_open_with_counter() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.section, Section::Videos);

        match handle_key_event(&mut app, press(KeyCode::Enter)) {
            Some(Action::Open(selection)) => {
                assert_eq!(selection.url, "https://v/4");
                assert_eq!(
                    selection.counter,
                    Some(CounterUpdate::new(CounterKind::Views, 4))
                );
            }
            other => panic!("expected open, got {other:?}"),
        }
    }

    #[test]
    fn arrows_switch_video_tabs_only_in_videos() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.video_tab, crate::app::VideoTab::All);

        handle_key_event(&mut app, press(KeyCode::Char('2')));
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.video_tab.label(), "Basic");
        handle_key_event(&mut app, press(KeyCode::Left));
        assert_eq!(app.video_tab.label(), "All");
    }

    #[test]
    fn number_keys_jump_to_sections() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Char('4')));
        assert_eq!(app.section, Section::Search);
        handle_key_event(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.section, Section::Featured);
    }
}
