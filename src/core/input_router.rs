//! Input routing
//!
//! Maps raw key presses to semantic `Action`s based on which screen is
//! showing. Mouse hits are resolved by the frontend (it owns the layout) into
//! the same vocabulary.

use super::state::Screen;
use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CursorUp,
    CursorDown,
    /// Select the target under the cursor
    SelectCursor,
    /// Select a target by index
    Select(usize),
    /// Press the progress button
    Click,
    /// Open the newest notification in the tray
    OpenNotification,
    /// Leave the detail screen
    Dismiss,
    None,
}

/// Route a key press to an Action for the current screen
pub fn route_key(code: KeyCode, modifiers: KeyModifiers, screen: &Screen) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match screen {
        Screen::Main => match code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
            KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
            KeyCode::Char(' ') => Action::SelectCursor,
            KeyCode::Char(c @ '1'..='9') => Action::Select(c as usize - '1' as usize),
            KeyCode::Enter | KeyCode::Char('d') => Action::Click,
            KeyCode::Char('n') => Action::OpenNotification,
            _ => Action::None,
        },
        Screen::Detail(_) => match code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('o') => {
                Action::Dismiss
            }
            _ => Action::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::detail::DetailScreen;
    use crate::notification::NotificationBody;

    fn detail() -> Screen {
        let config = Config::embedded().unwrap();
        Screen::Detail(DetailScreen::new(
            NotificationBody::new("a", "b", "c"),
            &config.strings,
            &config.colors,
        ))
    }

    #[test]
    fn test_main_screen_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(route_key(KeyCode::Enter, none, &Screen::Main), Action::Click);
        assert_eq!(route_key(KeyCode::Char('1'), none, &Screen::Main), Action::Select(0));
        assert_eq!(route_key(KeyCode::Char('3'), none, &Screen::Main), Action::Select(2));
        assert_eq!(route_key(KeyCode::Char(' '), none, &Screen::Main), Action::SelectCursor);
        assert_eq!(route_key(KeyCode::Up, none, &Screen::Main), Action::CursorUp);
        assert_eq!(route_key(KeyCode::Char('n'), none, &Screen::Main), Action::OpenNotification);
        assert_eq!(route_key(KeyCode::Esc, none, &Screen::Main), Action::None);
    }

    #[test]
    fn test_detail_screen_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(route_key(KeyCode::Esc, none, &detail()), Action::Dismiss);
        assert_eq!(route_key(KeyCode::Enter, none, &detail()), Action::Dismiss);
        assert_eq!(route_key(KeyCode::Char('1'), none, &detail()), Action::None);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(route_key(KeyCode::Char('c'), ctrl, &Screen::Main), Action::Quit);
        assert_eq!(route_key(KeyCode::Char('c'), ctrl, &detail()), Action::Quit);
    }
}
