//! Keyboard mapping

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::types::TaxonomyLevel;
use crate::ui::state::Action;

/// Translate a key press into a session action
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::Left | KeyCode::Char('h') => Action::PrevHighlight,
        KeyCode::Right | KeyCode::Char('l') => Action::NextHighlight,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Esc | KeyCode::Backspace => Action::Back,
        KeyCode::Char('f') => Action::OpenNavigator,
        KeyCode::Char('c') => Action::ClearFilter,
        KeyCode::Char('1') => Action::Breadcrumb(TaxonomyLevel::Branch),
        KeyCode::Char('2') => Action::Breadcrumb(TaxonomyLevel::Group),
        KeyCode::Char('3') => Action::Breadcrumb(TaxonomyLevel::Skill),
        _ => return None,
    };
    Some(action)
}

/// Footer help text
pub const KEY_HELP: &str =
    "Tab focus · ↑↓ move · Enter open/select · Esc back · f filter by skill · c clear · ←→ highlights · 1-3 breadcrumbs · q quit";
