use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match mode {
        AppMode::MainMenu => handle_key_menu(key),
        AppMode::Scanning => handle_key_scanning(key),
        AppMode::SelectItems => handle_key_select(key),
        AppMode::Deleting => handle_key_deleting(key),
        AppMode::DirectCleanup => match key.code {
            KeyCode::Char('q') => Action::Quit,
            _ => Action::Tick,
        },
        AppMode::DeletionComplete => match key.code {
            KeyCode::Char('r') | KeyCode::Esc => Action::BackToMenu,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Enter => Action::Confirm,
            _ => Action::Tick,
        },
    }
}

fn navigation(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToFirst,
        KeyCode::End | KeyCode::Char('G') => Action::GoToLast,
        _ => return None,
    };
    Some(action)
}

fn handle_key_menu(key: KeyEvent) -> Action {
    if let Some(action) = navigation(key.code) {
        return action;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Tab => Action::ToggleSelect,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_scanning(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('c') => Action::CancelScan,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_select(key: KeyEvent) -> Action {
    if let Some(action) = navigation(key.code) {
        return action;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Tab => Action::ToggleSelect,
        KeyCode::Char('a') => Action::SelectAll,
        KeyCode::Char('n') => Action::SelectNone,
        KeyCode::Char('s') => Action::SortBySize,
        KeyCode::Char('d') => Action::SortByDate,
        KeyCode::Char('p') => Action::SortByPath,
        KeyCode::Char('f') => Action::FilterBySize,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char('r') | KeyCode::Esc => Action::BackToMenu,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_deleting(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('j')), AppMode::MainMenu), Action::MoveDown);
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), AppMode::MainMenu),
            Action::ToggleSelect
        );
        assert_eq!(handle_key(key(KeyCode::Enter), AppMode::MainMenu), Action::Confirm);
        assert_eq!(handle_key(key(KeyCode::Char('q')), AppMode::MainMenu), Action::Quit);
    }

    #[test]
    fn test_escape_stops_scan() {
        assert_eq!(handle_key(key(KeyCode::Esc), AppMode::Scanning), Action::CancelScan);
        assert_eq!(handle_key(key(KeyCode::Char('q')), AppMode::Scanning), Action::Quit);
        assert_eq!(handle_key(key(KeyCode::Down), AppMode::Scanning), Action::Tick);
    }

    #[test]
    fn test_select_keys() {
        let mode = AppMode::SelectItems;
        assert_eq!(handle_key(key(KeyCode::Char('a')), mode), Action::SelectAll);
        assert_eq!(handle_key(key(KeyCode::Char('n')), mode), Action::SelectNone);
        assert_eq!(handle_key(key(KeyCode::Char('s')), mode), Action::SortBySize);
        assert_eq!(handle_key(key(KeyCode::Char('d')), mode), Action::SortByDate);
        assert_eq!(handle_key(key(KeyCode::Char('p')), mode), Action::SortByPath);
        assert_eq!(handle_key(key(KeyCode::Char('f')), mode), Action::FilterBySize);
        assert_eq!(handle_key(key(KeyCode::Enter), mode), Action::Confirm);
        assert_eq!(handle_key(key(KeyCode::Char('r')), mode), Action::BackToMenu);
        assert_eq!(handle_key(key(KeyCode::End), mode), Action::GoToLast);
    }

    #[test]
    fn test_deleting_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('q')), AppMode::Deleting), Action::Quit);
        assert_eq!(handle_key(key(KeyCode::Enter), AppMode::Deleting), Action::Tick);
        assert_eq!(handle_key(key(KeyCode::Up), AppMode::Deleting), Action::MoveUp);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c, AppMode::Scanning), Action::Quit);
        assert_eq!(handle_key(ctrl_c, AppMode::SelectItems), Action::Quit);
    }
}
