use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::terminal::state::{AppState, Mode, Pending};

/// Apply a key press. Returns `true` when the app should quit.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> bool {
    if state.mode == Mode::ConfirmAll {
        if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code {
            state.queue(Pending::ResolveAll);
        } else {
            state.status = "Cancelled".to_string();
        }
        state.mode = Mode::Browse;
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::PageDown => state.move_selection(10),
        KeyCode::PageUp => state.move_selection(-10),
        KeyCode::Home => state.select_first(),
        KeyCode::End => state.select_last(),
        KeyCode::Enter => state.queue(Pending::ResolveSelected),
        KeyCode::Char('a') if !state.newsletters.is_empty() => {
            state.mode = Mode::ConfirmAll;
            state.status = format!(
                "Look up unsubscribe links for all {} newsletters? (y/n)",
                state.newsletters.len()
            );
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Newsletter;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state(n: usize) -> AppState {
        AppState::new(
            (0..n)
                .map(|i| Newsletter {
                    sender_email: format!("s{i}@x.com"),
                    display_name: format!("S{i}"),
                    count: n - i,
                    exemplar_message_id: format!("m{i}"),
                })
                .collect(),
        )
    }

    #[test]
    fn navigation_and_quit() {
        let mut s = state(3);
        assert!(!handle_key(key(KeyCode::Char('j')), &mut s));
        assert!(!handle_key(key(KeyCode::End), &mut s));
        assert_eq!(s.list_state.selected(), Some(2));
        assert!(!handle_key(key(KeyCode::Home), &mut s));
        assert_eq!(s.list_state.selected(), Some(0));
        assert!(handle_key(key(KeyCode::Char('q')), &mut s));
    }

    #[test]
    fn enter_queues_selected() {
        let mut s = state(2);
        handle_key(key(KeyCode::Enter), &mut s);
        assert_eq!(s.pending, Some(Pending::ResolveSelected));
    }

    #[test]
    fn resolve_all_needs_confirmation() {
        let mut s = state(2);
        handle_key(key(KeyCode::Char('a')), &mut s);
        assert_eq!(s.mode, Mode::ConfirmAll);
        assert_eq!(s.pending, None);

        handle_key(key(KeyCode::Char('n')), &mut s);
        assert_eq!(s.mode, Mode::Browse);
        assert_eq!(s.pending, None);

        handle_key(key(KeyCode::Char('a')), &mut s);
        handle_key(key(KeyCode::Char('y')), &mut s);
        assert_eq!(s.pending, Some(Pending::ResolveAll));
    }

    #[test]
    fn quit_key_in_confirm_only_cancels() {
        let mut s = state(1);
        handle_key(key(KeyCode::Char('a')), &mut s);
        assert!(!handle_key(key(KeyCode::Char('q')), &mut s));
        assert_eq!(s.mode, Mode::Browse);
    }
}
