use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::navigator::Key;

/// Decode a terminal key event; `None` for anything the selector ignores.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    let command = event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
    match event.code {
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char('c' | 'C' | 'q' | 'Q') if command => Some(Key::ForceQuit),
        KeyCode::Char(_) if command || event.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}
