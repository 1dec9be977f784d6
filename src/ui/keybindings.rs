// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::visualizer::Effect;

/// Map digit/shifted-digit keys to section number (1..4).
pub fn map_key_to_digit(k: &KeyEvent) -> Option<usize> {
    match k.code {
        KeyCode::Char('1' | '!') => Some(1),
        KeyCode::Char('2' | '@') => Some(2),
        KeyCode::Char('3' | '#') => Some(3),
        KeyCode::Char('4' | '$') => Some(4),
        _ => None,
    }
}

/// Shift+digit, either reported with the modifier or as the shifted symbol.
pub fn is_section_toggle(key: &KeyEvent) -> bool {
    map_key_to_digit(key).is_some()
        && (key.modifiers.contains(KeyModifiers::SHIFT)
            || matches!(key.code, KeyCode::Char('!' | '@' | '#' | '$')))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Enter,
    Back,
    TogglePause,
    Stop,
    NextTrack,
    PreviousTrack,
    CycleVisualization,
    CycleColorScheme,
    CycleBackground,
    ToggleEffect(Effect),
    ToggleSection(usize),
    Quit,
    None,
}

pub fn key_to_action(key: &KeyEvent) -> Action {
    if is_section_toggle(key) {
        if let Some(d) = map_key_to_digit(key) {
            return Action::ToggleSection(d);
        }
    }

    match key.code {
        KeyCode::Down => Action::Down,
        KeyCode::Up => Action::Up,
        KeyCode::Enter | KeyCode::Right => Action::Enter,
        KeyCode::Left => Action::Back,
        KeyCode::Char(' ') => Action::TogglePause,
        KeyCode::Char('s') => Action::Stop,
        KeyCode::Char('n' | '>') => Action::NextTrack,
        KeyCode::Char('p' | '<') => Action::PreviousTrack,
        KeyCode::Char('v') => Action::CycleVisualization,
        KeyCode::Char('c') => Action::CycleColorScheme,
        KeyCode::Char('b') => Action::CycleBackground,
        KeyCode::Char('g') => Action::ToggleEffect(Effect::Glow),
        KeyCode::Char('m') => Action::ToggleEffect(Effect::Mirror),
        KeyCode::Char('i') => Action::ToggleEffect(Effect::Invert),
        KeyCode::Char('t') => Action::ToggleEffect(Effect::SongInfo),
        KeyCode::Char('f') => Action::ToggleEffect(Effect::Fps),
        KeyCode::Char('k') => Action::ToggleEffect(Effect::Time),
        KeyCode::Char('o') => Action::ToggleEffect(Effect::MotionBlur),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn shifted_digits_toggle_sections() {
        assert_eq!(key_to_action(&key(KeyCode::Char('@'))), Action::ToggleSection(2));
        let shifted = KeyEvent::new(KeyCode::Char('4'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(&shifted), Action::ToggleSection(4));
        assert_eq!(key_to_action(&key(KeyCode::Char('1'))), Action::None);
    }

    #[test]
    fn visualizer_keys() {
        assert_eq!(key_to_action(&key(KeyCode::Char('v'))), Action::CycleVisualization);
        assert_eq!(key_to_action(&key(KeyCode::Char('c'))), Action::CycleColorScheme);
        assert_eq!(
            key_to_action(&key(KeyCode::Char('o'))),
            Action::ToggleEffect(Effect::MotionBlur)
        );
        assert_eq!(
            key_to_action(&key(KeyCode::Char('k'))),
            Action::ToggleEffect(Effect::Time)
        );
    }

    #[test]
    fn transport_keys() {
        assert_eq!(key_to_action(&key(KeyCode::Char(' '))), Action::TogglePause);
        assert_eq!(key_to_action(&key(KeyCode::Char('s'))), Action::Stop);
        assert_eq!(key_to_action(&key(KeyCode::Char('n'))), Action::NextTrack);
        assert_eq!(key_to_action(&key(KeyCode::Char('q'))), Action::Quit);
    }
}
