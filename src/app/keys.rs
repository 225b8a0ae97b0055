//! Physical keys → logical intents, per input context.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpBottom,
    ToggleSelection,
    SelectAll,
    DeselectAll,
    Apply,
    EnterCommit,
    EnterModifyHead,
    TogglePreviewFocus,
    ToggleHelp,
    Quit,
    Confirm,
    Cancel,
    AmendMessage,
    AmendFiles,
    /// Ctrl+C: leaves the program from anywhere.
    Exit,
    /// Forwarded to the focused text input.
    Edit(KeyEvent),
}

/// Where the key is going. Derived from the app state on every key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    FileList,
    Help,
    /// Multi-line message editor: Ctrl+D confirms.
    MessageInput,
    /// Single-line date input: Enter confirms.
    DateInput,
    HeadMenu,
    /// Commit dispatched, waiting on its result.
    Busy,
    ErrorOverlay,
}

pub fn map_key(key: KeyEvent, ctx: KeyContext) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return Some(Intent::Exit);
    }

    match ctx {
        KeyContext::ErrorOverlay => match key.code {
            KeyCode::Char('q') if !ctrl => Some(Intent::Quit),
            _ => Some(Intent::Cancel),
        },
        KeyContext::FileList => file_list_key(key.code),
        KeyContext::Help => match key.code {
            KeyCode::Char('?') => Some(Intent::ToggleHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Quit),
            _ => None,
        },
        KeyContext::MessageInput => match key.code {
            KeyCode::Char('d') if ctrl => Some(Intent::Confirm),
            KeyCode::Esc => Some(Intent::Cancel),
            _ => Some(Intent::Edit(key)),
        },
        KeyContext::DateInput => match key.code {
            KeyCode::Enter => Some(Intent::Confirm),
            KeyCode::Esc => Some(Intent::Cancel),
            _ => Some(Intent::Edit(key)),
        },
        KeyContext::HeadMenu => match key.code {
            KeyCode::Char('m') => Some(Intent::AmendMessage),
            KeyCode::Char('f') => Some(Intent::AmendFiles),
            KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Cancel),
            _ => None,
        },
        KeyContext::Busy => None,
    }
}

fn file_list_key(code: KeyCode) -> Option<Intent> {
    let intent = match code {
        KeyCode::Up | KeyCode::Char('k') => Intent::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Intent::MoveDown,
        KeyCode::PageUp | KeyCode::Char('b') => Intent::PageUp,
        KeyCode::PageDown | KeyCode::Char('f') => Intent::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Intent::JumpTop,
        KeyCode::End | KeyCode::Char('G') => Intent::JumpBottom,
        KeyCode::Char(' ') | KeyCode::Tab => Intent::ToggleSelection,
        KeyCode::Char('a') => Intent::SelectAll,
        KeyCode::Char('d') => Intent::DeselectAll,
        KeyCode::Enter => Intent::Apply,
        KeyCode::Char('c') => Intent::EnterCommit,
        KeyCode::Char('m') => Intent::EnterModifyHead,
        KeyCode::Char('p') | KeyCode::Char('P') => Intent::TogglePreviewFocus,
        KeyCode::Char('?') => Intent::ToggleHelp,
        KeyCode::Char('q') => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_c_exits_everywhere() {
        for ctx in [
            KeyContext::FileList,
            KeyContext::Help,
            KeyContext::MessageInput,
            KeyContext::DateInput,
            KeyContext::HeadMenu,
            KeyContext::Busy,
            KeyContext::ErrorOverlay,
        ] {
            assert_eq!(map_key(ctrl('c'), ctx), Some(Intent::Exit), "{ctx:?}");
        }
    }

    #[test]
    fn test_file_list_bindings() {
        let ctx = KeyContext::FileList;
        assert_eq!(map_key(key(KeyCode::Char('j')), ctx), Some(Intent::MoveDown));
        assert_eq!(map_key(key(KeyCode::Up), ctx), Some(Intent::MoveUp));
        assert_eq!(map_key(key(KeyCode::Char('G')), ctx), Some(Intent::JumpBottom));
        assert_eq!(map_key(key(KeyCode::Tab), ctx), Some(Intent::ToggleSelection));
        assert_eq!(map_key(key(KeyCode::Enter), ctx), Some(Intent::Apply));
        assert_eq!(map_key(key(KeyCode::Char('P')), ctx), Some(Intent::TogglePreviewFocus));
        assert_eq!(map_key(key(KeyCode::Char('x')), ctx), None);
    }

    #[test]
    fn test_text_inputs_forward_plain_keys() {
        let k = key(KeyCode::Char('q'));
        assert_eq!(map_key(k, KeyContext::MessageInput), Some(Intent::Edit(k)));
        let enter = key(KeyCode::Enter);
        assert_eq!(map_key(enter, KeyContext::MessageInput), Some(Intent::Edit(enter)));
        assert_eq!(map_key(enter, KeyContext::DateInput), Some(Intent::Confirm));
        assert_eq!(map_key(ctrl('d'), KeyContext::MessageInput), Some(Intent::Confirm));
        assert_eq!(map_key(key(KeyCode::Esc), KeyContext::DateInput), Some(Intent::Cancel));
    }

    #[test]
    fn test_head_menu_q_cancels() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), KeyContext::HeadMenu),
            Some(Intent::Cancel)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('f')), KeyContext::HeadMenu),
            Some(Intent::AmendFiles)
        );
    }

    #[test]
    fn test_error_overlay_swallows_everything_but_quit() {
        let ctx = KeyContext::ErrorOverlay;
        assert_eq!(map_key(key(KeyCode::Char('q')), ctx), Some(Intent::Quit));
        assert_eq!(map_key(key(KeyCode::Char('j')), ctx), Some(Intent::Cancel));
        assert_eq!(map_key(key(KeyCode::Enter), ctx), Some(Intent::Cancel));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut k = key(KeyCode::Char('j'));
        k.kind = KeyEventKind::Release;
        assert_eq!(map_key(k, KeyContext::FileList), None);
    }
}
