//! Keyboard accelerators for shell actions.
//!
//! Uses the platform's primary modifier: `Cmd` on macOS, `Ctrl` elsewhere.
//!
//! | Keys                 | Action               |
//! |----------------------|----------------------|
//! | Primary+N            | New window           |
//! | Primary+Shift+T      | Reopen closed window |
//! | Primary+Shift+R      | Reset windows        |
//! | Primary+Q            | Quit                 |

use crate::window_manager::ShellAction;
use winit::keyboard::{Key, ModifiersState};

/// Primary modifier held, Shift not held.
pub fn primary_modifier(mods: &ModifiersState) -> bool {
    #[cfg(target_os = "macos")]
    {
        mods.super_key() && !mods.shift_key()
    }
    #[cfg(not(target_os = "macos"))]
    {
        mods.control_key() && !mods.shift_key()
    }
}

/// Primary modifier and Shift both held.
pub fn primary_modifier_with_shift(mods: &ModifiersState) -> bool {
    #[cfg(target_os = "macos")]
    {
        mods.super_key() && mods.shift_key()
    }
    #[cfg(not(target_os = "macos"))]
    {
        mods.control_key() && mods.shift_key()
    }
}

/// Shell action bound to `key` under `mods`, if any.
pub fn accelerator_action(mods: &ModifiersState, key: &Key) -> Option<ShellAction> {
    let Key::Character(text) = key else {
        return None;
    };
    let key = text.to_ascii_lowercase();

    if primary_modifier(mods) {
        match key.as_str() {
            "n" => Some(ShellAction::NewWindow(None)),
            "q" => Some(ShellAction::Quit),
            _ => None,
        }
    } else if primary_modifier_with_shift(mods) {
        match key.as_str() {
            "t" => Some(ShellAction::ReopenClosedWindow),
            "r" => Some(ShellAction::ResetWindows),
            _ => None,
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn primary() -> ModifiersState {
        if cfg!(target_os = "macos") {
            ModifiersState::SUPER
        } else {
            ModifiersState::CONTROL
        }
    }

    fn key(text: &str) -> Key {
        Key::Character(SmolStr::new(text))
    }

    #[test]
    fn test_primary_shortcuts() {
        assert_eq!(
            accelerator_action(&primary(), &key("n")),
            Some(ShellAction::NewWindow(None))
        );
        assert_eq!(
            accelerator_action(&primary(), &key("q")),
            Some(ShellAction::Quit)
        );
    }

    #[test]
    fn test_shifted_shortcuts_accept_uppercase() {
        let mods = primary() | ModifiersState::SHIFT;
        assert_eq!(
            accelerator_action(&mods, &key("T")),
            Some(ShellAction::ReopenClosedWindow)
        );
        assert_eq!(
            accelerator_action(&mods, &key("n")),
            None
        );
    }

    #[test]
    fn test_unmodified_keys_are_ignored() {
        assert_eq!(accelerator_action(&ModifiersState::empty(), &key("n")), None);
        assert_eq!(accelerator_action(&ModifiersState::SHIFT, &key("t")), None);
    }
}
