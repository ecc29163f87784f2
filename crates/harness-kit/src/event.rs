//! Simulated keyboard input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-printable keys that can be sent to an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKey {
    /// Enter / Return
    Enter,
    /// Tab
    Tab,
    /// Escape
    Escape,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Space bar
    Space,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Home
    Home,
    /// End
    End,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
}

impl SpecialKey {
    /// The DOM `KeyboardEvent.key` value for this key
    #[must_use]
    pub const fn key_name(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::Escape => "Escape",
            Self::Backspace => "Backspace",
            Self::Delete => "Delete",
            Self::Space => " ",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
        }
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space => write!(f, "Space"),
            other => write!(f, "{}", other.key_name()),
        }
    }
}

/// Modifier keys held while a key is sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierKeys {
    /// Shift held
    pub shift: bool,
    /// Control held
    pub control: bool,
    /// Alt held
    pub alt: bool,
    /// Meta / command held
    pub meta: bool,
}

impl ModifierKeys {
    /// No modifiers
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Whether any modifier is held
    #[must_use]
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// One unit of keyboard input passed to `ElementHandle::send_keys`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyInput {
    /// Printable text, typed character by character
    Text(String),
    /// A special key, optionally with modifiers
    Special {
        /// The key
        key: SpecialKey,
        /// Modifiers held while pressing it
        modifiers: ModifierKeys,
    },
}

impl KeyInput {
    /// Typed text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A bare special key
    #[must_use]
    pub const fn key(key: SpecialKey) -> Self {
        Self::Special {
            key,
            modifiers: ModifierKeys::NONE,
        }
    }

    /// A special key with modifiers
    #[must_use]
    pub const fn chord(key: SpecialKey, modifiers: ModifierKeys) -> Self {
        Self::Special { key, modifiers }
    }
}

impl From<&str> for KeyInput {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for KeyInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<SpecialKey> for KeyInput {
    fn from(key: SpecialKey) -> Self {
        Self::key(key)
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Special { key, modifiers } => {
                if modifiers.control {
                    write!(f, "Ctrl+")?;
                }
                if modifiers.alt {
                    write!(f, "Alt+")?;
                }
                if modifiers.shift {
                    write!(f, "Shift+")?;
                }
                if modifiers.meta {
                    write!(f, "Meta+")?;
                }
                write!(f, "{key}")
            }
        }
    }
}
