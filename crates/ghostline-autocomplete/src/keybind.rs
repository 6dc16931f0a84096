//! Key combinations used to trigger suggestion acceptance

use crate::error::KeyParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A keyboard modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Ctrl => write!(f, "Ctrl"),
            Modifier::Shift => write!(f, "Shift"),
            Modifier::Alt => write!(f, "Alt"),
            Modifier::Meta => write!(f, "Meta"),
        }
    }
}

impl FromStr for Modifier {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ctrl" | "control" => Ok(Modifier::Ctrl),
            "shift" => Ok(Modifier::Shift),
            "alt" | "option" => Ok(Modifier::Alt),
            "meta" | "cmd" | "command" | "mod" => Ok(Modifier::Meta),
            _ => Err(KeyParseError::InvalidModifier(s.to_string())),
        }
    }
}

/// A key on the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Tab,
    Enter,
    Escape,
    Space,
    Right,
    End,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Tab => write!(f, "Tab"),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Escape"),
            Key::Space => write!(f, "Space"),
            Key::Right => write!(f, "Right"),
            Key::End => write!(f, "End"),
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "tab" => Ok(Key::Tab),
            "enter" | "return" => Ok(Key::Enter),
            "escape" | "esc" => Ok(Key::Escape),
            "space" => Ok(Key::Space),
            "right" | "arrowright" => Ok(Key::Right),
            "end" => Ok(Key::End),
            "" => Err(KeyParseError::Empty),
            _ => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::Char(c.to_ascii_lowercase())),
                    _ => Err(KeyParseError::UnknownKey(s.to_string())),
                }
            }
        }
    }
}

/// Modifiers plus a key, e.g. `Tab` or `Ctrl+Space`
///
/// Modifiers are a set, so `Shift+Ctrl+Space` and `Ctrl+Shift+Space` are the
/// same combo. Serialized as its display string so configuration files can
/// write `accept_key: "Ctrl+Space"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombo {
    pub modifiers: BTreeSet<Modifier>,
    pub key: Key,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            modifiers: BTreeSet::new(),
            key,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Whether a pressed combo triggers this binding
    pub fn matches(&self, other: &KeyCombo) -> bool {
        self == other
    }
}

impl Default for KeyCombo {
    fn default() -> Self {
        Self::new(Key::Tab)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(KeyParseError::Empty);
        }
        if s.trim() == "+" {
            return Ok(KeyCombo::new(Key::Char('+')));
        }

        // A trailing "+" names the plus key itself: "Ctrl++"
        let (head, key_part) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match s.rsplit_once('+') {
                Some((rest, key)) => (rest, key),
                None => ("", s),
            },
        };

        let mut combo = KeyCombo::new(Key::from_str(key_part)?);
        if !head.is_empty() {
            for part in head.split('+') {
                combo = combo.with_modifier(Modifier::from_str(part)?);
            }
        }
        Ok(combo)
    }
}

impl TryFrom<String> for KeyCombo {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyCombo> for String {
    fn from(combo: KeyCombo) -> Self {
        combo.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_key() {
        let combo: KeyCombo = "Tab".parse().unwrap();
        assert_eq!(combo, KeyCombo::new(Key::Tab));
    }

    #[test]
    fn test_parse_with_modifiers() {
        let combo: KeyCombo = "Ctrl+Shift+Space".parse().unwrap();
        assert_eq!(combo.key, Key::Space);
        assert_eq!(
            combo.modifiers.into_iter().collect::<Vec<_>>(),
            vec![Modifier::Ctrl, Modifier::Shift]
        );
    }

    #[test]
    fn test_parse_plus_key() {
        let combo: KeyCombo = "Ctrl++".parse().unwrap();
        assert_eq!(combo, KeyCombo::new(Key::Char('+')).with_modifier(Modifier::Ctrl));
    }

    #[test]
    fn test_parse_bare_plus_key() {
        assert_eq!("+".parse::<KeyCombo>(), Ok(KeyCombo::new(Key::Char('+'))));
        assert_eq!(" + ".parse::<KeyCombo>(), Ok(KeyCombo::new(Key::Char('+'))));
        assert_eq!(KeyCombo::new(Key::Char('+')).to_string(), "+");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<KeyCombo>(), Err(KeyParseError::Empty));
        assert!(matches!(
            "Hyper+Tab".parse::<KeyCombo>(),
            Err(KeyParseError::InvalidModifier(_))
        ));
        assert!(matches!(
            "Ctrl+Banana".parse::<KeyCombo>(),
            Err(KeyParseError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_matches_ignores_modifier_order() {
        let a: KeyCombo = "Ctrl+Alt+Right".parse().unwrap();
        let b: KeyCombo = "Alt+Ctrl+Right".parse().unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&"Ctrl+Right".parse().unwrap()));
    }

    #[test]
    fn test_equality_and_hash_ignore_modifier_order() {
        let a: KeyCombo = "Shift+Ctrl+Space".parse().unwrap();
        let b: KeyCombo = "Ctrl+Shift+Space".parse().unwrap();
        assert_eq!(a, b);

        let bindings: std::collections::HashSet<KeyCombo> = [a.clone(), b].into_iter().collect();
        assert_eq!(bindings.len(), 1);
        assert_eq!(a.to_string(), "Ctrl+Shift+Space");
    }

    #[test]
    fn test_display_round_trip() {
        let combo: KeyCombo = "ctrl+space".parse().unwrap();
        assert_eq!(combo.to_string(), "Ctrl+Space");
    }
}
