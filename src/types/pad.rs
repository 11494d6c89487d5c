use std::fmt;
use std::path::{Path, PathBuf};

/// Key that toggles power; never available as a pad key
pub const POWER_KEY: char = 'P';

/// Number of pads in a kit (3x3 grid)
pub const PAD_COUNT: usize = 9;

/// Keyboard key bound to a pad, always stored uppercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadKey(char);

impl PadKey {
    /// Normalize a key character (case-insensitive)
    pub fn new(key: char) -> Self {
        PadKey(key.to_ascii_uppercase())
    }

    /// Parse a key from config text: exactly one alphanumeric character
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphanumeric() => Some(PadKey::new(ch)),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_char(&self) -> char {
        self.0
    }

    /// Case-insensitive match against raw keyboard input
    pub fn matches(&self, input: char) -> bool {
        self.0 == input.to_ascii_uppercase()
    }
}

impl fmt::Display for PadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed key -> clip -> label binding
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub key: PadKey,
    /// Clip location (resolved against the samples directory)
    pub clip: PathBuf,
    /// Text shown on the display when triggered
    pub label: String,
}

impl Pad {
    pub fn new(key: char, clip: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            key: PadKey::new(key),
            clip: clip.into(),
            label: label.into(),
        }
    }

    /// Absolute clip path, joining relative clips onto `samples_dir`
    pub fn clip_path(&self, samples_dir: &Path) -> PathBuf {
        if self.clip.is_absolute() {
            self.clip.clone()
        } else {
            samples_dir.join(&self.clip)
        }
    }
}

/// The stock kit: two heater rows, a percussion row
pub fn default_kit() -> Vec<Pad> {
    vec![
        Pad::new('Q', "Heater-1.mp3", "Heater 1"),
        Pad::new('W', "Heater-2.mp3", "Heater 2"),
        Pad::new('E', "Heater-3.mp3", "Heater 3"),
        Pad::new('A', "Heater-4.mp3", "Heater 4"),
        Pad::new('S', "Clap.mp3", "Clap"),
        Pad::new('D', "Open-HH.mp3", "Open HH"),
        Pad::new('Z', "Kick_n_Hat.mp3", "Kick n' Hat"),
        Pad::new('X', "Kick.mp3", "Kick"),
        Pad::new('C', "Closed-HH.mp3", "Closed HH"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_key_normalizes_case() {
        assert_eq!(PadKey::new('q'), PadKey::new('Q'));
        assert_eq!(PadKey::new('q').as_char(), 'Q');
        assert!(PadKey::new('Z').matches('z'));
        assert!(!PadKey::new('Z').matches('x'));
    }

    #[test]
    fn test_pad_key_parse() {
        assert_eq!(PadKey::parse("q"), Some(PadKey::new('Q')));
        assert_eq!(PadKey::parse(" 7 "), Some(PadKey::new('7')));
        assert_eq!(PadKey::parse(""), None);
        assert_eq!(PadKey::parse("QW"), None);
        assert_eq!(PadKey::parse("!"), None);
    }

    #[test]
    fn test_clip_path_resolution() {
        let pad = Pad::new('Q', "Heater-1.mp3", "Heater 1");
        assert_eq!(
            pad.clip_path(Path::new("sounds")),
            PathBuf::from("sounds/Heater-1.mp3")
        );

        let absolute = Pad::new('Q', "/tmp/kick.wav", "Kick");
        assert_eq!(
            absolute.clip_path(Path::new("sounds")),
            PathBuf::from("/tmp/kick.wav")
        );
    }

    #[test]
    fn test_default_kit_layout() {
        let kit = default_kit();
        assert_eq!(kit.len(), PAD_COUNT);
        let keys: String = kit.iter().map(|p| p.key.as_char()).collect();
        assert_eq!(keys, "QWEASDZXC");
        assert!(kit.iter().all(|p| !p.key.matches(POWER_KEY)));
    }
}
