use crate::error::PadError;
use std::fmt;
use std::str::FromStr;

/// Number of rotary encoders on the pad.
pub const ENCODER_COUNT: u8 = 3;

/// Number of plain keys on the pad.
pub const KEY_COUNT: u8 = 15;

/// Total number of bindable controls.
pub const LAYOUT_SIZE: usize = (ENCODER_COUNT + KEY_COUNT) as usize;

/// Stable identifier for one physical control on the pad.
///
/// The layout is fixed by the hardware: three rotary encoders followed by
/// fifteen keys. Identifiers are never created or destroyed at runtime,
/// only looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    /// Rotary encoder, 0-based index.
    Encoder(u8),
    /// Plain key, 0-based index.
    Key(u8),
}

impl KeyId {
    /// All controls in stable layout order (encoders first).
    pub fn layout() -> impl Iterator<Item = KeyId> {
        (0..ENCODER_COUNT)
            .map(KeyId::Encoder)
            .chain((0..KEY_COUNT).map(KeyId::Key))
    }

    /// Position of this control in layout order.
    pub fn index(self) -> usize {
        match self {
            KeyId::Encoder(i) => i as usize,
            KeyId::Key(i) => ENCODER_COUNT as usize + i as usize,
        }
    }

    /// Inverse of [`KeyId::index`]. Returns `None` out of range.
    pub fn from_index(index: usize) -> Option<KeyId> {
        if index < ENCODER_COUNT as usize {
            Some(KeyId::Encoder(index as u8))
        } else if index < LAYOUT_SIZE {
            Some(KeyId::Key((index - ENCODER_COUNT as usize) as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Encoder(i) => write!(f, "Enc {}", i + 1),
            KeyId::Key(i) => write!(f, "Key {}", i + 1),
        }
    }
}

impl FromStr for KeyId {
    type Err = PadError;

    /// Parse `enc1`..`enc3` / `key1`..`key15` (case-insensitive, spaces
    /// allowed), the 1-based labels printed on the pad.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(' ', "");
        let parse = |rest: &str, limit: u8| {
            rest.parse::<u8>()
                .ok()
                .filter(|n| (1..=limit).contains(n))
                .map(|n| n - 1)
        };
        if let Some(rest) = normalized.strip_prefix("enc") {
            if let Some(i) = parse(rest, ENCODER_COUNT) {
                return Ok(KeyId::Encoder(i));
            }
        } else if let Some(rest) = normalized.strip_prefix("key") {
            if let Some(i) = parse(rest, KEY_COUNT) {
                return Ok(KeyId::Key(i));
            }
        }
        Err(PadError::UnknownKey(s.trim().to_string()))
    }
}
