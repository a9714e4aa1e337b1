use crate::keys::KeyId;
use std::time::Instant;

/// Events flowing into the dispatcher's intake channel.
///
/// Trigger sources (hotkey bridges, the stdin bridge, a control surface)
/// push events here instead of calling into shared state from their own
/// threads; the dispatcher consumes them under one serialization
/// discipline.
#[derive(Debug, Clone)]
pub enum PadEvent {
    /// A key was triggered.
    Trigger {
        key: KeyId,
        /// When the trigger was observed by its source.
        at: Instant,
    },

    /// Stop accepting triggers and shut the daemon down.
    Shutdown,
}
