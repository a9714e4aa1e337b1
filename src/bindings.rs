use crate::action::ActionKind;
use crate::keys::{KeyId, LAYOUT_SIZE};
use std::sync::Mutex;

/// A key and the action currently assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: KeyId,
    pub action: ActionKind,
}

/// In-memory key → action table.
///
/// Holds exactly one slot per control in the fixed layout, so lookups
/// never fail and there is no notion of a missing or duplicate entry.
/// The mutex is held only for the table access itself; trigger-time
/// lookups and assignments from the configuration surface cannot race.
pub struct BindingStore {
    slots: Mutex<Vec<ActionKind>>,
}

impl Default for BindingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingStore {
    /// Create a store with every key `Unbound`.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(vec![ActionKind::Unbound; LAYOUT_SIZE]),
        }
    }

    /// The action currently bound to `key`.
    pub fn get(&self, key: KeyId) -> ActionKind {
        self.slots.lock().unwrap()[key.index()].clone()
    }

    /// Replace the action bound to `key`. The old action is fully
    /// replaced in one step.
    pub fn set(&self, key: KeyId, action: ActionKind) {
        self.slots.lock().unwrap()[key.index()] = action;
    }

    /// All bindings in stable layout order, for persistence.
    pub fn all(&self) -> Vec<Binding> {
        let slots = self.slots.lock().unwrap();
        KeyId::layout()
            .map(|key| Binding {
                key,
                action: slots[key.index()].clone(),
            })
            .collect()
    }
}
