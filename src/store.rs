//! Pending and committed field values.
//!
//! Values for the block being received go to the pending side. They are only
//! published to the committed side once the block's checksum checks out.

use heapless::{String, Vec};

use crate::field::MAX_FIELDS;

/// Longest value kept for a field. VE.Direct values are at most 33 characters.
pub const MAX_VALUE_LEN: usize = 33;

/// Raw field text as received. Empty means no value.
pub type Value = String<MAX_VALUE_LEN>;

#[derive(Debug, Clone)]
pub(crate) struct ValueStore {
    pending: Vec<Value, MAX_FIELDS>,
    committed: Vec<Value, MAX_FIELDS>,
}

impl ValueStore {
    /// Both sides get one empty slot per field. `fields` is capped at [`MAX_FIELDS`].
    pub fn new(fields: usize) -> Self {
        let mut pending = Vec::new();
        let mut committed = Vec::new();
        for _ in 0..fields.min(MAX_FIELDS) {
            // Cannot fail, length is bounded above.
            let _ = pending.push(Value::new());
            let _ = committed.push(Value::new());
        }
        Self { pending, committed }
    }

    /// Forget everything collected for the current block.
    pub fn clear_pending(&mut self) {
        self.pending.iter_mut().for_each(Value::clear);
    }

    pub fn set_pending(&mut self, index: usize, value: &Value) {
        if let Some(slot) = self.pending.get_mut(index) {
            slot.clone_from(value);
        }
    }

    /// Publish a block that passed its checksum.
    ///
    /// Fields with a pending value replace the committed one. Fields missing from
    /// the block keep their old value when `retain` is set, otherwise they are
    /// cleared.
    pub fn commit(&mut self, retain: bool) {
        for (committed, pending) in self.committed.iter_mut().zip(self.pending.iter()) {
            if !pending.is_empty() {
                committed.clone_from(pending);
            } else if !retain {
                committed.clear();
            }
        }
    }

    /// Drop a block that failed its checksum.
    pub fn discard(&mut self, retain: bool) {
        if !retain {
            self.committed.iter_mut().for_each(Value::clear);
        }
    }

    pub fn committed(&self, index: usize) -> Option<&str> {
        self.committed.get(index).map(Value::as_str)
    }
}
