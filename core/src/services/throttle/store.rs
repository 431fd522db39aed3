//! Keyed storage for throttling records.

use std::collections::HashMap;

use crate::domain::entities::AttemptRecord;

/// Map from namespaced key to record.
///
/// Implementations are plain maps: no expiry, no persistence, no errors.
/// Callers serialize read-modify-write sequences themselves.
pub trait AttemptStore<R = AttemptRecord>: Send {
    fn get(&self, key: &str) -> Option<R>;

    fn set(&mut self, key: &str, record: R);

    fn delete(&mut self, key: &str);

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys currently stored, in no particular order
    fn keys(&self) -> Vec<String>;

    /// Drop every record for which `keep` returns false; returns how many were dropped
    fn retain(&mut self, keep: &mut dyn FnMut(&str, &R) -> bool) -> usize;
}

/// Process-local store; a restart is a full reset
#[derive(Debug)]
pub struct MemoryAttemptStore<R = AttemptRecord> {
    records: HashMap<String, R>,
}

impl<R> MemoryAttemptStore<R> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<R> Default for MemoryAttemptStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> AttemptStore<R> for MemoryAttemptStore<R>
where
    R: Clone + Send,
{
    fn get(&self, key: &str) -> Option<R> {
        self.records.get(key).cloned()
    }

    fn set(&mut self, key: &str, record: R) {
        self.records.insert(key.to_string(), record);
    }

    fn delete(&mut self, key: &str) {
        self.records.remove(key);
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn keys(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    fn retain(&mut self, keep: &mut dyn FnMut(&str, &R) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(|key, record| keep(key, record));
        before - self.records.len()
    }
}
