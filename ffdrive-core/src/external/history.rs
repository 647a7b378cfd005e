//! Bounded history of recent ffmpeg diagnostic output.
//!
//! Shared between invocations (typically behind an `Arc`) and safe to append to
//! from several threads. Once full, each push evicts the oldest entry.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Default number of retained diagnostic outputs.
pub const DEFAULT_HISTORY_CAPACITY: usize = 25;

#[derive(Debug)]
pub struct DiagnosticHistory {
    capacity: usize,
    entries: Mutex<VecDeque<String>>,
}

impl Default for DiagnosticHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl DiagnosticHistory {
    /// Creates an empty history. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, diagnostics: impl Into<String>) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(diagnostics.into());
    }

    /// All retained entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<String> {
        self.lock().back().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the deque half-updated, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
