//! Tracks saves that haven't been acknowledged yet.
//!
//! ```
//! use cloze_session::unsaved::UnsavedTracker;
//!
//! let tracker = UnsavedTracker::default();
//! let guard = tracker.edit();
//! assert!(tracker.has_unsaved());
//! guard.save();
//! assert!(!tracker.has_unsaved());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct UnsavedTracker {
    count: Arc<AtomicUsize>,
}

impl UnsavedTracker {
    /// Mark the start of a save.
    pub fn edit(&self) -> EditGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        EditGuard {
            count: Arc::clone(&self.count),
            done: false,
        }
    }

    pub fn has_unsaved(&self) -> bool {
        self.count.load(Ordering::SeqCst) > 0
    }
}

/// Outstanding save. Counts as finished once saved or dropped.
#[derive(Debug)]
pub struct EditGuard {
    count: Arc<AtomicUsize>,
    done: bool,
}

impl EditGuard {
    pub fn save(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if !self.done {
            self.count.fetch_sub(1, Ordering::SeqCst);
            self.done = true;
        }
    }
}

impl Drop for EditGuard {
    fn drop(&mut self) {
        self.finish();
    }
}
