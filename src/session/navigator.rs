//! Navigation seam
//!
//! The pipeline and the route guard never touch a window or a view stack
//! directly; they go through a [`Navigator`]. The desktop shell uses
//! [`MemoryNavigator`] as its router.

use std::sync::{Mutex, PoisonError, RwLock};

pub trait Navigator: Send + Sync {
    /// Path of the page currently shown
    fn current_path(&self) -> String;

    /// User-initiated navigation (adds a history entry)
    fn push(&self, path: &str);

    /// Forced navigation that replaces the current entry (redirects)
    fn replace(&self, path: &str);
}

/// In-memory router that records forced redirects
#[derive(Debug)]
pub struct MemoryNavigator {
    history: RwLock<Vec<String>>,
    redirects: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            history: RwLock::new(vec![initial_path.into()]),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Every `replace` target, oldest first
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Go back one entry; returns false at the first entry
    pub fn back(&self) -> bool {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        if history.len() > 1 {
            history.pop();
            true
        } else {
            false
        }
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }

    fn replace(&self, path: &str) {
        tracing::info!(to = path, "redirecting");
        {
            let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
            match history.last_mut() {
                Some(last) => *last = path.to_string(),
                None => history.push(path.to_string()),
            }
        }
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
