//! Process-wide font directory used when resolving font files.
//!
//! The directory is shared state: resolvers read it on every lookup, so a
//! temporary override must be serialized against other callers and always
//! put back. [`FontSearchPath::run_scoped`] does both.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{ReentrantMutex, RwLock};

static GLOBAL: Lazy<Arc<FontSearchPath>> = Lazy::new(|| {
    Arc::new(FontSearchPath::new(sheetfit_config::default_font_directory()))
});

#[derive(Debug)]
pub struct FontSearchPath {
    current: RwLock<String>,
    /// Held for the whole of a scoped override. Reentrant so a scope can nest
    /// on the same thread.
    scope: ReentrantMutex<()>,
}

impl FontSearchPath {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
            scope: ReentrantMutex::new(()),
        }
    }

    /// The shared process-wide instance.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    /// Replace the directory outright. Stored as given.
    pub fn set(&self, path: impl Into<String>) {
        let _scope = self.scope.lock();
        *self.current.write() = path.into();
    }

    /// Run `body` with the directory set to `path`, restoring the previous
    /// value afterwards, including when `body` panics.
    pub fn run_scoped<T>(&self, path: &str, body: impl FnOnce() -> T) -> T {
        let _scope = self.scope.lock();
        let saved = std::mem::replace(&mut *self.current.write(), normalize_dir(path));
        let _restore = Restore {
            target: &self.current,
            saved: Some(saved),
        };
        body()
    }
}

struct Restore<'a> {
    target: &'a RwLock<String>,
    saved: Option<String>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.target.write() = saved;
        }
    }
}

/// Ensure a trailing separator; file names are appended directly.
pub(crate) fn normalize_dir(path: &str) -> String {
    if path.ends_with('/') || path.ends_with('\\') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
