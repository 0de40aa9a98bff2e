//! The page: one execution context shared by the host and its remotes.

use crate::events::PageEventBus;
use crate::registry::GlobalRegistry;
use once_cell::sync::Lazy;
use std::sync::Arc;

static PROCESS_PAGE: Lazy<Page> = Lazy::new(Page::new);

struct PageInner {
    globals: GlobalRegistry,
    events: PageEventBus,
}

/// Handle to a page. Cloning shares the same page.
///
/// Production code uses [`Page::global`], which lives for the whole process
/// and is never torn down. Tests build isolated pages with [`Page::new`].
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

impl Page {
    /// Create a fresh, isolated page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PageInner {
                globals: GlobalRegistry::new(),
                events: PageEventBus::new(),
            }),
        }
    }

    /// The process-wide page.
    #[must_use]
    pub fn global() -> Self {
        PROCESS_PAGE.clone()
    }

    /// Well-known global slots.
    #[must_use]
    pub fn globals(&self) -> &GlobalRegistry {
        &self.inner.globals
    }

    /// Page-wide custom event target.
    #[must_use]
    pub fn events(&self) -> &PageEventBus {
        &self.inner.events
    }

    /// Whether two handles refer to the same page.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("globals", &self.inner.globals)
            .finish_non_exhaustive()
    }
}
