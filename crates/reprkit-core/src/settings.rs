use std::sync::atomic::{AtomicUsize, Ordering};

const DEFAULT_MAX_ITEMS: usize = 100;

static MAX_ITEMS: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_ITEMS);

/// Process-wide rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Collections longer than this are cut short with a trailing `...`.
    pub max_items: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

/// Replace the global rendering settings.
pub fn configure_render(settings: RenderSettings) {
    MAX_ITEMS.store(settings.max_items, Ordering::Relaxed);
    tracing::debug!(max_items = settings.max_items, "render settings updated");
}

/// Current global rendering settings.
pub fn render_settings() -> RenderSettings {
    RenderSettings {
        max_items: MAX_ITEMS.load(Ordering::Relaxed),
    }
}
