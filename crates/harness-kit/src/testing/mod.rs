//! In-memory host environment for exercising harnesses without a real UI.
//!
//! ```rust,ignore
//! let document = MockDocument::from_html("<button class='ui-button'>Save</button>")?;
//! let button = document.loader().get_harness(ButtonHarness::with(ButtonFilters {
//!     text: Some("Save".into()),
//!     ..Default::default()
//! })).await?;
//! button.click().await?;
//! ```

mod css;
mod document;
mod html;
mod tree;

pub use css::SelectorList;
pub use document::{MockDocument, MockElement, MockEnvironment, DEFAULT_MAX_STABILIZE_ROUNDS};
pub use html::{decode_entities, parse_fragment};
pub use tree::{ClickHandler, IdAllocator, MockNode, MockTree, RecordedEvent};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Install a test-writer `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
