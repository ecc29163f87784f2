//! Element handles and the host environment seam.
//!
//! The engine never talks to a UI framework directly. A host implements
//! [`ElementHandle`] for its nodes and [`HarnessEnvironment`] for its tree;
//! everything in this crate is written against those two traits.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  HarnessEnvironment (host)                                    │
//! │    document_root() ──► Element (Arc<dyn ElementHandle>)       │
//! │    stabilize()     ──► flush pending rendering work           │
//! ├───────────────────────────────────────────────────────────────┤
//! │  LocatorFactory / HarnessLoader (engine)                      │
//! │    stabilize ─► query_all(selector) ─► harnesses ─► filter    │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use crate::event::KeyInput;
use crate::result::HarnessResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identity of a node, comparable across separate resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw identifier
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position and size of a rendered element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Dimensions {
    /// Create new dimensions
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point as `(x, y)`
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point lies inside
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Handle to one node of a live UI tree.
///
/// Every operation reads or drives the tree as it is *now*. If the node has
/// been removed since the handle was obtained, operations fail with
/// [`HarnessError::DetachedElement`](crate::HarnessError::DetachedElement).
#[async_trait]
pub trait ElementHandle: Send + Sync + fmt::Debug {
    /// Stable node identity
    fn id(&self) -> ElementId;

    /// Read a static attribute, `None` if absent
    async fn attribute(&self, name: &str) -> HarnessResult<Option<String>>;

    /// Check for a class flag
    async fn has_class(&self, name: &str) -> HarnessResult<bool>;

    /// Read a live runtime property such as `checked` or `value`
    async fn property(&self, name: &str) -> HarnessResult<serde_json::Value>;

    /// Rendered text content, trimmed
    async fn text(&self) -> HarnessResult<String>;

    /// Simulate a click
    async fn click(&self) -> HarnessResult<()>;

    /// Move focus to this element
    async fn focus(&self) -> HarnessResult<()>;

    /// Remove focus from this element
    async fn blur(&self) -> HarnessResult<()>;

    /// Whether this element currently has focus
    async fn is_focused(&self) -> HarnessResult<bool>;

    /// Focus the element and type the given keys
    async fn send_keys(&self, keys: &[KeyInput]) -> HarnessResult<()>;

    /// Rendered position and size
    async fn dimensions(&self) -> HarnessResult<Dimensions>;

    /// Whether this element matches a selector
    async fn matches_selector(&self, selector: &str) -> HarnessResult<bool>;

    /// All descendants matching a selector, in document order
    async fn query_all(&self, selector: &str) -> HarnessResult<Vec<Element>>;

    /// Read a boolean property, treating anything non-boolean as `false`
    async fn bool_property(&self, name: &str) -> HarnessResult<bool> {
        Ok(self.property(name).await?.as_bool().unwrap_or(false))
    }

    /// Read a string property, `None` unless the value is a string
    async fn string_property(&self, name: &str) -> HarnessResult<Option<String>> {
        Ok(self
            .property(name)
            .await?
            .as_str()
            .map(ToString::to_string))
    }
}

/// Shared element handle
pub type Element = Arc<dyn ElementHandle>;

/// Whether two handles refer to the same node
#[must_use]
pub fn same_element(a: &Element, b: &Element) -> bool {
    a.id() == b.id()
}

/// The host framework's view of one UI tree.
///
/// `stabilize` is the single "suspend until the tree is stable" primitive;
/// the engine calls it before resolving a locator so queries observe settled
/// state.
#[async_trait]
pub trait HarnessEnvironment: Send + Sync + fmt::Debug {
    /// Root element of the whole document
    fn document_root(&self) -> Element;

    /// Wait for pending rendering work to settle
    async fn stabilize(&self) -> HarnessResult<()>;
}
