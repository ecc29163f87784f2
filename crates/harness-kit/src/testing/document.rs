//! Shared mock document plus its `ElementHandle` and `HarnessEnvironment`.

use crate::element::{Dimensions, Element, ElementHandle, ElementId, HarnessEnvironment};
use crate::event::KeyInput;
use crate::loader::HarnessLoader;
use crate::locator::{LocatorFactory, LocatorOptions};
use crate::result::{HarnessError, HarnessResult};
use crate::testing::html::parse_fragment;
use crate::testing::tree::{MockTree, RecordedEvent};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Rounds of deferred work flushed per stabilization before giving up
pub const DEFAULT_MAX_STABILIZE_ROUNDS: usize = 16;

#[derive(Debug)]
struct DocumentState {
    tree: Mutex<MockTree>,
    stabilizations: AtomicUsize,
    max_rounds: AtomicUsize,
}

impl DocumentState {
    fn lock(&self) -> MutexGuard<'_, MockTree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A mock UI document shared by the environment and every handle into it
#[derive(Debug, Clone)]
pub struct MockDocument {
    state: Arc<DocumentState>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    /// Empty document
    #[must_use]
    pub fn new() -> Self {
        Self::from_tree(MockTree::new())
    }

    /// Wrap an existing tree
    #[must_use]
    pub fn from_tree(tree: MockTree) -> Self {
        Self {
            state: Arc::new(DocumentState {
                tree: Mutex::new(tree),
                stabilizations: AtomicUsize::new(0),
                max_rounds: AtomicUsize::new(DEFAULT_MAX_STABILIZE_ROUNDS),
            }),
        }
    }

    /// Document built from an HTML fragment
    pub fn from_html(html: &str) -> HarnessResult<Self> {
        let mut tree = MockTree::new();
        let root = tree.root();
        for node in parse_fragment(html)? {
            tree.append(root, node);
        }
        Ok(Self::from_tree(tree))
    }

    /// Limit how many rounds of deferred work one stabilization may flush
    #[must_use]
    pub fn with_max_stabilize_rounds(self, rounds: usize) -> Self {
        self.state.max_rounds.store(rounds, Ordering::SeqCst);
        self
    }

    /// The environment seam for this document
    #[must_use]
    pub fn environment(&self) -> Arc<dyn HarnessEnvironment> {
        Arc::new(MockEnvironment {
            state: Arc::clone(&self.state),
        })
    }

    /// Loader rooted at the document
    #[must_use]
    pub fn loader(&self) -> HarnessLoader {
        HarnessLoader::new(self.environment())
    }

    /// Loader rooted at the document with custom options
    #[must_use]
    pub fn loader_with_options(&self, options: LocatorOptions) -> HarnessLoader {
        HarnessLoader::with_options(self.environment(), options)
    }

    /// Locator factory rooted at the document
    #[must_use]
    pub fn locator_factory(&self) -> LocatorFactory {
        LocatorFactory::for_document(self.environment(), LocatorOptions::default())
    }

    /// Handle to a node
    #[must_use]
    pub fn element(&self, id: ElementId) -> Element {
        let label = self.state.lock().describe(id);
        Arc::new(MockElement {
            state: Arc::clone(&self.state),
            id,
            label,
        })
    }

    /// First element in the document matching `selector`
    #[must_use]
    pub fn first(&self, selector: &str) -> Option<ElementId> {
        self.state.lock().query(selector).ok().flatten()
    }

    /// Read the tree
    pub fn read<R>(&self, f: impl FnOnce(&MockTree) -> R) -> R {
        f(&self.state.lock())
    }

    /// Change the tree directly, bypassing simulated input
    pub fn mutate<R>(&self, f: impl FnOnce(&mut MockTree) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Register a click listener on `id`
    pub fn on_click(&self, id: ElementId, handler: impl Fn(&mut MockTree, ElementId) + Send + Sync + 'static) {
        self.state.lock().on_click(id, Arc::new(handler));
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.state.lock().events().to_vec()
    }

    /// Number of stabilizations requested by the engine
    #[must_use]
    pub fn stabilize_count(&self) -> usize {
        self.state.stabilizations.load(Ordering::SeqCst)
    }
}

/// [`HarnessEnvironment`] over a [`MockDocument`]
#[derive(Debug)]
pub struct MockEnvironment {
    state: Arc<DocumentState>,
}

#[async_trait]
impl HarnessEnvironment for MockEnvironment {
    fn document_root(&self) -> Element {
        let root = self.state.lock().root();
        Arc::new(MockElement {
            state: Arc::clone(&self.state),
            id: root,
            label: format!("{root} (document)"),
        })
    }

    async fn stabilize(&self) -> HarnessResult<()> {
        let round = self.state.stabilizations.fetch_add(1, Ordering::SeqCst) + 1;
        let max_rounds = self.state.max_rounds.load(Ordering::SeqCst);
        let flushed = self.state.lock().flush_pending(max_rounds)?;
        if flushed > 0 {
            debug!(round, flushed, "flushed deferred work");
        }
        Ok(())
    }
}

/// [`ElementHandle`] into a [`MockDocument`]
#[derive(Debug)]
pub struct MockElement {
    state: Arc<DocumentState>,
    id: ElementId,
    label: String,
}

impl MockElement {
    fn attached(&self) -> HarnessResult<MutexGuard<'_, MockTree>> {
        let tree = self.state.lock();
        if tree.contains(self.id) {
            Ok(tree)
        } else {
            Err(HarnessError::DetachedElement {
                element: self.label.clone(),
            })
        }
    }

    /// Apply a simulated interaction, then flush the work it queued
    fn interact(
        &self,
        action: impl FnOnce(&mut MockTree, ElementId) -> HarnessResult<()>,
    ) -> HarnessResult<()> {
        let mut tree = self.attached()?;
        action(&mut *tree, self.id)?;
        tree.flush_pending(self.state.max_rounds.load(Ordering::SeqCst))?;
        Ok(())
    }

    fn handle(&self, tree: &MockTree, id: ElementId) -> Element {
        Arc::new(Self {
            state: Arc::clone(&self.state),
            id,
            label: tree.describe(id),
        })
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn id(&self) -> ElementId {
        self.id
    }

    async fn attribute(&self, name: &str) -> HarnessResult<Option<String>> {
        Ok(self.attached()?.attribute(self.id, name).map(ToString::to_string))
    }

    async fn has_class(&self, name: &str) -> HarnessResult<bool> {
        Ok(self.attached()?.has_class(self.id, name))
    }

    async fn property(&self, name: &str) -> HarnessResult<Value> {
        Ok(self.attached()?.property(self.id, name))
    }

    async fn text(&self) -> HarnessResult<String> {
        Ok(self.attached()?.text(self.id).trim().to_string())
    }

    async fn click(&self) -> HarnessResult<()> {
        debug!(element = %self.label, "click");
        self.interact(|tree, id| {
            tree.click(id);
            Ok(())
        })
    }

    async fn focus(&self) -> HarnessResult<()> {
        debug!(element = %self.label, "focus");
        self.interact(|tree, id| {
            tree.focus(id);
            Ok(())
        })
    }

    async fn blur(&self) -> HarnessResult<()> {
        debug!(element = %self.label, "blur");
        self.interact(|tree, id| {
            tree.blur(id);
            Ok(())
        })
    }

    async fn is_focused(&self) -> HarnessResult<bool> {
        Ok(self.attached()?.focused() == Some(self.id))
    }

    async fn send_keys(&self, keys: &[KeyInput]) -> HarnessResult<()> {
        debug!(element = %self.label, keys = keys.len(), "send keys");
        self.interact(|tree, id| tree.type_keys(id, keys))
    }

    async fn dimensions(&self) -> HarnessResult<Dimensions> {
        Ok(self.attached()?.dimensions(self.id))
    }

    async fn matches_selector(&self, selector: &str) -> HarnessResult<bool> {
        self.attached()?.matches(self.id, selector)
    }

    async fn query_all(&self, selector: &str) -> HarnessResult<Vec<Element>> {
        let tree = self.attached()?;
        let found = tree.query_all(self.id, selector)?;
        Ok(found.into_iter().map(|id| self.handle(&tree, id)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::SpecialKey;
    use crate::testing::MockNode;

    mod element_tests {
        use super::*;

        #[tokio::test]
        async fn test_reads_reflect_live_tree() {
            let document = MockDocument::from_html("<p class='note' title='x'> Hello </p>").unwrap();
            let p = document.element(document.first("p").unwrap());
            assert_eq!(p.text().await.unwrap(), "Hello");
            assert_eq!(p.attribute("title").await.unwrap().as_deref(), Some("x"));
            assert!(p.has_class("note").await.unwrap());

            document.mutate(|tree| tree.set_attribute(p.id(), "title", "y"));
            assert_eq!(p.attribute("title").await.unwrap().as_deref(), Some("y"));
        }

        #[tokio::test]
        async fn test_detached_handle_errors() {
            let document = MockDocument::from_html("<button>Go</button>").unwrap();
            let button = document.element(document.first("button").unwrap());
            document.mutate(|tree| tree.remove(button.id()));

            assert!(button.text().await.unwrap_err().is_detached());
            assert!(button.click().await.unwrap_err().is_detached());
            let err = button.attribute("id").await.unwrap_err();
            assert!(err.to_string().contains("<button>"));
        }

        #[tokio::test]
        async fn test_send_keys_and_focus() {
            let document = MockDocument::from_html("<input><input id='other'>").unwrap();
            let input = document.element(document.first("input").unwrap());
            input
                .send_keys(&[KeyInput::text("hi"), SpecialKey::Enter.into()])
                .await
                .unwrap();
            assert_eq!(input.string_property("value").await.unwrap().as_deref(), Some("hi"));
            assert!(input.is_focused().await.unwrap());

            let other = document.element(document.first("#other").unwrap());
            other.focus().await.unwrap();
            assert!(!input.is_focused().await.unwrap());
            other.blur().await.unwrap();
            assert!(!other.is_focused().await.unwrap());
        }

        #[tokio::test]
        async fn test_query_all_and_matches() {
            let document = MockDocument::from_html("<ul><li>a</li><li class='x'>b</li></ul>").unwrap();
            let list = document.element(document.first("ul").unwrap());
            let items = list.query_all("li").await.unwrap();
            assert_eq!(items.len(), 2);
            assert!(items[1].matches_selector(".x").await.unwrap());
            assert!(!items[0].matches_selector(".x").await.unwrap());
            assert!(list.query_all("li[").await.is_err());
        }

        #[tokio::test]
        async fn test_dimensions() {
            let document = MockDocument::new();
            let id = document.mutate(|tree| {
                let root = tree.root();
                tree.append(
                    root,
                    MockNode::element("div").dimensions(Dimensions::new(1.0, 2.0, 3.0, 4.0)),
                )
            });
            let div = document.element(id);
            assert_eq!(div.dimensions().await.unwrap(), Dimensions::new(1.0, 2.0, 3.0, 4.0));
        }
    }

    mod environment_tests {
        use super::*;

        #[tokio::test]
        async fn test_stabilize_flushes_deferred_work() {
            let document = MockDocument::from_html("<div></div>").unwrap();
            let div = document.first("div").unwrap();
            document.mutate(|tree| tree.defer(move |tree| tree.toggle_class(div, "ready", true)));

            let env = document.environment();
            assert!(!document.read(|tree| tree.has_class(div, "ready")));
            env.stabilize().await.unwrap();
            assert!(document.read(|tree| tree.has_class(div, "ready")));
            assert_eq!(document.stabilize_count(), 1);
        }

        #[tokio::test]
        async fn test_stabilize_reports_runaway_work() {
            fn requeue(tree: &mut MockTree) {
                tree.defer(requeue);
            }
            let document = MockDocument::new().with_max_stabilize_rounds(2);
            document.mutate(|tree| tree.defer(requeue));
            let err = document.environment().stabilize().await.unwrap_err();
            assert!(matches!(err, HarnessError::Unstable { rounds: 2 }));
        }

        #[tokio::test]
        async fn test_document_root_queries_everything() {
            let document = MockDocument::from_html("<a></a><b></b>").unwrap();
            let root = document.environment().document_root();
            assert_eq!(root.query_all("*").await.unwrap().len(), 2);
            assert!(!root.matches_selector("*").await.unwrap());
        }

        #[tokio::test]
        async fn test_click_handlers_see_target() {
            let document = MockDocument::from_html("<div id='host'><span>x</span></div>").unwrap();
            let host = document.first("#host").unwrap();
            document.on_click(host, |tree, target| tree.set_attribute(target, "data-hit", "yes"));
            let span = document.element(document.first("span").unwrap());
            span.click().await.unwrap();
            assert_eq!(span.attribute("data-hit").await.unwrap().as_deref(), Some("yes"));
            assert!(document.events().contains(&RecordedEvent::Click(span.id())));
        }

        #[tokio::test]
        async fn test_interactions_settle_before_returning() {
            let document = MockDocument::from_html("<button>go</button>").unwrap();
            let id = document.first("button").unwrap();
            document.on_click(id, |tree, target| {
                tree.defer(move |tree| tree.toggle_class(target, "pressed", true));
            });
            let button = document.element(id);
            button.click().await.unwrap();
            assert!(button.has_class("pressed").await.unwrap());
            assert_eq!(document.stabilize_count(), 0);
        }
    }
}
