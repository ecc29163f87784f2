//! Arena-backed UI tree for tests.

use crate::element::{Dimensions, ElementId};
use crate::event::{KeyInput, SpecialKey};
use crate::result::{HarnessError, HarnessResult};
use crate::testing::css::SelectorList;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Hands out node ids for one tree
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Start at id 0
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Next unused id
    pub fn allocate(&mut self) -> ElementId {
        let id = ElementId::new(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next
    }
}

/// Detached description of a subtree, inserted with [`MockTree::append`]
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    kind: MockNodeKind,
}

#[derive(Debug, Clone, PartialEq)]
enum MockNodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        properties: Vec<(String, Value)>,
        dimensions: Option<Dimensions>,
        children: Vec<MockNode>,
    },
    Text(String),
}

impl MockNode {
    /// Element with the given tag
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: MockNodeKind::Element {
                tag: tag.into().to_ascii_lowercase(),
                attributes: Vec::new(),
                properties: Vec::new(),
                dimensions: None,
                children: Vec::new(),
            },
        }
    }

    /// Bare text node
    #[must_use]
    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            kind: MockNodeKind::Text(text.into()),
        }
    }

    /// Set an attribute, replacing any previous value
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let MockNodeKind::Element { attributes, .. } = &mut self.kind {
            set_attr(attributes, name.into(), value.into());
        }
        self
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if let MockNodeKind::Element { attributes, .. } = &mut self.kind {
            let current = get_attr(attributes, "class").unwrap_or_default().to_string();
            let joined = if current.is_empty() {
                class.to_string()
            } else {
                format!("{current} {class}")
            };
            set_attr(attributes, "class".to_string(), joined);
        }
        self
    }

    /// Set a live property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let MockNodeKind::Element { properties, .. } = &mut self.kind {
            properties.push((name.into(), value.into()));
        }
        self
    }

    /// Set the rendered box
    #[must_use]
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        if let MockNodeKind::Element { dimensions, .. } = &mut self.kind {
            *dimensions = Some(dims);
        }
        self
    }

    /// Append a child node
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.push_child(child);
        self
    }

    /// Append a text child
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Self::text_node(text))
    }

    pub(crate) fn push_child(&mut self, child: Self) {
        if let MockNodeKind::Element { children, .. } = &mut self.kind {
            children.push(child);
        }
    }

    pub(crate) fn tag(&self) -> Option<&str> {
        match &self.kind {
            MockNodeKind::Element { tag, .. } => Some(tag),
            MockNodeKind::Text(_) => None,
        }
    }
}

fn get_attr<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn set_attr(attributes: &mut Vec<(String, String)>, name: String, value: String) {
    match attributes.iter_mut().find(|(key, _)| *key == name) {
        Some(slot) => slot.1 = value,
        None => attributes.push((name, value)),
    }
}

/// Something that happened to the tree through simulated input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    /// Element was clicked
    Click(ElementId),
    /// Element gained focus
    Focus(ElementId),
    /// Element lost focus
    Blur(ElementId),
    /// A key was pressed while the element had focus
    KeyDown {
        /// Focused element
        target: ElementId,
        /// DOM key name
        key: String,
    },
    /// The element's value changed from typing
    Input {
        /// Edited element
        target: ElementId,
        /// New value
        value: String,
    },
}

/// Click listener: receives the tree and the clicked element
pub type ClickHandler = Arc<dyn Fn(&mut MockTree, ElementId) + Send + Sync>;

type DeferredTask = Box<dyn FnOnce(&mut MockTree) + Send>;

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    properties: HashMap<String, Value>,
    dimensions: Dimensions,
}

#[derive(Debug, Clone)]
struct TreeNode {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: NodeData,
}

/// In-memory UI tree
pub struct MockTree {
    nodes: HashMap<ElementId, TreeNode>,
    root: ElementId,
    ids: IdAllocator,
    focused: Option<ElementId>,
    events: Vec<RecordedEvent>,
    handlers: HashMap<ElementId, Vec<ClickHandler>>,
    pending: VecDeque<DeferredTask>,
}

impl fmt::Debug for MockTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("focused", &self.focused)
            .field("events", &self.events.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Default for MockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTree {
    /// Empty tree holding only the document node
    #[must_use]
    pub fn new() -> Self {
        let mut ids = IdAllocator::new();
        let root = ids.allocate();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            TreeNode {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            },
        );
        Self {
            nodes,
            root,
            ids,
            focused: None,
            events: Vec::new(),
            handlers: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// The document node
    #[must_use]
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Whether `id` is still part of the tree
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, document and text nodes included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the document node is left
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Insert a subtree as the last child of `parent`
    pub fn append(&mut self, parent: ElementId, node: MockNode) -> ElementId {
        let id = self.ids.allocate();
        let (data, children) = match node.kind {
            MockNodeKind::Text(text) => (NodeData::Text(text), Vec::new()),
            MockNodeKind::Element {
                tag,
                attributes,
                properties,
                dimensions,
                children,
            } => (
                NodeData::Element(ElementData {
                    tag,
                    attributes,
                    properties: properties.into_iter().collect(),
                    dimensions: dimensions.unwrap_or_default(),
                }),
                children,
            ),
        };
        self.nodes.insert(
            id,
            TreeNode {
                parent: Some(parent),
                children: Vec::new(),
                data,
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        for child in children {
            self.append(id, child);
        }
        id
    }

    /// Remove a node and its subtree. The document node cannot be removed.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root {
            return;
        }
        let Some(parent) = self.nodes.get(&id).map(|node| node.parent) else {
            return;
        };
        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.retain(|child| *child != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
            self.handlers.remove(&current);
            if self.focused == Some(current) {
                self.focused = None;
            }
        }
    }

    /// Parent node, document included
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Parent, if it is an element
    #[must_use]
    pub fn parent_element(&self, id: ElementId) -> Option<ElementId> {
        self.parent(id).filter(|parent| self.is_element(*parent))
    }

    /// Child nodes in order
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(&id)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// Child elements in order
    #[must_use]
    pub fn element_children(&self, id: ElementId) -> Vec<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Whether `id` is an element node
    #[must_use]
    pub fn is_element(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    fn element(&self, id: ElementId) -> Option<&ElementData> {
        match &self.nodes.get(&id)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Document | NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(&id)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Document | NodeData::Text(_) => None,
        }
    }

    /// Lowercase tag name of an element
    #[must_use]
    pub fn tag_name(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    /// Short label for logs and errors, like `#4 <button>`
    #[must_use]
    pub fn describe(&self, id: ElementId) -> String {
        match self.nodes.get(&id).map(|node| &node.data) {
            Some(NodeData::Element(element)) => format!("{id} <{}>", element.tag),
            Some(NodeData::Document) => format!("{id} (document)"),
            Some(NodeData::Text(_)) => format!("{id} (text)"),
            None => id.to_string(),
        }
    }

    /// Static attribute value
    #[must_use]
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|element| get_attr(&element.attributes, name))
    }

    /// Set a static attribute
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            set_attr(&mut element.attributes, name.to_string(), value.to_string());
        }
    }

    /// Remove a static attribute
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.retain(|(key, _)| key != name);
        }
    }

    /// Whether the element's class list holds `class`
    #[must_use]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Add or remove a class
    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) {
        let current: Vec<String> = self
            .attribute(id, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class)
            .map(ToString::to_string)
            .collect();
        let mut next = current;
        if on {
            next.push(class.to_string());
        }
        if next.is_empty() {
            self.remove_attribute(id, "class");
        } else {
            self.set_attribute(id, "class", &next.join(" "));
        }
    }

    /// Live property, falling back to the matching attribute for well-known names
    #[must_use]
    pub fn property(&self, id: ElementId, name: &str) -> Value {
        let Some(element) = self.element(id) else {
            return if name == "textContent" {
                Value::String(self.text(id))
            } else {
                Value::Null
            };
        };
        if let Some(value) = element.properties.get(name) {
            return value.clone();
        }
        match name {
            "checked" | "disabled" | "hidden" | "required" => {
                Value::Bool(get_attr(&element.attributes, name).is_some())
            }
            "value" | "id" | "name" | "type" => {
                Value::String(get_attr(&element.attributes, name).unwrap_or_default().to_string())
            }
            "tagName" => Value::String(element.tag.to_ascii_uppercase()),
            "textContent" => Value::String(self.text(id)),
            "className" => {
                Value::String(get_attr(&element.attributes, "class").unwrap_or_default().to_string())
            }
            _ => Value::Null,
        }
    }

    /// Live boolean property
    #[must_use]
    pub fn bool_property(&self, id: ElementId, name: &str) -> bool {
        self.property(id, name).as_bool().unwrap_or(false)
    }

    /// Set a live property
    pub fn set_property(&mut self, id: ElementId, name: &str, value: impl Into<Value>) {
        if let Some(element) = self.element_mut(id) {
            element.properties.insert(name.to_string(), value.into());
        }
    }

    /// Concatenated descendant text, untrimmed
    #[must_use]
    pub fn text(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if let NodeData::Text(text) = &node.data {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// Replace the children of `id` with one text node
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
        self.append(id, MockNode::text_node(text));
    }

    /// Rendered box
    #[must_use]
    pub fn dimensions(&self, id: ElementId) -> Dimensions {
        self.element(id)
            .map(|element| element.dimensions)
            .unwrap_or_default()
    }

    /// Set the rendered box
    pub fn set_dimensions(&mut self, id: ElementId, dims: Dimensions) {
        if let Some(element) = self.element_mut(id) {
            element.dimensions = dims;
        }
    }

    /// Currently focused element
    #[must_use]
    pub const fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Move focus, blurring the previous element
    pub fn focus(&mut self, id: ElementId) {
        if self.focused == Some(id) {
            return;
        }
        if let Some(previous) = self.focused.take() {
            self.events.push(RecordedEvent::Blur(previous));
        }
        self.focused = Some(id);
        self.events.push(RecordedEvent::Focus(id));
    }

    /// Drop focus if `id` holds it
    pub fn blur(&mut self, id: ElementId) {
        if self.focused == Some(id) {
            self.focused = None;
            self.events.push(RecordedEvent::Blur(id));
        }
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Forget recorded events
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Register a click listener on `id`; clicks on descendants bubble to it
    pub fn on_click(&mut self, id: ElementId, handler: ClickHandler) {
        self.handlers.entry(id).or_default().push(handler);
    }

    /// Queue work that runs on the next stabilization
    pub fn defer(&mut self, task: impl FnOnce(&mut Self) + Send + 'static) {
        self.pending.push_back(Box::new(task));
    }

    /// Number of queued tasks
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Run queued tasks until none are left.
    ///
    /// Tasks queued while flushing run in the next round. Returns the number
    /// of rounds, or `Unstable` once `max_rounds` is exceeded.
    pub fn flush_pending(&mut self, max_rounds: usize) -> HarnessResult<usize> {
        let mut rounds = 0;
        while !self.pending.is_empty() {
            if rounds == max_rounds {
                return Err(HarnessError::Unstable { rounds });
            }
            let batch: Vec<DeferredTask> = self.pending.drain(..).collect();
            for task in batch {
                task(self);
            }
            rounds += 1;
        }
        Ok(rounds)
    }

    /// Simulate a click with default actions and bubbling listeners.
    ///
    /// Disabled elements swallow the click.
    pub fn click(&mut self, id: ElementId) {
        if self.bool_property(id, "disabled") {
            debug!(element = %self.describe(id), "click ignored on disabled element");
            return;
        }
        self.focus(id);
        self.events.push(RecordedEvent::Click(id));
        if self.tag_name(id) == Some("input") {
            match self.attribute(id, "type") {
                Some("checkbox") => {
                    let checked = self.bool_property(id, "checked");
                    self.set_property(id, "checked", !checked);
                }
                Some("radio") => self.set_property(id, "checked", true),
                _ => {}
            }
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let listeners = self.handlers.get(&current).cloned().unwrap_or_default();
            for listener in listeners {
                listener(self, id);
            }
            cursor = self.parent(current);
        }
    }

    /// Focus `id` and type `keys` into its `value`
    pub fn type_keys(&mut self, id: ElementId, keys: &[KeyInput]) -> HarnessResult<()> {
        if self.bool_property(id, "disabled") {
            return Err(HarnessError::Interaction {
                element: self.describe(id),
                message: "cannot type into a disabled element".to_string(),
            });
        }
        self.focus(id);
        let mut value = self
            .property(id, "value")
            .as_str()
            .unwrap_or_default()
            .to_string();
        for key in keys {
            match key {
                KeyInput::Text(text) => {
                    for ch in text.chars() {
                        self.events.push(RecordedEvent::KeyDown {
                            target: id,
                            key: ch.to_string(),
                        });
                        value.push(ch);
                        self.events.push(RecordedEvent::Input {
                            target: id,
                            value: value.clone(),
                        });
                    }
                }
                KeyInput::Special { key, .. } => {
                    self.events.push(RecordedEvent::KeyDown {
                        target: id,
                        key: key.key_name().to_string(),
                    });
                    let edited = match key {
                        SpecialKey::Backspace => value.pop().is_some(),
                        SpecialKey::Space => {
                            value.push(' ');
                            true
                        }
                        _ => false,
                    };
                    if edited {
                        self.events.push(RecordedEvent::Input {
                            target: id,
                            value: value.clone(),
                        });
                    }
                }
            }
        }
        self.set_property(id, "value", value);
        Ok(())
    }

    /// Descendant elements of `scope` in document order
    #[must_use]
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        for child in self.children(scope) {
            self.collect_elements(*child, &mut out);
        }
        out
    }

    fn collect_elements(&self, id: ElementId, out: &mut Vec<ElementId>) {
        if self.is_element(id) {
            out.push(id);
        }
        for child in self.children(id) {
            self.collect_elements(*child, out);
        }
    }

    /// Descendants of `scope` matching `selector`, in document order
    pub fn query_all(&self, scope: ElementId, selector: &str) -> HarnessResult<Vec<ElementId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect())
    }

    /// First element in the document matching `selector`
    pub fn query(&self, selector: &str) -> HarnessResult<Option<ElementId>> {
        Ok(self.query_all(self.root, selector)?.into_iter().next())
    }

    /// Whether `id` matches `selector`
    pub fn matches(&self, id: ElementId, selector: &str) -> HarnessResult<bool> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.is_element(id) && selector.matches(self, id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn list_tree() -> (MockTree, ElementId) {
        let mut tree = MockTree::new();
        let root = tree.root();
        let list = tree.append(
            root,
            MockNode::element("ul")
                .child(MockNode::element("li").class("a").text("one"))
                .child(MockNode::element("li").text("two")),
        );
        (tree, list)
    }

    mod allocator_tests {
        use super::*;

        #[test]
        fn test_ids_are_sequential() {
            let mut ids = IdAllocator::new();
            assert_eq!(ids.allocate().get(), 0);
            assert_eq!(ids.allocate().get(), 1);
            assert_eq!(ids.allocated(), 2);
        }

        #[test]
        fn test_trees_do_not_share_counters() {
            let (first, _) = list_tree();
            let (second, _) = list_tree();
            assert_eq!(first.descendants(first.root()), second.descendants(second.root()));
        }
    }

    mod structure_tests {
        use super::*;

        #[test]
        fn test_append_and_text() {
            let (tree, list) = list_tree();
            assert_eq!(tree.element_children(list).len(), 2);
            assert_eq!(tree.text(list), "onetwo");
            assert_eq!(tree.tag_name(list), Some("ul"));
        }

        #[test]
        fn test_remove_detaches_subtree() {
            let (mut tree, list) = list_tree();
            let items = tree.element_children(list);
            tree.remove(list);
            assert!(!tree.contains(list));
            assert!(items.iter().all(|item| !tree.contains(*item)));
            assert!(tree.is_empty());
        }

        #[test]
        fn test_set_text_replaces_children() {
            let (mut tree, list) = list_tree();
            tree.set_text(list, "gone");
            assert_eq!(tree.text(list), "gone");
            assert!(tree.element_children(list).is_empty());
        }
    }

    mod attribute_tests {
        use super::*;

        #[test]
        fn test_toggle_class() {
            let (mut tree, list) = list_tree();
            tree.toggle_class(list, "open", true);
            assert!(tree.has_class(list, "open"));
            tree.toggle_class(list, "open", false);
            assert!(!tree.has_class(list, "open"));
            assert_eq!(tree.attribute(list, "class"), None);
        }

        #[test]
        fn test_property_falls_back_to_attribute() {
            let mut tree = MockTree::new();
            let root = tree.root();
            let input = tree.append(
                root,
                MockNode::element("input").attr("type", "checkbox").attr("checked", ""),
            );
            assert_eq!(tree.property(input, "checked"), Value::Bool(true));
            tree.set_property(input, "checked", false);
            assert_eq!(tree.property(input, "checked"), Value::Bool(false));
            assert_eq!(tree.attribute(input, "checked"), Some(""));
            assert_eq!(tree.property(input, "tagName"), Value::String("INPUT".into()));
            assert_eq!(tree.property(input, "unknown"), Value::Null);
        }
    }

    mod interaction_tests {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[test]
        fn test_checkbox_click_toggles_property() {
            let mut tree = MockTree::new();
            let root = tree.root();
            let input = tree.append(root, MockNode::element("input").attr("type", "checkbox"));
            tree.click(input);
            assert!(tree.bool_property(input, "checked"));
            tree.click(input);
            assert!(!tree.bool_property(input, "checked"));
            assert_eq!(tree.focused(), Some(input));
        }

        #[test]
        fn test_disabled_click_is_ignored() {
            let mut tree = MockTree::new();
            let root = tree.root();
            let input = tree.append(
                root,
                MockNode::element("input").attr("type", "checkbox").attr("disabled", ""),
            );
            tree.click(input);
            assert!(!tree.bool_property(input, "checked"));
            assert!(tree.events().is_empty());
        }

        #[test]
        fn test_click_bubbles_to_ancestors() {
            let (mut tree, list) = list_tree();
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&hits);
            tree.on_click(
                list,
                Arc::new(move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
            let item = tree.element_children(list)[1];
            tree.click(item);
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_type_keys_edits_value() {
            let mut tree = MockTree::new();
            let root = tree.root();
            let input = tree.append(root, MockNode::element("input").attr("value", "ab"));
            tree.type_keys(
                input,
                &[KeyInput::text("cd"), KeyInput::key(SpecialKey::Backspace)],
            )
            .unwrap();
            assert_eq!(tree.property(input, "value"), Value::String("abc".into()));
            assert!(tree
                .events()
                .contains(&RecordedEvent::KeyDown { target: input, key: "Backspace".into() }));
        }

        #[test]
        fn test_type_keys_rejects_disabled() {
            let mut tree = MockTree::new();
            let root = tree.root();
            let input = tree.append(root, MockNode::element("input").attr("disabled", ""));
            let err = tree.type_keys(input, &[KeyInput::text("x")]).unwrap_err();
            assert!(matches!(err, HarnessError::Interaction { .. }));
        }

        #[test]
        fn test_focus_moves_and_blurs_previous() {
            let (mut tree, list) = list_tree();
            let items = tree.element_children(list);
            tree.focus(items[0]);
            tree.focus(items[1]);
            assert_eq!(tree.focused(), Some(items[1]));
            assert!(tree.events().contains(&RecordedEvent::Blur(items[0])));
            tree.blur(items[0]);
            assert_eq!(tree.focused(), Some(items[1]));
        }
    }

    mod pending_tests {
        use super::*;

        #[test]
        fn test_flush_runs_follow_up_rounds() {
            let (mut tree, list) = list_tree();
            tree.defer(move |tree| {
                tree.toggle_class(list, "first", true);
                tree.defer(move |tree| tree.toggle_class(list, "second", true));
            });
            assert_eq!(tree.flush_pending(8).unwrap(), 2);
            assert!(tree.has_class(list, "second"));
            assert_eq!(tree.pending_tasks(), 0);
        }

        #[test]
        fn test_flush_gives_up_on_endless_work() {
            fn requeue(tree: &mut MockTree) {
                tree.defer(requeue);
            }
            let mut tree = MockTree::new();
            tree.defer(requeue);
            let err = tree.flush_pending(3).unwrap_err();
            assert!(matches!(err, HarnessError::Unstable { rounds: 3 }));
        }
    }
}
