//! Lazy locators.
//!
//! # Design Philosophy
//!
//! - **Lazy**: `locator_for*` only records *what* to find. Nothing touches the
//!   tree until `resolve()` is awaited, and every `resolve()` queries again.
//! - **Settled reads**: the environment is stabilized before each query.
//! - **First match by default**: a required locator returns the first match in
//!   document order; `.strict(true)` turns extra matches into an error.

use crate::element::{Element, HarnessEnvironment};
use crate::harness::ComponentHarness;
use crate::loader::HarnessLoader;
use crate::predicate::HarnessPredicate;
use crate::result::{HarnessError, HarnessResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Locator options for customizing behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    /// Required locators fail when more than one element matches
    pub strict: bool,
    /// Stabilize the environment before querying
    pub stabilize: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            strict: false,
            stabilize: true,
        }
    }
}

impl LocatorOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict single-match mode
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set whether to stabilize before querying
    #[must_use]
    pub const fn with_stabilize(mut self, stabilize: bool) -> Self {
        self.stabilize = stabilize;
        self
    }
}

/// Something a locator can search for
#[async_trait]
pub trait LocatorTarget: Send + Sync {
    /// What a match produces
    type Output: Send;

    /// Description used in error messages
    fn describe(&self) -> String;

    /// All matches under the factory's root, in document order
    async fn find_all(&self, factory: &LocatorFactory) -> HarnessResult<Vec<Self::Output>>;
}

/// Raw selector query yielding elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementQuery {
    selector: String,
}

impl ElementQuery {
    /// Create a query for a selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// The selector
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

#[async_trait]
impl LocatorTarget for ElementQuery {
    type Output = Element;

    fn describe(&self) -> String {
        format!("\"{}\"", self.selector)
    }

    async fn find_all(&self, factory: &LocatorFactory) -> HarnessResult<Vec<Element>> {
        factory.root.query_all(&self.selector).await
    }
}

#[async_trait]
impl<H: ComponentHarness> LocatorTarget for HarnessPredicate<H> {
    type Output = H;

    fn describe(&self) -> String {
        self.description()
    }

    async fn find_all(&self, factory: &LocatorFactory) -> HarnessResult<Vec<H>> {
        let selector = self.selector()?;
        let candidates: Vec<H> = factory
            .root
            .query_all(&selector)
            .await?
            .into_iter()
            .map(|element| H::from_locator_factory(factory.child(element)))
            .collect();
        self.filter(candidates).await
    }
}

/// Conversion into a [`LocatorTarget`]: selectors and harness predicates
pub trait IntoLocatorTarget {
    /// The resulting target
    type Target: LocatorTarget;

    /// Convert
    fn into_target(self) -> Self::Target;
}

impl IntoLocatorTarget for &str {
    type Target = ElementQuery;

    fn into_target(self) -> ElementQuery {
        ElementQuery::new(self)
    }
}

impl IntoLocatorTarget for String {
    type Target = ElementQuery;

    fn into_target(self) -> ElementQuery {
        ElementQuery::new(self)
    }
}

impl IntoLocatorTarget for ElementQuery {
    type Target = Self;

    fn into_target(self) -> Self {
        self
    }
}

impl<H: ComponentHarness> IntoLocatorTarget for HarnessPredicate<H> {
    type Target = Self;

    fn into_target(self) -> Self {
        self
    }
}

/// Creates locators relative to one root element
#[derive(Clone)]
pub struct LocatorFactory {
    environment: Arc<dyn HarnessEnvironment>,
    root: Element,
    options: LocatorOptions,
}

impl fmt::Debug for LocatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatorFactory")
            .field("root", &self.root.id())
            .field("options", &self.options)
            .finish()
    }
}

impl LocatorFactory {
    /// Create a factory rooted at `root`
    #[must_use]
    pub fn new(environment: Arc<dyn HarnessEnvironment>, root: Element, options: LocatorOptions) -> Self {
        Self {
            environment,
            root,
            options,
        }
    }

    /// Create a factory rooted at the environment's document root
    #[must_use]
    pub fn for_document(environment: Arc<dyn HarnessEnvironment>, options: LocatorOptions) -> Self {
        let root = environment.document_root();
        Self::new(environment, root, options)
    }

    /// Same environment and options, different root
    #[must_use]
    pub fn child(&self, root: Element) -> Self {
        Self::new(Arc::clone(&self.environment), root, self.options)
    }

    /// The root element
    #[must_use]
    pub fn root_element(&self) -> Element {
        Arc::clone(&self.root)
    }

    /// The environment
    #[must_use]
    pub fn environment(&self) -> &Arc<dyn HarnessEnvironment> {
        &self.environment
    }

    /// Options inherited by locators created here
    #[must_use]
    pub const fn options(&self) -> LocatorOptions {
        self.options
    }

    /// Replace the inherited options
    #[must_use]
    pub fn with_options(mut self, options: LocatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Factory rooted at the document root instead of this element
    #[must_use]
    pub fn document_root_locator_factory(&self) -> Self {
        self.child(self.environment.document_root())
    }

    /// Wait for pending rendering work to settle
    pub async fn stabilize(&self) -> HarnessResult<()> {
        self.environment.stabilize().await
    }

    /// Locator that must find a match
    #[must_use]
    pub fn locator_for<Q: IntoLocatorTarget>(&self, query: Q) -> RequiredLocator<Q::Target> {
        RequiredLocator {
            core: LocatorCore::new(self.clone(), query.into_target()),
        }
    }

    /// Locator that yields `None` when nothing matches
    #[must_use]
    pub fn locator_for_optional<Q: IntoLocatorTarget>(&self, query: Q) -> OptionalLocator<Q::Target> {
        OptionalLocator {
            core: LocatorCore::new(self.clone(), query.into_target()),
        }
    }

    /// Locator that yields every match
    #[must_use]
    pub fn locator_for_all<Q: IntoLocatorTarget>(&self, query: Q) -> AllLocator<Q::Target> {
        AllLocator {
            core: LocatorCore::new(self.clone(), query.into_target()),
        }
    }

    /// Loader rooted at this factory's root
    #[must_use]
    pub fn root_harness_loader(&self) -> HarnessLoader {
        HarnessLoader::from_factory(self.clone())
    }

    /// Loader rooted at the first element matching `selector`
    pub async fn harness_loader_for(&self, selector: &str) -> HarnessResult<HarnessLoader> {
        let element = self.locator_for(selector).resolve().await?;
        Ok(HarnessLoader::from_factory(self.child(element)))
    }

    /// Loader rooted at the first element matching `selector`, if any
    pub async fn harness_loader_for_optional(&self, selector: &str) -> HarnessResult<Option<HarnessLoader>> {
        let element = self.locator_for_optional(selector).resolve().await?;
        Ok(element.map(|element| HarnessLoader::from_factory(self.child(element))))
    }

    /// Loaders rooted at every element matching `selector`
    pub async fn harness_loader_for_all(&self, selector: &str) -> HarnessResult<Vec<HarnessLoader>> {
        let elements = self.locator_for_all(selector).resolve().await?;
        Ok(elements
            .into_iter()
            .map(|element| HarnessLoader::from_factory(self.child(element)))
            .collect())
    }
}

#[derive(Debug, Clone)]
struct LocatorCore<T> {
    factory: LocatorFactory,
    target: T,
    options: LocatorOptions,
}

impl<T: LocatorTarget> LocatorCore<T> {
    fn new(factory: LocatorFactory, target: T) -> Self {
        let options = factory.options;
        Self {
            factory,
            target,
            options,
        }
    }

    async fn resolve_all(&self) -> HarnessResult<Vec<T::Output>> {
        if self.options.stabilize {
            self.factory.stabilize().await?;
        }
        let found = self.target.find_all(&self.factory).await?;
        debug!(
            root = %self.factory.root.id(),
            query = %self.target.describe(),
            matches = found.len(),
            "resolved locator"
        );
        Ok(found)
    }
}

/// Locator that fails when nothing matches
#[derive(Debug, Clone)]
pub struct RequiredLocator<T> {
    core: LocatorCore<T>,
}

impl<T: LocatorTarget> RequiredLocator<T> {
    /// Require exactly one match
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.core.options.strict = strict;
        self
    }

    /// Skip stabilization before the query
    #[must_use]
    pub fn stabilize(mut self, stabilize: bool) -> Self {
        self.core.options.stabilize = stabilize;
        self
    }

    /// Query the tree now
    pub async fn resolve(&self) -> HarnessResult<T::Output> {
        let found = self.core.resolve_all().await?;
        if self.core.options.strict && found.len() > 1 {
            return Err(HarnessError::AmbiguousMatch {
                query: self.core.target.describe(),
                count: found.len(),
            });
        }
        found
            .into_iter()
            .next()
            .ok_or_else(|| HarnessError::not_found(self.core.target.describe()))
    }
}

/// Locator that yields `None` when nothing matches
#[derive(Debug, Clone)]
pub struct OptionalLocator<T> {
    core: LocatorCore<T>,
}

impl<T: LocatorTarget> OptionalLocator<T> {
    /// Skip stabilization before the query
    #[must_use]
    pub fn stabilize(mut self, stabilize: bool) -> Self {
        self.core.options.stabilize = stabilize;
        self
    }

    /// Query the tree now
    pub async fn resolve(&self) -> HarnessResult<Option<T::Output>> {
        Ok(self.core.resolve_all().await?.into_iter().next())
    }
}

/// Locator that yields every match
#[derive(Debug, Clone)]
pub struct AllLocator<T> {
    core: LocatorCore<T>,
}

impl<T: LocatorTarget> AllLocator<T> {
    /// Skip stabilization before the query
    #[must_use]
    pub fn stabilize(mut self, stabilize: bool) -> Self {
        self.core.options.stabilize = stabilize;
        self
    }

    /// Query the tree now
    pub async fn resolve(&self) -> HarnessResult<Vec<T::Output>> {
        self.core.resolve_all().await
    }
}
