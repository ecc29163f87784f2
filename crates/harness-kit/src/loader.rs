//! Entry point for test code.
//!
//! A [`HarnessLoader`] is rooted at one element (the document root for the
//! top-level loader) and loads harnesses and child loaders beneath it.

use crate::element::{Element, HarnessEnvironment};
use crate::harness::ComponentHarness;
use crate::locator::{LocatorFactory, LocatorOptions, LocatorTarget};
use crate::predicate::HarnessPredicate;
use crate::result::{HarnessError, HarnessResult};
use std::sync::Arc;
use tracing::debug;

/// Loads harnesses under one root element
#[derive(Debug, Clone)]
pub struct HarnessLoader {
    factory: LocatorFactory,
}

impl HarnessLoader {
    /// Loader for the whole document of `environment`
    #[must_use]
    pub fn new(environment: Arc<dyn HarnessEnvironment>) -> Self {
        Self::with_options(environment, LocatorOptions::default())
    }

    /// Loader for the whole document with custom locator options
    #[must_use]
    pub fn with_options(environment: Arc<dyn HarnessEnvironment>, options: LocatorOptions) -> Self {
        Self::from_factory(LocatorFactory::for_document(environment, options))
    }

    /// Loader sharing a factory's root and options
    #[must_use]
    pub const fn from_factory(factory: LocatorFactory) -> Self {
        Self { factory }
    }

    /// Factory rooted where this loader is rooted
    #[must_use]
    pub const fn locator_factory(&self) -> &LocatorFactory {
        &self.factory
    }

    /// Root element of this loader
    #[must_use]
    pub fn root_element(&self) -> Element {
        self.factory.root_element()
    }

    /// Loader rooted at the first element matching `selector`
    pub async fn get_child_loader(&self, selector: &str) -> HarnessResult<Self> {
        self.factory.harness_loader_for(selector).await
    }

    /// Loaders rooted at every element matching `selector`
    pub async fn get_all_child_loaders(&self, selector: &str) -> HarnessResult<Vec<Self>> {
        self.factory.harness_loader_for_all(selector).await
    }

    /// First harness matching `query`
    pub async fn get_harness<H: ComponentHarness>(&self, query: HarnessPredicate<H>) -> HarnessResult<H> {
        self.factory.locator_for(query).resolve().await
    }

    /// First harness matching `query`, or `None`
    pub async fn get_harness_or_none<H: ComponentHarness>(
        &self,
        query: HarnessPredicate<H>,
    ) -> HarnessResult<Option<H>> {
        self.factory.locator_for_optional(query).resolve().await
    }

    /// The `index`-th harness matching `query`, in document order
    pub async fn get_harness_at_index<H: ComponentHarness>(
        &self,
        query: HarnessPredicate<H>,
        index: usize,
    ) -> HarnessResult<H> {
        let description = query.describe();
        let all = self.get_all_harnesses(query).await?;
        let count = all.len();
        if count == 0 {
            return Err(HarnessError::not_found(description));
        }
        all.into_iter()
            .nth(index)
            .ok_or(HarnessError::IndexOutOfRange {
                index,
                count,
                query: description,
            })
    }

    /// Every harness matching `query`, in document order
    pub async fn get_all_harnesses<H: ComponentHarness>(
        &self,
        query: HarnessPredicate<H>,
    ) -> HarnessResult<Vec<H>> {
        let found = self.factory.locator_for_all(query).resolve().await?;
        debug!(harness = H::harness_name(), count = found.len(), "loaded harnesses");
        Ok(found)
    }

    /// Number of harnesses matching `query`
    pub async fn count_harnesses<H: ComponentHarness>(&self, query: HarnessPredicate<H>) -> HarnessResult<usize> {
        Ok(self.get_all_harnesses(query).await?.len())
    }

    /// Whether any harness matches `query`
    pub async fn has_harness<H: ComponentHarness>(&self, query: HarnessPredicate<H>) -> HarnessResult<bool> {
        Ok(self.get_harness_or_none(query).await?.is_some())
    }
}
