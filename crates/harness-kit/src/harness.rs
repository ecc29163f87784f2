//! The component harness contract.
//!
//! A harness wraps exactly one host element and exposes a semantic API over
//! it. Concrete harnesses implement [`ComponentHarness`] (usually through
//! `#[derive(ComponentHarness)]`) and pick the capability traits they need
//! instead of inheriting from a base class:
//!
//! - [`HasText`]: text of the host
//! - [`HasCheckedState`]: checked / toggle semantics
//! - [`HasDisabledState`]: disabled flag
//! - [`ContentContainer`]: loads harnesses projected into the component
//!
//! [`HostAttributes`] is implemented for every harness and centralizes the
//! "empty attribute means no value" coercion.

use crate::element::Element;
use crate::loader::HarnessLoader;
use crate::locator::LocatorFactory;
use crate::predicate::{BaseHarnessFilters, HarnessPredicate};
use crate::result::HarnessResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// A typed wrapper around one host element.
///
/// Implementations are stateless: every getter reads the live tree through
/// the host handle or a freshly resolved locator.
pub trait ComponentHarness: Sized + Send + Sync + 'static {
    /// Selector (or comma-separated alternatives) identifying host elements
    const HOST_SELECTOR: &'static str;

    /// Selector an ancestor of the host must match, if any
    const ANCESTOR_SELECTOR: Option<&'static str> = None;

    /// Bind a harness to the factory rooted at its host element
    fn from_locator_factory(factory: LocatorFactory) -> Self;

    /// Factory rooted at the host element
    fn locator_factory(&self) -> &LocatorFactory;

    /// The host element
    fn host(&self) -> Element {
        self.locator_factory().root_element()
    }

    /// Unfiltered query for this harness type
    fn query() -> HarnessPredicate<Self> {
        HarnessPredicate::new(BaseHarnessFilters::default())
    }

    /// Query constrained only by the base filters
    fn with_base(filters: BaseHarnessFilters) -> HarnessPredicate<Self> {
        HarnessPredicate::new(filters)
    }

    /// Short type name used in descriptions
    fn harness_name() -> &'static str {
        short_type_name::<Self>()
    }
}

/// Last path segment of a type name, generics stripped
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Treat an empty value as missing
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Attribute helpers available on every harness
#[async_trait]
pub trait HostAttributes: ComponentHarness {
    /// Host attribute, `None` when absent or empty
    async fn host_attribute(&self, name: &str) -> HarnessResult<Option<String>> {
        Ok(non_empty(self.host().attribute(name).await?))
    }

    /// Host `id`, `None` when absent or empty
    async fn host_id(&self) -> HarnessResult<Option<String>> {
        self.host_attribute("id").await
    }

    /// Host `aria-label`, `None` when absent or empty
    async fn aria_label(&self) -> HarnessResult<Option<String>> {
        self.host_attribute("aria-label").await
    }

    /// Whether the host carries a `disabled` attribute or `aria-disabled="true"`
    async fn host_disabled(&self) -> HarnessResult<bool> {
        let host = self.host();
        if host.attribute("disabled").await?.is_some() {
            return Ok(true);
        }
        Ok(host.attribute("aria-disabled").await?.as_deref() == Some("true"))
    }

    /// Live host property deserialized into `T`; a value of the wrong shape
    /// fails with [`HarnessError::Json`](crate::HarnessError::Json)
    async fn host_property<T: DeserializeOwned>(&self, name: &str) -> HarnessResult<T> {
        let value = self.host().property(name).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<H: ComponentHarness> HostAttributes for H {}

/// Harnesses whose meaningful text is the host text
#[async_trait]
pub trait HasText: ComponentHarness {
    /// Rendered text
    async fn text(&self) -> HarnessResult<String> {
        self.host().text().await
    }
}

/// Toggle-like harnesses
#[async_trait]
pub trait HasCheckedState: ComponentHarness {
    /// Current checked state
    async fn is_checked(&self) -> HarnessResult<bool>;

    /// Flip the checked state
    async fn toggle(&self) -> HarnessResult<()>;

    /// Ensure checked, toggling only if needed
    async fn check(&self) -> HarnessResult<()> {
        if !self.is_checked().await? {
            self.toggle().await?;
        }
        Ok(())
    }

    /// Ensure unchecked, toggling only if needed
    async fn uncheck(&self) -> HarnessResult<()> {
        if self.is_checked().await? {
            self.toggle().await?;
        }
        Ok(())
    }
}

/// Harnesses that can be disabled
#[async_trait]
pub trait HasDisabledState: ComponentHarness {
    /// Whether the component is disabled
    async fn is_disabled(&self) -> HarnessResult<bool> {
        self.host_disabled().await
    }
}

/// Harnesses that host arbitrary child content
#[async_trait]
pub trait ContentContainer: ComponentHarness {
    /// Loader rooted where child content lives; the host by default
    async fn root_harness_loader(&self) -> HarnessResult<HarnessLoader> {
        Ok(self.locator_factory().root_harness_loader())
    }

    /// Loader rooted at the first element matching `selector` inside the content
    async fn child_loader(&self, selector: &str) -> HarnessResult<HarnessLoader> {
        self.root_harness_loader()
            .await?
            .get_child_loader(selector)
            .await
    }

    /// Loaders for every element matching `selector` inside the content
    async fn all_child_loaders(&self, selector: &str) -> HarnessResult<Vec<HarnessLoader>> {
        self.root_harness_loader()
            .await?
            .get_all_child_loaders(selector)
            .await
    }

    /// First harness in the content matching `query`
    async fn get_harness<T: ComponentHarness>(&self, query: HarnessPredicate<T>) -> HarnessResult<T> {
        self.root_harness_loader().await?.get_harness(query).await
    }

    /// First harness in the content matching `query`, if any
    async fn get_harness_or_none<T: ComponentHarness>(
        &self,
        query: HarnessPredicate<T>,
    ) -> HarnessResult<Option<T>> {
        self.root_harness_loader()
            .await?
            .get_harness_or_none(query)
            .await
    }

    /// Every harness in the content matching `query`
    async fn get_all_harnesses<T: ComponentHarness>(
        &self,
        query: HarnessPredicate<T>,
    ) -> HarnessResult<Vec<T>> {
        self.root_harness_loader()
            .await?
            .get_all_harnesses(query)
            .await
    }

    /// Whether the content holds a harness matching `query`
    async fn has_harness<T: ComponentHarness>(&self, query: HarnessPredicate<T>) -> HarnessResult<bool> {
        self.root_harness_loader().await?.has_harness(query).await
    }
}
