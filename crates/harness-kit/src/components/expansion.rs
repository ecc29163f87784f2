//! Expansion panel and accordion harnesses.

use crate::element::Element;
use crate::harness::{non_empty, ContentContainer, HasDisabledState};
use crate::loader::HarnessLoader;
use crate::locator::LocatorFactory;
use crate::pattern::TextPattern;
use crate::predicate::{BaseHarnessFilters, HarnessPredicate};
use crate::result::HarnessResult;
use crate::ComponentHarness;
use async_trait::async_trait;
use futures::FutureExt;

const HEADER: &str = ".ui-expansion-panel-header";
const CONTENT: &str = ".ui-expansion-panel-content";

/// Filters for [`ExpansionPanelHarness::with`]
#[derive(Debug, Clone, Default)]
pub struct ExpansionPanelFilters {
    /// Host must also match this selector
    pub selector: Option<String>,
    /// Host must sit under an element matching this selector
    pub ancestor: Option<String>,
    /// Header title
    pub title: Option<TextPattern>,
    /// Header description
    pub description: Option<TextPattern>,
    /// Text of the panel body
    pub content: Option<TextPattern>,
    /// Expanded state
    pub expanded: Option<bool>,
    /// Disabled state
    pub disabled: Option<bool>,
}

/// Harness for `.ui-expansion-panel`.
///
/// The header (`.ui-expansion-panel-header`) holds an optional title,
/// description and toggle indicator; the body lives in
/// `.ui-expansion-panel-content`. Expansion is signalled by the
/// `ui-expanded` class on the host.
#[derive(Debug, Clone, ComponentHarness)]
#[harness(host = ".ui-expansion-panel")]
pub struct ExpansionPanelHarness {
    factory: LocatorFactory,
}

impl ExpansionPanelHarness {
    /// Query for panels matching `filters`
    #[must_use]
    pub fn with(filters: ExpansionPanelFilters) -> HarnessPredicate<Self> {
        HarnessPredicate::new(BaseHarnessFilters {
            selector: filters.selector,
            ancestor: filters.ancestor,
        })
        .add_option("title", filters.title, |harness: &Self, title| {
            async move { Ok(title.matches(harness.get_title().await?.as_deref())) }.boxed()
        })
        .add_option("description", filters.description, |harness: &Self, description| {
            async move { Ok(description.matches(harness.get_description().await?.as_deref())) }
                .boxed()
        })
        .add_option("content", filters.content, |harness: &Self, content| {
            async move { Ok(content.matches(Some(&harness.get_text_content().await?))) }.boxed()
        })
        .add_option("expanded", filters.expanded, |harness: &Self, expanded| {
            async move { Ok(harness.is_expanded().await? == expanded) }.boxed()
        })
        .add_option("disabled", filters.disabled, |harness: &Self, disabled| {
            async move { Ok(harness.is_disabled().await? == disabled) }.boxed()
        })
    }

    async fn header(&self) -> HarnessResult<Element> {
        self.factory.locator_for(HEADER).resolve().await
    }

    async fn optional_text(&self, selector: &str) -> HarnessResult<Option<String>> {
        match self.factory.locator_for_optional(selector).resolve().await? {
            Some(element) => Ok(non_empty(Some(element.text().await?))),
            None => Ok(None),
        }
    }

    /// Whether the panel is expanded
    pub async fn is_expanded(&self) -> HarnessResult<bool> {
        self.host().has_class("ui-expanded").await
    }

    /// Header title, `None` when not rendered or empty
    pub async fn get_title(&self) -> HarnessResult<Option<String>> {
        self.optional_text(".ui-expansion-panel-title").await
    }

    /// Header description, `None` when not rendered or empty
    pub async fn get_description(&self) -> HarnessResult<Option<String>> {
        self.optional_text(".ui-expansion-panel-description").await
    }

    /// Text of the panel body
    pub async fn get_text_content(&self) -> HarnessResult<String> {
        self.factory.locator_for(CONTENT).resolve().await?.text().await
    }

    /// Whether the header shows a toggle indicator
    pub async fn has_toggle_indicator(&self) -> HarnessResult<bool> {
        Ok(self
            .factory
            .locator_for_optional(".ui-expansion-indicator")
            .resolve()
            .await?
            .is_some())
    }

    /// Click the header
    pub async fn toggle(&self) -> HarnessResult<()> {
        self.header().await?.click().await
    }

    /// Expand if collapsed
    pub async fn expand(&self) -> HarnessResult<()> {
        if !self.is_expanded().await? {
            self.toggle().await?;
        }
        Ok(())
    }

    /// Collapse if expanded
    pub async fn collapse(&self) -> HarnessResult<()> {
        if self.is_expanded().await? {
            self.toggle().await?;
        }
        Ok(())
    }

    /// Focus the header
    pub async fn focus(&self) -> HarnessResult<()> {
        self.header().await?.focus().await
    }

    /// Blur the header
    pub async fn blur(&self) -> HarnessResult<()> {
        self.header().await?.blur().await
    }

    /// Whether the header has focus
    pub async fn is_focused(&self) -> HarnessResult<bool> {
        self.header().await?.is_focused().await
    }
}

#[async_trait]
impl HasDisabledState for ExpansionPanelHarness {
    async fn is_disabled(&self) -> HarnessResult<bool> {
        Ok(self.header().await?.attribute("aria-disabled").await?.as_deref() == Some("true"))
    }
}

#[async_trait]
impl ContentContainer for ExpansionPanelHarness {
    async fn root_harness_loader(&self) -> HarnessResult<HarnessLoader> {
        self.factory.harness_loader_for(CONTENT).await
    }
}

/// Filters for [`AccordionHarness::with`]
#[derive(Debug, Clone, Default)]
pub struct AccordionFilters {
    /// Host must also match this selector
    pub selector: Option<String>,
    /// Host must sit under an element matching this selector
    pub ancestor: Option<String>,
}

/// Harness for `.ui-accordion`
#[derive(Debug, Clone, ComponentHarness)]
#[harness(host = ".ui-accordion")]
pub struct AccordionHarness {
    factory: LocatorFactory,
}

impl AccordionHarness {
    /// Query for accordions matching `filters`
    #[must_use]
    pub fn with(filters: AccordionFilters) -> HarnessPredicate<Self> {
        Self::with_base(BaseHarnessFilters {
            selector: filters.selector,
            ancestor: filters.ancestor,
        })
    }

    /// Panels inside this accordion
    pub async fn get_expansion_panels(
        &self,
        filters: ExpansionPanelFilters,
    ) -> HarnessResult<Vec<ExpansionPanelHarness>> {
        self.factory
            .locator_for_all(ExpansionPanelHarness::with(filters))
            .resolve()
            .await
    }

    /// Whether several panels may be open at once
    pub async fn is_multi(&self) -> HarnessResult<bool> {
        self.host().has_class("ui-accordion-multi").await
    }
}
