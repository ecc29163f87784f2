//! Toolbar harness.

use crate::harness::{ContentContainer, HasText};
use crate::locator::LocatorFactory;
use crate::parallel::parallel;
use crate::pattern::TextPattern;
use crate::predicate::{BaseHarnessFilters, HarnessPredicate};
use crate::result::HarnessResult;
use crate::ComponentHarness;
use futures::FutureExt;

/// Filters for [`ToolbarHarness::with`]
#[derive(Debug, Clone, Default)]
pub struct ToolbarFilters {
    /// Host must also match this selector
    pub selector: Option<String>,
    /// Host must sit under an element matching this selector
    pub ancestor: Option<String>,
    /// Full toolbar text
    pub text: Option<TextPattern>,
}

/// Harness for `.ui-toolbar`
#[derive(Debug, Clone, ComponentHarness)]
#[harness(host = ".ui-toolbar")]
pub struct ToolbarHarness {
    factory: LocatorFactory,
}

impl ToolbarHarness {
    /// Query for toolbars matching `filters`
    #[must_use]
    pub fn with(filters: ToolbarFilters) -> HarnessPredicate<Self> {
        HarnessPredicate::new(BaseHarnessFilters {
            selector: filters.selector,
            ancestor: filters.ancestor,
        })
        .add_option("text", filters.text, |harness: &Self, text| {
            async move { Ok(text.matches(Some(&harness.text().await?))) }.boxed()
        })
    }

    /// Whether the toolbar lays its content out in explicit rows
    pub async fn has_multiple_rows(&self) -> HarnessResult<bool> {
        self.host().has_class("ui-toolbar-multiple-rows").await
    }

    /// Text of each row; a single-row toolbar yields its whole text
    pub async fn get_row_as_text(&self) -> HarnessResult<Vec<String>> {
        if self.has_multiple_rows().await? {
            let rows = self
                .factory
                .locator_for_all(".ui-toolbar-row")
                .resolve()
                .await?;
            parallel(rows.iter().map(|row| row.text())).await
        } else {
            Ok(vec![self.host().text().await?])
        }
    }
}

impl HasText for ToolbarHarness {}

impl ContentContainer for ToolbarHarness {}
