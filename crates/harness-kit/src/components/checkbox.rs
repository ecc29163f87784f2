//! Checkbox harness.

use crate::element::Element;
use crate::harness::{non_empty, HasCheckedState, HasDisabledState, HostAttributes};
use crate::locator::{ElementQuery, LocatorFactory, OptionalLocator, RequiredLocator};
use crate::pattern::TextPattern;
use crate::predicate::{BaseHarnessFilters, HarnessPredicate};
use crate::result::HarnessResult;
use crate::ComponentHarness;
use async_trait::async_trait;
use futures::FutureExt;

/// Filters for [`CheckboxHarness::with`]
#[derive(Debug, Clone, Default)]
pub struct CheckboxFilters {
    /// Host must also match this selector
    pub selector: Option<String>,
    /// Host must sit under an element matching this selector
    pub ancestor: Option<String>,
    /// Label text
    pub label: Option<TextPattern>,
    /// `name` of the native input
    pub name: Option<TextPattern>,
    /// Checked state
    pub checked: Option<bool>,
    /// Disabled state
    pub disabled: Option<bool>,
}

/// Harness for `.ui-checkbox`.
///
/// Expected structure: a host wrapping a native `input[type=checkbox]` and an
/// optional `label`.
#[derive(Debug, Clone, ComponentHarness)]
#[harness(host = ".ui-checkbox")]
pub struct CheckboxHarness {
    factory: LocatorFactory,
}

impl CheckboxHarness {
    /// Query for checkboxes matching `filters`
    #[must_use]
    pub fn with(filters: CheckboxFilters) -> HarnessPredicate<Self> {
        HarnessPredicate::new(BaseHarnessFilters {
            selector: filters.selector,
            ancestor: filters.ancestor,
        })
        .add_option("label", filters.label, |harness: &Self, label| {
            async move { Ok(label.matches(Some(&harness.get_label_text().await?))) }.boxed()
        })
        .add_option("name", filters.name, |harness: &Self, name| {
            async move { Ok(name.matches(harness.get_name().await?.as_deref())) }.boxed()
        })
        .add_option("checked", filters.checked, |harness: &Self, checked| {
            async move { Ok(harness.is_checked().await? == checked) }.boxed()
        })
        .add_option("disabled", filters.disabled, |harness: &Self, disabled| {
            async move { Ok(harness.is_disabled().await? == disabled) }.boxed()
        })
    }

    fn input(&self) -> RequiredLocator<ElementQuery> {
        self.factory.locator_for("input[type=checkbox]")
    }

    fn label(&self) -> OptionalLocator<ElementQuery> {
        self.factory.locator_for_optional("label")
    }

    async fn input_element(&self) -> HarnessResult<Element> {
        self.input().resolve().await
    }

    /// Whether the checkbox is in the mixed state
    pub async fn is_indeterminate(&self) -> HarnessResult<bool> {
        self.input_element().await?.bool_property("indeterminate").await
    }

    /// Whether the checkbox is required
    pub async fn is_required(&self) -> HarnessResult<bool> {
        self.input_element().await?.bool_property("required").await
    }

    /// Whether the checkbox passes its validity constraints
    pub async fn is_valid(&self) -> HarnessResult<bool> {
        Ok(!self.host().has_class("ui-checkbox-invalid").await?)
    }

    /// `name` of the native input
    pub async fn get_name(&self) -> HarnessResult<Option<String>> {
        Ok(non_empty(self.input_element().await?.attribute("name").await?))
    }

    /// Live `value` of the native input
    pub async fn get_value(&self) -> HarnessResult<Option<String>> {
        Ok(non_empty(self.input_element().await?.string_property("value").await?))
    }

    /// `aria-label` of the native input
    pub async fn get_aria_label(&self) -> HarnessResult<Option<String>> {
        Ok(non_empty(self.input_element().await?.attribute("aria-label").await?))
    }

    /// `aria-labelledby` of the native input
    pub async fn get_aria_labelledby(&self) -> HarnessResult<Option<String>> {
        Ok(non_empty(
            self.input_element().await?.attribute("aria-labelledby").await?,
        ))
    }

    /// Label text, or an empty string when no label is rendered
    pub async fn get_label_text(&self) -> HarnessResult<String> {
        match self.label().resolve().await? {
            Some(label) => label.text().await,
            None => Ok(String::new()),
        }
    }

    /// Focus the native input
    pub async fn focus(&self) -> HarnessResult<()> {
        self.input_element().await?.focus().await
    }

    /// Blur the native input
    pub async fn blur(&self) -> HarnessResult<()> {
        self.input_element().await?.blur().await
    }

    /// Whether the native input has focus
    pub async fn is_focused(&self) -> HarnessResult<bool> {
        self.input_element().await?.is_focused().await
    }
}

#[async_trait]
impl HasCheckedState for CheckboxHarness {
    async fn is_checked(&self) -> HarnessResult<bool> {
        self.input_element().await?.bool_property("checked").await
    }

    async fn toggle(&self) -> HarnessResult<()> {
        self.input_element().await?.click().await
    }
}

#[async_trait]
impl HasDisabledState for CheckboxHarness {
    async fn is_disabled(&self) -> HarnessResult<bool> {
        Ok(self.input_element().await?.bool_property("disabled").await? || self.host_disabled().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;

    const FORM: &str = "\
        <div class='ui-checkbox'>\
          <input type='checkbox' name='terms'><label>Accept terms</label>\
        </div>\
        <div class='ui-checkbox'>\
          <input type='checkbox' name='news' checked aria-label='newsletter'>\
        </div>\
        <div class='ui-checkbox'>\
          <input type='checkbox' disabled required><label>Locked</label>\
        </div>";

    async fn checkbox(document: &MockDocument, filters: CheckboxFilters) -> CheckboxHarness {
        document
            .loader()
            .get_harness(CheckboxHarness::with(filters))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_toggle_is_observed_by_fresh_reads() {
        let document = MockDocument::from_html(FORM).unwrap();
        let terms = checkbox(&document, CheckboxFilters::default()).await;
        assert!(!terms.is_checked().await.unwrap());
        terms.toggle().await.unwrap();
        assert!(terms.is_checked().await.unwrap());
    }

    #[tokio::test]
    async fn test_check_and_uncheck_are_idempotent() {
        let document = MockDocument::from_html(FORM).unwrap();
        let news = checkbox(
            &document,
            CheckboxFilters {
                name: Some("news".into()),
                ..Default::default()
            },
        )
        .await;
        news.check().await.unwrap();
        assert!(news.is_checked().await.unwrap());
        news.uncheck().await.unwrap();
        news.uncheck().await.unwrap();
        assert!(!news.is_checked().await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_label_reads_as_empty() {
        let document = MockDocument::from_html(FORM).unwrap();
        let news = checkbox(
            &document,
            CheckboxFilters {
                checked: Some(true),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(news.get_label_text().await.unwrap(), "");
        assert_eq!(news.get_aria_label().await.unwrap().as_deref(), Some("newsletter"));
        assert_eq!(news.get_aria_labelledby().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_filter_by_label_regex_and_disabled() {
        let document = MockDocument::from_html(FORM).unwrap();
        let loader = document.loader();
        let locked = loader
            .get_all_harnesses(CheckboxHarness::with(CheckboxFilters {
                label: Some(TextPattern::regex("^Lock").unwrap()),
                disabled: Some(true),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(locked.len(), 1);
        assert!(locked[0].is_required().await.unwrap());
        assert_eq!(locked[0].get_name().await.unwrap(), None);

        locked[0].toggle().await.unwrap();
        assert!(!locked[0].is_checked().await.unwrap());
    }

    #[tokio::test]
    async fn test_value_and_indeterminate() {
        let document = MockDocument::from_html(FORM).unwrap();
        let terms = checkbox(&document, CheckboxFilters::default()).await;
        assert_eq!(terms.get_value().await.unwrap(), None);
        assert!(!terms.is_indeterminate().await.unwrap());
        assert!(terms.is_valid().await.unwrap());
        terms.focus().await.unwrap();
        assert!(terms.is_focused().await.unwrap());
        terms.blur().await.unwrap();
        assert!(!terms.is_focused().await.unwrap());
    }
}
