//! Button harness.

use crate::element::Element;
use crate::harness::{ContentContainer, HasDisabledState, HasText, HostAttributes};
use crate::locator::LocatorFactory;
use crate::pattern::TextPattern;
use crate::predicate::{BaseHarnessFilters, HarnessPredicate};
use crate::result::HarnessResult;
use crate::ComponentHarness;
use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

/// Visual variant, read from the host's classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Text-only button
    Basic,
    /// Elevated button
    Raised,
    /// Filled button without elevation
    Flat,
    /// Outlined button
    Stroked,
    /// Icon-only button
    Icon,
    /// Floating action button
    Fab,
}

/// Filters for [`ButtonHarness::with`]
#[derive(Debug, Clone, Default)]
pub struct ButtonFilters {
    /// Host must also match this selector
    pub selector: Option<String>,
    /// Host must sit under an element matching this selector
    pub ancestor: Option<String>,
    /// Button text
    pub text: Option<TextPattern>,
    /// Visual variant
    pub variant: Option<ButtonVariant>,
    /// Disabled state
    pub disabled: Option<bool>,
}

/// Harness for `.ui-button` family elements
#[derive(Debug, Clone, ComponentHarness)]
#[harness(host = ".ui-button, .ui-raised-button, .ui-flat-button, .ui-stroked-button, .ui-icon-button, .ui-fab")]
pub struct ButtonHarness {
    factory: LocatorFactory,
}

impl ButtonHarness {
    /// Query for buttons matching `filters`
    #[must_use]
    pub fn with(filters: ButtonFilters) -> HarnessPredicate<Self> {
        HarnessPredicate::new(BaseHarnessFilters {
            selector: filters.selector,
            ancestor: filters.ancestor,
        })
        .add_option("text", filters.text, |harness: &Self, text| {
            async move { Ok(text.matches(Some(&harness.text().await?))) }.boxed()
        })
        .add_option("variant", filters.variant, |harness: &Self, variant| {
            async move { Ok(harness.variant().await? == variant) }.boxed()
        })
        .add_option("disabled", filters.disabled, |harness: &Self, disabled| {
            async move { Ok(harness.is_disabled().await? == disabled) }.boxed()
        })
    }

    /// Click the button
    pub async fn click(&self) -> HarnessResult<()> {
        self.host().click().await
    }

    /// Visual variant
    pub async fn variant(&self) -> HarnessResult<ButtonVariant> {
        let host: Element = self.host();
        for (class, variant) in [
            ("ui-fab", ButtonVariant::Fab),
            ("ui-icon-button", ButtonVariant::Icon),
            ("ui-raised-button", ButtonVariant::Raised),
            ("ui-flat-button", ButtonVariant::Flat),
            ("ui-stroked-button", ButtonVariant::Stroked),
        ] {
            if host.has_class(class).await? {
                return Ok(variant);
            }
        }
        Ok(ButtonVariant::Basic)
    }

    /// Focus the button
    pub async fn focus(&self) -> HarnessResult<()> {
        self.host().focus().await
    }

    /// Blur the button
    pub async fn blur(&self) -> HarnessResult<()> {
        self.host().blur().await
    }

    /// Whether the button has focus
    pub async fn is_focused(&self) -> HarnessResult<bool> {
        self.host().is_focused().await
    }
}

impl HasText for ButtonHarness {}

#[async_trait]
impl HasDisabledState for ButtonHarness {
    async fn is_disabled(&self) -> HarnessResult<bool> {
        Ok(self.host().bool_property("disabled").await? || self.host_disabled().await?)
    }
}

impl ContentContainer for ButtonHarness {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;

    const BUTTONS: &str = "\
        <button class='ui-button'>Save</button>\
        <button class='ui-raised-button' disabled>Cancel</button>\
        <button class='ui-fab' aria-label='add'><i class='icon'>+</i></button>\
        <button class='ui-button'>Save</button>";

    async fn texts(buttons: &[ButtonHarness]) -> Vec<String> {
        let mut out = Vec::new();
        for button in buttons {
            out.push(button.text().await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_loads_every_variant() {
        let document = MockDocument::from_html(BUTTONS).unwrap();
        let all = document
            .loader()
            .get_all_harnesses(ButtonHarness::query())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[1].variant().await.unwrap(), ButtonVariant::Raised);
        assert_eq!(all[2].variant().await.unwrap(), ButtonVariant::Fab);
        assert_eq!(all[3].variant().await.unwrap(), ButtonVariant::Basic);
    }

    #[tokio::test]
    async fn test_filter_by_text_and_state() {
        let document = MockDocument::from_html(BUTTONS).unwrap();
        let loader = document.loader();
        let enabled = loader
            .get_all_harnesses(ButtonHarness::with(ButtonFilters {
                disabled: Some(false),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(texts(&enabled).await, vec!["Save", "+", "Save"]);

        let fab = loader
            .get_harness(ButtonHarness::with(ButtonFilters {
                variant: Some(ButtonVariant::Fab),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(fab.aria_label().await.unwrap().as_deref(), Some("add"));
    }

    #[tokio::test]
    async fn test_disabled_button_ignores_click() {
        let document = MockDocument::from_html(BUTTONS).unwrap();
        let cancel = document
            .loader()
            .get_harness(ButtonHarness::with(ButtonFilters {
                text: Some("Cancel".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(cancel.is_disabled().await.unwrap());
        cancel.click().await.unwrap();
        assert!(document.events().is_empty());
    }

    #[tokio::test]
    async fn test_focus_round_trip() {
        let document = MockDocument::from_html(BUTTONS).unwrap();
        let save = document.loader().get_harness(ButtonHarness::query()).await.unwrap();
        save.focus().await.unwrap();
        assert!(save.is_focused().await.unwrap());
        save.blur().await.unwrap();
        assert!(!save.is_focused().await.unwrap());
    }

    #[test]
    fn test_description_lists_constraints() {
        let query = ButtonHarness::with(ButtonFilters {
            text: Some("Save".into()),
            disabled: Some(true),
            ..Default::default()
        });
        let description = query.description();
        assert!(description.starts_with("ButtonHarness with host element matching selector"));
        assert!(description.ends_with("text = \"Save\", disabled = true"));
    }
}
