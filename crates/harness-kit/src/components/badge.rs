//! Badge harness.

use crate::harness::{non_empty, HasDisabledState};
use crate::locator::LocatorFactory;
use crate::pattern::TextPattern;
use crate::predicate::{BaseHarnessFilters, HarnessPredicate};
use crate::result::HarnessResult;
use crate::ComponentHarness;
use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

/// Where the badge sits relative to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgePosition {
    /// Above, trailing edge
    AboveAfter,
    /// Above, leading edge
    AboveBefore,
    /// Below, trailing edge
    BelowAfter,
    /// Below, leading edge
    BelowBefore,
}

/// Badge size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeSize {
    /// Small
    Small,
    /// Medium
    Medium,
    /// Large
    Large,
}

/// Filters for [`BadgeHarness::with`]
#[derive(Debug, Clone, Default)]
pub struct BadgeFilters {
    /// Host must also match this selector
    pub selector: Option<String>,
    /// Host must sit under an element matching this selector
    pub ancestor: Option<String>,
    /// Badge content
    pub text: Option<TextPattern>,
}

/// Harness for `.ui-badge` hosts
#[derive(Debug, Clone, ComponentHarness)]
#[harness(host = ".ui-badge")]
pub struct BadgeHarness {
    factory: LocatorFactory,
}

impl BadgeHarness {
    /// Query for badges matching `filters`
    #[must_use]
    pub fn with(filters: BadgeFilters) -> HarnessPredicate<Self> {
        HarnessPredicate::new(BaseHarnessFilters {
            selector: filters.selector,
            ancestor: filters.ancestor,
        })
        .add_option("text", filters.text, |harness: &Self, text| {
            async move { Ok(text.matches(harness.get_text().await?.as_deref())) }.boxed()
        })
    }

    /// Badge content, `None` when the content element is missing or empty
    pub async fn get_text(&self) -> HarnessResult<Option<String>> {
        match self
            .factory
            .locator_for_optional(".ui-badge-content")
            .resolve()
            .await?
        {
            Some(content) => Ok(non_empty(Some(content.text().await?))),
            None => Ok(None),
        }
    }

    /// Whether the badge overlaps its host
    pub async fn is_overlapping(&self) -> HarnessResult<bool> {
        self.host().has_class("ui-badge-overlap").await
    }

    /// Position relative to the host; above-after unless the classes say otherwise
    pub async fn get_position(&self) -> HarnessResult<BadgePosition> {
        let host = self.host();
        let below = host.has_class("ui-badge-below").await?;
        let before = host.has_class("ui-badge-before").await?;
        Ok(match (below, before) {
            (false, false) => BadgePosition::AboveAfter,
            (false, true) => BadgePosition::AboveBefore,
            (true, false) => BadgePosition::BelowAfter,
            (true, true) => BadgePosition::BelowBefore,
        })
    }

    /// Size; medium unless the classes say otherwise
    pub async fn get_size(&self) -> HarnessResult<BadgeSize> {
        let host = self.host();
        if host.has_class("ui-badge-small").await? {
            Ok(BadgeSize::Small)
        } else if host.has_class("ui-badge-large").await? {
            Ok(BadgeSize::Large)
        } else {
            Ok(BadgeSize::Medium)
        }
    }

    /// Whether the badge is hidden
    pub async fn is_hidden(&self) -> HarnessResult<bool> {
        self.host().has_class("ui-badge-hidden").await
    }
}

#[async_trait]
impl HasDisabledState for BadgeHarness {
    async fn is_disabled(&self) -> HarnessResult<bool> {
        self.host().has_class("ui-badge-disabled").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;

    const BADGES: &str = "\
        <span class='ui-badge ui-badge-below ui-badge-before ui-badge-small'>\
          Inbox<span class='ui-badge-content'>3</span>\
        </span>\
        <span class='ui-badge ui-badge-overlap ui-badge-hidden ui-badge-disabled'>\
          Drafts<span class='ui-badge-content'></span>\
        </span>";

    #[tokio::test]
    async fn test_reads_position_and_size() {
        let document = MockDocument::from_html(BADGES).unwrap();
        let badges = document
            .loader()
            .get_all_harnesses(BadgeHarness::query())
            .await
            .unwrap();
        assert_eq!(badges[0].get_position().await.unwrap(), BadgePosition::BelowBefore);
        assert_eq!(badges[0].get_size().await.unwrap(), BadgeSize::Small);
        assert_eq!(badges[1].get_position().await.unwrap(), BadgePosition::AboveAfter);
        assert_eq!(badges[1].get_size().await.unwrap(), BadgeSize::Medium);
        assert!(badges[1].is_overlapping().await.unwrap());
        assert!(badges[1].is_hidden().await.unwrap());
        assert!(badges[1].is_disabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_content_is_none() {
        let document = MockDocument::from_html(BADGES).unwrap();
        let loader = document.loader();
        let drafts = loader
            .get_harness(BadgeHarness::with(BadgeFilters {
                text: Some(TextPattern::Absent),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(drafts.get_text().await.unwrap(), None);

        let inbox = loader
            .get_harness(BadgeHarness::with(BadgeFilters {
                text: Some("3".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(!inbox.is_hidden().await.unwrap());
    }

    #[test]
    fn test_position_serializes_kebab_case() {
        let json = serde_json::to_string(&BadgePosition::BelowBefore).unwrap();
        assert_eq!(json, "\"below-before\"");
    }
}
