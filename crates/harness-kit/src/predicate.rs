//! Composable harness filters.
//!
//! A [`HarnessPredicate`] is the query for one harness type: the type's host
//! selector, optional ancestor constraints, and a list of named async
//! predicates AND-ed together. Builders consume and return the predicate, so a
//! clone handed to a locator is never affected by later additions.

use crate::harness::ComponentHarness;
use crate::result::HarnessResult;
use crate::selector::combine_selectors;
use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

type BoxedPredicate<H> =
    Arc<dyn for<'a> Fn(&'a H) -> BoxFuture<'a, HarnessResult<bool>> + Send + Sync>;

/// Filters every harness type understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHarnessFilters {
    /// Host must additionally match this selector
    pub selector: Option<String>,
    /// Host must be a descendant of an element matching this selector
    pub ancestor: Option<String>,
}

/// Query for harnesses of type `H`
pub struct HarnessPredicate<H> {
    predicates: Vec<BoxedPredicate<H>>,
    descriptions: Vec<String>,
    ancestor: Option<String>,
    _harness: PhantomData<fn() -> H>,
}

impl<H> Clone for HarnessPredicate<H> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            descriptions: self.descriptions.clone(),
            ancestor: self.ancestor.clone(),
            _harness: PhantomData,
        }
    }
}

impl<H: ComponentHarness> fmt::Debug for HarnessPredicate<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessPredicate")
            .field("harness", &H::harness_name())
            .field("host_selector", &H::HOST_SELECTOR)
            .field("ancestor", &self.ancestor)
            .field("constraints", &self.descriptions)
            .finish()
    }
}

impl<H: ComponentHarness> HarnessPredicate<H> {
    /// Start a query for `H` from the base filters.
    ///
    /// Harness authors call this from their `with()` constructor; test code
    /// should go through `with()` instead.
    #[must_use]
    pub fn new(filters: BaseHarnessFilters) -> Self {
        let predicate = Self {
            predicates: Vec::new(),
            descriptions: Vec::new(),
            ancestor: None,
            _harness: PhantomData,
        };
        predicate
            .add_option("selector", filters.selector, |harness: &H, selector| {
                async move { harness.host().matches_selector(&selector).await }.boxed()
            })
            .with_ancestor(filters.ancestor)
    }

    fn with_ancestor(mut self, ancestor: Option<String>) -> Self {
        if let Some(ancestor) = ancestor {
            self.descriptions
                .push(format!("has ancestor matching selector \"{ancestor}\""));
            self.ancestor = Some(ancestor);
        }
        self
    }

    /// Add an unconditional named predicate
    #[must_use]
    pub fn add<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: for<'a> Fn(&'a H) -> BoxFuture<'a, HarnessResult<bool>> + Send + Sync + 'static,
    {
        self.descriptions.push(description.into());
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Add a predicate for an optional criterion.
    ///
    /// A `None` criterion means "don't care" and leaves the query unchanged.
    #[must_use]
    pub fn add_option<C, F>(mut self, name: &str, criterion: Option<C>, matcher: F) -> Self
    where
        C: Clone + fmt::Debug + Send + Sync + 'static,
        F: for<'a> Fn(&'a H, C) -> BoxFuture<'a, HarnessResult<bool>> + Send + Sync + 'static,
    {
        let Some(criterion) = criterion else {
            return self;
        };
        self.descriptions.push(format!("{name} = {criterion:?}"));
        self.predicates
            .push(Arc::new(move |harness: &H| matcher(harness, criterion.clone())));
        self
    }

    /// Number of active predicates
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Evaluate every predicate in declaration order, stopping at the first `false`
    pub async fn evaluate(&self, harness: &H) -> HarnessResult<bool> {
        for (index, predicate) in self.predicates.iter().enumerate() {
            let verdict = predicate(harness).await?;
            trace!(
                harness = H::harness_name(),
                predicate = index,
                verdict,
                "evaluated predicate"
            );
            if !verdict {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Keep the harnesses that satisfy every predicate, preserving order.
    ///
    /// Candidates are evaluated concurrently. Any matcher error fails the
    /// whole call.
    pub async fn filter(&self, harnesses: Vec<H>) -> HarnessResult<Vec<H>> {
        if self.predicates.is_empty() {
            return Ok(harnesses);
        }
        let verdicts = try_join_all(harnesses.iter().map(|harness| self.evaluate(harness))).await?;
        Ok(harnesses
            .into_iter()
            .zip(verdicts)
            .filter_map(|(harness, keep)| keep.then_some(harness))
            .collect())
    }

    /// Effective selector: host selector under any ancestor constraints
    pub fn selector(&self) -> HarnessResult<String> {
        let mut selector = H::HOST_SELECTOR.trim().to_string();
        if let Some(ancestor) = &self.ancestor {
            selector = combine_selectors(ancestor, &selector)?;
        }
        if let Some(ancestor) = H::ANCESTOR_SELECTOR {
            selector = combine_selectors(ancestor, &selector)?;
        }
        Ok(selector)
    }

    /// Human readable description used in error messages
    #[must_use]
    pub fn description(&self) -> String {
        let mut description = format!(
            "{} with host element matching selector: \"{}\"",
            H::harness_name(),
            H::HOST_SELECTOR.trim()
        );
        if !self.descriptions.is_empty() {
            description.push_str(" satisfying the constraints: ");
            description.push_str(&self.descriptions.join(", "));
        }
        description
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::LocatorFactory;
    use crate::pattern::TextPattern;
    use crate::testing::MockDocument;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct ItemHarness {
        factory: LocatorFactory,
    }

    impl ComponentHarness for ItemHarness {
        const HOST_SELECTOR: &'static str = ".item";

        fn from_locator_factory(factory: LocatorFactory) -> Self {
            Self { factory }
        }

        fn locator_factory(&self) -> &LocatorFactory {
            &self.factory
        }
    }

    fn text_option(pattern: Option<TextPattern>) -> HarnessPredicate<ItemHarness> {
        ItemHarness::query().add_option("text", pattern, |harness: &ItemHarness, pattern| {
            async move {
                let text = harness.host().text().await?;
                Ok(pattern.matches(Some(&text)))
            }
            .boxed()
        })
    }

    async fn items(html: &str) -> Vec<ItemHarness> {
        let document = MockDocument::from_html(html).unwrap();
        document
            .locator_factory()
            .locator_for_all(ItemHarness::query())
            .resolve()
            .await
            .unwrap()
    }

    mod option_tests {
        use super::*;

        #[test]
        fn test_unset_option_adds_nothing() {
            let predicate = text_option(None);
            assert_eq!(predicate.predicate_count(), 0);
            assert!(!predicate.description().contains("constraints"));
        }

        #[test]
        fn test_set_option_is_described() {
            let predicate = text_option(Some("Save".into()));
            assert_eq!(predicate.predicate_count(), 1);
            assert_eq!(
                predicate.description(),
                "ItemHarness with host element matching selector: \".item\" \
                 satisfying the constraints: text = \"Save\""
            );
        }

        #[test]
        fn test_clone_is_independent() {
            let base = text_option(Some("Save".into()));
            let extended = base
                .clone()
                .add("always false", |_: &ItemHarness| async { Ok(false) }.boxed());
            assert_eq!(base.predicate_count(), 1);
            assert_eq!(extended.predicate_count(), 2);
        }

        #[test]
        fn test_base_filters_describe_ancestor() {
            let predicate = HarnessPredicate::<ItemHarness>::new(BaseHarnessFilters {
                selector: Some("#first".to_string()),
                ancestor: Some(".panel, .dialog".to_string()),
            });
            let description = predicate.description();
            assert!(description.contains("selector = \"#first\""));
            assert!(description.contains("has ancestor matching selector \".panel, .dialog\""));
            assert_eq!(
                predicate.selector().unwrap(),
                ".panel .item, .dialog .item"
            );
        }
    }

    mod evaluate_tests {
        use super::*;

        #[tokio::test]
        async fn test_unset_option_is_vacuously_true() {
            let harnesses = items("<div class='item'>A</div>").await;
            assert!(text_option(None).evaluate(&harnesses[0]).await.unwrap());
        }

        #[tokio::test]
        async fn test_short_circuits_on_first_false() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let predicate = ItemHarness::query()
                .add("never", |_: &ItemHarness| async { Ok(false) }.boxed())
                .add("counted", move |_: &ItemHarness| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async { Ok(true) }.boxed()
                });

            let harnesses = items("<div class='item'>A</div>").await;
            assert!(!predicate.evaluate(&harnesses[0]).await.unwrap());
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_filter_preserves_order() {
            let harnesses = items(
                "<div class='item'>Save</div><div class='item'>Cancel</div><div class='item'>Save</div>",
            )
            .await;
            let ids: Vec<_> = harnesses.iter().map(|h| h.host().id()).collect();

            let kept = text_option(Some("Save".into())).filter(harnesses).await.unwrap();
            assert_eq!(kept.len(), 2);
            assert_eq!(kept[0].host().id(), ids[0]);
            assert_eq!(kept[1].host().id(), ids[2]);
        }

        #[tokio::test]
        async fn test_matcher_error_propagates() {
            let predicate = ItemHarness::query().add("broken", |harness: &ItemHarness| {
                async move { harness.host().matches_selector("[").await }.boxed()
            });
            let harnesses = items("<div class='item'>A</div>").await;
            assert!(predicate.filter(harnesses).await.is_err());
        }
    }
}
