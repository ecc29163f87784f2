//! harness-kit: typed component harnesses over an abstract UI tree
//!
//! A *harness* wraps one host element of a UI component and exposes
//! component-level operations (read a label, toggle a checkbox) so tests never
//! touch the underlying markup. Harnesses are found through *locators*, which
//! resolve lazily against the live tree and wait for the environment to
//! settle before every lookup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌────────────────────┐
//! │ HarnessLoader│───►│  LocatorFactory  │───►│ HarnessEnvironment │
//! │ (test entry) │    │ locator_for(...) │    │ stabilize + root   │
//! └──────────────┘    └────────┬─────────┘    └─────────┬──────────┘
//!                              │ HarnessPredicate<H>    │ ElementHandle
//!                              ▼                        ▼
//!                     ┌──────────────────┐    ┌────────────────────┐
//!                     │ ComponentHarness │───►│    host element    │
//!                     └──────────────────┘    └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use harness_kit::components::{ButtonFilters, ButtonHarness};
//! use harness_kit::testing::MockDocument;
//! use harness_kit::HasText;
//!
//! # futures::executor::block_on(async {
//! let document = MockDocument::from_html(
//!     "<button class='ui-button'>Save</button><button class='ui-button'>Cancel</button>",
//! )?;
//! let cancel = document
//!     .loader()
//!     .get_harness(ButtonHarness::with(ButtonFilters {
//!         text: Some("Cancel".into()),
//!         ..Default::default()
//!     }))
//!     .await?;
//! assert_eq!(cancel.text().await?, "Cancel");
//! # Ok::<(), harness_kit::HarnessError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

extern crate self as harness_kit;

mod element;
mod event;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod harness;
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
mod loader;
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
mod locator;
mod parallel;
mod pattern;
mod predicate;
mod result;
mod selector;

/// Reference harnesses for common components
#[allow(clippy::missing_errors_doc)]
pub mod components;

/// In-memory tree, selector engine and environment for tests
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
pub mod testing;

pub use element::{same_element, Dimensions, Element, ElementHandle, ElementId, HarnessEnvironment};
pub use event::{KeyInput, ModifierKeys, SpecialKey};
pub use harness::{
    non_empty, short_type_name, ComponentHarness, ContentContainer, HasCheckedState,
    HasDisabledState, HasText, HostAttributes,
};
pub use harness_kit_derive::ComponentHarness;
pub use loader::HarnessLoader;
pub use locator::{
    AllLocator, ElementQuery, IntoLocatorTarget, LocatorFactory, LocatorOptions, LocatorTarget,
    OptionalLocator, RequiredLocator,
};
pub use parallel::parallel;
pub use pattern::{string_matches, TextPattern};
pub use predicate::{BaseHarnessFilters, HarnessPredicate};
pub use result::{HarnessError, HarnessResult};
pub use selector::{combine_selectors, split_selector_groups};

/// Everything a harness author or test usually needs
pub mod prelude {
    pub use super::components::*;
    pub use super::element::*;
    pub use super::event::*;
    pub use super::harness::*;
    pub use super::loader::*;
    pub use super::locator::*;
    pub use super::parallel::*;
    pub use super::pattern::*;
    pub use super::predicate::*;
    pub use super::result::*;
    pub use harness_kit_derive::ComponentHarness;
}
