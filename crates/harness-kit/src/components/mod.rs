//! Reference harnesses for common components.
//!
//! Each one is a thin wrapper over the core contract: a derived
//! [`ComponentHarness`](crate::ComponentHarness) impl, a flat filter record and
//! a `with()` constructor building the matching [`HarnessPredicate`](crate::HarnessPredicate).

mod badge;
mod button;
mod checkbox;
mod expansion;
mod toolbar;

pub use badge::{BadgeFilters, BadgeHarness, BadgePosition, BadgeSize};
pub use button::{ButtonFilters, ButtonHarness, ButtonVariant};
pub use checkbox::{CheckboxFilters, CheckboxHarness};
pub use expansion::{AccordionFilters, AccordionHarness, ExpansionPanelFilters, ExpansionPanelHarness};
pub use toolbar::{ToolbarFilters, ToolbarHarness};
