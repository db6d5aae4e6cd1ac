//! User confirmation capability
//!
//! Two library operations need a human decision: adding a template whose path
//! already exists, and building a template from an empty selection. The host
//! editor injects a [`ConfirmProvider`]; headless callers use one of the fixed
//! providers.

/// Outcome of a two-option prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The first offered option
    Primary,
    /// The second offered option
    Alternative,
}

/// Asks the user to pick between two options
pub trait ConfirmProvider {
    fn confirm(&self, title: &str, message: &str, primary: &str, alternative: &str) -> Choice;
}

/// Always picks the first option without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysPrimary;

impl ConfirmProvider for AlwaysPrimary {
    fn confirm(&self, _title: &str, _message: &str, _primary: &str, _alternative: &str) -> Choice {
        Choice::Primary
    }
}

/// Always picks the second option without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysAlternative;

impl ConfirmProvider for AlwaysAlternative {
    fn confirm(&self, _title: &str, _message: &str, _primary: &str, _alternative: &str) -> Choice {
        Choice::Alternative
    }
}
