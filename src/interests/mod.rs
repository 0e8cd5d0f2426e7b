//! Name-based interest selection.
//!
//! Callers address interests by category title and interest name; the member
//! endpoint wants `{interestId: bool}`. [`InterestSpec`] captures the caller's
//! shape and [`InterestResolver`] maps it onto ids.

mod resolver;
mod spec;

pub use resolver::InterestResolver;
pub use spec::{InterestSpec, OneOrMany};

use crate::models::InterestFlags;

/// Interests as handed to a member update: either ids already resolved, or a spec still to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum InterestsInput {
    Resolved(InterestFlags),
    Spec(InterestSpec),
}

impl From<InterestFlags> for InterestsInput {
    fn from(flags: InterestFlags) -> Self {
        InterestsInput::Resolved(flags)
    }
}

impl From<InterestSpec> for InterestsInput {
    fn from(spec: InterestSpec) -> Self {
        InterestsInput::Spec(spec)
    }
}

impl From<&str> for InterestsInput {
    fn from(text: &str) -> Self {
        InterestsInput::Spec(InterestSpec::from(text))
    }
}
