//! Per-list memoization of the category → interest graph.
//!
//! The store ([`InterestCache`]) is owned by the client rather than the process,
//! so its lifetime follows the client and tests can hand in a pre-seeded one.
//! [`CategoryCache`] fills it on first use of a list id and never refreshes it.

mod category_cache;
mod interest_cache;

pub use category_cache::CategoryCache;
pub use interest_cache::{InterestCache, InterestCacheStats};
