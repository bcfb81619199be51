//! Cache decision engine
//!
//! This module holds the core of the crate: [`FeedCache`], which decides per
//! lookup whether to serve a stored copy, revalidate it with a conditional
//! fetch, or fetch fresh, and whether the fetch result should be persisted.

mod engine;

pub use engine::{CacheError, FeedCache};
