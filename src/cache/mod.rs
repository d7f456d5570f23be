//! Cache module for holding upstream API responses in memory
//!
//! This module provides a cache manager that keeps API responses for a fixed
//! time-to-live. Entries expire a fixed interval after they were written
//! (absolute TTL); reads never extend an entry's lifetime.

mod manager;

pub use manager::{CacheManager, CachedData};
