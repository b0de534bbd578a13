//! Duplicate detection module.
//!
//! Files are bucketed by content fingerprint during the walk; this module
//! reports the buckets with more than one member.

pub mod groups;

pub use groups::{find_duplicates, sort_by_wasted_space, DuplicateGroup, DuplicateStats};
