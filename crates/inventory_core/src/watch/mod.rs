//! Change-notification layer.
//!
//! # Responsibility
//! - Track watchers interested in invalidation events for an address.
//! - Deliver "something changed, re-query" signals after committed writes.
//!
//! # Invariants
//! - Events are invalidation signals, not data diffs.
//! - Dropping a subscription unsubscribes its watcher.

pub mod hub;
