//! Record-store layer: raw table primitives.
//!
//! # Responsibility
//! - Execute query/insert/update/delete against the books table by
//!   column/value maps and predicate + positional-argument pairs.
//! - Keep SQL assembly inside the persistence boundary.
//!
//! # Invariants
//! - The store performs no semantic validation; that is the provider's job.
//! - Constructors reject connections that were not bootstrapped through
//!   the db module.

pub mod book_store;
