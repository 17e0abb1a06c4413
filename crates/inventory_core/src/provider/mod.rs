//! Validating router over the record store.
//!
//! # Responsibility
//! - Classify addresses, dispatch table operations, enforce validation.
//! - Emit change notifications after successful mutations.
//!
//! # Invariants
//! - Validation and routing failures stop an operation before any store
//!   mutation; there are no partial writes.
//! - All failures raise through `Result`; no sentinel return values.

pub mod book_provider;
