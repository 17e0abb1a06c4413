//! Domain model for inventory records.
//!
//! # Responsibility
//! - Define the canonical book record and its partial write-set shape.
//! - Own field-level validation rules enforced before every write.
//!
//! # Invariants
//! - A stored record always satisfies the full rule set; a write-set is
//!   checked only for the fields it carries.

pub mod book;
