//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate provider calls into use-case level APIs.
//! - Keep UI layers decoupled from addressing and storage details.

pub mod inventory_service;
