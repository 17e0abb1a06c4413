//! Core data-access layer for the book inventory application.
//! This crate is the single source of truth for record validation and
//! addressing invariants.

pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;
pub mod watch;

pub use contract::{
    BookUri, CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, PATH_BOOKS, TABLE_NAME,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookDecodeError, BookValues, ValidationError};
pub use provider::book_provider::{BookProvider, ProviderError, ProviderResult};
pub use service::inventory_service::InventoryService;
pub use store::book_store::{Row, SqliteBookStore, StoreError};
pub use watch::hub::{ChangeEvent, ChangeHub, Subscription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
