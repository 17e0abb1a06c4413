//! Schema and addressing contract for the inventory store.
//!
//! # Responsibility
//! - Define the canonical table/column identifiers shared by all layers.
//! - Define the address scheme (collection vs. single item) and its
//!   MIME-style type strings.
//!
//! # Invariants
//! - Column names are part of the externally observable schema and keep
//!   their original camelCase spelling.
//! - Type strings returned by the provider are stable across restarts.

use std::fmt::{Display, Formatter};

pub mod matcher;

pub use matcher::{book_uri_matcher, BookMatch, ContractError, UriMatcher};

/// Opaque authority owning every address handled by this crate.
pub const CONTENT_AUTHORITY: &str = "com.example.android.inventoryapp";

/// Path segment denoting the book collection.
pub const PATH_BOOKS: &str = "books";

/// Backing table for book records.
pub const TABLE_NAME: &str = "books";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_PRODUCT_NAME: &str = "productName";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_QUANTITY: &str = "quantity";
pub const COLUMN_SUPPLIER_NAME: &str = "supplierName";
pub const COLUMN_SUPPLIER_PHONE: &str = "supplierPhoneNumber";

/// MIME-style type string for the whole book collection.
pub const CONTENT_LIST_TYPE: &str =
    "vnd.android.cursor.dir/com.example.android.inventoryapp/books";

/// MIME-style type string for a single book record.
pub const CONTENT_ITEM_TYPE: &str =
    "vnd.android.cursor.item/com.example.android.inventoryapp/books";

/// Resolved address for book operations.
///
/// `Collection` covers every record; `Item` targets one record by its
/// store-assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookUri {
    Collection,
    Item(i64),
}

impl BookUri {
    /// Returns the record id for item addresses.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(*id),
        }
    }

    /// Returns whether this address targets a single record.
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }
}

impl Display for BookUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "content://{CONTENT_AUTHORITY}/{PATH_BOOKS}"),
            Self::Item(id) => write!(f, "content://{CONTENT_AUTHORITY}/{PATH_BOOKS}/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookUri, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};

    #[test]
    fn uri_rendering_matches_contract() {
        assert_eq!(
            BookUri::Collection.to_string(),
            "content://com.example.android.inventoryapp/books"
        );
        assert_eq!(
            BookUri::Item(42).to_string(),
            "content://com.example.android.inventoryapp/books/42"
        );
    }

    #[test]
    fn item_accessors_work() {
        assert_eq!(BookUri::Item(7).id(), Some(7));
        assert_eq!(BookUri::Collection.id(), None);
        assert!(BookUri::Item(7).is_item());
        assert!(!BookUri::Collection.is_item());
    }

    #[test]
    fn type_strings_are_distinct() {
        assert_ne!(CONTENT_LIST_TYPE, CONTENT_ITEM_TYPE);
    }
}
