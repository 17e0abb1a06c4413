//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide typed CRUD and stock-adjustment entry points for callers.
//! - Delegate addressing, validation and notification to the provider.
//!
//! # Invariants
//! - Service APIs never bypass provider validation or routing.
//! - Stock adjustments never push quantity below zero.

use crate::contract::BookUri;
use crate::model::book::{Book, BookValues};
use crate::provider::book_provider::{BookProvider, ProviderError, ProviderResult};

/// Use-case wrapper over one book provider.
pub struct InventoryService<'conn> {
    provider: BookProvider<'conn>,
}

impl<'conn> InventoryService<'conn> {
    /// Creates a service using the provided provider.
    pub fn new(provider: BookProvider<'conn>) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider, e.g. for subscriptions.
    pub fn provider(&self) -> &BookProvider<'conn> {
        &self.provider
    }

    /// Creates a book and returns its store-assigned id.
    pub fn create_book(&self, values: &BookValues) -> ProviderResult<i64> {
        let uri = self
            .provider
            .insert(&BookUri::Collection.to_string(), values)?;
        uri.id().ok_or_else(|| {
            ProviderError::InvalidData("insert returned a collection address".to_string())
        })
    }

    /// Gets one book by id, or `None` when no such record exists.
    pub fn get_book(&self, id: i64) -> ProviderResult<Option<Book>> {
        let rows = self
            .provider
            .query(&BookUri::Item(id).to_string(), None, None, &[], None)?;

        match rows.first() {
            Some(row) => {
                let book = Book::from_row(row)
                    .map_err(|err| ProviderError::InvalidData(err.to_string()))?;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    /// Lists all books in stable id order.
    pub fn list_books(&self) -> ProviderResult<Vec<Book>> {
        let rows = self.provider.query(
            &BookUri::Collection.to_string(),
            None,
            None,
            &[],
            Some(ID_ORDER),
        )?;

        rows.iter()
            .map(|row| {
                Book::from_row(row).map_err(|err| ProviderError::InvalidData(err.to_string()))
            })
            .collect()
    }

    /// Applies a partial update to one book; returns the changed-row count.
    pub fn update_book(&self, id: i64, values: &BookValues) -> ProviderResult<usize> {
        self.provider
            .update(&BookUri::Item(id).to_string(), values, None, &[])
    }

    /// Deletes one book; returns the removed-row count (0 or 1).
    pub fn delete_book(&self, id: i64) -> ProviderResult<usize> {
        self.provider
            .delete(&BookUri::Item(id).to_string(), None, &[])
    }

    /// Deletes every book; returns the removed-row count.
    pub fn delete_all(&self) -> ProviderResult<usize> {
        self.provider
            .delete(&BookUri::Collection.to_string(), None, &[])
    }

    /// Records the sale of one unit; returns the remaining quantity.
    ///
    /// Selling at zero stock fails with `InvalidArgument` and writes
    /// nothing.
    pub fn sell_one(&self, id: i64) -> ProviderResult<i64> {
        self.adjust_quantity(id, -1)
    }

    /// Restocks one unit; returns the new quantity.
    pub fn restock_one(&self, id: i64) -> ProviderResult<i64> {
        self.adjust_quantity(id, 1)
    }

    fn adjust_quantity(&self, id: i64, delta: i64) -> ProviderResult<i64> {
        let book = self.get_book(id)?.ok_or(ProviderError::NotFound(id))?;

        let next = book.quantity + delta;
        if next < 0 {
            return Err(ProviderError::InvalidArgument(format!(
                "book {id} is out of stock"
            )));
        }

        let values = BookValues::new().with_quantity(next);
        self.update_book(id, &values)?;
        Ok(next)
    }
}

/// Stable listing order; column name is part of the contract.
const ID_ORDER: &str = "_id ASC";
