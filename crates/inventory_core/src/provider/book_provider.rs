//! Book provider: URI routing, validation and change notification.
//!
//! # Responsibility
//! - Route collection/item addresses to store operations.
//! - Validate write-sets before any mutation reaches the store.
//! - Notify watchers of the affected address after committed writes.
//!
//! # Invariants
//! - Item addresses always operate on `_id = ?`; caller predicates are
//!   only honored for collection addresses.
//! - Watchers are notified only when at least one row actually changed.

use crate::contract::matcher::parse_item_id;
use crate::contract::{
    book_uri_matcher, BookMatch, BookUri, ContractError, UriMatcher, CONTENT_ITEM_TYPE,
    CONTENT_LIST_TYPE,
};
use crate::model::book::{BookValues, ValidationError};
use crate::store::book_store::{Row, SqliteBookStore, StoreError};
use crate::watch::hub::{ChangeHub, Subscription};
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error surface of the provider contract.
#[derive(Debug)]
pub enum ProviderError {
    /// A write-set violates a field rule; carries a field-specific reason.
    InvalidArgument(String),
    /// The address matches neither the collection nor the item pattern.
    UnrecognizedUri(String),
    /// The operation is not defined for this address kind.
    UnsupportedOperation {
        operation: &'static str,
        uri: String,
    },
    /// No record with this id exists.
    NotFound(i64),
    /// The store refused an otherwise-valid operation.
    Store(StoreError),
    /// Persisted state failed to decode into a record.
    InvalidData(String),
    /// The routing table failed to build.
    Contract(ContractError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(reason) => write!(f, "{reason}"),
            Self::UnrecognizedUri(uri) => write!(f, "unrecognized address: {uri}"),
            Self::UnsupportedOperation { operation, uri } => {
                write!(f, "{operation} is not supported for {uri}")
            }
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::Contract(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Contract(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ProviderError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<StoreError> for ProviderError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ContractError> for ProviderError {
    fn from(value: ContractError) -> Self {
        Self::Contract(value)
    }
}

/// Validating router over one book store.
///
/// Owns its routing table and change hub; both are built at construction,
/// never shared process-wide.
pub struct BookProvider<'conn> {
    store: SqliteBookStore<'conn>,
    matcher: UriMatcher<BookMatch>,
    hub: ChangeHub,
}

impl<'conn> BookProvider<'conn> {
    /// Builds a provider over a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> ProviderResult<Self> {
        Ok(Self {
            store: SqliteBookStore::try_new(conn)?,
            matcher: book_uri_matcher()?,
            hub: ChangeHub::new(),
        })
    }

    /// Classifies an address as collection or item.
    pub fn resolve(&self, uri: &str) -> ProviderResult<BookUri> {
        match self.matcher.match_uri(uri) {
            Some(BookMatch::Books) => Ok(BookUri::Collection),
            Some(BookMatch::BookId) => match parse_item_id(uri) {
                Some(id) => Ok(BookUri::Item(id)),
                // Matcher-approved but out of i64 range.
                None => Err(ProviderError::UnrecognizedUri(uri.to_string())),
            },
            None => Err(ProviderError::UnrecognizedUri(uri.to_string())),
        }
    }

    /// Queries records under an address.
    ///
    /// For item addresses the predicate is forced to the id match and any
    /// caller-supplied predicate is ignored; collection addresses honor the
    /// caller predicate. Unknown projection columns surface as store errors.
    pub fn query(
        &self,
        uri: &str,
        projection: Option<&[&str]>,
        predicate: Option<&str>,
        args: &[Value],
        order: Option<&str>,
    ) -> ProviderResult<Vec<Row>> {
        let rows = match self.resolve(uri)? {
            BookUri::Collection => self.store.query(projection, predicate, args, order)?,
            BookUri::Item(id) => self.store.query(
                projection,
                Some(ID_PREDICATE),
                &[Value::Integer(id)],
                order,
            )?,
        };
        Ok(rows)
    }

    /// Inserts one record under the collection address.
    ///
    /// Returns the item address of the fresh record. Store refusals raise
    /// as [`ProviderError::Store`]; this crate uses the always-raise
    /// convention uniformly across insert/update/delete.
    pub fn insert(&self, uri: &str, values: &BookValues) -> ProviderResult<BookUri> {
        match self.resolve(uri)? {
            BookUri::Collection => {}
            BookUri::Item(_) => {
                return Err(ProviderError::UnsupportedOperation {
                    operation: "insert",
                    uri: uri.to_string(),
                });
            }
        }

        values.validate_insert()?;

        let id = match self.store.insert(&values.to_column_values()) {
            Ok(id) => id,
            Err(err) => {
                error!("event=book_insert module=provider status=error error={err}");
                return Err(err.into());
            }
        };

        info!("event=book_insert module=provider status=ok id={id}");
        self.hub.notify(BookUri::Collection);
        Ok(BookUri::Item(id))
    }

    /// Updates records under an address; returns the changed-row count.
    ///
    /// An empty write-set returns 0 without touching the store. Watchers
    /// are notified only when at least one row changed.
    pub fn update(
        &self,
        uri: &str,
        values: &BookValues,
        predicate: Option<&str>,
        args: &[Value],
    ) -> ProviderResult<usize> {
        let target = self.resolve(uri)?;

        if values.is_empty() {
            return Ok(0);
        }

        values.validate_update()?;

        let column_values = values.to_column_values();
        let changed = match target {
            BookUri::Collection => self.store.update(&column_values, predicate, args)?,
            BookUri::Item(id) => {
                self.store
                    .update(&column_values, Some(ID_PREDICATE), &[Value::Integer(id)])?
            }
        };

        if changed > 0 {
            info!("event=book_update module=provider status=ok uri={target} rows={changed}");
            self.hub.notify(target);
        }

        Ok(changed)
    }

    /// Deletes records under an address; returns the removed-row count.
    pub fn delete(
        &self,
        uri: &str,
        predicate: Option<&str>,
        args: &[Value],
    ) -> ProviderResult<usize> {
        let target = self.resolve(uri)?;

        let removed = match target {
            BookUri::Collection => self.store.delete(predicate, args)?,
            BookUri::Item(id) => self
                .store
                .delete(Some(ID_PREDICATE), &[Value::Integer(id)])?,
        };

        if removed > 0 {
            info!("event=book_delete module=provider status=ok uri={target} rows={removed}");
            self.hub.notify(target);
        }

        Ok(removed)
    }

    /// Returns the MIME-style type string for an address.
    pub fn type_of(&self, uri: &str) -> ProviderResult<&'static str> {
        match self.resolve(uri)? {
            BookUri::Collection => Ok(CONTENT_LIST_TYPE),
            BookUri::Item(_) => Ok(CONTENT_ITEM_TYPE),
        }
    }

    /// Subscribes to invalidation events for an address scope.
    pub fn subscribe(&self, scope: BookUri) -> Subscription {
        self.hub.subscribe(scope)
    }

    /// Returns the number of active watchers; diagnostic.
    pub fn watcher_count(&self) -> usize {
        self.hub.watcher_count()
    }
}

/// Forced predicate for item addresses; binds the id from the address.
const ID_PREDICATE: &str = "_id = ?";
