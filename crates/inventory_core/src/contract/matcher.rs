//! Address routing table for provider operations.
//!
//! # Responsibility
//! - Compile registered `(authority, path pattern)` pairs into an immutable
//!   matching structure.
//! - Classify incoming addresses into routing codes.
//!
//! # Invariants
//! - The matcher is built once at provider construction; it is never a
//!   process-wide mutable singleton.
//! - Path patterns support `#` (one numeric segment) and `*` (one arbitrary
//!   segment); everything else matches literally.

use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Routing codes for the two recognized book address shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookMatch {
    /// Whole collection (`books`).
    Books,
    /// Single record by id (`books/<id>`).
    BookId,
}

/// Contract-level error for matcher construction.
#[derive(Debug)]
pub enum ContractError {
    InvalidPathPattern { pattern: String, message: String },
}

impl Display for ContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPathPattern { pattern, message } => {
                write!(f, "invalid path pattern `{pattern}`: {message}")
            }
        }
    }
}

impl Error for ContractError {}

struct Route<C> {
    authority: String,
    path: Regex,
    code: C,
}

/// Immutable address-to-code routing table.
///
/// Generic over the routing code so other collections could reuse it, but
/// in this crate only [`book_uri_matcher`] instantiates it.
pub struct UriMatcher<C: Copy> {
    routes: Vec<Route<C>>,
}

impl<C: Copy> UriMatcher<C> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers one `(authority, path pattern)` route.
    pub fn add_uri(
        &mut self,
        authority: &str,
        path_pattern: &str,
        code: C,
    ) -> Result<(), ContractError> {
        let path = compile_path_pattern(path_pattern)?;
        self.routes.push(Route {
            authority: authority.to_string(),
            path,
            code,
        });
        Ok(())
    }

    /// Matches a full `content://authority/path` address against registered
    /// routes. Returns the first matching code, or `None`.
    pub fn match_uri(&self, uri: &str) -> Option<C> {
        let rest = uri.strip_prefix("content://")?;
        let (authority, path) = rest.split_once('/')?;

        self.routes
            .iter()
            .find(|route| route.authority == authority && route.path.is_match(path))
            .map(|route| route.code)
    }
}

impl<C: Copy> Default for UriMatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the routing table for book addresses.
pub fn book_uri_matcher() -> Result<UriMatcher<BookMatch>, ContractError> {
    let mut matcher = UriMatcher::new();
    matcher.add_uri(super::CONTENT_AUTHORITY, super::PATH_BOOKS, BookMatch::Books)?;
    matcher.add_uri(
        super::CONTENT_AUTHORITY,
        &format!("{}/#", super::PATH_BOOKS),
        BookMatch::BookId,
    )?;
    Ok(matcher)
}

/// Extracts the trailing numeric segment of an item address.
///
/// Callers must only pass addresses already classified as item-shaped;
/// overly long ids that do not fit `i64` yield `None`.
pub fn parse_item_id(uri: &str) -> Option<i64> {
    uri.rsplit('/').next()?.parse().ok()
}

fn compile_path_pattern(pattern: &str) -> Result<Regex, ContractError> {
    let mut expr = String::from("^");
    for (index, segment) in pattern.split('/').enumerate() {
        if index > 0 {
            expr.push('/');
        }
        match segment {
            "#" => expr.push_str("[0-9]+"),
            "*" => expr.push_str("[^/]+"),
            literal => expr.push_str(&regex::escape(literal)),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|err| ContractError::InvalidPathPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{book_uri_matcher, parse_item_id, BookMatch};
    use crate::contract::BookUri;

    #[test]
    fn matches_collection_and_item_addresses() {
        let matcher = book_uri_matcher().expect("static routes should compile");

        assert_eq!(
            matcher.match_uri(&BookUri::Collection.to_string()),
            Some(BookMatch::Books)
        );
        assert_eq!(
            matcher.match_uri(&BookUri::Item(3).to_string()),
            Some(BookMatch::BookId)
        );
    }

    #[test]
    fn rejects_foreign_and_malformed_addresses() {
        let matcher = book_uri_matcher().expect("static routes should compile");

        assert_eq!(matcher.match_uri("books"), None);
        assert_eq!(matcher.match_uri("content://books"), None);
        assert_eq!(
            matcher.match_uri("content://other.authority/books"),
            None
        );
        assert_eq!(
            matcher.match_uri("content://com.example.android.inventoryapp/pens"),
            None
        );
        assert_eq!(
            matcher.match_uri("content://com.example.android.inventoryapp/books/abc"),
            None
        );
        assert_eq!(
            matcher.match_uri("content://com.example.android.inventoryapp/books/1/extra"),
            None
        );
    }

    #[test]
    fn parse_item_id_reads_trailing_segment() {
        assert_eq!(
            parse_item_id("content://com.example.android.inventoryapp/books/15"),
            Some(15)
        );
        assert_eq!(
            parse_item_id("content://com.example.android.inventoryapp/books/99999999999999999999"),
            None
        );
    }
}
