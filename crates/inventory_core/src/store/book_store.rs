//! SQLite-backed record store for the books table.
//!
//! # Responsibility
//! - Provide raw CRUD primitives over canonical `books` storage.
//! - Surface store-level failures (unknown columns, constraint violations)
//!   unchanged to the caller.
//!
//! # Invariants
//! - Predicates are SQL fragments with positional `?` arguments; argument
//!   order is write-set values first, then predicate arguments.
//! - Connections must carry an applied schema before any operation runs.

use crate::contract::TABLE_NAME;
use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One raw result row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for raw table operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    EmptyWriteSet,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not bootstrapped: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` does not exist")
            }
            Self::EmptyWriteSet => write!(f, "write-set contains no columns"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::EmptyWriteSet => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQLite-backed book store borrowing a bootstrapped connection.
pub struct SqliteBookStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookStore<'conn> {
    /// Wraps a connection after verifying it was opened through the db
    /// module (schema applied, books table present).
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(StoreError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [TABLE_NAME],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(StoreError::MissingRequiredTable(TABLE_NAME));
        }

        Ok(Self { conn })
    }

    /// Queries the table with an optional column projection, predicate and
    /// ordering. Unknown projection columns surface as the underlying
    /// SQLite error.
    pub fn query(
        &self,
        projection: Option<&[&str]>,
        predicate: Option<&str>,
        args: &[Value],
        order: Option<&str>,
    ) -> StoreResult<Vec<Row>> {
        let columns = match projection {
            Some(columns) => columns.join(", "),
            None => "*".to_string(),
        };

        let mut sql = format!("SELECT {columns} FROM {TABLE_NAME}");
        if let Some(predicate) = predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        if let Some(order) = order {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = stmt.query(params_from_iter(args.iter().cloned()))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut decoded = Row::new();
            for (index, name) in names.iter().enumerate() {
                decoded.insert(name.clone(), row.get::<_, Value>(index)?);
            }
            result.push(decoded);
        }

        Ok(result)
    }

    /// Inserts one row from column/value pairs and returns the new rowid.
    pub fn insert(&self, values: &[(&str, Value)]) -> StoreResult<i64> {
        if values.is_empty() {
            return Err(StoreError::EmptyWriteSet);
        }

        let columns = values
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!("INSERT INTO {TABLE_NAME} ({columns}) VALUES ({placeholders});");

        self.conn.execute(
            &sql,
            params_from_iter(values.iter().map(|(_, value)| value.clone())),
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Updates matching rows from column/value pairs; returns the count of
    /// rows changed.
    pub fn update(
        &self,
        values: &[(&str, Value)],
        predicate: Option<&str>,
        args: &[Value],
    ) -> StoreResult<usize> {
        if values.is_empty() {
            return Err(StoreError::EmptyWriteSet);
        }

        let assignments = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE {TABLE_NAME} SET {assignments}");
        if let Some(predicate) = predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }

        let bind_values = values
            .iter()
            .map(|(_, value)| value.clone())
            .chain(args.iter().cloned());

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    /// Deletes matching rows; returns the count of rows removed.
    pub fn delete(&self, predicate: Option<&str>, args: &[Value]) -> StoreResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        if let Some(predicate) = predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }

        let removed = self
            .conn
            .execute(&sql, params_from_iter(args.iter().cloned()))?;
        Ok(removed)
    }
}
