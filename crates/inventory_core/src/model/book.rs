//! Book record, write-set and validation rules.
//!
//! # Responsibility
//! - Define the fully materialized `Book` record and the `BookValues`
//!   write-set used by insert/update paths.
//! - Enforce field rules: required names/phone non-empty, price and
//!   quantity non-negative.
//!
//! # Invariants
//! - Validation fails fast; the first violating field wins.
//! - Update validation only checks fields present in the write-set, so
//!   partial updates stay legal.

use crate::contract::{
    COLUMN_ID, COLUMN_PRICE, COLUMN_PRODUCT_NAME, COLUMN_QUANTITY, COLUMN_SUPPLIER_NAME,
    COLUMN_SUPPLIER_PHONE,
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One row of the books table, fully materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(rename = "supplierName")]
    pub supplier_name: String,
    #[serde(rename = "supplierPhoneNumber")]
    pub supplier_phone: String,
}

impl Book {
    /// Decodes a raw store row into a typed record.
    ///
    /// Rejects malformed persisted state with a descriptive error instead
    /// of masking it. Requires a full (non-projected) row.
    pub fn from_row(row: &BTreeMap<String, Value>) -> Result<Self, BookDecodeError> {
        Ok(Self {
            id: integer_column(row, COLUMN_ID)?,
            product_name: text_column(row, COLUMN_PRODUCT_NAME)?,
            price: real_column(row, COLUMN_PRICE)?,
            quantity: integer_column(row, COLUMN_QUANTITY)?,
            supplier_name: text_column(row, COLUMN_SUPPLIER_NAME)?,
            supplier_phone: text_column(row, COLUMN_SUPPLIER_PHONE)?,
        })
    }
}

/// Partial write-set for insert/update operations.
///
/// `None` means "absent from this write": the store default applies at
/// insert time, and the stored value is left untouched at update time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookValues {
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub supplier_name: Option<String>,
    pub supplier_phone: Option<String>,
}

impl BookValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product_name(mut self, value: impl Into<String>) -> Self {
        self.product_name = Some(value.into());
        self
    }

    pub fn with_price(mut self, value: f64) -> Self {
        self.price = Some(value);
        self
    }

    pub fn with_quantity(mut self, value: i64) -> Self {
        self.quantity = Some(value);
        self
    }

    pub fn with_supplier_name(mut self, value: impl Into<String>) -> Self {
        self.supplier_name = Some(value.into());
        self
    }

    pub fn with_supplier_phone(mut self, value: impl Into<String>) -> Self {
        self.supplier_phone = Some(value.into());
        self
    }

    /// Returns whether no field is present in this write-set.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.supplier_name.is_none()
            && self.supplier_phone.is_none()
    }

    /// Validates an insert write-set: required fields must be present and
    /// non-empty, optional numeric fields must be non-negative when present.
    pub fn validate_insert(&self) -> Result<(), ValidationError> {
        require_text(COLUMN_PRODUCT_NAME, self.product_name.as_deref(), "product requires a name")?;
        self.validate_numeric_fields()?;
        require_text(
            COLUMN_SUPPLIER_NAME,
            self.supplier_name.as_deref(),
            "supplier requires a name",
        )?;
        require_text(
            COLUMN_SUPPLIER_PHONE,
            self.supplier_phone.as_deref(),
            "supplier requires a phone number",
        )?;
        Ok(())
    }

    /// Validates an update write-set: only present fields are checked, with
    /// the same per-field rules as at insert time.
    pub fn validate_update(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.product_name.as_deref() {
            require_text(COLUMN_PRODUCT_NAME, Some(name), "product requires a name")?;
        }
        self.validate_numeric_fields()?;
        if let Some(name) = self.supplier_name.as_deref() {
            require_text(COLUMN_SUPPLIER_NAME, Some(name), "supplier requires a name")?;
        }
        if let Some(phone) = self.supplier_phone.as_deref() {
            require_text(
                COLUMN_SUPPLIER_PHONE,
                Some(phone),
                "supplier requires a phone number",
            )?;
        }
        Ok(())
    }

    /// Returns present fields as column/value pairs for the store.
    pub fn to_column_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        if let Some(name) = &self.product_name {
            values.push((COLUMN_PRODUCT_NAME, Value::Text(name.clone())));
        }
        if let Some(price) = self.price {
            values.push((COLUMN_PRICE, Value::Real(price)));
        }
        if let Some(quantity) = self.quantity {
            values.push((COLUMN_QUANTITY, Value::Integer(quantity)));
        }
        if let Some(name) = &self.supplier_name {
            values.push((COLUMN_SUPPLIER_NAME, Value::Text(name.clone())));
        }
        if let Some(phone) = &self.supplier_phone {
            values.push((COLUMN_SUPPLIER_PHONE, Value::Text(phone.clone())));
        }
        values
    }

    fn validate_numeric_fields(&self) -> Result<(), ValidationError> {
        if let Some(price) = self.price {
            if price.is_nan() || price < 0.0 {
                return Err(ValidationError::new(
                    COLUMN_PRICE,
                    "price must be a non-negative number",
                ));
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(ValidationError::new(
                    COLUMN_QUANTITY,
                    "quantity cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// Field-level validation failure with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl Error for ValidationError {}

/// Error for malformed persisted rows surfacing on decode paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookDecodeError {
    MissingColumn(&'static str),
    InvalidValue {
        column: &'static str,
        detail: String,
    },
}

impl Display for BookDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn(column) => write!(f, "row is missing column `{column}`"),
            Self::InvalidValue { column, detail } => {
                write!(f, "invalid value in column `{column}`: {detail}")
            }
        }
    }
}

impl Error for BookDecodeError {}

fn require_text(
    field: &'static str,
    value: Option<&str>,
    reason: &'static str,
) -> Result<(), ValidationError> {
    match value {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(ValidationError::new(field, reason)),
    }
}

fn column<'row>(
    row: &'row BTreeMap<String, Value>,
    name: &'static str,
) -> Result<&'row Value, BookDecodeError> {
    row.get(name).ok_or(BookDecodeError::MissingColumn(name))
}

fn integer_column(row: &BTreeMap<String, Value>, name: &'static str) -> Result<i64, BookDecodeError> {
    match column(row, name)? {
        Value::Integer(value) => Ok(*value),
        other => Err(BookDecodeError::InvalidValue {
            column: name,
            detail: format!("expected integer, got {other:?}"),
        }),
    }
}

fn real_column(row: &BTreeMap<String, Value>, name: &'static str) -> Result<f64, BookDecodeError> {
    match column(row, name)? {
        Value::Real(value) => Ok(*value),
        // REAL column affinity normally converts, but an integer literal can
        // still come back for rows written outside this crate.
        Value::Integer(value) => Ok(*value as f64),
        other => Err(BookDecodeError::InvalidValue {
            column: name,
            detail: format!("expected real, got {other:?}"),
        }),
    }
}

fn text_column(row: &BTreeMap<String, Value>, name: &'static str) -> Result<String, BookDecodeError> {
    match column(row, name)? {
        Value::Text(value) => Ok(value.clone()),
        other => Err(BookDecodeError::InvalidValue {
            column: name,
            detail: format!("expected text, got {other:?}"),
        }),
    }
}
