//! Validation errors for the canonical record model and the normalizers.
//!
//! [`RecordError`] is returned when a record cannot be constructed from the
//! values it was given. [`NormalizeError`] wraps it with the upstream kind and
//! transaction id so a single bad transaction can be skipped and logged.
//!
//! # Examples
//!
//! ```
//! use ledgerbridge::domain::error::RecordError;
//! use ledgerbridge::domain::record::Record;
//!
//! let result = Record::builder().currency("usdt").build();
//! assert!(matches!(result, Err(RecordError::MissingField { field: "amount" })));
//! ```

use thiserror::Error;

use super::transaction::TransactionKind;

/// Errors raised while constructing a [`Record`](super::record::Record).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required field was not provided.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The amount could not be read as a number.
    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount {
        /// The raw value that was rejected.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Amounts are unsigned; direction lives in the record type.
    #[error("amount must not be negative, got {value}")]
    NegativeAmount {
        /// The raw value that was rejected.
        value: String,
    },

    /// Direction was neither `in` nor `out`.
    #[error("invalid record type '{value}', expected 'in' or 'out'")]
    InvalidDirection {
        /// The raw value that was rejected.
        value: String,
    },

    /// Currency codes must be non-empty and alphanumeric.
    #[error("invalid currency code '{value}'")]
    InvalidCurrency {
        /// The raw value that was rejected.
        value: String,
    },

    /// Timestamp cannot be represented as a point in time.
    #[error("invalid date '{value}'")]
    InvalidDate {
        /// The raw value that was rejected.
        value: String,
    },

    /// A field that must carry text was blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the blank field.
        field: &'static str,
    },
}

/// Failure to normalize one upstream transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The transaction carried a zero amount, which is not a transfer.
    #[error("{kind} transaction {id} has a zero amount")]
    ZeroAmount {
        /// Upstream kind.
        kind: TransactionKind,
        /// Upstream transaction id.
        id: String,
    },

    /// The transaction could not be turned into a valid record.
    #[error("{kind} transaction {id} rejected: {source}")]
    Invalid {
        /// Upstream kind.
        kind: TransactionKind,
        /// Upstream transaction id.
        id: String,
        /// Underlying validation error.
        #[source]
        source: RecordError,
    },
}

impl NormalizeError {
    /// Wrap a record validation error with transaction context.
    pub fn invalid(kind: TransactionKind, id: impl Into<String>, source: RecordError) -> Self {
        Self::Invalid {
            kind,
            id: id.into(),
            source,
        }
    }

    /// Upstream kind of the rejected transaction.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::ZeroAmount { kind, .. } | Self::Invalid { kind, .. } => *kind,
        }
    }

    /// Upstream id of the rejected transaction.
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        match self {
            Self::ZeroAmount { id, .. } | Self::Invalid { id, .. } => id,
        }
    }
}
