//! Shared translation of pool and Diesel failures into port errors.
//!
//! Every port error enum exposes `connection(..)` and `query(..)`
//! constructors, so repositories pass those in and add their own arms for
//! constraint violations they care about.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constraint violations repositories translate into domain variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
}

/// Classify a Diesel error as a constraint violation, if it is one.
pub(crate) fn violation(error: &DieselError) -> Option<Violation> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Some(Violation::Unique),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Some(Violation::ForeignKey)
        }
        _ => None,
    }
}

/// Pool checkout and build failures become connection errors.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel error to `query` or `connection`.
///
/// Messages are generic; the database detail is logged at `debug`.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), constraint = ?info.constraint_name(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            query("stored value could not be converted")
        }
        _ => query("database error"),
    }
}

/// Implement `From` for pool, Diesel and row conversion failures on a port
/// error so repository bodies can use `?` directly.
macro_rules! impl_persistence_error_from {
    ($error:ty) => {
        impl From<$crate::outbound::persistence::PoolError> for $error {
            fn from(error: $crate::outbound::persistence::PoolError) -> Self {
                $crate::outbound::persistence::error_mapping::map_pool_error(
                    error,
                    <$error>::connection,
                )
            }
        }

        impl From<diesel::result::Error> for $error {
            fn from(error: diesel::result::Error) -> Self {
                $crate::outbound::persistence::error_mapping::map_diesel_error(
                    error,
                    <$error>::query,
                    <$error>::connection,
                )
            }
        }

        impl From<$crate::outbound::persistence::models::RowConversionError> for $error {
            fn from(error: $crate::outbound::persistence::models::RowConversionError) -> Self {
                tracing::warn!(%error, "stored row failed validation");
                <$error>::query(error.to_string())
            }
        }
    };
}

pub(crate) use impl_persistence_error_from;

/// Convert a stored non-negative count into `u32`, clamping corrupt values.
pub(crate) fn count_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Convert a SQL `COUNT(*)` into `u64`.
pub(crate) fn count_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Convert an affected-row count into `u64`.
pub(crate) fn rows_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
