//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose `details` carry
//! the offending field, a stable code and, where useful, the raw value.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidDate,
    InvalidValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidDate => "invalid_date",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field, as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
        None,
    )
}

/// Wrap a domain validation failure for `field`.
pub(crate) fn invalid_field_error(field: FieldName, reason: impl Display) -> Error {
    field_error(field, reason.to_string(), ErrorCode::InvalidValue, None)
}

/// Unwrap a required field or report it missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            Some(value),
        )
    })
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_optional_user_id(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<UserId>, Error> {
    value.map(|raw| parse_user_id(raw, field)).transpose()
}

pub(crate) fn parse_rfc3339_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                ErrorCode::InvalidTimestamp,
                Some(value),
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            format!("{} must be a YYYY-MM-DD date", field.as_str()),
            ErrorCode::InvalidDate,
            Some(value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const STARTS_AT: FieldName = FieldName::new("startsAt");

    #[rstest]
    fn missing_field_names_the_field() {
        let err = missing_field_error(FieldName::new("serviceId"));
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "serviceId", "code": "missing_field" }))
        );
    }

    #[rstest]
    #[case("2026-03-02T09:00:00Z", 9)]
    #[case("2026-03-02T10:00:00+01:00", 9)]
    fn timestamps_normalise_to_utc(#[case] raw: &str, #[case] hour: u32) {
        use chrono::Timelike;
        let parsed = parse_rfc3339_timestamp(raw, STARTS_AT).expect("valid timestamp");
        assert_eq!(parsed.hour(), hour);
    }

    #[rstest]
    fn bad_timestamp_echoes_the_value() {
        let err = parse_rfc3339_timestamp("tomorrow", STARTS_AT).expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "startsAt", "value": "tomorrow", "code": "invalid_timestamp" }))
        );
    }

    #[rstest]
    #[case("2026-02-30")]
    #[case("02/03/2026")]
    fn rejects_bad_dates(#[case] raw: &str) {
        let err = parse_date(raw, FieldName::new("date")).expect_err("invalid date");
        assert_eq!(err.details().and_then(|d| d.get("code")), Some(&json!("invalid_date")));
    }

    #[rstest]
    fn user_ids_parse_from_uuid_strings() {
        let id = parse_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", FieldName::new("id"))
            .expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert!(parse_user_id("nope", FieldName::new("id")).is_err());
    }
}
