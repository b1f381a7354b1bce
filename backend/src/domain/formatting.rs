//! Formatting helpers shared by handlers and exports: time-string parsing,
//! price rendering and URL normalisation. All functions are pure.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::domain::TimeOfDay;

/// Errors raised by the formatting helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormattingError {
    #[error("'{value}' is not a valid time; use HH:MM or h:mm am/pm")]
    InvalidTime { value: String },
    #[error("'{value}' is not a valid URL: {reason}")]
    InvalidUrl { value: String, reason: String },
}

static TIME_24H_RE: OnceLock<Regex> = OnceLock::new();
static TIME_12H_RE: OnceLock<Regex> = OnceLock::new();

fn time_24h_regex() -> &'static Regex {
    TIME_24H_RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$")
            .unwrap_or_else(|error| panic!("24h time regex failed to compile: {error}"))
    })
}

fn time_12h_regex() -> &'static Regex {
    TIME_12H_RE.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*([ap])\.?\s*m\.?$")
            .unwrap_or_else(|error| panic!("12h time regex failed to compile: {error}"))
    })
}

/// Parse a 24-hour (`9:05`, `17:30`, `17:30:00`) or 12-hour (`9am`,
/// `9:30 PM`, `12 a.m.`) time string.
///
/// # Examples
/// ```
/// use barberbook::domain::formatting::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("9:30 pm").unwrap().to_string(), "21:30");
/// assert_eq!(parse_time_of_day("12am").unwrap().to_string(), "00:00");
/// assert_eq!(parse_time_of_day("07:05").unwrap().to_string(), "07:05");
/// ```
pub fn parse_time_of_day(raw: &str) -> Result<TimeOfDay, FormattingError> {
    let value = raw.trim();
    let invalid = || FormattingError::InvalidTime {
        value: raw.to_owned(),
    };

    if let Some(caps) = time_24h_regex().captures(value) {
        let hour = number(caps.get(1)).ok_or_else(invalid)?;
        let minute = number(caps.get(2)).ok_or_else(invalid)?;
        let second = number(caps.get(3)).unwrap_or(0);
        if hour > 23 || minute > 59 || second > 59 {
            return Err(invalid());
        }
        return TimeOfDay::from_hm(hour, minute).ok_or_else(invalid);
    }

    if let Some(caps) = time_12h_regex().captures(value) {
        let hour = number(caps.get(1)).ok_or_else(invalid)?;
        let minute = number(caps.get(2)).unwrap_or(0);
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(invalid());
        }
        let is_pm = caps
            .get(3)
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("p"));
        let hour24 = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        return TimeOfDay::from_hm(hour24, minute).ok_or_else(invalid);
    }

    Err(invalid())
}

fn number(m: Option<regex::Match<'_>>) -> Option<u16> {
    m.and_then(|m| m.as_str().parse().ok())
}

/// Render integer cents as a dollar amount, e.g. `$12.50`.
///
/// # Examples
/// ```
/// use barberbook::domain::formatting::format_price;
///
/// assert_eq!(format_price(2500), "$25.00");
/// assert_eq!(format_price(-199), "-$1.99");
/// ```
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Normalise a user-supplied link: trim, default to `https://` when no
/// scheme is given, and accept only http(s) URLs with a host.
///
/// # Examples
/// ```
/// use barberbook::domain::formatting::normalize_url;
///
/// assert_eq!(
///     normalize_url(" instagram.com/fadesbyjo ").unwrap(),
///     "https://instagram.com/fadesbyjo"
/// );
/// ```
pub fn normalize_url(raw: &str) -> Result<String, FormattingError> {
    let value = raw.trim();
    let invalid = |reason: &str| FormattingError::InvalidUrl {
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };
    if value.is_empty() {
        return Err(invalid("empty"));
    }

    let candidate = if value.contains("://") {
        value.to_owned()
    } else {
        format!("https://{value}")
    };

    let url = Url::parse(&candidate).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https links are allowed"));
    }
    match url.host_str() {
        Some(host) if host.contains('.') || host == "localhost" => Ok(url.to_string()),
        _ => Err(invalid("missing host")),
    }
}

/// Normalise an optional link, treating blank input as absent.
pub fn normalize_optional_url(raw: Option<&str>) -> Result<Option<String>, FormattingError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_url(value).map(Some),
    }
}
