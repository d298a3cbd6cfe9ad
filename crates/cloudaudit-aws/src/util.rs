//! Conversions between SDK primitives and the domain model.

use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::DateTime as SmithyDateTime;
use chrono::{DateTime, Utc};
use cloudaudit_core::AuditError;

/// Map an SDK error into the domain provider error, tagged with the
/// API call it came from (e.g. `iam:ListUsers`).
pub(crate) fn sdk_err<E: std::error::Error>(context: &'static str, err: E) -> AuditError {
    AuditError::provider(context, DisplayErrorContext(&err))
}

/// Convert an SDK timestamp to chrono UTC. Out-of-range timestamps
/// collapse to the Unix epoch rather than panicking.
pub(crate) fn to_utc(dt: &SmithyDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()).unwrap_or_default()
}

/// Parse an ISO-8601 string timestamp (GuardDuty wire format).
pub(crate) fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_utc_roundtrip() {
        let dt = SmithyDateTime::from_secs(1_700_000_000);
        assert_eq!(to_utc(&dt).timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_iso_guardduty_format() {
        let parsed = parse_iso("2024-05-01T12:30:00.000Z").expect("parse failed");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_iso_rejects_garbage() {
        assert!(parse_iso("yesterday").is_none());
    }
}
