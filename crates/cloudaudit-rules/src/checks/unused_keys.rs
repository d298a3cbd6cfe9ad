//! Unused access key rule: flag active keys never used, or last used
//! before a 90-day cutoff.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cloudaudit_core::{
    CellValue, CheckOutcome, ComplianceCheck, Finding, Placeholder, ReportSchema, Result,
};
use tracing::info;

use crate::providers::IamDirectory;
use crate::records::{AccessKeyRecord, KeyStatus};

pub const REPORT_FILENAME: &str = "iam_unused_access_keys.xlsx";
pub const LOG_FILENAME: &str = "iam_keys_audit.log";

/// Default lookback window for "unused".
pub const DEFAULT_THRESHOLD_DAYS: i64 = 90;

static SCHEMA: ReportSchema = ReportSchema {
    sheet_name: "Unused_Access_Keys",
    columns: &[
        "user_name",
        "access_key_id",
        "create_date",
        "last_used",
        "age_days",
    ],
    totals_column: "total_unused_keys",
    placeholder: Placeholder::HeadersOnly,
};

/// A key is unused when it has never been used, or its last use is
/// strictly older than the cutoff. Use exactly at the cutoff instant
/// counts as still-used.
pub fn key_is_unused(last_used: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    match last_used {
        None => true,
        Some(t) => t < cutoff,
    }
}

fn key_finding(
    user_name: &str,
    key: &AccessKeyRecord,
    last_used: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Finding {
    let create_cell = key
        .create_date
        .map(CellValue::Timestamp)
        .unwrap_or(CellValue::Empty);
    let last_used_cell = last_used.map(CellValue::Timestamp).unwrap_or(CellValue::Empty);
    let age_cell = key
        .create_date
        .map(|created| CellValue::Int((now - created).num_days()))
        .unwrap_or(CellValue::Empty);

    Finding::new(vec![
        CellValue::Text(user_name.to_string()),
        CellValue::Text(key.access_key_id.clone()),
        create_cell,
        last_used_cell,
        age_cell,
    ])
}

/// "Active access keys must have been used within the last 90 days."
pub struct UnusedKeysCheck<P> {
    directory: P,
    threshold_days: i64,
}

impl<P> UnusedKeysCheck<P> {
    pub fn new(directory: P) -> Self {
        Self {
            directory,
            threshold_days: DEFAULT_THRESHOLD_DAYS,
        }
    }

    pub fn with_threshold_days(mut self, threshold_days: i64) -> Self {
        self.threshold_days = threshold_days;
        self
    }
}

#[async_trait]
impl<P: IamDirectory> ComplianceCheck for UnusedKeysCheck<P> {
    fn name(&self) -> &'static str {
        "Unused IAM access keys"
    }

    fn schema(&self) -> &ReportSchema {
        &SCHEMA
    }

    fn report_filename(&self) -> &'static str {
        REPORT_FILENAME
    }

    fn log_filename(&self) -> &'static str {
        LOG_FILENAME
    }

    async fn collect(&self) -> Result<CheckOutcome> {
        let now = Utc::now();
        let cutoff = now - Duration::days(self.threshold_days);
        info!(cutoff = %cutoff.format("%Y-%m-%d"), "Scanning IAM users for unused keys");

        let users = self.directory.list_users().await?;
        let mut findings = Vec::new();

        for user in &users {
            for key in self.directory.access_keys(&user.user_name).await? {
                if key.status != KeyStatus::Active {
                    continue;
                }
                let last_used = self.directory.key_last_used(&key.access_key_id).await?;
                if key_is_unused(last_used, cutoff) {
                    findings.push(key_finding(&user.user_name, &key, last_used, now));
                }
            }
        }

        info!(total = findings.len(), "Unused active keys");
        Ok(CheckOutcome::flagged(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryIamDirectory;
    use crate::records::IamUser;
    use chrono::TimeZone;

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_never_used_key_is_unused() {
        assert!(key_is_unused(None, cutoff()));
    }

    #[test]
    fn test_use_exactly_at_cutoff_is_still_used() {
        assert!(!key_is_unused(Some(cutoff()), cutoff()));
    }

    #[test]
    fn test_use_older_than_cutoff_is_unused() {
        assert!(key_is_unused(
            Some(cutoff() - Duration::seconds(1)),
            cutoff()
        ));
    }

    #[test]
    fn test_recent_use_is_still_used() {
        assert!(!key_is_unused(Some(cutoff() + Duration::days(5)), cutoff()));
    }

    fn user(name: &str) -> IamUser {
        IamUser {
            user_name: name.to_string(),
            arn: format!("arn:aws:iam::123456789012:user/{name}"),
            create_date: Utc::now() - Duration::days(400),
        }
    }

    fn key(id: &str, status: KeyStatus) -> AccessKeyRecord {
        AccessKeyRecord {
            access_key_id: id.to_string(),
            status,
            create_date: Some(Utc::now() - Duration::days(200)),
        }
    }

    #[tokio::test]
    async fn test_inactive_keys_are_skipped() {
        let directory = MemoryIamDirectory::new()
            .with_user(user("carol"), 1)
            .with_keys("carol", vec![key("AKIAINACTIVE", KeyStatus::Inactive)]);
        let check = UnusedKeysCheck::new(directory);

        let outcome = check.collect().await.expect("collect failed");
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn test_stale_active_key_is_flagged_with_age() {
        let directory = MemoryIamDirectory::new()
            .with_user(user("carol"), 1)
            .with_keys("carol", vec![key("AKIASTALE", KeyStatus::Active)])
            .with_last_used("AKIASTALE", Some(Utc::now() - Duration::days(120)));
        let check = UnusedKeysCheck::new(directory);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.violations, 1);
        let cells = outcome.findings[0].cells();
        assert_eq!(cells[0], CellValue::Text("carol".to_string()));
        assert_eq!(cells[1], CellValue::Text("AKIASTALE".to_string()));
        assert_eq!(cells[4], CellValue::Int(200));
    }

    #[tokio::test]
    async fn test_recently_used_key_not_flagged() {
        let directory = MemoryIamDirectory::new()
            .with_user(user("carol"), 1)
            .with_keys("carol", vec![key("AKIAFRESH", KeyStatus::Active)])
            .with_last_used("AKIAFRESH", Some(Utc::now() - Duration::days(10)));
        let check = UnusedKeysCheck::new(directory);

        let outcome = check.collect().await.expect("collect failed");
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn test_never_used_active_key_is_flagged() {
        let directory = MemoryIamDirectory::new()
            .with_user(user("carol"), 1)
            .with_keys("carol", vec![key("AKIANEVER", KeyStatus::Active)]);
        let check = UnusedKeysCheck::new(directory);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.violations, 1);
        assert_eq!(outcome.findings[0].cells()[3], CellValue::Empty);
    }

    #[tokio::test]
    async fn test_enumeration_failure_propagates() {
        let check = UnusedKeysCheck::new(MemoryIamDirectory::new().failing());
        assert!(check.collect().await.is_err());
    }
}
