//! IAM MFA rule: flag every user with zero enrolled MFA devices.

use async_trait::async_trait;
use cloudaudit_core::report::TIMESTAMP_FORMAT;
use cloudaudit_core::{
    CellValue, CheckOutcome, ComplianceCheck, Finding, Placeholder, ReportSchema, Result,
};
use tracing::{debug, info};

use crate::providers::IamDirectory;
use crate::records::IamUser;

pub const REPORT_FILENAME: &str = "iam_users_without_mfa.xlsx";
pub const LOG_FILENAME: &str = "fafo_audit.log";

static SCHEMA: ReportSchema = ReportSchema {
    sheet_name: "IAM_Users_No_MFA",
    columns: &["user_name", "user_arn", "create_date", "create_date_str"],
    totals_column: "total_non_compliant_users",
    placeholder: Placeholder::HeadersOnly,
};

/// A user is non-compliant when no MFA device is enrolled, regardless
/// of creation date.
pub fn evaluate_user(user: &IamUser, mfa_devices: usize) -> Option<Finding> {
    if mfa_devices > 0 {
        return None;
    }
    Some(Finding::new(vec![
        CellValue::Text(user.user_name.clone()),
        CellValue::Text(user.arn.clone()),
        CellValue::Timestamp(user.create_date),
        CellValue::Text(user.create_date.format(TIMESTAMP_FORMAT).to_string()),
    ]))
}

/// "All IAM users must have MFA enabled."
pub struct IamMfaCheck<P> {
    directory: P,
}

impl<P> IamMfaCheck<P> {
    pub fn new(directory: P) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<P: IamDirectory> ComplianceCheck for IamMfaCheck<P> {
    fn name(&self) -> &'static str {
        "IAM MFA"
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
        info!("Fetching IAM user list via pagination");
        let users = self.directory.list_users().await?;

        let mut findings = Vec::new();
        for user in &users {
            debug!(user = %user.user_name, "Checking MFA enrollment");
            let devices = self.directory.mfa_device_count(&user.user_name).await?;
            if let Some(finding) = evaluate_user(user, devices) {
                findings.push(finding);
            }
        }

        info!(total = findings.len(), "IAM users without MFA");
        Ok(CheckOutcome::flagged(findings))
    }
}
