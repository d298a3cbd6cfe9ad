//! EC2 hardening rule: termination protection, EBS encryption, and
//! public IP exposure, across every enabled region.

use async_trait::async_trait;
use cloudaudit_core::{
    AuditError, CellValue, CheckOutcome, ComplianceCheck, Finding, Placeholder, ReportSchema,
    Result,
};
use tracing::{info, warn};

use crate::providers::InstanceFleet;
use crate::records::Ec2Instance;

pub const REPORT_FILENAME: &str = "ec2_compliance_report.xlsx";
pub const LOG_FILENAME: &str = "ec2_audit.log";

/// Instances in this state are skipped before any evaluation.
pub const TERMINATED_STATE: &str = "terminated";

// `status` is a permanent column so the placeholder row fits the same
// schema as real findings.
static SCHEMA: ReportSchema = ReportSchema {
    sheet_name: "EC2_Compliance",
    columns: &[
        "status",
        "instance_id",
        "instance_type",
        "state",
        "region",
        "launch_time",
        "issues",
    ],
    totals_column: "total_noncompliant_instances",
    placeholder: Placeholder::InfoRow {
        column: "status",
        message: "All EC2 instances are compliant",
    },
};

/// Issue strings for one instance. `protection` carries the lookup
/// result: a failed attribute fetch is recorded in-band rather than
/// aborting the run (this rule only — see the volume lookup below).
pub fn instance_issues(
    instance: &Ec2Instance,
    protection: std::result::Result<bool, String>,
    unencrypted_volumes: &[String],
) -> Vec<String> {
    let mut issues = Vec::new();

    match protection {
        Ok(false) => issues.push("Termination protection disabled".to_string()),
        Ok(true) => {}
        Err(message) => issues.push(format!("API error: {message}")),
    }

    if instance.public_ip.is_some() {
        issues.push("Has public IP address".to_string());
    }

    for volume_id in unencrypted_volumes {
        issues.push(format!("Volume {volume_id} is not encrypted"));
    }

    issues
}

fn instance_finding(instance: &Ec2Instance, region: &str, issues: Vec<String>) -> Finding {
    Finding::new(vec![
        CellValue::Text("Non-compliant".to_string()),
        CellValue::Text(instance.instance_id.clone()),
        CellValue::Text(instance.instance_type.clone()),
        CellValue::Text(instance.state.clone()),
        CellValue::Text(region.to_string()),
        instance
            .launch_time
            .map(CellValue::Timestamp)
            .unwrap_or(CellValue::Empty),
        CellValue::Text(issues.join("; ")),
    ])
}

/// "EC2 instances must be hardened": termination protection enabled,
/// all attached EBS volumes encrypted, no public IP address.
pub struct Ec2HardeningCheck<P> {
    fleet: P,
}

impl<P> Ec2HardeningCheck<P> {
    pub fn new(fleet: P) -> Self {
        Self { fleet }
    }
}

#[async_trait]
impl<P: InstanceFleet> ComplianceCheck for Ec2HardeningCheck<P> {
    fn name(&self) -> &'static str {
        "EC2 hardening"
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
        let regions = self.fleet.regions().await?;
        info!(regions = regions.len(), "Scanning EC2 instances per region");

        let mut findings = Vec::new();

        // Regions are scanned serially in provider order; a failure in
        // any region is a hard error for the whole run.
        for region in &regions {
            for instance in self.fleet.instances(region).await? {
                if instance.state == TERMINATED_STATE {
                    continue;
                }

                let protection = self
                    .fleet
                    .termination_protection(region, &instance.instance_id)
                    .await
                    .map_err(|e: AuditError| {
                        warn!(instance = %instance.instance_id, "Attribute lookup failed");
                        e.to_string()
                    });

                let mut unencrypted = Vec::new();
                for volume_id in &instance.volume_ids {
                    // Volume lookup failures propagate, unlike the
                    // attribute lookup above.
                    if !self.fleet.volume_encrypted(region, volume_id).await? {
                        unencrypted.push(volume_id.clone());
                    }
                }

                let issues = instance_issues(&instance, protection, &unencrypted);
                if !issues.is_empty() {
                    findings.push(instance_finding(&instance, region, issues));
                }
            }
        }

        info!(total = findings.len(), "Non-compliant EC2 instances");
        Ok(CheckOutcome::flagged(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryInstanceFleet;
    use chrono::{TimeZone, Utc};

    fn instance(id: &str, state: &str, volume_ids: Vec<&str>) -> Ec2Instance {
        Ec2Instance {
            instance_id: id.to_string(),
            instance_type: "t3.micro".to_string(),
            state: state.to_string(),
            public_ip: None,
            launch_time: Some(Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap()),
            volume_ids: volume_ids.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_compliant_instance_has_no_issues() {
        let inst = instance("i-1", "running", vec![]);
        assert!(instance_issues(&inst, Ok(true), &[]).is_empty());
    }

    #[test]
    fn test_all_three_predicates() {
        let mut inst = instance("i-1", "running", vec!["vol-1"]);
        inst.public_ip = Some("54.0.0.1".to_string());
        let issues = instance_issues(&inst, Ok(false), &["vol-1".to_string()]);
        assert_eq!(
            issues,
            vec![
                "Termination protection disabled",
                "Has public IP address",
                "Volume vol-1 is not encrypted",
            ]
        );
    }

    #[test]
    fn test_attribute_error_recorded_in_band() {
        let inst = instance("i-1", "running", vec![]);
        let issues = instance_issues(&inst, Err("access denied".to_string()), &[]);
        assert_eq!(issues, vec!["API error: access denied"]);
    }

    #[tokio::test]
    async fn test_terminated_instance_excluded_even_if_unencrypted() {
        let fleet = MemoryInstanceFleet::new()
            .with_region("us-east-1", vec![instance("i-dead", "terminated", vec!["vol-raw"])])
            .with_volume("vol-raw", false);
        let check = Ec2HardeningCheck::new(fleet);

        let outcome = check.collect().await.expect("collect failed");
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn test_unencrypted_volume_flagged() {
        let fleet = MemoryInstanceFleet::new()
            .with_region("us-east-1", vec![instance("i-1", "running", vec!["vol-1"])])
            .with_protection("i-1", true)
            .with_volume("vol-1", false);
        let check = Ec2HardeningCheck::new(fleet);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.violations, 1);
        let cells = outcome.findings[0].cells();
        assert_eq!(cells[0], CellValue::Text("Non-compliant".to_string()));
        assert_eq!(
            cells[6],
            CellValue::Text("Volume vol-1 is not encrypted".to_string())
        );
    }

    #[tokio::test]
    async fn test_protection_lookup_error_is_in_band_finding() {
        let fleet = MemoryInstanceFleet::new()
            .with_region("us-east-1", vec![instance("i-1", "running", vec![])])
            .with_protection_error("i-1");
        let check = Ec2HardeningCheck::new(fleet);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.violations, 1);
        match &outcome.findings[0].cells()[6] {
            CellValue::Text(issues) => assert!(issues.starts_with("API error:")),
            other => panic!("unexpected cell: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_region_enumeration_failure_is_hard_error() {
        let fleet = MemoryInstanceFleet::new()
            .with_region("us-east-1", vec![instance("i-1", "running", vec![])])
            .with_protection("i-1", true)
            .failing_region("eu-west-1")
            .with_region("eu-west-1", vec![]);
        let check = Ec2HardeningCheck::new(fleet);

        assert!(check.collect().await.is_err());
    }

    #[tokio::test]
    async fn test_volume_lookup_failure_is_hard_error() {
        let fleet = MemoryInstanceFleet::new()
            .with_region("us-east-1", vec![instance("i-1", "running", vec!["vol-1"])])
            .with_protection("i-1", true)
            .failing_volume_lookup();
        let check = Ec2HardeningCheck::new(fleet);

        assert!(check.collect().await.is_err());
    }

    #[tokio::test]
    async fn test_results_follow_region_list_order() {
        let fleet = MemoryInstanceFleet::new()
            .with_region("us-west-2", vec![instance("i-west", "running", vec![])])
            .with_region("us-east-1", vec![instance("i-east", "running", vec![])]);
        let check = Ec2HardeningCheck::new(fleet);

        let outcome = check.collect().await.expect("collect failed");
        // Both lack termination protection, so both are flagged, in
        // region-list order.
        assert_eq!(
            outcome.findings[0].cells()[1],
            CellValue::Text("i-west".to_string())
        );
        assert_eq!(
            outcome.findings[1].cells()[1],
            CellValue::Text("i-east".to_string())
        );
    }
}
