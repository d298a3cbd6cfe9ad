//! GuardDuty rule: summarise findings updated in the last 24 hours,
//! bucketed into severity bands.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cloudaudit_core::{
    CellValue, CheckOutcome, ComplianceCheck, Finding, Placeholder, ReportSchema, Result,
};
use tracing::info;

use crate::providers::ThreatDetector;
use crate::records::ThreatFinding;

pub const REPORT_FILENAME: &str = "guardduty_findings_summary.xlsx";
pub const LOG_FILENAME: &str = "guardduty_audit.log";

/// Lookback window applied to the `updated_at` timestamp.
pub const LOOKBACK_HOURS: i64 = 24;

static SCHEMA: ReportSchema = ReportSchema {
    sheet_name: "GD_Findings_Summary",
    columns: &["severity", "count"],
    totals_column: "total_findings",
    placeholder: Placeholder::HeadersOnly,
};

/// Severity bands, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityBand {
    pub const ALL: [SeverityBand; 4] = [
        SeverityBand::Low,
        SeverityBand::Medium,
        SeverityBand::High,
        SeverityBand::Critical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Low => "Low",
            SeverityBand::Medium => "Medium",
            SeverityBand::High => "High",
            SeverityBand::Critical => "Critical",
        }
    }
}

/// Band a severity score: [0, 3.9) Low, [3.9, 6.9) Medium,
/// [6.9, 8.9) High, [8.9, 10] Critical. Scores outside [0, 10] fall
/// in no band.
pub fn severity_band(severity: f64) -> Option<SeverityBand> {
    if (0.0..3.9).contains(&severity) {
        Some(SeverityBand::Low)
    } else if (3.9..6.9).contains(&severity) {
        Some(SeverityBand::Medium)
    } else if (6.9..8.9).contains(&severity) {
        Some(SeverityBand::High)
    } else if (8.9..=10.0).contains(&severity) {
        Some(SeverityBand::Critical)
    } else {
        None
    }
}

/// Whether a finding falls inside the lookback window. Findings with
/// no `updated_at` are excluded.
pub fn within_lookback(finding: &ThreatFinding, since: DateTime<Utc>) -> bool {
    finding.updated_at.map_or(false, |t| t >= since)
}

/// "Recent GuardDuty findings must be reviewed": one summary row per
/// severity band over the last 24 hours.
pub struct GuardDutyCheck<P> {
    detector: P,
}

impl<P> GuardDutyCheck<P> {
    pub fn new(detector: P) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl<P: ThreatDetector> ComplianceCheck for GuardDutyCheck<P> {
    fn name(&self) -> &'static str {
        "GuardDuty findings"
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
        let since = Utc::now() - Duration::hours(LOOKBACK_HOURS);

        let detector_ids = self.detector.detector_ids().await?;
        info!(detectors = detector_ids.len(), "Collecting GuardDuty findings");

        let mut counts = [0usize; 4];
        let mut total = 0usize;

        for detector_id in &detector_ids {
            let findings = self
                .detector
                .findings_updated_since(detector_id, since)
                .await?;
            for finding in &findings {
                // The provider already filters server-side; re-apply
                // the window so the rule does not depend on it.
                if !within_lookback(finding, since) {
                    continue;
                }
                if let Some(band) = severity_band(finding.severity) {
                    counts[band as usize] += 1;
                    total += 1;
                }
            }
        }

        info!(total, "GuardDuty findings in the last 24h");

        if total == 0 {
            return Ok(CheckOutcome::aggregated(Vec::new(), 0));
        }

        // All four bands are reported, zero counts included.
        let rows = SeverityBand::ALL
            .iter()
            .map(|band| {
                Finding::new(vec![
                    CellValue::Text(band.label().to_string()),
                    CellValue::Int(counts[*band as usize] as i64),
                ])
            })
            .collect();

        Ok(CheckOutcome::aggregated(rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryThreatDetector;

    #[test]
    fn test_band_boundaries_are_lower_inclusive() {
        assert_eq!(severity_band(0.0), Some(SeverityBand::Low));
        assert_eq!(severity_band(3.8), Some(SeverityBand::Low));
        assert_eq!(severity_band(3.9), Some(SeverityBand::Medium));
        assert_eq!(severity_band(6.8), Some(SeverityBand::Medium));
        assert_eq!(severity_band(6.9), Some(SeverityBand::High));
        assert_eq!(severity_band(8.8), Some(SeverityBand::High));
        assert_eq!(severity_band(8.9), Some(SeverityBand::Critical));
        assert_eq!(severity_band(10.0), Some(SeverityBand::Critical));
    }

    #[test]
    fn test_out_of_range_severity_has_no_band() {
        assert_eq!(severity_band(-0.1), None);
        assert_eq!(severity_band(10.1), None);
    }

    fn finding(id: &str, severity: f64, updated_at: DateTime<Utc>) -> ThreatFinding {
        ThreatFinding {
            id: id.to_string(),
            finding_type: "Recon:EC2/PortProbeUnprotectedPort".to_string(),
            severity,
            title: "Port probe".to_string(),
            region: "us-east-1".to_string(),
            created_at: Some(updated_at),
            updated_at: Some(updated_at),
        }
    }

    #[tokio::test]
    async fn test_summary_counts_per_band() {
        let now = Utc::now();
        let detector = MemoryThreatDetector::new().with_detector(
            "det-1",
            vec![
                finding("f1", 2.0, now),
                finding("f2", 3.9, now),
                finding("f3", 6.9, now),
                finding("f4", 9.5, now),
            ],
        );
        let check = GuardDutyCheck::new(detector);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.violations, 4);
        assert_eq!(outcome.findings.len(), 4);

        let counts: Vec<(CellValue, CellValue)> = outcome
            .findings
            .iter()
            .map(|f| (f.cells()[0].clone(), f.cells()[1].clone()))
            .collect();
        assert_eq!(counts[0], (CellValue::Text("Low".into()), CellValue::Int(1)));
        assert_eq!(counts[1], (CellValue::Text("Medium".into()), CellValue::Int(1)));
        assert_eq!(counts[2], (CellValue::Text("High".into()), CellValue::Int(1)));
        assert_eq!(counts[3], (CellValue::Text("Critical".into()), CellValue::Int(1)));
    }

    #[tokio::test]
    async fn test_zero_count_bands_still_reported() {
        let now = Utc::now();
        let detector = MemoryThreatDetector::new()
            .with_detector("det-1", vec![finding("f1", 9.9, now)]);
        let check = GuardDutyCheck::new(detector);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.findings.len(), 4);
        assert_eq!(outcome.violations, 1);
        assert_eq!(outcome.findings[0].cells()[1], CellValue::Int(0));
        assert_eq!(outcome.findings[3].cells()[1], CellValue::Int(1));
    }

    #[tokio::test]
    async fn test_stale_findings_excluded() {
        let detector = MemoryThreatDetector::new().with_detector(
            "det-1",
            vec![finding("old", 8.0, Utc::now() - Duration::days(3))],
        );
        let check = GuardDutyCheck::new(detector);

        let outcome = check.collect().await.expect("collect failed");
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.violations, 0);
    }

    #[tokio::test]
    async fn test_no_detectors_is_compliant() {
        let check = GuardDutyCheck::new(MemoryThreatDetector::new());
        let outcome = check.collect().await.expect("collect failed");
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.violations, 0);
    }

    #[tokio::test]
    async fn test_detector_enumeration_failure_propagates() {
        let check = GuardDutyCheck::new(MemoryThreatDetector::new().failing());
        assert!(check.collect().await.is_err());
    }
}
