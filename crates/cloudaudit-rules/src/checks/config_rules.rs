//! AWS Config rule: report every Config rule in NON_COMPLIANT state.

use async_trait::async_trait;
use cloudaudit_core::{
    CellValue, CheckOutcome, ComplianceCheck, Finding, Placeholder, ReportSchema, Result,
};
use tracing::info;

use crate::providers::ComplianceStore;
use crate::records::RuleCompliance;

pub const REPORT_FILENAME: &str = "config_noncompliant_rules.xlsx";
pub const LOG_FILENAME: &str = "config_audit.log";

pub const NON_COMPLIANT: &str = "NON_COMPLIANT";

static SCHEMA: ReportSchema = ReportSchema {
    sheet_name: "Config_NonCompliant",
    columns: &["config_rule", "compliance_type", "noncompliant_count"],
    totals_column: "total_noncompliant_rules",
    placeholder: Placeholder::HeadersOnly,
};

/// Flag a rule when its compliance type is NON_COMPLIANT; the count is
/// the provider's capped non-compliant resource count.
pub fn evaluate_rule(rule: &RuleCompliance) -> Option<Finding> {
    if rule.compliance_type != NON_COMPLIANT {
        return None;
    }
    Some(Finding::new(vec![
        CellValue::Text(rule.rule_name.clone()),
        CellValue::Text(rule.compliance_type.clone()),
        CellValue::Int(rule.noncompliant_count),
    ]))
}

/// "No Config rule may be in NON_COMPLIANT state."
pub struct ConfigRulesCheck<P> {
    store: P,
}

impl<P> ConfigRulesCheck<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<P: ComplianceStore> ComplianceCheck for ConfigRulesCheck<P> {
    fn name(&self) -> &'static str {
        "Config non-compliant rules"
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
        let entries = self.store.rule_compliance().await?;
        let findings: Vec<Finding> = entries.iter().filter_map(evaluate_rule).collect();

        info!(total = findings.len(), "Non-compliant Config rules");
        Ok(CheckOutcome::flagged(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryComplianceStore;

    fn entry(name: &str, compliance_type: &str, count: i64) -> RuleCompliance {
        RuleCompliance {
            rule_name: name.to_string(),
            compliance_type: compliance_type.to_string(),
            noncompliant_count: count,
        }
    }

    #[test]
    fn test_compliant_rule_not_flagged() {
        assert!(evaluate_rule(&entry("encrypted-volumes", "COMPLIANT", 0)).is_none());
        assert!(evaluate_rule(&entry("mfa-enabled", "INSUFFICIENT_DATA", 0)).is_none());
    }

    #[test]
    fn test_noncompliant_rule_carries_capped_count() {
        let finding = evaluate_rule(&entry("s3-public-read", NON_COMPLIANT, 25)).expect("flag");
        assert_eq!(finding.cells()[0], CellValue::Text("s3-public-read".into()));
        assert_eq!(finding.cells()[2], CellValue::Int(25));
    }

    #[tokio::test]
    async fn test_collect_filters_to_noncompliant() {
        let store = MemoryComplianceStore::new(vec![
            entry("a", "COMPLIANT", 0),
            entry("b", NON_COMPLIANT, 3),
            entry("c", NON_COMPLIANT, 1),
        ]);
        let check = ConfigRulesCheck::new(store);

        let outcome = check.collect().await.expect("collect failed");
        assert_eq!(outcome.violations, 2);
    }

    #[tokio::test]
    async fn test_enumeration_failure_propagates() {
        let check = ConfigRulesCheck::new(MemoryComplianceStore::failing());
        assert!(check.collect().await.is_err());
    }
}
