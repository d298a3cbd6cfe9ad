//! AWS Config adapter: rule compliance states, server-side filtered
//! to NON_COMPLIANT.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_config::types::ComplianceType;
use aws_sdk_config::Client;
use cloudaudit_core::Result;
use cloudaudit_rules::records::RuleCompliance;
use cloudaudit_rules::ComplianceStore;

use crate::util::sdk_err;

pub struct AwsComplianceStore {
    client: Client,
}

impl AwsComplianceStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ComplianceStore for AwsComplianceStore {
    async fn rule_compliance(&self) -> Result<Vec<RuleCompliance>> {
        let mut entries = Vec::new();
        let mut pages = self
            .client
            .describe_compliance_by_config_rule()
            .compliance_types(ComplianceType::NonCompliant)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_err("config:DescribeComplianceByConfigRule", e))?;
            for item in page.compliance_by_config_rules() {
                let Some(rule_name) = item.config_rule_name() else {
                    continue;
                };
                let compliance = item.compliance();
                entries.push(RuleCompliance {
                    rule_name: rule_name.to_string(),
                    compliance_type: compliance
                        .and_then(|c| c.compliance_type())
                        .map(|t| t.as_str().to_string())
                        .unwrap_or_default(),
                    noncompliant_count: compliance
                        .and_then(|c| c.compliance_contributor_count())
                        .map(|c| i64::from(c.capped_count()))
                        .unwrap_or(0),
                });
            }
        }
        Ok(entries)
    }
}
