//! Raw resource records consumed read-only by the rule evaluators.
//!
//! These are provider-shaped but provider-agnostic: the AWS adapters
//! map SDK output into them, and the fakes construct them directly.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One IAM user.
#[derive(Debug, Clone, Serialize)]
pub struct IamUser {
    pub user_name: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
}

/// Access key activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    Active,
    Inactive,
}

/// One IAM access key, as listed for a user.
#[derive(Debug, Clone, Serialize)]
pub struct AccessKeyRecord {
    pub access_key_id: String,
    pub status: KeyStatus,
    pub create_date: Option<DateTime<Utc>>,
}

/// One EC2 instance within a region.
#[derive(Debug, Clone, Serialize)]
pub struct Ec2Instance {
    pub instance_id: String,
    pub instance_type: String,
    /// Lifecycle state name, e.g. `running` or `terminated`.
    pub state: String,
    pub public_ip: Option<String>,
    pub launch_time: Option<DateTime<Utc>>,
    /// IDs of attached EBS volumes.
    pub volume_ids: Vec<String>,
}

/// Compliance state of one AWS Config rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleCompliance {
    pub rule_name: String,
    /// e.g. `NON_COMPLIANT`, `COMPLIANT`, `INSUFFICIENT_DATA`.
    pub compliance_type: String,
    /// Capped count of non-compliant resources for the rule.
    pub noncompliant_count: i64,
}

/// One GuardDuty finding.
#[derive(Debug, Clone, Serialize)]
pub struct ThreatFinding {
    pub id: String,
    pub finding_type: String,
    /// GuardDuty severity score in [0, 10].
    pub severity: f64,
    pub title: String,
    pub region: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One S3 bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketRecord {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
}
