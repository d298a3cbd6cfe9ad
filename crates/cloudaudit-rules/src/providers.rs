//! Provider traits: the enumeration seams between rules and AWS.
//!
//! Every method must follow provider pagination to completion before
//! returning — a single page is never the full result set — and must
//! return an error on any auth/network/throttling failure rather than
//! degrading to an empty collection. An empty `Vec` is a valid,
//! non-error outcome meaning "nothing exists in scope".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudaudit_core::Result;

use crate::records::{
    AccessKeyRecord, BucketRecord, Ec2Instance, IamUser, RuleCompliance, ThreatFinding,
};

/// IAM user, MFA device, and access key lookups.
#[async_trait]
pub trait IamDirectory: Send + Sync {
    /// All IAM users in the account.
    async fn list_users(&self) -> Result<Vec<IamUser>>;

    /// Number of MFA devices enrolled for a user.
    async fn mfa_device_count(&self, user_name: &str) -> Result<usize>;

    /// All access keys belonging to a user.
    async fn access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyRecord>>;

    /// When a key was last used, if ever.
    async fn key_last_used(&self, access_key_id: &str) -> Result<Option<DateTime<Utc>>>;
}

/// EC2 region and instance lookups.
#[async_trait]
pub trait InstanceFleet: Send + Sync {
    /// Enabled regions, in provider order. Instances are enumerated
    /// per region in this order.
    async fn regions(&self) -> Result<Vec<String>>;

    /// All instances in one region.
    async fn instances(&self, region: &str) -> Result<Vec<Ec2Instance>>;

    /// Whether API termination protection is enabled for an instance.
    async fn termination_protection(&self, region: &str, instance_id: &str) -> Result<bool>;

    /// Whether an EBS volume is encrypted.
    async fn volume_encrypted(&self, region: &str, volume_id: &str) -> Result<bool>;
}

/// AWS Config rule compliance lookups.
#[async_trait]
pub trait ComplianceStore: Send + Sync {
    /// Compliance state per Config rule.
    async fn rule_compliance(&self) -> Result<Vec<RuleCompliance>>;
}

/// GuardDuty detector and finding lookups.
#[async_trait]
pub trait ThreatDetector: Send + Sync {
    /// Detector IDs in the account/region.
    async fn detector_ids(&self) -> Result<Vec<String>>;

    /// Findings updated at or after `since` for one detector.
    async fn findings_updated_since(
        &self,
        detector_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ThreatFinding>>;
}

/// S3 bucket lookups.
#[async_trait]
pub trait BucketCatalog: Send + Sync {
    /// All buckets visible to the caller.
    async fn buckets(&self) -> Result<Vec<BucketRecord>>;
}
