//! In-memory fakes for the provider traits (testing only).
//!
//! Each fake satisfies its trait contract without touching AWS, and can
//! be armed to fail so tests can assert the fail-closed error policy.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudaudit_core::{AuditError, Result};

use crate::providers::{
    BucketCatalog, ComplianceStore, IamDirectory, InstanceFleet, ThreatDetector,
};
use crate::records::{
    AccessKeyRecord, BucketRecord, Ec2Instance, IamUser, RuleCompliance, ThreatFinding,
};

fn injected(context: &str) -> AuditError {
    AuditError::provider(context, "injected failure")
}

// ---------------------------------------------------------------------------
// MemoryIamDirectory
// ---------------------------------------------------------------------------

/// In-memory IAM directory: users with MFA counts and access keys.
#[derive(Debug, Default)]
pub struct MemoryIamDirectory {
    users: Vec<IamUser>,
    mfa_counts: HashMap<String, usize>,
    keys: HashMap<String, Vec<AccessKeyRecord>>,
    last_used: HashMap<String, Option<DateTime<Utc>>>,
    fail_listing: bool,
}

impl MemoryIamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: IamUser, mfa_devices: usize) -> Self {
        self.mfa_counts.insert(user.user_name.clone(), mfa_devices);
        self.users.push(user);
        self
    }

    pub fn with_keys(mut self, user_name: &str, keys: Vec<AccessKeyRecord>) -> Self {
        self.keys.insert(user_name.to_string(), keys);
        self
    }

    pub fn with_last_used(
        mut self,
        access_key_id: &str,
        last_used: Option<DateTime<Utc>>,
    ) -> Self {
        self.last_used.insert(access_key_id.to_string(), last_used);
        self
    }

    /// Arm the user listing to fail.
    pub fn failing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

#[async_trait]
impl IamDirectory for MemoryIamDirectory {
    async fn list_users(&self) -> Result<Vec<IamUser>> {
        if self.fail_listing {
            return Err(injected("iam:ListUsers"));
        }
        Ok(self.users.clone())
    }

    async fn mfa_device_count(&self, user_name: &str) -> Result<usize> {
        Ok(self.mfa_counts.get(user_name).copied().unwrap_or(0))
    }

    async fn access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyRecord>> {
        Ok(self.keys.get(user_name).cloned().unwrap_or_default())
    }

    async fn key_last_used(&self, access_key_id: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.last_used.get(access_key_id).copied().flatten())
    }
}

// ---------------------------------------------------------------------------
// MemoryInstanceFleet
// ---------------------------------------------------------------------------

/// In-memory EC2 fleet keyed by region.
#[derive(Debug, Default)]
pub struct MemoryInstanceFleet {
    regions: Vec<String>,
    instances: HashMap<String, Vec<Ec2Instance>>,
    protection: HashMap<String, bool>,
    encrypted: HashMap<String, bool>,
    protection_errors: HashSet<String>,
    fail_region: Option<String>,
    fail_volume_lookup: bool,
}

impl MemoryInstanceFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: &str, instances: Vec<Ec2Instance>) -> Self {
        self.regions.push(region.to_string());
        self.instances.insert(region.to_string(), instances);
        self
    }

    pub fn with_protection(mut self, instance_id: &str, enabled: bool) -> Self {
        self.protection.insert(instance_id.to_string(), enabled);
        self
    }

    /// Arm the termination-protection lookup for one instance to fail.
    pub fn with_protection_error(mut self, instance_id: &str) -> Self {
        self.protection_errors.insert(instance_id.to_string());
        self
    }

    pub fn with_volume(mut self, volume_id: &str, encrypted: bool) -> Self {
        self.encrypted.insert(volume_id.to_string(), encrypted);
        self
    }

    /// Arm instance enumeration for one region to fail.
    pub fn failing_region(mut self, region: &str) -> Self {
        self.fail_region = Some(region.to_string());
        self
    }

    /// Arm every volume-encryption lookup to fail.
    pub fn failing_volume_lookup(mut self) -> Self {
        self.fail_volume_lookup = true;
        self
    }
}

#[async_trait]
impl InstanceFleet for MemoryInstanceFleet {
    async fn regions(&self) -> Result<Vec<String>> {
        Ok(self.regions.clone())
    }

    async fn instances(&self, region: &str) -> Result<Vec<Ec2Instance>> {
        if self.fail_region.as_deref() == Some(region) {
            return Err(injected("ec2:DescribeInstances"));
        }
        Ok(self.instances.get(region).cloned().unwrap_or_default())
    }

    async fn termination_protection(&self, _region: &str, instance_id: &str) -> Result<bool> {
        if self.protection_errors.contains(instance_id) {
            return Err(injected("ec2:DescribeInstanceAttribute"));
        }
        Ok(self.protection.get(instance_id).copied().unwrap_or(false))
    }

    async fn volume_encrypted(&self, _region: &str, volume_id: &str) -> Result<bool> {
        if self.fail_volume_lookup {
            return Err(injected("ec2:DescribeVolumes"));
        }
        Ok(self.encrypted.get(volume_id).copied().unwrap_or(false))
    }
}

// ---------------------------------------------------------------------------
// MemoryComplianceStore
// ---------------------------------------------------------------------------

/// In-memory AWS Config compliance entries.
#[derive(Debug, Default)]
pub struct MemoryComplianceStore {
    entries: Vec<RuleCompliance>,
    fail: bool,
}

impl MemoryComplianceStore {
    pub fn new(entries: Vec<RuleCompliance>) -> Self {
        Self {
            entries,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            entries: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ComplianceStore for MemoryComplianceStore {
    async fn rule_compliance(&self) -> Result<Vec<RuleCompliance>> {
        if self.fail {
            return Err(injected("config:DescribeComplianceByConfigRule"));
        }
        Ok(self.entries.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryThreatDetector
// ---------------------------------------------------------------------------

/// In-memory GuardDuty detectors and findings.
#[derive(Debug, Default)]
pub struct MemoryThreatDetector {
    detectors: Vec<String>,
    findings: HashMap<String, Vec<ThreatFinding>>,
    fail: bool,
}

impl MemoryThreatDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detector(mut self, detector_id: &str, findings: Vec<ThreatFinding>) -> Self {
        self.detectors.push(detector_id.to_string());
        self.findings.insert(detector_id.to_string(), findings);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl ThreatDetector for MemoryThreatDetector {
    async fn detector_ids(&self) -> Result<Vec<String>> {
        if self.fail {
            return Err(injected("guardduty:ListDetectors"));
        }
        Ok(self.detectors.clone())
    }

    async fn findings_updated_since(
        &self,
        detector_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ThreatFinding>> {
        // Server-side lookback filter, same as the real provider query.
        Ok(self
            .findings
            .get(detector_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|f| f.updated_at.map_or(false, |t| t >= since))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemoryBucketCatalog
// ---------------------------------------------------------------------------

/// In-memory S3 bucket listing.
#[derive(Debug, Default)]
pub struct MemoryBucketCatalog {
    buckets: Vec<BucketRecord>,
    fail: bool,
}

impl MemoryBucketCatalog {
    pub fn new(buckets: Vec<BucketRecord>) -> Self {
        Self {
            buckets,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            buckets: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl BucketCatalog for MemoryBucketCatalog {
    async fn buckets(&self) -> Result<Vec<BucketRecord>> {
        if self.fail {
            return Err(injected("s3:ListBuckets"));
        }
        Ok(self.buckets.clone())
    }
}
