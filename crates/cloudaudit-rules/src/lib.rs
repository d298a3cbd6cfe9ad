//! cloudaudit rules
//!
//! The six compliance rules, each a parameterization of the generic
//! pipeline in `cloudaudit-core`:
//! - AWS Config rules in NON_COMPLIANT state
//! - EC2 hardening (termination protection, EBS encryption, public IPs)
//! - IAM users without MFA
//! - IAM access keys unused for 90+ days
//! - GuardDuty findings from the last 24 hours, bucketed by severity
//! - S3 bucket inventory (informational, no pass/fail predicate)
//!
//! Provider access goes through the traits in [`providers`]; in-memory
//! fakes for tests live in [`fakes`].

pub mod checks;
pub mod fakes;
pub mod providers;
pub mod records;

pub use checks::config_rules::ConfigRulesCheck;
pub use checks::ec2::Ec2HardeningCheck;
pub use checks::guardduty::GuardDutyCheck;
pub use checks::iam_mfa::IamMfaCheck;
pub use checks::s3_inventory::S3InventoryCheck;
pub use checks::unused_keys::UnusedKeysCheck;
pub use providers::{BucketCatalog, ComplianceStore, IamDirectory, InstanceFleet, ThreatDetector};
