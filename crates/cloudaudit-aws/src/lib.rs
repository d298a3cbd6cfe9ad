//! AWS SDK adapters for cloudaudit.
//!
//! One adapter per service, each implementing a provider trait from
//! `cloudaudit-rules`. Credentials come from the ambient credential
//! chain via `aws-config`; adapters never construct credentials.
//! Every paginated list call is followed to completion.

pub mod config_service;
pub mod ec2;
pub mod guardduty;
pub mod iam;
pub mod s3;

mod util;

pub use config_service::AwsComplianceStore;
pub use ec2::AwsInstanceFleet;
pub use guardduty::AwsThreatDetector;
pub use iam::AwsIamDirectory;
pub use s3::AwsBucketCatalog;
