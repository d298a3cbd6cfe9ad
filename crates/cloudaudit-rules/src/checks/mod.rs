//! One module per compliance rule.
//!
//! Each module pairs a pure evaluator (record in, zero-or-one finding
//! out) with a `ComplianceCheck` impl that drives enumeration through
//! its provider trait. Schemas, artifact filenames, and predicate
//! constants live next to the rule they belong to.

pub mod config_rules;
pub mod ec2;
pub mod guardduty;
pub mod iam_mfa;
pub mod s3_inventory;
pub mod unused_keys;
