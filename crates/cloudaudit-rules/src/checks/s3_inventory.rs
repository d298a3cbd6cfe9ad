//! S3 inventory: every bucket is found, not flagged. No pass/fail
//! predicate — the report is audit evidence, and the run exits 0
//! unless a hard error occurs.

use async_trait::async_trait;
use cloudaudit_core::report::TIMESTAMP_FORMAT;
use cloudaudit_core::{
    CellValue, CheckOutcome, ComplianceCheck, Finding, Placeholder, ReportSchema, Result,
};
use tracing::info;

use crate::providers::BucketCatalog;
use crate::records::BucketRecord;

pub const REPORT_FILENAME: &str = "s3_buckets_report.xlsx";
pub const LOG_FILENAME: &str = "s3_audit.log";

static SCHEMA: ReportSchema = ReportSchema {
    sheet_name: "S3_Buckets",
    columns: &["bucket_name", "creation_date", "creation_date_str"],
    totals_column: "total_buckets_found",
    placeholder: Placeholder::HeadersOnly,
};

pub fn bucket_row(bucket: &BucketRecord) -> Finding {
    Finding::new(vec![
        CellValue::Text(bucket.name.clone()),
        bucket
            .created
            .map(CellValue::Timestamp)
            .unwrap_or(CellValue::Empty),
        bucket
            .created
            .map(|t| CellValue::Text(t.format(TIMESTAMP_FORMAT).to_string()))
            .unwrap_or(CellValue::Empty),
    ])
}

/// S3 bucket inventory report.
pub struct S3InventoryCheck<P> {
    catalog: P,
}

impl<P> S3InventoryCheck<P> {
    pub fn new(catalog: P) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl<P: BucketCatalog> ComplianceCheck for S3InventoryCheck<P> {
    fn name(&self) -> &'static str {
        "S3 bucket inventory"
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
        info!("Retrieving S3 bucket list");
        let buckets = self.catalog.buckets().await?;
        info!(total = buckets.len(), "S3 buckets found");

        let rows = buckets.iter().map(bucket_row).collect();
        Ok(CheckOutcome::informational(rows))
    }
}
