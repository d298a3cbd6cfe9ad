//! S3 adapter: account-wide bucket listing.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use cloudaudit_core::Result;
use cloudaudit_rules::records::BucketRecord;
use cloudaudit_rules::BucketCatalog;

use crate::util::{sdk_err, to_utc};

pub struct AwsBucketCatalog {
    client: Client,
}

impl AwsBucketCatalog {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl BucketCatalog for AwsBucketCatalog {
    async fn buckets(&self) -> Result<Vec<BucketRecord>> {
        let out = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| sdk_err("s3:ListBuckets", e))?;
        Ok(out
            .buckets()
            .iter()
            .filter_map(|b| {
                b.name().map(|name| BucketRecord {
                    name: name.to_string(),
                    created: b.creation_date().map(to_utc),
                })
            })
            .collect())
    }
}
