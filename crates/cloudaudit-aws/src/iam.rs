//! IAM adapter: users, MFA devices, access keys, last-used lookups.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::types::StatusType;
use aws_sdk_iam::Client;
use chrono::{DateTime, Utc};
use cloudaudit_core::Result;
use cloudaudit_rules::records::{AccessKeyRecord, IamUser, KeyStatus};
use cloudaudit_rules::IamDirectory;

use crate::util::{sdk_err, to_utc};

pub struct AwsIamDirectory {
    client: Client,
}

impl AwsIamDirectory {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl IamDirectory for AwsIamDirectory {
    async fn list_users(&self) -> Result<Vec<IamUser>> {
        let mut users = Vec::new();
        let mut pages = self.client.list_users().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_err("iam:ListUsers", e))?;
            for user in page.users() {
                users.push(IamUser {
                    user_name: user.user_name().to_string(),
                    arn: user.arn().to_string(),
                    create_date: to_utc(user.create_date()),
                });
            }
        }
        Ok(users)
    }

    async fn mfa_device_count(&self, user_name: &str) -> Result<usize> {
        let mut count = 0;
        let mut pages = self
            .client
            .list_mfa_devices()
            .user_name(user_name)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_err("iam:ListMFADevices", e))?;
            count += page.mfa_devices().len();
        }
        Ok(count)
    }

    async fn access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyRecord>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_access_keys()
            .user_name(user_name)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_err("iam:ListAccessKeys", e))?;
            for meta in page.access_key_metadata() {
                let Some(key_id) = meta.access_key_id() else {
                    continue;
                };
                let status = match meta.status() {
                    Some(StatusType::Active) => KeyStatus::Active,
                    _ => KeyStatus::Inactive,
                };
                keys.push(AccessKeyRecord {
                    access_key_id: key_id.to_string(),
                    status,
                    create_date: meta.create_date().map(to_utc),
                });
            }
        }
        Ok(keys)
    }

    async fn key_last_used(&self, access_key_id: &str) -> Result<Option<DateTime<Utc>>> {
        let out = self
            .client
            .get_access_key_last_used()
            .access_key_id(access_key_id)
            .send()
            .await
            .map_err(|e| sdk_err("iam:GetAccessKeyLastUsed", e))?;
        Ok(out
            .access_key_last_used()
            .and_then(|u| u.last_used_date())
            .map(to_utc))
    }
}
