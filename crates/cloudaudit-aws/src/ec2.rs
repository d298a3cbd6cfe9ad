//! EC2 adapter: region discovery, instance enumeration, attribute
//! and volume lookups. A fresh regional client is built per region
//! from the shared base config.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::InstanceAttributeName;
use aws_sdk_ec2::Client;
use cloudaudit_core::Result;
use cloudaudit_rules::records::Ec2Instance;
use cloudaudit_rules::InstanceFleet;

use crate::util::{sdk_err, to_utc};

pub struct AwsInstanceFleet {
    base: SdkConfig,
}

impl AwsInstanceFleet {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            base: config.clone(),
        }
    }

    fn regional_client(&self, region: &str) -> Client {
        let conf = aws_sdk_ec2::config::Builder::from(&self.base)
            .region(Region::new(region.to_string()))
            .build();
        Client::from_conf(conf)
    }
}

#[async_trait]
impl InstanceFleet for AwsInstanceFleet {
    async fn regions(&self) -> Result<Vec<String>> {
        let out = Client::new(&self.base)
            .describe_regions()
            .send()
            .await
            .map_err(|e| sdk_err("ec2:DescribeRegions", e))?;
        Ok(out
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(str::to_string))
            .collect())
    }

    async fn instances(&self, region: &str) -> Result<Vec<Ec2Instance>> {
        let client = self.regional_client(region);
        let mut instances = Vec::new();
        let mut pages = client.describe_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_err("ec2:DescribeInstances", e))?;
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    let Some(instance_id) = instance.instance_id() else {
                        continue;
                    };
                    let volume_ids = instance
                        .block_device_mappings()
                        .iter()
                        .filter_map(|m| m.ebs())
                        .filter_map(|e| e.volume_id())
                        .map(str::to_string)
                        .collect();
                    instances.push(Ec2Instance {
                        instance_id: instance_id.to_string(),
                        instance_type: instance
                            .instance_type()
                            .map(|t| t.as_str().to_string())
                            .unwrap_or_default(),
                        state: instance
                            .state()
                            .and_then(|s| s.name())
                            .map(|n| n.as_str().to_string())
                            .unwrap_or_default(),
                        public_ip: instance.public_ip_address().map(str::to_string),
                        launch_time: instance.launch_time().map(to_utc),
                        volume_ids,
                    });
                }
            }
        }
        Ok(instances)
    }

    async fn termination_protection(&self, region: &str, instance_id: &str) -> Result<bool> {
        let out = self
            .regional_client(region)
            .describe_instance_attribute()
            .instance_id(instance_id)
            .attribute(InstanceAttributeName::DisableApiTermination)
            .send()
            .await
            .map_err(|e| sdk_err("ec2:DescribeInstanceAttribute", e))?;
        Ok(out
            .disable_api_termination()
            .and_then(|a| a.value())
            .unwrap_or(false))
    }

    async fn volume_encrypted(&self, region: &str, volume_id: &str) -> Result<bool> {
        let out = self
            .regional_client(region)
            .describe_volumes()
            .volume_ids(volume_id)
            .send()
            .await
            .map_err(|e| sdk_err("ec2:DescribeVolumes", e))?;
        Ok(out
            .volumes()
            .first()
            .and_then(|v| v.encrypted())
            .unwrap_or(false))
    }
}
