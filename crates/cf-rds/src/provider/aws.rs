// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! AWS RDS provider.
//!
//! Maps the provider trait onto `aws-sdk-rds`, using the default AWS
//! credential chain and region resolution.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rds::Client;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::{DbInstance, DbSubnetGroup};
use tracing::debug;

use super::traits::*;

/// Provider backed by the AWS RDS API.
#[derive(Debug, Clone)]
pub struct AwsRdsProvider {
    client: Client,
}

impl AwsRdsProvider {
    /// Create a provider from the ambient AWS configuration
    /// (environment, profile, instance metadata).
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Wrap an existing RDS client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Render an SDK error with its full source chain so markers such as the
/// credentials failure stay visible.
fn provider_error<E: std::error::Error>(err: E) -> ProviderError {
    ProviderError::new(DisplayErrorContext(err).to_string())
}

fn subnet_group_from_aws(group: &DbSubnetGroup) -> SubnetGroup {
    SubnetGroup {
        name: group.db_subnet_group_name().unwrap_or_default().to_string(),
        vpc_id: group.vpc_id().unwrap_or_default().to_string(),
    }
}

fn instance_from_aws(instance: &DbInstance) -> DbInstanceDescriptor {
    let endpoint = instance.endpoint().and_then(|endpoint| {
        let address = endpoint.address()?;
        let port = u16::try_from(endpoint.port()?).ok()?;
        Some(Endpoint {
            address: address.to_string(),
            port,
        })
    });

    DbInstanceDescriptor {
        identifier: instance
            .db_instance_identifier()
            .unwrap_or_default()
            .to_string(),
        arn: instance.db_instance_arn().unwrap_or_default().to_string(),
        resource_id: instance.dbi_resource_id().unwrap_or_default().to_string(),
        status: instance.db_instance_status().unwrap_or_default().to_string(),
        master_username: instance.master_username().unwrap_or_default().to_string(),
        db_name: instance.db_name().unwrap_or_default().to_string(),
        engine: instance.engine().unwrap_or_default().to_string(),
        endpoint,
        vpc_security_groups: instance
            .vpc_security_groups()
            .iter()
            .filter_map(|group| group.vpc_security_group_id())
            .map(str::to_string)
            .collect(),
        subnet_group: instance.db_subnet_group().map(subnet_group_from_aws),
    }
}

#[async_trait]
impl RdsProvider for AwsRdsProvider {
    async fn describe_subnet_groups(
        &self,
        request: &DescribeSubnetGroupsRequest,
    ) -> ProviderResult<Vec<SubnetGroup>> {
        let output = self
            .client
            .describe_db_subnet_groups()
            .max_records(request.max_records)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(output
            .db_subnet_groups()
            .iter()
            .map(subnet_group_from_aws)
            .collect())
    }

    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> ProviderResult<DbInstanceDescriptor> {
        let output = self
            .client
            .create_db_instance()
            .db_instance_identifier(&request.identifier)
            .db_instance_class(&request.instance_class)
            .engine(&request.engine)
            .allocated_storage(request.allocated_storage_gb)
            .availability_zone(&request.availability_zone)
            .db_name(&request.db_name)
            .master_username(&request.master_username)
            .master_user_password(&request.master_password)
            .port(i32::from(request.port))
            .set_db_parameter_group_name(request.parameter_group.clone())
            .db_subnet_group_name(&request.subnet_group_name)
            .publicly_accessible(request.publicly_accessible)
            .multi_az(request.multi_az)
            .auto_minor_version_upgrade(request.auto_minor_version_upgrade)
            .copy_tags_to_snapshot(request.copy_tags_to_snapshot)
            .send()
            .await
            .map_err(provider_error)?;

        output
            .db_instance()
            .map(instance_from_aws)
            .ok_or_else(|| ProviderError::new("create-db-instance returned no instance"))
    }

    async fn describe_instances(
        &self,
        identifier: &str,
    ) -> ProviderResult<Vec<DbInstanceDescriptor>> {
        let result = self
            .client
            .describe_db_instances()
            .db_instance_identifier(identifier)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.db_instances().iter().map(instance_from_aws).collect()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_db_instance_not_found_fault()) =>
            {
                debug!(identifier, "DB instance not found");
                Ok(Vec::new())
            }
            Err(err) => Err(provider_error(err)),
        }
    }

    async fn modify_master_password(
        &self,
        identifier: &str,
        password: &str,
    ) -> ProviderResult<()> {
        self.client
            .modify_db_instance()
            .db_instance_identifier(identifier)
            .master_user_password(password)
            .apply_immediately(true)
            .send()
            .await
            .map_err(provider_error)?;
        Ok(())
    }
}
