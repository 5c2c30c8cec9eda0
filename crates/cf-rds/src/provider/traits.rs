// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider trait definitions.
//!
//! Defines the abstract interface over the four remote RDS operations the
//! workflows need, plus the request and descriptor types that cross it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status string the provider reports once an instance accepts connections.
pub const AVAILABLE_STATUS: &str = "available";

/// Opaque error from a provider call.
///
/// The message is kept verbatim; callers translate well-known conditions
/// (missing credentials) into dedicated error kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    /// Raw provider message.
    pub message: String,
}

impl ProviderError {
    /// Create a provider error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// A DB subnet group and the VPC that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetGroup {
    /// Subnet group name, passed back on create.
    pub name: String,
    /// Owning VPC id.
    pub vpc_id: String,
}

impl SubnetGroup {
    /// Create a subnet group descriptor.
    pub fn new(name: impl Into<String>, vpc_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vpc_id: vpc_id.into(),
        }
    }
}

/// Network address of a running instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// DNS name of the instance.
    pub address: String,
    /// Listening port.
    pub port: u16,
}

/// Provider view of one database instance.
///
/// Every field except the identifier is optional on the wire; absent values
/// come back as empty strings or collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInstanceDescriptor {
    /// Instance identifier (the caller-supplied name).
    pub identifier: String,
    /// Resource ARN.
    pub arn: String,
    /// Provider-internal resource id.
    pub resource_id: String,
    /// Current lifecycle status, e.g. "creating", "backing-up", "available".
    pub status: String,
    /// Master username.
    pub master_username: String,
    /// Initial database name.
    pub db_name: String,
    /// Engine name.
    pub engine: String,
    /// Connection endpoint, present once the instance has an address.
    pub endpoint: Option<Endpoint>,
    /// VPC security group ids, in provider order.
    pub vpc_security_groups: Vec<String>,
    /// Subnet group the instance was placed in.
    pub subnet_group: Option<SubnetGroup>,
}

/// Parameters for describing subnet groups.
///
/// The listing is unfiltered: every group visible to the account matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeSubnetGroupsRequest {
    /// Page size.
    pub max_records: i32,
}

impl Default for DescribeSubnetGroupsRequest {
    fn default() -> Self {
        Self { max_records: 20 }
    }
}

/// Parameters for creating an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInstanceRequest {
    pub identifier: String,
    pub instance_class: String,
    pub engine: String,
    pub allocated_storage_gb: i32,
    pub availability_zone: String,
    pub db_name: String,
    pub master_username: String,
    pub master_password: String,
    pub port: u16,
    /// Engine-specific parameter group; `None` lets the provider pick its default.
    pub parameter_group: Option<String>,
    pub subnet_group_name: String,
    pub publicly_accessible: bool,
    pub multi_az: bool,
    pub auto_minor_version_upgrade: bool,
    pub copy_tags_to_snapshot: bool,
}

/// Trait for RDS providers.
///
/// Implementations must be safe to share across concurrently running poll
/// tasks; the workflows never lock around provider calls.
#[async_trait]
pub trait RdsProvider: Send + Sync {
    /// List the DB subnet groups visible to the account.
    async fn describe_subnet_groups(
        &self,
        request: &DescribeSubnetGroupsRequest,
    ) -> ProviderResult<Vec<SubnetGroup>>;

    /// Submit an instance creation request.
    ///
    /// Returns as soon as the provider accepts the request; the instance is
    /// usually still "creating".
    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> ProviderResult<DbInstanceDescriptor>;

    /// Describe instances matching the identifier.
    ///
    /// An empty result means the instance does not exist.
    async fn describe_instances(&self, identifier: &str)
    -> ProviderResult<Vec<DbInstanceDescriptor>>;

    /// Set a new master password on an existing instance.
    async fn modify_master_password(&self, identifier: &str, password: &str)
    -> ProviderResult<()>;
}
