// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Instance parameters, instance record and service snapshot types.

use serde::{Deserialize, Serialize};

use crate::error::{RdsError, Result};
use crate::provider::{DbInstanceDescriptor, Endpoint, SubnetGroup};

pub const DEFAULT_ENGINE: &str = "postgres";
pub const DEFAULT_INSTANCE_CLASS: &str = "db.t2.micro";
pub const DEFAULT_STORAGE_GB: u32 = 20;
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_AVAILABILITY_ZONE: &str = "us-east-1a";

// ============================================================================
// Instance parameters
// ============================================================================

/// What to create: the caller-facing parameters of a new instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    /// Instance identifier, also used as the service name.
    pub name: String,
    pub engine: String,
    pub instance_class: String,
    pub storage_gb: u32,
    /// Master username.
    pub username: String,
    pub port: u16,
    pub availability_zone: String,
}

impl InstanceSpec {
    /// Create a spec with default engine, class, storage, username, port and AZ.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: DEFAULT_ENGINE.to_string(),
            instance_class: DEFAULT_INSTANCE_CLASS.to_string(),
            storage_gb: DEFAULT_STORAGE_GB,
            username: DEFAULT_USERNAME.to_string(),
            port: DEFAULT_PORT,
            availability_zone: DEFAULT_AVAILABILITY_ZONE.to_string(),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_instance_class(mut self, class: impl Into<String>) -> Self {
        self.instance_class = class.into();
        self
    }

    pub fn with_storage_gb(mut self, storage_gb: u32) -> Self {
        self.storage_gb = storage_gb;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = zone.into();
        self
    }

    /// Check that every required field is present and sane.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("engine", &self.engine),
            ("instance class", &self.instance_class),
            ("username", &self.username),
            ("availability zone", &self.availability_zone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RdsError::InvalidInput(format!("{} must not be empty", field)));
            }
        }
        if self.storage_gb == 0 {
            return Err(RdsError::InvalidInput(
                "storage size must be at least 1 GB".to_string(),
            ));
        }
        if i32::try_from(self.storage_gb).is_err() {
            return Err(RdsError::InvalidInput(format!(
                "storage size {} GB is too large",
                self.storage_gb
            )));
        }
        if self.port == 0 {
            return Err(RdsError::InvalidInput("port must not be 0".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Instance record
// ============================================================================

/// One database instance as tracked by a create or refresh invocation.
///
/// The record is owned by exactly one workflow at a time: it is built by the
/// provisioner, moved into the poll task and handed back through the
/// [`ProvisionHandle`](crate::ProvisionHandle). The password and the
/// connection URI are only written by the workflow itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceRecord {
    pub arn: String,
    pub resource_id: String,
    /// Caller-supplied name; the only key used to query the provider.
    pub instance_name: String,
    pub username: String,
    pub(crate) password: String,
    pub database_name: String,
    pub(crate) connection_uri: Option<String>,
    pub engine: String,
    /// VPC security group ids in provider order.
    pub security_groups: Vec<String>,
    pub subnet_group: Option<SubnetGroup>,
    pub storage_gb: u32,
    pub instance_class: String,
    pub availability_zone: String,
    pub port: u16,
}

impl InstanceRecord {
    /// Record for a refresh: only the name is known until the provider is asked.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            instance_name: name.into(),
            ..Default::default()
        }
    }

    /// Record for a new instance placed in the given subnet group.
    pub fn from_spec(spec: &InstanceSpec, subnet_group: SubnetGroup) -> Self {
        Self {
            instance_name: spec.name.clone(),
            username: spec.username.clone(),
            engine: spec.engine.clone(),
            subnet_group: Some(subnet_group),
            storage_gb: spec.storage_gb,
            instance_class: spec.instance_class.clone(),
            availability_zone: spec.availability_zone.clone(),
            port: spec.port,
            ..Default::default()
        }
    }

    /// Master password generated for this instance (empty until set).
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Connection URI, present only once the instance has been seen available.
    pub fn connection_uri(&self) -> Option<&str> {
        self.connection_uri.as_deref()
    }

    /// First security group, the one reported to the user.
    pub fn primary_security_group(&self) -> Option<&str> {
        self.security_groups.first().map(String::as_str)
    }

    /// VPC of the subnet group, if resolved.
    pub fn vpc_id(&self) -> Option<&str> {
        self.subnet_group.as_ref().map(|group| group.vpc_id.as_str())
    }

    /// Take identity fields from a create-instance response.
    pub(crate) fn apply_created(
        &mut self,
        created: &DbInstanceDescriptor,
        database_name: String,
        password: String,
    ) {
        self.arn = created.arn.clone();
        self.resource_id = created.resource_id.clone();
        self.security_groups = created.vpc_security_groups.clone();
        self.database_name = database_name;
        self.password = password;
    }

    /// Replace identity fields with the provider's current view.
    pub(crate) fn resync_from(&mut self, described: &DbInstanceDescriptor) {
        self.arn = described.arn.clone();
        self.resource_id = described.resource_id.clone();
        self.username = described.master_username.clone();
        self.database_name = described.db_name.clone();
        self.security_groups = described.vpc_security_groups.clone();
        self.subnet_group = described.subnet_group.clone();
        self.engine = described.engine.clone();
    }

    pub(crate) fn set_password(&mut self, password: String) {
        self.password = password;
    }

    /// Compose `<engine>://<username>:<password>@<host>:<port>/<database>`.
    pub(crate) fn set_connection_uri(&mut self, endpoint: &Endpoint) {
        self.connection_uri = Some(format!(
            "{}://{}:{}@{}:{}/{}",
            self.engine,
            self.username,
            self.password,
            endpoint.address,
            endpoint.port,
            self.database_name
        ));
    }

    /// Flat snapshot handed to the service registrar.
    pub fn snapshot(&self) -> ServiceSnapshot {
        ServiceSnapshot {
            arn: self.arn.clone(),
            instance_name: self.instance_name.clone(),
            resource_id: self.resource_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            database_name: self.database_name.clone(),
            connection_uri: self.connection_uri.clone().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Service payloads
// ============================================================================

/// Credentials document published as a user-provided service.
///
/// Empty fields are omitted from the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arn: String,
    #[serde(rename = "instance_id", default, skip_serializing_if = "String::is_empty")]
    pub instance_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(rename = "database", default, skip_serializing_if = "String::is_empty")]
    pub database_name: String,
    #[serde(rename = "uri", default, skip_serializing_if = "String::is_empty")]
    pub connection_uri: String,
}

impl ServiceSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Credentials document for a database registered by URI only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriCredentials {
    pub uri: String,
}

impl UriCredentials {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
