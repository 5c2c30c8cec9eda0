// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for cf-rds workflow tests.
//!
//! Provides deterministic credentials, a recording registrar and a
//! collecting reporter to plug into the provisioner and the commands.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cf_rds::{
    CredentialGenerator, DbInstanceDescriptor, Endpoint, PollerConfig, ProgressReporter,
    RdsError, ServiceRegistrar, SubnetGroup,
};

pub const INSTANCE_NAME: &str = "test-instance";
pub const ENDPOINT_ADDRESS: &str = "test-uri.us-east-1.rds.amazonaws.com";

/// Fast poller for tests.
pub fn fast_poller() -> PollerConfig {
    PollerConfig::new(Duration::from_millis(5)).with_deadline(Duration::from_secs(5))
}

pub fn subnet_group() -> SubnetGroup {
    SubnetGroup::new("default-vpc-vpcid", "vpcid")
}

/// Response to a create call: identity set, not available yet.
pub fn created_instance(security_groups: &[&str]) -> DbInstanceDescriptor {
    DbInstanceDescriptor {
        identifier: INSTANCE_NAME.to_string(),
        arn: "arn".to_string(),
        resource_id: "resourceid".to_string(),
        status: "creating".to_string(),
        master_username: "root".to_string(),
        db_name: "database".to_string(),
        engine: "postgres".to_string(),
        endpoint: None,
        vpc_security_groups: security_groups.iter().map(|s| s.to_string()).collect(),
        subnet_group: Some(subnet_group()),
    }
}

/// Describe entry in the given status, with an endpoint once available.
pub fn described_instance(status: &str) -> DbInstanceDescriptor {
    let endpoint = (status == "available").then(|| Endpoint {
        address: ENDPOINT_ADDRESS.to_string(),
        port: 5432,
    });
    DbInstanceDescriptor {
        status: status.to_string(),
        endpoint,
        ..created_instance(&["sg-1"])
    }
}

/// Credentials that always return the same name and password.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    pub name: String,
    pub password: String,
}

impl FixedCredentials {
    pub fn new(name: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            password: password.to_string(),
        }
    }
}

impl CredentialGenerator for FixedCredentials {
    fn generate_name(&self) -> String {
        self.name.clone()
    }

    fn generate_password(&self) -> String {
        self.password.clone()
    }
}

/// Credentials that hand out `password-1`, `password-2`, ...
#[derive(Debug, Default)]
pub struct SequenceCredentials {
    counter: AtomicUsize,
}

impl CredentialGenerator for SequenceCredentials {
    fn generate_name(&self) -> String {
        "database".to_string()
    }

    fn generate_password(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("password-{}", n)
    }
}

/// One call received by the recording registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrarCall {
    Create { name: String, json: String },
    Update { name: String, json: String },
}

/// Registrar that records calls instead of running `cf`.
#[derive(Debug, Default)]
pub struct RecordingRegistrar {
    calls: Mutex<Vec<RegistrarCall>>,
    fail_create: bool,
}

impl RecordingRegistrar {
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<RegistrarCall> {
        self.calls.lock().unwrap().clone()
    }

    /// JSON documents of all update calls, parsed.
    pub fn updates(&self) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RegistrarCall::Update { json, .. } => serde_json::from_str(&json).ok(),
                RegistrarCall::Create { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ServiceRegistrar for RecordingRegistrar {
    async fn create_service(&self, name: &str, credentials_json: &str) -> cf_rds::Result<()> {
        if self.fail_create {
            return Err(RdsError::Registrar("cf cups exited with status 1".to_string()));
        }
        self.calls.lock().unwrap().push(RegistrarCall::Create {
            name: name.to_string(),
            json: credentials_json.to_string(),
        });
        Ok(())
    }

    async fn update_service(&self, name: &str, credentials_json: &str) -> cf_rds::Result<()> {
        self.calls.lock().unwrap().push(RegistrarCall::Update {
            name: name.to_string(),
            json: credentials_json.to_string(),
        });
        Ok(())
    }

    async fn current_space(&self) -> cf_rds::Result<String> {
        Ok("development".to_string())
    }
}

/// Reporter that keeps every message.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub texts: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl ProgressReporter for CollectingReporter {
    fn display_text(&self, message: &str) {
        self.texts.lock().unwrap().push(message.to_string());
    }

    fn display_error(&self, error: &RdsError) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}
