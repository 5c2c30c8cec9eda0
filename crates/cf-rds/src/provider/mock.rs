// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock provider for testing.
//!
//! A scripted provider that returns canned responses and records every call,
//! without talking to a real cloud account.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::*;

/// Calls observed by the mock, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordedCalls {
    pub subnet_group_requests: Vec<DescribeSubnetGroupsRequest>,
    pub create_requests: Vec<CreateInstanceRequest>,
    pub describe_requests: Vec<String>,
    /// (identifier, new password)
    pub modify_requests: Vec<(String, String)>,
}

/// Mock provider for testing.
///
/// Describe responses are consumed in order; the last one is repeated once
/// the script runs out, so a single "available" response serves any number
/// of polls.
pub struct MockProvider {
    subnet_groups: ProviderResult<Vec<SubnetGroup>>,
    create_response: ProviderResult<DbInstanceDescriptor>,
    describe_script: Mutex<VecDeque<ProviderResult<Vec<DbInstanceDescriptor>>>>,
    modify_response: ProviderResult<()>,
    calls: Mutex<RecordedCalls>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a mock with no subnet groups, a failing create and no instances.
    pub fn new() -> Self {
        Self {
            subnet_groups: Ok(Vec::new()),
            create_response: Err(ProviderError::new("mock: no create response scripted")),
            describe_script: Mutex::new(VecDeque::new()),
            modify_response: Ok(()),
            calls: Mutex::new(RecordedCalls::default()),
        }
    }

    /// Return these subnet groups from describe-subnet-groups.
    pub fn with_subnet_groups(mut self, groups: Vec<SubnetGroup>) -> Self {
        self.subnet_groups = Ok(groups);
        self
    }

    /// Fail describe-subnet-groups with the given message.
    pub fn with_subnet_groups_error(mut self, message: impl Into<String>) -> Self {
        self.subnet_groups = Err(ProviderError::new(message));
        self
    }

    /// Return this descriptor from create-instance.
    pub fn with_created_instance(mut self, instance: DbInstanceDescriptor) -> Self {
        self.create_response = Ok(instance);
        self
    }

    /// Fail create-instance with the given message.
    pub fn with_create_error(mut self, message: impl Into<String>) -> Self {
        self.create_response = Err(ProviderError::new(message));
        self
    }

    /// Append a describe response listing the given instances.
    pub fn then_describe(mut self, instances: Vec<DbInstanceDescriptor>) -> Self {
        self.describe_script.get_mut().push_back(Ok(instances));
        self
    }

    /// Append a describe response that fails with the given message.
    pub fn then_describe_error(mut self, message: impl Into<String>) -> Self {
        self.describe_script
            .get_mut()
            .push_back(Err(ProviderError::new(message)));
        self
    }

    /// Fail modify-instance with the given message.
    pub fn with_modify_error(mut self, message: impl Into<String>) -> Self {
        self.modify_response = Err(ProviderError::new(message));
        self
    }

    /// Snapshot of the calls received so far.
    pub async fn calls(&self) -> RecordedCalls {
        self.calls.lock().await.clone()
    }

    /// Number of describe-instance calls received so far.
    pub async fn describe_count(&self) -> usize {
        self.calls.lock().await.describe_requests.len()
    }

    /// Number of modify-instance calls received so far.
    pub async fn modify_count(&self) -> usize {
        self.calls.lock().await.modify_requests.len()
    }
}

#[async_trait]
impl RdsProvider for MockProvider {
    async fn describe_subnet_groups(
        &self,
        request: &DescribeSubnetGroupsRequest,
    ) -> ProviderResult<Vec<SubnetGroup>> {
        self.calls
            .lock()
            .await
            .subnet_group_requests
            .push(request.clone());
        self.subnet_groups.clone()
    }

    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> ProviderResult<DbInstanceDescriptor> {
        self.calls
            .lock()
            .await
            .create_requests
            .push(request.clone());
        self.create_response.clone()
    }

    async fn describe_instances(
        &self,
        identifier: &str,
    ) -> ProviderResult<Vec<DbInstanceDescriptor>> {
        self.calls
            .lock()
            .await
            .describe_requests
            .push(identifier.to_string());

        let mut script = self.describe_script.lock().await;
        match script.len() {
            0 => Ok(Vec::new()),
            1 => script.front().cloned().unwrap_or_else(|| Ok(Vec::new())),
            _ => script.pop_front().unwrap_or_else(|| Ok(Vec::new())),
        }
    }

    async fn modify_master_password(
        &self,
        identifier: &str,
        password: &str,
    ) -> ProviderResult<()> {
        self.calls
            .lock()
            .await
            .modify_requests
            .push((identifier.to_string(), password.to_string()));
        self.modify_response.clone()
    }
}
