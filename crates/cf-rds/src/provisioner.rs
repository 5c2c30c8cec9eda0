// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provisioning and refresh workflows.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::credentials::{CredentialGenerator, RandomCredentials};
use crate::error::{RdsError, Result};
use crate::poller::{AvailabilityPoller, PasswordPolicy, PollerConfig};
use crate::provider::{
    CreateInstanceRequest, DescribeSubnetGroupsRequest, RdsProvider, SubnetGroup,
};
use crate::reporter::{ProgressReporter, SilentReporter};
use crate::types::{InstanceRecord, InstanceSpec};

/// Parameter group to request for an engine, if any.
pub fn parameter_group_for(engine: &str) -> Option<&'static str> {
    match engine {
        "postgres" => Some("default.postgres9.6"),
        _ => None,
    }
}

/// Handle to an instance whose availability is being awaited in the background.
///
/// Resolves exactly once, to the finished record or to the error that ended
/// polling. Dropping the handle does not stop the poll task; call
/// [`cancel`](Self::cancel) for that.
#[derive(Debug)]
pub struct ProvisionHandle {
    provisional: InstanceRecord,
    receiver: oneshot::Receiver<Result<InstanceRecord>>,
    cancel: CancellationToken,
}

impl ProvisionHandle {
    /// The record as it stood when polling started (no connection URI yet).
    pub fn provisional(&self) -> &InstanceRecord {
        &self.provisional
    }

    pub fn instance_name(&self) -> &str {
        &self.provisional.instance_name
    }

    /// Ask the poll task to stop; the handle then resolves to `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Future for ProvisionHandle {
    type Output = Result<InstanceRecord>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let name = self.provisional.instance_name.clone();
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(RdsError::TaskAborted(name))))
    }
}

/// Creates and refreshes instances against a provider.
#[derive(Clone)]
pub struct Provisioner {
    provider: Arc<dyn RdsProvider>,
    credentials: Arc<dyn CredentialGenerator>,
    reporter: Arc<dyn ProgressReporter>,
    poller_config: PollerConfig,
}

impl Provisioner {
    /// Create a provisioner with random credentials, no progress output and
    /// the default poller configuration.
    pub fn new(provider: Arc<dyn RdsProvider>) -> Self {
        Self {
            provider,
            credentials: Arc::new(RandomCredentials::new()),
            reporter: Arc::new(SilentReporter),
            poller_config: PollerConfig::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialGenerator>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_poller_config(mut self, config: PollerConfig) -> Self {
        self.poller_config = config;
        self
    }

    fn poller(&self) -> AvailabilityPoller {
        AvailabilityPoller::new(
            self.provider.clone(),
            self.credentials.clone(),
            self.reporter.clone(),
            self.poller_config.clone(),
        )
    }

    /// List the subnet groups an instance can be placed in.
    ///
    /// Fails with `NoSubnetGroups` when the account has none.
    #[instrument(skip(self))]
    pub async fn get_subnet_groups(&self) -> Result<Vec<SubnetGroup>> {
        let groups = self
            .provider
            .describe_subnet_groups(&DescribeSubnetGroupsRequest::default())
            .await?;

        if groups.is_empty() {
            return Err(RdsError::NoSubnetGroups);
        }

        debug!(count = groups.len(), "Found DB subnet groups");
        Ok(groups)
    }

    /// Create an instance and start waiting for it in the background.
    ///
    /// Errors up to and including the create call are returned directly;
    /// errors while polling arrive through the handle.
    #[instrument(skip(self, spec), fields(instance_name = %spec.name, engine = %spec.engine))]
    pub async fn create_instance(&self, spec: InstanceSpec) -> Result<ProvisionHandle> {
        spec.validate()?;

        let subnet_group = self
            .get_subnet_groups()
            .await?
            .into_iter()
            .next()
            .ok_or(RdsError::NoSubnetGroups)?;

        let database_name = self.credentials.generate_name();
        let password = self.credentials.generate_password();

        let request = CreateInstanceRequest {
            identifier: spec.name.clone(),
            instance_class: spec.instance_class.clone(),
            engine: spec.engine.clone(),
            allocated_storage_gb: i32::try_from(spec.storage_gb).map_err(|_| {
                RdsError::InvalidInput(format!("storage size {} GB is too large", spec.storage_gb))
            })?,
            availability_zone: spec.availability_zone.clone(),
            db_name: database_name.clone(),
            master_username: spec.username.clone(),
            master_password: password.clone(),
            port: spec.port,
            parameter_group: parameter_group_for(&spec.engine).map(str::to_string),
            subnet_group_name: subnet_group.name.clone(),
            publicly_accessible: true,
            multi_az: false,
            auto_minor_version_upgrade: true,
            copy_tags_to_snapshot: true,
        };

        let created = self.provider.create_instance(&request).await?;

        if created.vpc_security_groups.is_empty() {
            warn!("Instance created without VPC security groups; not registering it");
            return Err(RdsError::NoSecurityGroups {
                instance: spec.name.clone(),
            });
        }

        let mut record = InstanceRecord::from_spec(&spec, subnet_group);
        record.apply_created(&created, database_name, password);

        info!(
            resource_id = %record.resource_id,
            subnet_group = ?record.subnet_group.as_ref().map(|g| &g.name),
            "Instance creation submitted"
        );

        Ok(self.spawn_poll(record, PasswordPolicy::Keep))
    }

    /// Resynchronize an existing instance and rotate its password once it is available.
    #[instrument(skip(self))]
    pub async fn refresh_instance(&self, name: &str) -> Result<ProvisionHandle> {
        let described = self
            .provider
            .describe_instances(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RdsError::InstanceNotFound(name.to_string()))?;

        let mut record = InstanceRecord::named(name);
        record.resync_from(&described);

        info!(
            resource_id = %record.resource_id,
            status = %described.status,
            "Instance metadata refreshed"
        );

        Ok(self.spawn_poll(record, PasswordPolicy::Rotate))
    }

    fn spawn_poll(&self, mut record: InstanceRecord, password: PasswordPolicy) -> ProvisionHandle {
        let (sender, receiver) = oneshot::channel();
        let cancel = CancellationToken::new();
        let provisional = record.clone();

        let poller = self.poller();
        let token = cancel.clone();
        tokio::spawn(async move {
            let result = poller
                .wait_until_available(&mut record, password, &token)
                .await
                .map(|()| record);
            if sender.send(result).is_err() {
                debug!("Provision handle dropped before the result was delivered");
            }
        });

        ProvisionHandle {
            provisional,
            receiver,
            cancel,
        }
    }
}
