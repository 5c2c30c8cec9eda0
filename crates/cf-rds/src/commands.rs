// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Command handlers: create, refresh and register.
//!
//! Each handler runs one workflow end to end: it publishes the service
//! through the registrar, waits for the background poll while printing
//! progress, and reports the outcome. Any error is shown through the
//! reporter before being returned.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::error::{RdsError, Result};
use crate::provisioner::{ProvisionHandle, Provisioner};
use crate::registrar::ServiceRegistrar;
use crate::reporter::{CHECK_TIME_FORMAT, ProgressReporter};
use crate::types::{InstanceRecord, InstanceSpec, UriCredentials};

/// The create/refresh/register commands.
pub struct RdsCommands {
    provisioner: Provisioner,
    registrar: Arc<dyn ServiceRegistrar>,
    reporter: Arc<dyn ProgressReporter>,
    progress_interval: Duration,
    shutdown: CancellationToken,
}

impl RdsCommands {
    pub fn new(
        provisioner: Provisioner,
        registrar: Arc<dyn ServiceRegistrar>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            provisioner,
            registrar,
            reporter,
            progress_interval: Duration::from_secs(30),
            shutdown: CancellationToken::new(),
        }
    }

    /// Interval of the "not available yet" messages.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Token that, once cancelled, stops any wait in progress.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn fail<T>(&self, error: RdsError) -> Result<T> {
        self.reporter.display_error(&error);
        Err(error)
    }

    /// Create an instance and publish it as a service named after it.
    ///
    /// The service is created right after the instance is submitted (without
    /// a URI) and updated with the full credentials once it is available.
    #[instrument(skip(self, spec), fields(instance_name = %spec.name))]
    pub async fn create(&self, spec: InstanceSpec) -> Result<InstanceRecord> {
        let mut handle = match self.provisioner.create_instance(spec).await {
            Ok(handle) => handle,
            Err(err) => return self.fail(err),
        };

        let provisional = handle.provisional().snapshot();
        let published = match provisional.to_json() {
            Ok(json) => {
                self.registrar
                    .create_service(handle.instance_name(), &json)
                    .await
            }
            Err(err) => Err(err),
        };
        if let Err(err) = published {
            handle.cancel();
            return self.fail(err);
        }

        self.finish(&mut handle).await
    }

    /// Resynchronize an instance, rotate its password and update its service.
    #[instrument(skip(self))]
    pub async fn refresh(&self, name: &str) -> Result<InstanceRecord> {
        let mut handle = match self.provisioner.refresh_instance(name).await {
            Ok(handle) => handle,
            Err(err) => return self.fail(err),
        };

        self.finish(&mut handle).await
    }

    /// Publish an externally managed database as a service, by URI only.
    ///
    /// Returns the space the service was created in.
    #[instrument(skip(self, uri))]
    pub async fn register(&self, name: &str, uri: &str) -> Result<String> {
        let result = async {
            let json = UriCredentials::new(uri).to_json()?;
            self.registrar.create_service(name, &json).await?;
            self.registrar.current_space().await
        }
        .await;

        match result {
            Ok(space) => {
                self.reporter.display_text(&format!(
                    "Successfully created user-provided service {} in space {}! You can bind this service to an app using `cf bind-service` or add it to the `services` section in your manifest.yml",
                    name, space
                ));
                Ok(space)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Wait for the poll task, publish the finished record and report success.
    async fn finish(&self, handle: &mut ProvisionHandle) -> Result<InstanceRecord> {
        let record = match self.wait_for_result(handle).await {
            Ok(record) => record,
            Err(err) => return self.fail(err),
        };

        let published = match record.snapshot().to_json() {
            Ok(json) => {
                self.registrar
                    .update_service(&record.instance_name, &json)
                    .await
            }
            Err(err) => Err(err),
        };
        if let Err(err) = published {
            return self.fail(err);
        }

        info!(instance_name = %record.instance_name, "Service published");
        self.reporter.display_text(&format!(
            "Successfully created user-provided service {} exposing RDS Instance {}, {} in AWS VPC {} with Security Group {}! You can bind this service to an app using `cf bind-service` or add it to the `services` section in your manifest.yml",
            record.instance_name,
            record.instance_name,
            record.resource_id,
            record.vpc_id().unwrap_or("unknown"),
            record.primary_security_group().unwrap_or("unknown"),
        ));
        Ok(record)
    }

    /// Two-armed wait: the handle's result vs. a progress timer.
    ///
    /// A cancelled shutdown token stops the poll task; the handle then
    /// resolves to `Cancelled`.
    async fn wait_for_result(&self, handle: &mut ProvisionHandle) -> Result<InstanceRecord> {
        let period = self.progress_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval completes immediately.
        ticker.tick().await;

        let mut shutdown_seen = false;
        loop {
            tokio::select! {
                result = &mut *handle => return result,
                _ = self.shutdown.cancelled(), if !shutdown_seen => {
                    shutdown_seen = true;
                    handle.cancel();
                }
                _ = ticker.tick() => {
                    let next_check_at = Local::now()
                        + chrono::Duration::from_std(period)
                            .unwrap_or_else(|_| chrono::Duration::zero());
                    self.reporter.display_text(&format!(
                        "Checking connectivity... not available yet, will check again at {}",
                        next_check_at.format(CHECK_TIME_FORMAT)
                    ));
                }
            }
        }
    }
}
