// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! cf-rds
//!
//! Provision AWS RDS instances and expose them to Cloud Foundry as
//! user-provided services.
//!
//! # Architecture
//!
//! ```text
//!   cf-rds CLI ──► RdsCommands ──► ServiceRegistrar (cf cups / cf uups)
//!                      │
//!                      ▼
//!                 Provisioner ──► RdsProvider (AWS RDS, mock)
//!                      │
//!                      ▼ tokio::spawn
//!              AvailabilityPoller ──► ProgressReporter
//!                      │
//!                      ▼ oneshot
//!                ProvisionHandle
//! ```
//!
//! - [`Provisioner::create_instance`] resolves a subnet group, submits the
//!   instance and returns a [`ProvisionHandle`] without waiting.
//! - [`Provisioner::refresh_instance`] re-reads an existing instance and
//!   rotates its master password once it is available.
//! - The handle resolves once the instance is available (with its
//!   connection URI) or polling failed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cf_rds::{InstanceSpec, MockProvider, PollerConfig, Provisioner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provisioner = Provisioner::new(Arc::new(MockProvider::new()))
//!     .with_poller_config(PollerConfig::new(Duration::from_secs(10)));
//!
//! let handle = provisioner
//!     .create_instance(InstanceSpec::new("orders-db"))
//!     .await?;
//! println!("Submitted {}", handle.instance_name());
//!
//! let record = handle.await?;
//! println!("Ready: {:?}", record.connection_uri());
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod poller;
pub mod provider;
pub mod provisioner;
pub mod registrar;
pub mod reporter;
mod types;

pub use commands::RdsCommands;
pub use config::RdsConfig;
pub use credentials::{CredentialGenerator, RandomCredentials};
pub use error::{RdsError, Result};
pub use poller::{AvailabilityPoller, PasswordPolicy, PollState, PollerConfig};
#[cfg(feature = "aws")]
pub use provider::AwsRdsProvider;
pub use provider::{
    CreateInstanceRequest, DbInstanceDescriptor, DescribeSubnetGroupsRequest, Endpoint,
    MockProvider, ProviderError, RdsProvider, SubnetGroup,
};
pub use provisioner::{ProvisionHandle, Provisioner, parameter_group_for};
pub use registrar::{CfCliRegistrar, ServiceRegistrar};
pub use reporter::{PollTick, ProgressReporter, SilentReporter, TerminalReporter};
pub use types::{InstanceRecord, InstanceSpec, ServiceSnapshot, UriCredentials};
