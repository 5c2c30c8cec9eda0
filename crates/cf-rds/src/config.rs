// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for cf-rds.

use std::time::Duration;

use crate::error::{RdsError, Result};
use crate::poller::PollerConfig;
use crate::types::{DEFAULT_AVAILABILITY_ZONE, DEFAULT_PORT, DEFAULT_USERNAME, InstanceSpec};

/// Configuration for the provisioning commands.
#[derive(Debug, Clone)]
pub struct RdsConfig {
    /// Availability poller settings.
    pub poller: PollerConfig,
    /// How often the command loop prints "not available yet".
    pub progress_interval: Duration,
    /// Cloud Foundry CLI executable used to publish services.
    pub cf_binary: String,
    /// Availability zone for new instances.
    pub availability_zone: String,
    /// Port for new instances.
    pub port: u16,
    /// Master username for new instances.
    pub username: String,
}

impl Default for RdsConfig {
    fn default() -> Self {
        let poller = PollerConfig::default();
        Self {
            progress_interval: poller.wait_duration,
            poller,
            cf_binary: "cf".to_string(),
            availability_zone: DEFAULT_AVAILABILITY_ZONE.to_string(),
            port: DEFAULT_PORT,
            username: DEFAULT_USERNAME.to_string(),
        }
    }
}

impl RdsConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CF_RDS_WAIT_DURATION_SECS`: Delay between status checks (default: 30)
    /// - `CF_RDS_MAX_POLL_ATTEMPTS`: Maximum status checks (default: unlimited)
    /// - `CF_RDS_POLL_DEADLINE_SECS`: Overall wait limit, `0` disables it (default: 3600)
    /// - `CF_RDS_PROGRESS_INTERVAL_SECS`: Progress message interval (default: wait duration)
    /// - `CF_RDS_CF_BINARY`: Cloud Foundry CLI executable (default: "cf")
    /// - `CF_RDS_AVAILABILITY_ZONE`: AZ for new instances (default: "us-east-1a")
    /// - `CF_RDS_PORT`: Port for new instances (default: 5432)
    /// - `CF_RDS_USERNAME`: Master username for new instances (default: "root")
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let wait_secs: u64 = std::env::var("CF_RDS_WAIT_DURATION_SECS")
            .unwrap_or_else(|_| defaults.poller.wait_duration.as_secs().to_string())
            .parse()
            .map_err(|e| RdsError::Config(format!("invalid CF_RDS_WAIT_DURATION_SECS: {}", e)))?;
        let wait_duration = Duration::from_secs(wait_secs);

        let max_attempts = match std::env::var("CF_RDS_MAX_POLL_ATTEMPTS") {
            Ok(value) => Some(value.parse::<u32>().map_err(|e| {
                RdsError::Config(format!("invalid CF_RDS_MAX_POLL_ATTEMPTS: {}", e))
            })?),
            Err(_) => None,
        };

        let deadline_secs: u64 = match std::env::var("CF_RDS_POLL_DEADLINE_SECS") {
            Ok(value) => value.parse().map_err(|e| {
                RdsError::Config(format!("invalid CF_RDS_POLL_DEADLINE_SECS: {}", e))
            })?,
            Err(_) => defaults
                .poller
                .deadline
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        };
        let deadline = (deadline_secs > 0).then(|| Duration::from_secs(deadline_secs));

        let progress_interval = match std::env::var("CF_RDS_PROGRESS_INTERVAL_SECS") {
            Ok(value) => Duration::from_secs(value.parse().map_err(|e| {
                RdsError::Config(format!("invalid CF_RDS_PROGRESS_INTERVAL_SECS: {}", e))
            })?),
            Err(_) => wait_duration,
        };

        let cf_binary = std::env::var("CF_RDS_CF_BINARY").unwrap_or(defaults.cf_binary);

        let availability_zone =
            std::env::var("CF_RDS_AVAILABILITY_ZONE").unwrap_or(defaults.availability_zone);

        let port: u16 = match std::env::var("CF_RDS_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|e| RdsError::Config(format!("invalid CF_RDS_PORT: {}", e)))?,
            Err(_) => defaults.port,
        };

        let username = std::env::var("CF_RDS_USERNAME").unwrap_or(defaults.username);

        let config = Self {
            poller: PollerConfig {
                wait_duration,
                max_attempts,
                deadline,
            },
            progress_interval,
            cf_binary,
            availability_zone,
            port,
            username,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the wait loops cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.poller.wait_duration.is_zero() {
            return Err(RdsError::Config(
                "wait duration must be greater than zero".to_string(),
            ));
        }
        if self.progress_interval.is_zero() {
            return Err(RdsError::Config(
                "progress interval must be greater than zero".to_string(),
            ));
        }
        if self.poller.max_attempts == Some(0) {
            return Err(RdsError::Config(
                "max poll attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the poller configuration.
    pub fn with_poller(mut self, poller: PollerConfig) -> Self {
        self.poller = poller;
        self
    }

    /// Set the progress message interval.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the Cloud Foundry CLI executable.
    pub fn with_cf_binary(mut self, binary: impl Into<String>) -> Self {
        self.cf_binary = binary.into();
        self
    }

    /// Instance spec for `name` with the configured AZ, port and username.
    pub fn instance_spec(&self, name: impl Into<String>) -> InstanceSpec {
        InstanceSpec::new(name)
            .with_availability_zone(&self.availability_zone)
            .with_port(self.port)
            .with_username(&self.username)
    }
}
