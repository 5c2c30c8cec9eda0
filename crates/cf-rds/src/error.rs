// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for cf-rds.

use thiserror::Error;

use crate::provider::ProviderError;

/// Result type using RdsError.
pub type Result<T> = std::result::Result<T, RdsError>;

/// Help text shown when the provider rejects a call for lack of credentials.
pub const CREDENTIALS_HELP_URL: &str =
    "https://docs.aws.amazon.com/sdkref/latest/guide/standardized-credentials.html";

/// Substrings that identify a missing or unusable credential chain in provider errors.
const CREDENTIALS_MARKERS: &[&str] = &[
    "NoCredentialProviders",
    "no providers in chain provided credentials",
    "CredentialsNotLoaded",
];

/// Errors that can occur while provisioning, refreshing or registering an instance.
#[derive(Debug, Error)]
pub enum RdsError {
    /// The provider rejected the call because no valid credentials were found.
    #[error(
        "No valid AWS credentials found. Please see this document for help configuring credentials: {}",
        CREDENTIALS_HELP_URL
    )]
    CredentialsMissing,

    /// The account has no DB subnet group to place the instance in.
    #[error("did not find any DB subnet groups to create RDS instance in")]
    NoSubnetGroups,

    /// The instance was created without any VPC security group.
    ///
    /// The instance exists in the provider but is not registered as a service.
    #[error(
        "RDS instance {instance} has no VPC security groups; it was created but not registered"
    )]
    NoSecurityGroups { instance: String },

    /// Describe returned no instance for the given name.
    #[error("could not find db instance {0}")]
    InstanceNotFound(String),

    /// Any other provider-side failure, passed through verbatim.
    #[error("{0}")]
    Provider(String),

    /// Invalid instance parameters or command input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The instance reported "available" without an endpoint.
    #[error("db instance {0} is available but reported no endpoint")]
    MissingEndpoint(String),

    /// Polling was cancelled before the instance became available.
    #[error("stopped waiting for db instance {0}")]
    Cancelled(String),

    /// Polling hit its attempt or deadline ceiling.
    #[error("db instance {instance} was not available after {attempts} status checks")]
    PollTimeout { instance: String, attempts: u32 },

    /// The background poll task ended without delivering a result.
    #[error("poll task for db instance {0} ended without a result")]
    TaskAborted(String),

    /// Publishing the service failed.
    #[error("service registration failed: {0}")]
    Registrar(String),

    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RdsError {
    /// Whether the error should be fixed by the user's credential setup.
    pub fn is_credentials_missing(&self) -> bool {
        matches!(self, RdsError::CredentialsMissing)
    }
}

/// Whether a raw provider message signals a missing credential chain.
pub fn is_credentials_error(message: &str) -> bool {
    CREDENTIALS_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

impl From<ProviderError> for RdsError {
    fn from(err: ProviderError) -> Self {
        if is_credentials_error(&err.message) {
            RdsError::CredentialsMissing
        } else {
            RdsError::Provider(err.message)
        }
    }
}

impl From<serde_json::Error> for RdsError {
    fn from(err: serde_json::Error) -> Self {
        RdsError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for RdsError {
    fn from(err: std::io::Error) -> Self {
        RdsError::Registrar(err.to_string())
    }
}
