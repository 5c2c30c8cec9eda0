// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type tests for cf-rds.

use cf_rds::error::CREDENTIALS_HELP_URL;
use cf_rds::{ProviderError, RdsError};

#[test]
fn test_credentials_missing_display() {
    let err = RdsError::CredentialsMissing;
    let display = err.to_string();
    assert!(display.starts_with("No valid AWS credentials found."));
    assert!(display.contains(CREDENTIALS_HELP_URL));
}

#[test]
fn test_no_subnet_groups_display() {
    let err = RdsError::NoSubnetGroups;
    assert_eq!(
        err.to_string(),
        "did not find any DB subnet groups to create RDS instance in"
    );
}

#[test]
fn test_no_security_groups_display() {
    let err = RdsError::NoSecurityGroups {
        instance: "orders".to_string(),
    };
    let display = err.to_string();
    assert!(display.contains("orders"));
    assert!(display.contains("no VPC security groups"));
}

#[test]
fn test_instance_not_found_display() {
    let err = RdsError::InstanceNotFound("orders".to_string());
    assert_eq!(err.to_string(), "could not find db instance orders");
}

#[test]
fn test_provider_error_display_is_verbatim() {
    let err = RdsError::Provider("InvalidParameterCombination: bad class".to_string());
    assert_eq!(err.to_string(), "InvalidParameterCombination: bad class");
}

#[test]
fn test_poll_timeout_display() {
    let err = RdsError::PollTimeout {
        instance: "orders".to_string(),
        attempts: 120,
    };
    let display = err.to_string();
    assert!(display.contains("orders"));
    assert!(display.contains("120"));
}

#[test]
fn test_registrar_error_display() {
    let err = RdsError::Registrar("cf not found".to_string());
    assert!(err.to_string().contains("service registration failed"));
    assert!(err.to_string().contains("cf not found"));
}

#[test]
fn test_config_error_display() {
    let err = RdsError::Config("CF_RDS_PORT must be a number".to_string());
    assert!(err.to_string().contains("configuration error"));
}

#[test]
fn test_provider_error_conversion() {
    let err: RdsError =
        ProviderError::new("dispatch failure: no providers in chain provided credentials").into();
    assert!(err.is_credentials_missing());

    let err: RdsError = ProviderError::new("DBInstanceAlreadyExists").into();
    assert!(!err.is_credentials_missing());
    assert_eq!(err.to_string(), "DBInstanceAlreadyExists");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
    let err: RdsError = io.into();
    assert!(matches!(err, RdsError::Registrar(_)));
}

#[test]
fn test_serde_error_conversion() {
    let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err: RdsError = serde_err.into();
    assert!(err.to_string().contains("serialization error"));
}
