// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Publishing connection details as Cloud Foundry user-provided services.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{RdsError, Result};

/// Publishes credentials documents as bindable services.
#[async_trait]
pub trait ServiceRegistrar: Send + Sync {
    /// Create a user-provided service named `name` with the given JSON credentials.
    async fn create_service(&self, name: &str, credentials_json: &str) -> Result<()>;

    /// Replace the credentials of an existing user-provided service.
    async fn update_service(&self, name: &str, credentials_json: &str) -> Result<()>;

    /// Name of the space services are published into.
    async fn current_space(&self) -> Result<String>;
}

/// Registrar that shells out to the `cf` CLI.
#[derive(Debug, Clone)]
pub struct CfCliRegistrar {
    binary: String,
}

impl Default for CfCliRegistrar {
    fn default() -> Self {
        Self::new("cf")
    }
}

impl CfCliRegistrar {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary).args(args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(RdsError::Registrar(format!(
                "`{} {}` failed ({}): {}",
                self.binary,
                args.first().copied().unwrap_or_default(),
                output.status,
                detail
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ServiceRegistrar for CfCliRegistrar {
    #[instrument(skip(self, credentials_json))]
    async fn create_service(&self, name: &str, credentials_json: &str) -> Result<()> {
        self.run(&["cups", name, "-p", credentials_json]).await?;
        debug!("User-provided service created");
        Ok(())
    }

    #[instrument(skip(self, credentials_json))]
    async fn update_service(&self, name: &str, credentials_json: &str) -> Result<()> {
        self.run(&["uups", name, "-p", credentials_json]).await?;
        debug!("User-provided service updated");
        Ok(())
    }

    async fn current_space(&self) -> Result<String> {
        let target = self.run(&["target"]).await?;
        parse_space_name(&target)
            .ok_or_else(|| RdsError::Registrar("no space targeted; run `cf target -s SPACE`".into()))
    }
}

/// Extract the space name from `cf target` output.
pub fn parse_space_name(target_output: &str) -> Option<String> {
    target_output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("space") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
