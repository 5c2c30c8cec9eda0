// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Database name and master password generation.

use rand::Rng;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const LOWERCASE_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz1234567890";

/// Default length of generated names and passwords.
pub const DEFAULT_CREDENTIAL_LENGTH: usize = 10;

/// Strategy for generating database names and master passwords.
///
/// Injected into the workflows so tests can substitute deterministic values.
pub trait CredentialGenerator: Send + Sync {
    /// A fresh database name (lowercase letters only, valid as an RDS DB name).
    fn generate_name(&self) -> String;

    /// A fresh master password (lowercase letters and digits).
    fn generate_password(&self) -> String;
}

/// Generates credentials from the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomCredentials {
    length: usize,
}

impl Default for RandomCredentials {
    fn default() -> Self {
        Self {
            length: DEFAULT_CREDENTIAL_LENGTH,
        }
    }
}

impl RandomCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the length of generated values.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

fn random_string(charset: &[u8], length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

impl CredentialGenerator for RandomCredentials {
    fn generate_name(&self) -> String {
        random_string(LOWERCASE, self.length)
    }

    fn generate_password(&self) -> String {
        random_string(LOWERCASE_ALPHANUMERIC, self.length)
    }
}
