// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider module - the remote database service the workflows drive.

#[cfg(feature = "aws")]
pub mod aws;
pub mod mock;
mod traits;

#[cfg(feature = "aws")]
pub use aws::AwsRdsProvider;
pub use mock::MockProvider;
pub use traits::*;
