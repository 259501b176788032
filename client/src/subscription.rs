// This file is part of avail-tx.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed transaction status subscription.

use crate::{
	error::{Error, Result},
	rpc::RpcSubscription,
	status::TransactionStatus,
	LOG_TARGET,
};
use log::*;

/// Stream of [`TransactionStatus`] updates of one submitted extrinsic.
///
/// The subscription is closed on the node exactly once: on the first call to
/// [`StatusSubscription::unsubscribe`], or on drop if that never happened.
pub struct StatusSubscription {
	inner: Option<Box<dyn RpcSubscription>>,
}

impl StatusSubscription {
	/// Wrap a raw `author_extrinsicUpdate` subscription.
	pub fn new(inner: Box<dyn RpcSubscription>) -> Self {
		Self { inner: Some(inner) }
	}

	/// Next status update. `None` after the node ended the stream or after unsubscribing.
	pub async fn next(&mut self) -> Option<Result<TransactionStatus>> {
		let inner = self.inner.as_mut()?;
		let item = inner.next().await?;
		Some(item.and_then(|value| serde_json::from_value(value).map_err(Error::from)))
	}

	/// Close the subscription. Calling this again is a no-op.
	pub async fn unsubscribe(&mut self) {
		if let Some(inner) = self.inner.take() {
			if let Err(e) = inner.unsubscribe().await {
				debug!(target: LOG_TARGET, "Failed to unsubscribe from status updates: {e}");
			}
		}
	}

	/// Whether the subscription is still open on our side.
	pub fn is_active(&self) -> bool {
		self.inner.is_some()
	}
}

impl Drop for StatusSubscription {
	fn drop(&mut self) {
		let Some(inner) = self.inner.take() else { return };
		match tokio::runtime::Handle::try_current() {
			Ok(handle) => {
				handle.spawn(async move {
					if let Err(e) = inner.unsubscribe().await {
						debug!(target: LOG_TARGET, "Failed to unsubscribe on drop: {e}");
					}
				});
			},
			Err(_) => trace!(target: LOG_TARGET, "No runtime to unsubscribe on, dropping"),
		}
	}
}
