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

//! Submitting an extrinsic and following it until a milestone.

use crate::{
	error::{Error, Result},
	rpc::RpcClient,
	status::WaitFor,
	subscription::StatusSubscription,
	LOG_TARGET,
};
use avail_tx_primitives::{Extrinsic, H256};
use log::*;
use serde_json::Value;
use std::time::Duration;
use tokio::{sync::oneshot, task::JoinHandle};

/// Default time to wait for a milestone.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(180);

/// Submit `xt` and subscribe to its status updates.
///
/// A rejection by the node is reported as [`Error::Submission`].
pub async fn submit_and_watch<R: RpcClient + ?Sized>(
	rpc: &R,
	xt: &Extrinsic,
) -> Result<StatusSubscription> {
	let inner = rpc
		.subscribe(
			"author_submitAndWatchExtrinsic",
			vec![Value::String(xt.to_hex())],
			"author_unwatchExtrinsic",
		)
		.await
		.map_err(Error::into_submission)?;
	Ok(StatusSubscription::new(inner))
}

/// Follow `subscription` until `milestone` is reached and return the block hash that reached
/// it.
///
/// Fails on a terminal failure status, when the stream ends, or when `timeout` elapses first.
/// The subscription is closed in every case.
pub async fn wait_for(
	subscription: &mut StatusSubscription,
	milestone: WaitFor,
	timeout: Duration,
) -> Result<H256> {
	let watch = async {
		while let Some(status) = subscription.next().await {
			let status = status?;
			debug!(target: LOG_TARGET, "Transaction status: {status}");

			if let Some(block_hash) = milestone.reached_by(&status) {
				return Ok(block_hash)
			}
			if status.is_failure() {
				return Err(Error::TransactionFailed(status))
			}
		}
		Err(Error::SubscriptionClosed)
	};

	let result = match tokio::time::timeout(timeout, watch).await {
		Ok(result) => result,
		Err(_) => Err(Error::Timeout { milestone, after: timeout }),
	};
	subscription.unsubscribe().await;
	result
}

/// Outcome of a tracked submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionResult {
	/// Block that satisfied the milestone.
	pub block_hash: H256,
	/// Hash of the extrinsic.
	pub tx_hash: H256,
}

/// Handle on a submitted extrinsic whose status is followed in the background.
///
/// The extrinsic hash is computed on a separate task and is available through
/// [`TransactionTracker::tx_hash`] independently of the milestone.
pub struct TransactionTracker {
	waiter: JoinHandle<Result<H256>>,
	tx_hash: oneshot::Receiver<H256>,
	known_hash: Option<H256>,
	cancel: Option<oneshot::Sender<()>>,
}

impl TransactionTracker {
	/// Submit `xt` and start waiting for `milestone`.
	///
	/// Submission errors are returned right away; everything after that is reported by
	/// [`TransactionTracker::result`].
	pub async fn submit<R: RpcClient + ?Sized>(
		rpc: &R,
		xt: Extrinsic,
		milestone: WaitFor,
		timeout: Duration,
	) -> Result<Self> {
		let mut subscription = submit_and_watch(rpc, &xt).await?;

		let (hash_tx, hash_rx) = oneshot::channel();
		tokio::task::spawn_blocking(move || {
			let _ = hash_tx.send(xt.hash());
		});

		let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
		let waiter = tokio::spawn(async move {
			let outcome = tokio::select! {
				result = wait_for(&mut subscription, milestone, timeout) => Some(result),
				_ = &mut cancel_rx => None,
			};
			match outcome {
				Some(result) => result,
				None => {
					debug!(target: LOG_TARGET, "Tracking cancelled, unsubscribing");
					subscription.unsubscribe().await;
					Err(Error::Cancelled)
				},
			}
		});

		Ok(Self { waiter, tx_hash: hash_rx, known_hash: None, cancel: Some(cancel_tx) })
	}

	/// Hash of the submitted extrinsic.
	pub async fn tx_hash(&mut self) -> Result<H256> {
		if let Some(hash) = self.known_hash {
			return Ok(hash)
		}
		let hash = (&mut self.tx_hash)
			.await
			.map_err(|_| Error::Task("extrinsic hashing task went away".into()))?;
		self.known_hash = Some(hash);
		Ok(hash)
	}

	/// Stop waiting. [`TransactionTracker::result`] then fails with [`Error::Cancelled`] unless
	/// the milestone was already reached.
	pub fn cancel(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			let _ = cancel.send(());
		}
	}

	/// Wait for the milestone.
	pub async fn result(mut self) -> Result<TransactionResult> {
		let tx_hash = self.tx_hash().await?;
		// Dropping the sender would count as cancellation.
		let _cancel = self.cancel.take();
		let block_hash = (&mut self.waiter).await.map_err(|e| Error::Task(e.to_string()))??;
		Ok(TransactionResult { block_hash, tx_hash })
	}
}

impl Drop for TransactionTracker {
	fn drop(&mut self) {
		self.cancel();
	}
}
