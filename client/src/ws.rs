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

//! WebSocket transport.

use crate::{
	error::{Error, Result},
	rpc::{RpcClient, RpcSubscription},
	LOG_TARGET,
};
use async_trait::async_trait;
use jsonrpsee::{
	core::{
		client::{ClientT, Subscription, SubscriptionClientT},
		params::ArrayParams,
	},
	ws_client::{WsClient, WsClientBuilder},
};
use log::*;
use serde_json::Value;
use std::{future::Future, sync::Arc, time::Duration};

/// Default timeout for connecting and for single RPC requests.
pub const RPC_TIMEOUT: Duration = Duration::from_secs(60);

/// Run `future`, failing with a transport error once `timeout` elapses.
pub(crate) async fn with_timeout<T, F: Future<Output = Result<T>>>(
	future: F,
	timeout: Duration,
) -> Result<T> {
	tokio::time::timeout(timeout, future)
		.await
		.map_err(|_| Error::Transport(format!("no answer within {timeout:?}")))?
}

fn array_params(params: Vec<Value>) -> Result<ArrayParams> {
	let mut array = ArrayParams::new();
	for param in params {
		array.insert(param)?;
	}
	Ok(array)
}

/// [`RpcClient`] over a jsonrpsee WebSocket connection.
#[derive(Debug, Clone)]
pub struct WsRpcClient {
	ws_client: Arc<WsClient>,
	uri: String,
}

impl WsRpcClient {
	/// Connect to `uri`, e.g. `ws://127.0.0.1:9944`.
	pub async fn new(uri: impl Into<String>) -> Result<Self> {
		Self::with_request_timeout(uri, RPC_TIMEOUT).await
	}

	/// Connect to `uri`, giving up on single requests after `request_timeout`.
	pub async fn with_request_timeout(
		uri: impl Into<String>,
		request_timeout: Duration,
	) -> Result<Self> {
		let uri = uri.into();
		debug!(target: LOG_TARGET, "initializing RPC client to {:?}", uri);

		let ws_client = with_timeout(
			async {
				WsClientBuilder::default()
					.max_request_size(u32::MAX)
					.max_response_size(u32::MAX)
					.request_timeout(request_timeout)
					.build(&uri)
					.await
					.map_err(Error::from)
			},
			RPC_TIMEOUT,
		)
		.await
		.map_err(|e| {
			warn!(target: LOG_TARGET, "Connection to {uri} failed: {e}");
			e
		})?;

		Ok(Self { ws_client: Arc::new(ws_client), uri })
	}

	/// The URI this client is connected to.
	pub fn uri(&self) -> &str {
		&self.uri
	}

	/// Whether the connection is still alive.
	pub fn is_connected(&self) -> bool {
		self.ws_client.is_connected()
	}
}

#[async_trait]
impl RpcClient for WsRpcClient {
	async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
		trace!(target: LOG_TARGET, "-> {method} {params:?}");
		let response: Value = self.ws_client.request(method, array_params(params)?).await?;
		trace!(target: LOG_TARGET, "<- {method} {response}");
		Ok(response)
	}

	async fn subscribe(
		&self,
		method: &str,
		params: Vec<Value>,
		unsubscribe_method: &str,
	) -> Result<Box<dyn RpcSubscription>> {
		trace!(target: LOG_TARGET, "-> subscribe {method} {params:?}");
		let subscription: Subscription<Value> = self
			.ws_client
			.subscribe(method, array_params(params)?, unsubscribe_method)
			.await?;
		Ok(Box::new(WsSubscription(subscription)))
	}
}

struct WsSubscription(Subscription<Value>);

#[async_trait]
impl RpcSubscription for WsSubscription {
	async fn next(&mut self) -> Option<Result<Value>> {
		self.0.next().await.map(|item| item.map_err(Error::from))
	}

	async fn unsubscribe(self: Box<Self>) -> Result<()> {
		self.0.unsubscribe().await.map_err(Error::from)
	}
}
