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

//! The transport seam between the client and a node.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A raw JSON-RPC subscription.
#[async_trait]
pub trait RpcSubscription: Send {
	/// Next notification, `None` once the server closed the subscription.
	async fn next(&mut self) -> Option<Result<Value>>;

	/// Tell the server to stop sending notifications.
	async fn unsubscribe(self: Box<Self>) -> Result<()>;
}

/// JSON-RPC access to a node.
///
/// Implemented over WebSocket by [`crate::WsRpcClient`]; anything else that speaks JSON-RPC
/// (an HTTP bridge, an in-process mock) can stand in.
#[async_trait]
pub trait RpcClient: Send + Sync + 'static {
	/// Perform a single request with positional parameters.
	async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value>;

	/// Open a subscription with positional parameters.
	async fn subscribe(
		&self,
		method: &str,
		params: Vec<Value>,
		unsubscribe_method: &str,
	) -> Result<Box<dyn RpcSubscription>>;
}
