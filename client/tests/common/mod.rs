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

//! In-process stand-in for a node.

#![allow(dead_code)]

use async_trait::async_trait;
use avail_tx_client::{Error, Result, RpcClient, RpcSubscription};
use avail_tx_primitives::H256;
use serde_json::{json, Value};
use std::{
	collections::{HashMap, VecDeque},
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc, Mutex,
	},
};

pub const GENESIS: H256 = H256::repeat_byte(0xee);

#[derive(Clone)]
enum Reply {
	Value(Value),
	Error { code: i32, message: String },
}

impl Reply {
	fn into_result(self) -> Result<Value> {
		match self {
			Reply::Value(value) => Ok(value),
			Reply::Error { code, message } => Err(Error::RpcCall { code, message, data: None }),
		}
	}
}

/// What the next `subscribe` call produces.
pub enum Plan {
	/// Emit these notifications, then end the stream.
	Finite(Vec<Value>),
	/// Emit these notifications, then stay silent forever.
	Hang(Vec<Value>),
	/// Fail the subscription request.
	Reject { code: i32, message: String },
}

/// Scripted node. Replies are keyed by method; the last reply of a method repeats.
#[derive(Default)]
pub struct MockRpc {
	replies: Mutex<HashMap<String, VecDeque<Reply>>>,
	plans: Mutex<VecDeque<Plan>>,
	requests: Mutex<Vec<(String, Vec<Value>)>>,
	unsubscribes: Arc<AtomicUsize>,
}

impl MockRpc {
	/// A node that knows its genesis block.
	pub fn new() -> Self {
		let rpc = Self::default();
		rpc.reply("chain_getBlockHash", json!(GENESIS));
		rpc
	}

	pub fn reply(&self, method: &str, value: Value) -> &Self {
		self.push(method, Reply::Value(value))
	}

	pub fn fail(&self, method: &str, code: i32, message: &str) -> &Self {
		self.push(method, Reply::Error { code, message: message.into() })
	}

	/// Replace every queued reply of `method`.
	pub fn set_reply(&self, method: &str, value: Value) -> &Self {
		self.replies.lock().unwrap().remove(method);
		self.reply(method, value)
	}

	fn push(&self, method: &str, reply: Reply) -> &Self {
		self.replies.lock().unwrap().entry(method.into()).or_default().push_back(reply);
		self
	}

	pub fn plan(&self, plan: Plan) -> &Self {
		self.plans.lock().unwrap().push_back(plan);
		self
	}

	/// Parameters of every request to `method`, oldest first.
	pub fn requests_to(&self, method: &str) -> Vec<Vec<Value>> {
		self.requests
			.lock()
			.unwrap()
			.iter()
			.filter(|(m, _)| m == method)
			.map(|(_, params)| params.clone())
			.collect()
	}

	pub fn unsubscribes(&self) -> usize {
		self.unsubscribes.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl RpcClient for MockRpc {
	async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
		self.requests.lock().unwrap().push((method.into(), params));
		let mut replies = self.replies.lock().unwrap();
		let queue = replies.get_mut(method).ok_or_else(|| Error::RpcCall {
			code: -32601,
			message: "Method not found".into(),
			data: None,
		})?;
		let reply = if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() };
		reply.expect("queues are never empty").into_result()
	}

	async fn subscribe(
		&self,
		method: &str,
		params: Vec<Value>,
		unsubscribe_method: &str,
	) -> Result<Box<dyn RpcSubscription>> {
		assert_eq!(method, "author_submitAndWatchExtrinsic");
		assert_eq!(unsubscribe_method, "author_unwatchExtrinsic");
		self.requests.lock().unwrap().push((method.into(), params));

		let plan = self.plans.lock().unwrap().pop_front().expect("a subscription plan");
		let (items, hang) = match plan {
			Plan::Finite(items) => (items, false),
			Plan::Hang(items) => (items, true),
			Plan::Reject { code, message } =>
				return Err(Error::RpcCall { code, message, data: None }),
		};
		Ok(Box::new(MockSubscription {
			items: items.into(),
			hang,
			unsubscribes: self.unsubscribes.clone(),
		}))
	}
}

struct MockSubscription {
	items: VecDeque<Value>,
	hang: bool,
	unsubscribes: Arc<AtomicUsize>,
}

#[async_trait]
impl RpcSubscription for MockSubscription {
	async fn next(&mut self) -> Option<Result<Value>> {
		match self.items.pop_front() {
			Some(item) => Some(Ok(item)),
			None if self.hang => futures::future::pending().await,
			None => None,
		}
	}

	async fn unsubscribe(self: Box<Self>) -> Result<()> {
		self.unsubscribes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

pub fn hash_hex(hash: H256) -> String {
	format!("{hash:?}")
}
