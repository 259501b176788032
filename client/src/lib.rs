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

//! JSON-RPC client for Avail-flavoured Substrate chains.
//!
//! [`Client`] resolves nonce, era and runtime versions, signs calls built with
//! [`avail_tx_primitives`], submits them and follows their status until a [`WaitFor`]
//! milestone through a [`TransactionTracker`].

#![warn(missing_docs)]

mod client;
mod error;
mod kate;
mod options;
mod rpc;
mod status;
mod subscription;
mod tracker;
mod ws;

pub use client::{account_info_key, Client, RuntimeVersion};
pub use error::{Error, Result};
pub use options::{Mortality, NonceSource, TransactionOptions, DEFAULT_BLOCK_HASH_COUNT};
pub use rpc::{RpcClient, RpcSubscription};
pub use status::{TransactionStatus, WaitFor};
pub use subscription::StatusSubscription;
pub use tracker::{
	submit_and_watch, wait_for, TransactionResult, TransactionTracker, DEFAULT_WAIT_TIMEOUT,
};
pub use ws::{WsRpcClient, RPC_TIMEOUT};

pub use avail_tx_primitives as primitives;

/// Log target of this crate.
pub const LOG_TARGET: &str = "avail-tx";
