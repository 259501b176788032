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

//! Per-transaction options resolved into [`avail_tx_primitives::SignatureOptions`] by the
//! client.

use serde::{Deserialize, Serialize};

/// Number of recent block hashes the runtime keeps, which bounds the useful era period.
pub const DEFAULT_BLOCK_HASH_COUNT: u64 = 2400;

/// Where the account nonce is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceSource {
	/// `System.Account` at the finalized head.
	FinalizedState,
	/// `System.Account` at the best block.
	BestState,
	/// `system_accountNextIndex`, which also counts extrinsics waiting in the pool.
	#[default]
	TxPool,
	/// Use this value as is.
	Custom(u32),
}

/// Lifetime of the extrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mortality {
	/// Valid forever.
	Immortal,
	/// Valid for about `block_hash_count` blocks after the finalized head.
	Mortal {
		/// Requested lifetime in blocks.
		block_hash_count: u64,
	},
}

impl Default for Mortality {
	fn default() -> Self {
		Mortality::Mortal { block_hash_count: DEFAULT_BLOCK_HASH_COUNT }
	}
}

/// Options of a single submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOptions {
	/// Application key the extrinsic is submitted under.
	pub app_id: u32,
	/// Tip for the block author.
	pub tip: u128,
	/// Nonce lookup.
	pub nonce: NonceSource,
	/// Extrinsic lifetime.
	pub mortality: Mortality,
}

impl TransactionOptions {
	/// Set the application id.
	pub fn app_id(mut self, app_id: u32) -> Self {
		self.app_id = app_id;
		self
	}

	/// Set the tip.
	pub fn tip(mut self, tip: u128) -> Self {
		self.tip = tip;
		self
	}

	/// Set the nonce source.
	pub fn nonce(mut self, nonce: NonceSource) -> Self {
		self.nonce = nonce;
		self
	}

	/// Set the mortality.
	pub fn mortality(mut self, mortality: Mortality) -> Self {
		self.mortality = mortality;
		self
	}
}
