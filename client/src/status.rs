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

//! Transaction pool status notifications.

use avail_tx_primitives::H256;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Status of an extrinsic as reported by `author_submitAndWatchExtrinsic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionStatus {
	/// Waiting for a nonce gap to close.
	Future,
	/// Ready to be included.
	Ready,
	/// Gossiped to these peers.
	Broadcast(Vec<String>),
	/// Included in a block.
	#[serde(deserialize_with = "block_reference")]
	InBlock(H256),
	/// The including block was retracted.
	Retracted(H256),
	/// Finality was not reached within the pool's finality window.
	FinalityTimeout(H256),
	/// The including block was finalized.
	#[serde(deserialize_with = "block_reference")]
	Finalized(H256),
	/// Replaced by another extrinsic with the same nonce.
	Usurped(H256),
	/// Dropped from the pool, e.g. because it was full.
	Dropped,
	/// No longer valid in the current state.
	Invalid,
}

/// Newer nodes append the extrinsic's index to the block hash.
fn block_reference<'de, D: Deserializer<'de>>(deserializer: D) -> Result<H256, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Reference {
		Hash(H256),
		WithIndex(H256, u32),
	}

	match Reference::deserialize(deserializer) {
		Ok(Reference::Hash(hash)) | Ok(Reference::WithIndex(hash, _)) => Ok(hash),
		Err(_) => Err(de::Error::custom("expected a block hash or a (hash, index) pair")),
	}
}

impl TransactionStatus {
	/// Whether no further notification will follow.
	pub fn is_final(&self) -> bool {
		matches!(
			self,
			TransactionStatus::Finalized(_) |
				TransactionStatus::Usurped(_) |
				TransactionStatus::FinalityTimeout(_) |
				TransactionStatus::Dropped |
				TransactionStatus::Invalid
		)
	}

	/// Whether the extrinsic will never make it into a finalized block.
	pub fn is_failure(&self) -> bool {
		self.is_final() && !matches!(self, TransactionStatus::Finalized(_))
	}
}

impl fmt::Display for TransactionStatus {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			TransactionStatus::Future => write!(f, "future"),
			TransactionStatus::Ready => write!(f, "ready"),
			TransactionStatus::Broadcast(peers) => write!(f, "broadcast to {} peers", peers.len()),
			TransactionStatus::InBlock(hash) => write!(f, "in block {hash:?}"),
			TransactionStatus::Retracted(hash) => write!(f, "retracted from {hash:?}"),
			TransactionStatus::FinalityTimeout(hash) => write!(f, "finality timeout at {hash:?}"),
			TransactionStatus::Finalized(hash) => write!(f, "finalized in {hash:?}"),
			TransactionStatus::Usurped(hash) => write!(f, "usurped by {hash:?}"),
			TransactionStatus::Dropped => write!(f, "dropped"),
			TransactionStatus::Invalid => write!(f, "invalid"),
		}
	}
}

/// The milestone a submission waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitFor {
	/// The extrinsic is part of a block.
	BlockInclusion,
	/// The including block is finalized.
	#[default]
	BlockFinalization,
}

impl WaitFor {
	/// The hash of the block that satisfies this milestone, if `status` reaches it.
	pub fn reached_by(&self, status: &TransactionStatus) -> Option<H256> {
		match (self, status) {
			(WaitFor::BlockInclusion, TransactionStatus::InBlock(hash)) |
			(_, TransactionStatus::Finalized(hash)) => Some(*hash),
			_ => None,
		}
	}
}

impl fmt::Display for WaitFor {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			WaitFor::BlockInclusion => write!(f, "block inclusion"),
			WaitFor::BlockFinalization => write!(f, "block finalization"),
		}
	}
}

impl FromStr for WaitFor {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('-', "_").as_str() {
			"inclusion" | "in_block" | "block_inclusion" => Ok(WaitFor::BlockInclusion),
			"finalization" | "finalized" | "block_finalization" => Ok(WaitFor::BlockFinalization),
			other => Err(format!("unknown milestone '{other}', expected inclusion or finalization")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn hash_hex(byte: u8) -> String {
		format!("0x{}", hex::encode([byte; 32]))
	}

	#[test]
	fn parses_node_notifications() {
		let cases = vec![
			(json!("future"), TransactionStatus::Future),
			(json!("ready"), TransactionStatus::Ready),
			(json!({ "broadcast": ["peer"] }), TransactionStatus::Broadcast(vec!["peer".into()])),
			(json!({ "inBlock": hash_hex(1) }), TransactionStatus::InBlock(H256::repeat_byte(1))),
			(
				json!({ "inBlock": [hash_hex(2), 3] }),
				TransactionStatus::InBlock(H256::repeat_byte(2)),
			),
			(json!({ "retracted": hash_hex(4) }), TransactionStatus::Retracted(H256::repeat_byte(4))),
			(
				json!({ "finalized": [hash_hex(5), 0] }),
				TransactionStatus::Finalized(H256::repeat_byte(5)),
			),
			(json!({ "usurped": hash_hex(6) }), TransactionStatus::Usurped(H256::repeat_byte(6))),
			(json!("dropped"), TransactionStatus::Dropped),
			(json!("invalid"), TransactionStatus::Invalid),
		];
		for (json, expected) in cases {
			assert_eq!(serde_json::from_value::<TransactionStatus>(json).unwrap(), expected);
		}
		assert!(serde_json::from_value::<TransactionStatus>(json!({ "inBlock": 7 })).is_err());
	}

	#[test]
	fn finality_classification() {
		assert!(!TransactionStatus::InBlock(H256::zero()).is_final());
		assert!(!TransactionStatus::Retracted(H256::zero()).is_failure());
		assert!(TransactionStatus::Finalized(H256::zero()).is_final());
		assert!(!TransactionStatus::Finalized(H256::zero()).is_failure());
		assert!(TransactionStatus::Usurped(H256::zero()).is_failure());
		assert!(TransactionStatus::FinalityTimeout(H256::zero()).is_failure());
		assert!(TransactionStatus::Dropped.is_failure());
	}

	#[test]
	fn milestones() {
		let in_block = TransactionStatus::InBlock(H256::repeat_byte(1));
		let finalized = TransactionStatus::Finalized(H256::repeat_byte(2));

		assert_eq!(WaitFor::BlockInclusion.reached_by(&in_block), Some(H256::repeat_byte(1)));
		assert_eq!(WaitFor::BlockInclusion.reached_by(&finalized), Some(H256::repeat_byte(2)));
		assert_eq!(WaitFor::BlockFinalization.reached_by(&in_block), None);
		assert_eq!(WaitFor::BlockFinalization.reached_by(&finalized), Some(H256::repeat_byte(2)));
		assert_eq!(WaitFor::BlockFinalization.reached_by(&TransactionStatus::Ready), None);

		assert_eq!("in-block".parse::<WaitFor>().unwrap(), WaitFor::BlockInclusion);
		assert_eq!("Finalized".parse::<WaitFor>().unwrap(), WaitFor::BlockFinalization);
		assert!("soon".parse::<WaitFor>().is_err());
		assert_eq!(WaitFor::default(), WaitFor::BlockFinalization);
	}
}
