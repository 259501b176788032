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

//! Blocks and headers as returned by the `chain_*` RPCs, and locating submitted extrinsics
//! inside them.

use crate::{
	address::MultiAddress,
	call::{Call, CallDescriptor},
	error::{Error, Result},
	extrinsic::Extrinsic,
	LOG_TARGET,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sp_core::{Bytes, H256};

/// Block number type of the chain.
pub type BlockNumber = u32;

/// Block header. The Avail header extension is kept as opaque JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
	/// Hash of the parent block.
	pub parent_hash: H256,
	/// Block number, hex encoded on the wire.
	#[serde(serialize_with = "serialize_number", deserialize_with = "deserialize_number")]
	pub number: BlockNumber,
	/// State trie root after this block.
	pub state_root: H256,
	/// Root of the extrinsics trie.
	pub extrinsics_root: H256,
	/// Consensus digest.
	pub digest: Digest,
	/// Data availability header extension.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extension: Option<serde_json::Value>,
}

/// Header digest: a list of opaque SCALE encoded log items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
	/// Encoded digest items.
	pub logs: Vec<Bytes>,
}

fn serialize_number<S: Serializer>(
	number: &BlockNumber,
	serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
	serializer.serialize_str(&format!("0x{number:x}"))
}

/// Accepts the `0x` hex string nodes emit as well as a plain JSON number.
fn deserialize_number<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> std::result::Result<BlockNumber, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Number {
		Hex(String),
		Plain(BlockNumber),
	}

	match Number::deserialize(deserializer)? {
		Number::Plain(n) => Ok(n),
		Number::Hex(s) => {
			let digits = s.strip_prefix("0x").unwrap_or(&s);
			BlockNumber::from_str_radix(digits, 16).map_err(de::Error::custom)
		},
	}
}

/// A block: header plus the opaque extrinsics of its body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
	/// Header.
	pub header: Header,
	/// Length prefixed extrinsics.
	pub extrinsics: Vec<Bytes>,
}

/// Response of `chain_getBlock`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedBlock {
	/// The block.
	pub block: Block,
	/// Finality justifications, if any.
	#[serde(default)]
	pub justifications: Option<serde_json::Value>,
}

/// An extrinsic located by [`find_extrinsic`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundExtrinsic {
	/// Position within the block body.
	pub index: usize,
	/// Address of the signer.
	pub signer: MultiAddress,
	/// What kind of call it is.
	pub descriptor: &'static CallDescriptor,
	/// The call, including its encoded arguments.
	pub call: Call,
}

impl Block {
	/// Decode the extrinsic at `index`.
	pub fn extrinsic(&self, index: usize) -> Option<Result<Extrinsic>> {
		self.extrinsics.get(index).map(|bytes| Extrinsic::decode_lenient(bytes))
	}

	/// All extrinsics whose call targets the given pallet and call indices.
	pub fn find_calls(&self, pallet_index: u8, call_index: u8) -> Result<Vec<(usize, Extrinsic)>> {
		let mut found = Vec::new();
		for (index, bytes) in self.extrinsics.iter().enumerate() {
			let xt = Extrinsic::decode_lenient(bytes)?;
			if xt.call().pallet_index == pallet_index && xt.call().call_index == call_index {
				found.push((index, xt));
			}
		}
		Ok(found)
	}
}

/// Locate the signed extrinsic with hash `target` in `block`.
///
/// Only signed extrinsics calling one of the known calls are considered. Each candidate is
/// re-encoded and hashed; the first match is returned.
pub fn find_extrinsic(block: &Block, target: H256) -> Result<FoundExtrinsic> {
	for (index, bytes) in block.extrinsics.iter().enumerate() {
		let xt = Extrinsic::decode_lenient(bytes)?;
		let Some(section) = xt.signature() else { continue };
		let Some(descriptor) = xt.call().descriptor() else { continue };

		if xt.hash() == target {
			log::debug!(
				target: LOG_TARGET,
				"Found {target:?} at index {index} of block #{} ({})",
				block.header.number,
				descriptor.path,
			);
			return Ok(FoundExtrinsic {
				index,
				signer: section.signer.clone(),
				descriptor,
				call: xt.call().clone(),
			})
		}
	}
	Err(Error::ExtrinsicNotFound(target))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		call::CallBuilder, compact::CompactInteger, payload::SignatureOptions,
		signer::pair_from_suri,
	};
	use assert_matches::assert_matches;
	use codec::Encode;
	use sp_core::{crypto::AccountId32, sr25519, Pair};

	fn header_json(number: &str) -> serde_json::Value {
		serde_json::json!({
			"parentHash": format!("0x{}", "11".repeat(32)),
			"number": number,
			"stateRoot": format!("0x{}", "22".repeat(32)),
			"extrinsicsRoot": format!("0x{}", "33".repeat(32)),
			"digest": { "logs": ["0x0642414245b50101"] },
			"extension": { "V3": { "appLookup": { "size": 1, "index": [] } } }
		})
	}

	fn signed(nonce: u32) -> Extrinsic {
		let pair: sr25519::Pair = pair_from_suri("//Alice").unwrap();
		let call = CallBuilder::new("Balances", "transfer_keep_alive")
			.unwrap()
			.arg(AccountId32::new([1; 32]))
			.arg(CompactInteger::new(5))
			.build()
			.unwrap();
		let mut xt = Extrinsic::new(call);
		xt.sign(&pair, &SignatureOptions::immortal(nonce, 1, 1, H256::zero())).unwrap();
		xt
	}

	fn block_with(extrinsics: Vec<Vec<u8>>) -> Block {
		Block {
			header: serde_json::from_value(header_json("0x2a")).unwrap(),
			extrinsics: extrinsics.into_iter().map(Bytes).collect(),
		}
	}

	#[test]
	fn header_number_is_hex() {
		let header: Header = serde_json::from_value(header_json("0x1b4")).unwrap();
		assert_eq!(header.number, 436);
		assert_eq!(header.parent_hash, H256::repeat_byte(0x11));
		assert_eq!(header.digest.logs.len(), 1);
		assert!(header.extension.is_some());

		let json = serde_json::to_value(&header).unwrap();
		assert_eq!(json["number"], "0x1b4");

		let plain: Header = serde_json::from_value({
			let mut v = header_json("0x0");
			v["number"] = 7.into();
			v
		})
		.unwrap();
		assert_eq!(plain.number, 7);
	}

	#[test]
	fn signed_block_parses() {
		let xt = signed(0);
		let json = serde_json::json!({
			"block": { "header": header_json("0x10"), "extrinsics": [xt.to_hex()] },
			"justifications": null
		});
		let signed_block: SignedBlock = serde_json::from_value(json).unwrap();
		assert_eq!(signed_block.block.extrinsic(0).unwrap().unwrap(), xt);
		assert!(signed_block.block.extrinsic(1).is_none());
	}

	#[test]
	fn finds_signed_extrinsic_by_hash() {
		let timestamp = Extrinsic::new(Call { pallet_index: 3, call_index: 0, args: vec![0x0b, 0, 0] });
		let first = signed(0);
		let second = signed(1);
		let block = block_with(vec![timestamp.encode(), first.encode(), second.encode()]);

		let found = find_extrinsic(&block, second.hash()).unwrap();
		assert_eq!(found.index, 2);
		assert_eq!(found.descriptor.path, "Balances.transfer_keep_alive");
		assert_eq!(found.call, *second.call());
		let alice: sr25519::Pair = pair_from_suri("//Alice").unwrap();
		assert_eq!(found.signer, MultiAddress::Id(alice.public().into()));

		assert_matches!(
			find_extrinsic(&block, H256::repeat_byte(9)),
			Err(Error::ExtrinsicNotFound(h)) if h == H256::repeat_byte(9)
		);
	}

	#[test]
	fn unprefixed_body_entries_are_accepted() {
		let xt = signed(3);
		let block = block_with(vec![xt.encode_inner()]);
		assert_eq!(find_extrinsic(&block, xt.hash()).unwrap().index, 0);
	}

	#[test]
	fn corrupt_body_entries_are_reported() {
		let block = block_with(vec![vec![0x08, 0x85, 0x00]]);
		assert_matches!(
			find_extrinsic(&block, H256::zero()),
			Err(Error::UnsupportedExtrinsicVersion { version: 5, signed: true })
		);
	}

	#[test]
	fn find_calls_filters_by_index() {
		let block = block_with(vec![signed(0).encode(), signed(1).encode()]);
		let transfers = block.find_calls(6, 3).unwrap();
		assert_eq!(transfers.len(), 2);
		assert_eq!(transfers[1].0, 1);
		assert!(block.find_calls(29, 1).unwrap().is_empty());
	}
}
