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

//! Types returned by the `kate_*` RPCs.

use crate::{compact::CompactInteger, error::Error};
use codec::{Decode, Encode, Input, Output};
use serde::{Deserialize, Serialize};
use sp_core::{H256, U256};

/// Maximum number of cells a single `kate_queryProof` may ask for.
pub const MAX_CELLS: usize = 10_000;

/// A cell of the data matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct Cell {
	/// Row index.
	pub row: u32,
	/// Column index.
	pub col: u32,
}

impl Cell {
	/// Cell at `row`, `col`.
	pub fn new(row: u32, col: u32) -> Self {
		Self { row, col }
	}
}

/// A 48 byte KZG opening proof.
///
/// Serialized as a plain byte list since serde has no impls for arrays this long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct GProof(pub [u8; 48]);

impl From<GProof> for Vec<u8> {
	fn from(proof: GProof) -> Self {
		proof.0.to_vec()
	}
}

impl TryFrom<Vec<u8>> for GProof {
	type Error = Error;

	fn try_from(data: Vec<u8>) -> Result<Self, Self::Error> {
		let len = data.len();
		data.try_into()
			.map(GProof)
			.map_err(|_| Error::InvalidProof(format!("expected 48 proof bytes, got {len}")))
	}
}

/// Cell scalar and its opening proof.
pub type GDataProof = (U256, GProof);

/// A row of the extended data matrix.
pub type GRow = Vec<U256>;

/// Roots committed to in the header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxDataRoots {
	/// Root over blob and bridge roots.
	pub data_root: H256,
	/// Root of submitted data.
	pub blob_root: H256,
	/// Root of bridge messages.
	pub bridge_root: H256,
}

/// Merkle proof of a data leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProof {
	/// Committed roots.
	pub roots: TxDataRoots,
	/// Inner node hashes from the leaf up, excluding leaf and root.
	pub proof: Vec<H256>,
	/// Number of leaves in the tree.
	#[codec(compact)]
	pub number_of_leaves: u32,
	/// Zero based leaf index.
	#[codec(compact)]
	pub leaf_index: u32,
	/// The leaf.
	pub leaf: H256,
}

/// Message bridged out of Avail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Message {
	/// Arbitrary payload.
	ArbitraryMessage(Vec<u8>),
	/// Token transfer.
	#[serde(rename_all = "camelCase")]
	FungibleToken {
		/// Asset identifier.
		asset_id: H256,
		/// Amount transferred.
		amount: u128,
	},
}

impl Message {
	const ARBITRARY: u8 = 0;
	const FUNGIBLE_TOKEN: u8 = 1;
}

impl Encode for Message {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		match self {
			Message::ArbitraryMessage(data) => {
				dest.push_byte(Self::ARBITRARY);
				data.encode_to(dest);
			},
			Message::FungibleToken { asset_id, amount } => {
				dest.push_byte(Self::FUNGIBLE_TOKEN);
				asset_id.encode_to(dest);
				CompactInteger::new(*amount).encode_to(dest);
			},
		}
	}
}

impl Decode for Message {
	fn decode<I: Input>(input: &mut I) -> Result<Self, codec::Error> {
		match input.read_byte()? {
			Self::ARBITRARY => Ok(Message::ArbitraryMessage(Vec::<u8>::decode(input)?)),
			Self::FUNGIBLE_TOKEN => Ok(Message::FungibleToken {
				asset_id: H256::decode(input)?,
				amount: CompactInteger::decode(input)?.value(),
			}),
			_ => Err("unknown message discriminant".into()),
		}
	}
}

/// A bridge message with its routing information.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressedMessage {
	/// The message.
	pub message: Message,
	/// Sender.
	pub from: H256,
	/// Recipient.
	pub to: H256,
	/// Origin domain.
	#[codec(compact)]
	pub origin_domain: u32,
	/// Destination domain.
	#[codec(compact)]
	pub destination_domain: u32,
	/// Message id.
	#[codec(compact)]
	pub id: u64,
}

/// Response of `kate_queryDataProof`.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
	/// Proof of the data leaf.
	pub data_proof: DataProof,
	/// The bridge message, when the leaf is one.
	pub message: Option<AddressedMessage>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn message_discriminant_selects_the_variant() {
		let token = Message::FungibleToken { asset_id: H256::repeat_byte(1), amount: 1_000 };
		let encoded = token.encode();
		assert_eq!(encoded[0], 1);
		assert_eq!(&encoded[33..], &codec::Compact(1_000u128).encode()[..]);
		assert_eq!(Message::decode(&mut &encoded[..]).unwrap(), token);

		let arbitrary = Message::ArbitraryMessage(b"hello".to_vec());
		assert_eq!(arbitrary.encode(), [&[0u8, 5 << 2][..], &b"hello"[..]].concat());
		assert_eq!(Message::decode(&mut &arbitrary.encode()[..]).unwrap(), arbitrary);

		assert!(Message::decode(&mut &[2u8, 0][..]).is_err());
	}

	#[test]
	fn proof_response_json() {
		let json = serde_json::json!({
			"dataProof": {
				"roots": {
					"dataRoot": format!("0x{}", "01".repeat(32)),
					"blobRoot": format!("0x{}", "02".repeat(32)),
					"bridgeRoot": format!("0x{}", "03".repeat(32)),
				},
				"proof": [format!("0x{}", "04".repeat(32))],
				"numberOfLeaves": 2,
				"leafIndex": 1,
				"leaf": format!("0x{}", "05".repeat(32)),
			},
			"message": {
				"message": { "arbitraryMessage": [1, 2, 3] },
				"from": format!("0x{}", "06".repeat(32)),
				"to": format!("0x{}", "07".repeat(32)),
				"originDomain": 1,
				"destinationDomain": 2,
				"id": 9,
			}
		});
		let response: ProofResponse = serde_json::from_value(json).unwrap();
		assert_eq!(response.data_proof.roots.blob_root, H256::repeat_byte(2));
		assert_eq!(response.data_proof.leaf_index, 1);
		let message = response.message.clone().unwrap();
		assert_eq!(message.message, Message::ArbitraryMessage(vec![1, 2, 3]));
		assert_eq!(ProofResponse::decode(&mut &response.encode()[..]).unwrap(), response);
	}

	#[test]
	fn g_data_proof_json() {
		let proof: Vec<u8> = (0..48).collect();
		let json = serde_json::json!([["0x2a", proof]]);
		let proofs: Vec<GDataProof> = serde_json::from_value(json).unwrap();
		assert_eq!(proofs[0].0, U256::from(42u64));
		assert_eq!(proofs[0].1 .0[47], 47);

		let short = serde_json::json!(["0x1", [1, 2, 3]]);
		assert!(serde_json::from_value::<GDataProof>(short).is_err());
		assert_matches!(GProof::try_from(vec![0u8; 47]), Err(Error::InvalidProof(_)));
	}
}
