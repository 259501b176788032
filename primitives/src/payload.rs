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

//! The material an account signs to authorize an extrinsic.

use crate::{
	call::Call,
	compact::CompactInteger,
	era::Era,
	error::{Error, Result},
};
use codec::{Decode, Encode, Input, Output};
use sp_core::H256;

/// Signing material longer than this is replaced by its blake2-256 hash.
pub const MAX_UNHASHED_PAYLOAD: usize = 256;

/// Everything the signature section and the signed payload need besides the call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignatureOptions {
	/// Transaction mortality.
	pub era: Era,
	/// Account nonce.
	pub nonce: CompactInteger,
	/// Tip for the block author.
	pub tip: CompactInteger,
	/// Application the extrinsic belongs to, `0` for none.
	pub app_id: CompactInteger,
	/// Runtime spec version.
	pub spec_version: u32,
	/// Runtime transaction version.
	pub transaction_version: u32,
	/// Genesis hash of the chain.
	pub genesis_hash: H256,
	/// Hash of the block the era is anchored to. Not used for immortal extrinsics.
	pub block_hash: H256,
}

impl SignatureOptions {
	/// Options for an immortal extrinsic with zero tip and no application.
	pub fn immortal(
		nonce: impl Into<CompactInteger>,
		spec_version: u32,
		transaction_version: u32,
		genesis_hash: H256,
	) -> Self {
		Self {
			era: Era::Immortal,
			nonce: nonce.into(),
			tip: CompactInteger::default(),
			app_id: CompactInteger::default(),
			spec_version,
			transaction_version,
			genesis_hash,
			block_hash: genesis_hash,
		}
	}
}

/// A payload that is signed, never parsed.
///
/// Encoding order: call, era, nonce, tip, app id, spec version, transaction version, genesis
/// hash, era reference block hash.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignaturePayload {
	call: Call,
	era: Era,
	nonce: CompactInteger,
	tip: CompactInteger,
	app_id: CompactInteger,
	spec_version: u32,
	transaction_version: u32,
	genesis_hash: H256,
	block_hash: H256,
}

impl SignaturePayload {
	/// Assemble the payload. For an immortal era the genesis hash is used as the reference
	/// block hash whatever `options.block_hash` says.
	pub fn new(call: &Call, options: &SignatureOptions) -> Self {
		let block_hash =
			if options.era.is_immortal() { options.genesis_hash } else { options.block_hash };
		Self {
			call: call.clone(),
			era: options.era,
			nonce: options.nonce,
			tip: options.tip,
			app_id: options.app_id,
			spec_version: options.spec_version,
			transaction_version: options.transaction_version,
			genesis_hash: options.genesis_hash,
			block_hash,
		}
	}

	/// Run `f` on the bytes that get signed: the encoded payload, or its blake2-256 hash when
	/// it is longer than [`MAX_UNHASHED_PAYLOAD`].
	pub fn using_signing_material<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
		self.using_encoded(|payload| {
			if payload.len() > MAX_UNHASHED_PAYLOAD {
				f(&sp_core::blake2_256(payload)[..])
			} else {
				f(payload)
			}
		})
	}

	/// Owned copy of the signing material.
	pub fn signing_material(&self) -> Vec<u8> {
		self.using_signing_material(|material| material.to_vec())
	}

	/// Always fails with [`Error::PayloadDecodeUnsupported`].
	pub fn decode_from(_bytes: &[u8]) -> Result<Self> {
		Err(Error::PayloadDecodeUnsupported)
	}
}

impl Encode for SignaturePayload {
	fn size_hint(&self) -> usize {
		self.call.size_hint() +
			self.era.size_hint() +
			self.nonce.encoded_len() +
			self.tip.encoded_len() +
			self.app_id.encoded_len() +
			4 + 4 + 32 + 32
	}

	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		self.call.encode_to(dest);
		self.era.encode_to(dest);
		self.nonce.encode_to(dest);
		self.tip.encode_to(dest);
		self.app_id.encode_to(dest);
		self.spec_version.encode_to(dest);
		self.transaction_version.encode_to(dest);
		self.genesis_hash.encode_to(dest);
		self.block_hash.encode_to(dest);
	}
}

impl Decode for SignaturePayload {
	fn decode<I: Input>(_input: &mut I) -> std::result::Result<Self, codec::Error> {
		Err(Error::PayloadDecodeUnsupported.into())
	}
}
