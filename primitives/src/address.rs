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

//! Signer addresses and signatures as they appear inside the extrinsic signature section.

use codec::{Decode, Encode};
use sp_core::{crypto::AccountId32, ecdsa, ed25519, sr25519, Pair};

/// A multi-format address wrapper for on-chain accounts.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug)]
pub enum MultiAddress {
	/// It's an account ID (pubkey).
	#[codec(index = 0)]
	Id(AccountId32),
	/// It's an account index.
	#[codec(index = 1)]
	Index(#[codec(compact)] u32),
	/// It's some arbitrary raw bytes.
	#[codec(index = 2)]
	Raw(Vec<u8>),
	/// It's a 32 byte representation.
	#[codec(index = 3)]
	Address32([u8; 32]),
	/// It's a 20 byte representation.
	#[codec(index = 4)]
	Address20([u8; 20]),
}

impl MultiAddress {
	/// The account id behind this address, when the address carries one directly.
	pub fn account_id(&self) -> Option<AccountId32> {
		match self {
			MultiAddress::Id(id) => Some(id.clone()),
			MultiAddress::Address32(raw) => Some(AccountId32::new(*raw)),
			_ => None,
		}
	}
}

impl From<AccountId32> for MultiAddress {
	fn from(id: AccountId32) -> Self {
		MultiAddress::Id(id)
	}
}

/// Signature over the signing material, tagged with its scheme.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug)]
pub enum MultiSignature {
	/// An Ed25519 signature.
	#[codec(index = 0)]
	Ed25519([u8; 64]),
	/// An Sr25519 signature.
	#[codec(index = 1)]
	Sr25519([u8; 64]),
	/// An ECDSA/SECP256k1 signature (recoverable).
	#[codec(index = 2)]
	Ecdsa([u8; 65]),
}

impl MultiSignature {
	/// Check this signature over `message` against `signer`.
	///
	/// `message` is what was handed to the key pair, i.e. after any hashing of long signing
	/// material. ECDSA signatures are checked by recovering the public key and comparing its
	/// blake2 hash with the account id.
	pub fn verify(&self, message: &[u8], signer: &AccountId32) -> bool {
		let account: &[u8; 32] = signer.as_ref();
		match self {
			MultiSignature::Sr25519(raw) => sr25519::Pair::verify(
				&sr25519::Signature::from_raw(*raw),
				message,
				&sr25519::Public::from_raw(*account),
			),
			MultiSignature::Ed25519(raw) => ed25519::Pair::verify(
				&ed25519::Signature::from_raw(*raw),
				message,
				&ed25519::Public::from_raw(*account),
			),
			MultiSignature::Ecdsa(raw) => ecdsa::Signature::from_raw(*raw)
				.recover(message)
				.map_or(false, |public| sp_core::blake2_256(public.as_ref()) == *account),
		}
	}
}

impl From<sr25519::Signature> for MultiSignature {
	fn from(sig: sr25519::Signature) -> Self {
		let mut raw = [0u8; 64];
		raw.copy_from_slice(sig.as_ref());
		MultiSignature::Sr25519(raw)
	}
}

impl From<ed25519::Signature> for MultiSignature {
	fn from(sig: ed25519::Signature) -> Self {
		let mut raw = [0u8; 64];
		raw.copy_from_slice(sig.as_ref());
		MultiSignature::Ed25519(raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;

	#[test]
	fn address_encoding_is_discriminant_prefixed() {
		let id = AccountId32::new([7u8; 32]);
		let encoded = MultiAddress::Id(id.clone()).encode();
		assert_eq!(encoded[0], 0);
		assert_eq!(&encoded[1..], &id.encode()[..]);

		assert_eq!(MultiAddress::Index(64).encode(), hex!("010101"));
		assert_eq!(MultiAddress::Raw(vec![1, 2]).encode(), hex!("02080102"));
		assert_eq!(MultiAddress::Address20([9u8; 20]).encode()[0], 4);

		let decoded = MultiAddress::decode(&mut &encoded[..]).unwrap();
		assert_eq!(decoded.account_id(), Some(id));
		assert_eq!(MultiAddress::Index(3).account_id(), None);
	}

	#[test]
	fn signature_encoding_is_discriminant_prefixed() {
		let sig = MultiSignature::Ecdsa([1u8; 65]);
		let encoded = sig.encode();
		assert_eq!(encoded.len(), 66);
		assert_eq!(encoded[0], 2);
		assert_eq!(MultiSignature::decode(&mut &encoded[..]).unwrap(), sig);
		assert_eq!(MultiSignature::Sr25519([0u8; 64]).encode()[0], 1);
	}

	#[test]
	fn verify_checks_scheme_and_signer() {
		let pair = sr25519::Pair::from_string("//Alice", None).unwrap();
		let alice = AccountId32::from(pair.public());
		let bob = AccountId32::from(sr25519::Pair::from_string("//Bob", None).unwrap().public());
		let sig = MultiSignature::from(pair.sign(b"payload"));

		assert!(sig.verify(b"payload", &alice));
		assert!(!sig.verify(b"payload", &bob));
		assert!(!sig.verify(b"other payload", &alice));

		let ed = ed25519::Pair::from_string("//Alice", None).unwrap();
		let ed_sig = MultiSignature::from(ed.sign(b"payload"));
		assert!(ed_sig.verify(b"payload", &AccountId32::from(ed.public())));
	}
}
