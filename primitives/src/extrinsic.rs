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

//! The extrinsic envelope: version byte, optional signature section, call, and the outer
//! length prefix used in block bodies and on the RPC transport.

use crate::{
	address::{MultiAddress, MultiSignature},
	call::Call,
	compact::CompactInteger,
	era::Era,
	error::{Error, Result},
	payload::{SignatureOptions, SignaturePayload},
	signer::ExtrinsicSigner,
	LOG_TARGET,
};
use codec::{Decode, Encode, Input, Output};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sp_core::H256;

/// The only extrinsic format version this crate reads and writes.
pub const EXTRINSIC_FORMAT_VERSION: u8 = 4;

const SIGNED_FLAG: u8 = 0b1000_0000;
const VERSION_MASK: u8 = 0b0111_1111;

/// Signer, signature and the signed extensions carried by a signed extrinsic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignatureSection {
	/// Address of the signing account.
	pub signer: MultiAddress,
	/// Signature over the signing material.
	pub signature: MultiSignature,
	/// Mortality.
	pub era: Era,
	/// Account nonce.
	pub nonce: CompactInteger,
	/// Tip.
	pub tip: CompactInteger,
	/// Application id.
	pub app_id: CompactInteger,
}

impl Encode for SignatureSection {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		self.signer.encode_to(dest);
		self.signature.encode_to(dest);
		self.era.encode_to(dest);
		self.nonce.encode_to(dest);
		self.tip.encode_to(dest);
		self.app_id.encode_to(dest);
	}
}

impl SignatureSection {
	fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
		Ok(Self {
			signer: MultiAddress::decode(input)?,
			signature: MultiSignature::decode(input)?,
			era: Era::decode_from(input)?,
			nonce: CompactInteger::decode_from(input)?,
			tip: CompactInteger::decode_from(input)?,
			app_id: CompactInteger::decode_from(input)?,
		})
	}
}

/// A transaction as it travels over the wire.
///
/// Built unsigned with [`Extrinsic::new`], signed at most once with [`Extrinsic::sign`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Extrinsic {
	version: u8,
	signature: Option<SignatureSection>,
	call: Call,
}

impl Extrinsic {
	/// An unsigned extrinsic for `call`.
	pub fn new(call: Call) -> Self {
		Self { version: EXTRINSIC_FORMAT_VERSION, signature: None, call }
	}

	/// Format version, without the signed flag.
	pub fn version(&self) -> u8 {
		self.version
	}

	/// Whether a signature section is present.
	pub fn is_signed(&self) -> bool {
		self.signature.is_some()
	}

	/// The signature section, if signed.
	pub fn signature(&self) -> Option<&SignatureSection> {
		self.signature.as_ref()
	}

	/// The call.
	pub fn call(&self) -> &Call {
		&self.call
	}

	/// The payload a signature section of this extrinsic must sign, for the given options.
	pub fn signature_payload(&self, options: &SignatureOptions) -> SignaturePayload {
		SignaturePayload::new(&self.call, options)
	}

	/// Sign the extrinsic, attaching the signature section.
	pub fn sign<S: ExtrinsicSigner + ?Sized>(
		&mut self,
		signer: &S,
		options: &SignatureOptions,
	) -> Result<()> {
		if self.signature.is_some() {
			return Err(Error::AlreadySigned)
		}
		if self.version != EXTRINSIC_FORMAT_VERSION {
			return Err(Error::UnsupportedExtrinsicVersion { version: self.version, signed: false })
		}
		options.era.validate()?;

		let payload = self.signature_payload(options);
		let signature = payload.using_signing_material(|material| signer.sign(material));
		let signer = signer.address();
		log::trace!(
			target: LOG_TARGET,
			"Signed call {}.{} for {:?} with nonce {}",
			self.call.pallet_index,
			self.call.call_index,
			signer,
			options.nonce,
		);

		self.signature = Some(SignatureSection {
			signer,
			signature,
			era: options.era,
			nonce: options.nonce,
			tip: options.tip,
			app_id: options.app_id,
		});
		Ok(())
	}

	/// Encoding of version byte, signature section and call, without the length prefix.
	pub fn encode_inner(&self) -> Vec<u8> {
		let mut inner = Vec::with_capacity(self.call.size_hint() + 128);
		match &self.signature {
			Some(section) => {
				inner.push(self.version | SIGNED_FLAG);
				section.encode_to(&mut inner);
			},
			None => inner.push(self.version),
		}
		self.call.encode_to(&mut inner);
		inner
	}

	/// Decode the unprefixed form produced by [`Extrinsic::encode_inner`]. The call takes every
	/// byte after the signature section.
	pub fn decode_inner(mut inner: &[u8]) -> Result<Self> {
		let first = inner.read_byte()?;
		let version = first & VERSION_MASK;
		let signed = first & SIGNED_FLAG != 0;
		if version != EXTRINSIC_FORMAT_VERSION {
			return Err(Error::UnsupportedExtrinsicVersion { version, signed })
		}

		let signature = if signed { Some(SignatureSection::decode_from(&mut inner)?) } else { None };
		let call = Call::decode(&mut inner)?;
		Ok(Self { version, signature, call })
	}

	/// Decode the length prefixed form from the start of `input`.
	pub fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
		let len = CompactInteger::decode_from(input)?.value();
		let len = usize::try_from(len)
			.map_err(|_| codec::Error::from("extrinsic length does not fit in memory"))?;
		if let Some(remaining) = input.remaining_len()? {
			if remaining < len {
				return Err(codec::Error::from("extrinsic length exceeds input").into())
			}
		}
		let mut inner = vec![0u8; len];
		input.read(&mut inner)?;
		Self::decode_inner(&inner)
	}

	/// Decode bytes that may or may not carry the outer length prefix.
	///
	/// The input counts as prefixed when it starts with a canonical compact integer equal to
	/// the number of bytes that follow it. Otherwise the prefix is synthesized.
	pub fn decode_lenient(bytes: &[u8]) -> Result<Self> {
		let prefixed = matches!(
			CompactInteger::decode_prefix(bytes),
			Ok((len, consumed)) if consumed as u128 + len.value() == bytes.len() as u128
		);
		if prefixed {
			match Self::decode_from(&mut &bytes[..]) {
				Ok(xt) => return Ok(xt),
				Err(e) => {
					log::trace!(
						target: LOG_TARGET,
						"Length prefixed decoding failed ({e}), retrying as unprefixed"
					);
					return Self::decode_inner(bytes).map_err(|_| e)
				},
			}
		}
		Self::decode_inner(bytes)
	}

	/// `0x` prefixed hex of the length prefixed encoding, as expected by the RPC.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(self.encode()))
	}

	/// Parse hex, with or without the `0x` prefix and with or without the length prefix.
	pub fn from_hex(s: &str) -> Result<Self> {
		let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
		Self::decode_lenient(&bytes)
	}

	/// Blake2-256 hash of the length prefixed encoding; the transaction hash nodes report.
	pub fn hash(&self) -> H256 {
		self.using_encoded(|encoded| sp_core::blake2_256(encoded)).into()
	}
}

impl Encode for Extrinsic {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		let inner = self.encode_inner();
		CompactInteger::from(inner.len()).encode_to(dest);
		dest.write(&inner);
	}
}

impl Decode for Extrinsic {
	fn decode<I: Input>(input: &mut I) -> std::result::Result<Self, codec::Error> {
		Self::decode_from(input).map_err(Into::into)
	}
}

impl Serialize for Extrinsic {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for Extrinsic {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Self::from_hex(&s).map_err(de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		call::{CallArg, CallBuilder},
		signer::pair_from_suri,
	};
	use assert_matches::assert_matches;
	use pretty_assertions::assert_eq;
	use sp_core::{crypto::AccountId32, sr25519};

	fn transfer_call() -> Call {
		let dest = AccountId32::new([0x2a; 32]);
		CallBuilder::new("Balances", "transfer_keep_alive")
			.unwrap()
			.arg(MultiAddress::Id(dest))
			.arg(CompactInteger::new(10_000_000_000_000_000_000))
			.build()
			.unwrap()
	}

	fn alice() -> sr25519::Pair {
		pair_from_suri("//Alice").unwrap()
	}

	fn signed_transfer(options: &SignatureOptions) -> Extrinsic {
		let mut xt = Extrinsic::new(transfer_call());
		xt.sign(&alice(), options).unwrap();
		xt
	}

	fn immortal() -> SignatureOptions {
		SignatureOptions::immortal(0u32, 39, 1, H256::repeat_byte(0xee))
	}

	#[test]
	fn signing_sets_the_signed_flag() {
		let unsigned = Extrinsic::new(transfer_call());
		assert!(!unsigned.is_signed());
		assert_eq!(unsigned.encode_inner()[0], 0x04);

		let xt = signed_transfer(&immortal());
		assert!(xt.is_signed());
		assert_eq!(xt.version(), 4);
		assert_eq!(xt.encode_inner()[0], 0x84);
	}

	#[test]
	fn signing_twice_fails() {
		let mut xt = signed_transfer(&immortal());
		assert_matches!(xt.sign(&alice(), &immortal()), Err(Error::AlreadySigned));
	}

	#[test]
	fn signed_extrinsic_round_trips() {
		let mut options = immortal();
		options.era = Era::mortal(1000, 2400);
		options.block_hash = H256::repeat_byte(0x07);
		options.nonce = 17u32.into();
		options.tip = 1_000_000u32.into();
		options.app_id = 5u32.into();
		let xt = signed_transfer(&options);

		let encoded = xt.encode();
		let (len, consumed) = CompactInteger::decode_prefix(&encoded).unwrap();
		assert_eq!(len.value() as usize + consumed, encoded.len());
		assert_eq!(Extrinsic::decode(&mut &encoded[..]).unwrap(), xt);
		assert_eq!(Extrinsic::from_hex(&xt.to_hex()).unwrap(), xt);
	}

	#[test]
	fn signing_rejects_eras_that_cannot_be_decoded() {
		for era in [Era::Mortal(64, 100), Era::Mortal(100, 4)] {
			let mut options = immortal();
			options.era = era;
			let mut xt = Extrinsic::new(transfer_call());
			assert_matches!(xt.sign(&alice(), &options), Err(Error::InvalidEra { .. }));
			assert!(!xt.is_signed());
		}
	}

	#[test]
	fn signature_verifies_against_signer() {
		let options = immortal();
		let xt = signed_transfer(&options);
		let section = xt.signature().unwrap();
		let material = xt.signature_payload(&options).signing_material();
		let alice_id = ExtrinsicSigner::account_id(&alice());
		assert_eq!(section.signer, MultiAddress::Id(alice_id.clone()));
		assert!(section.signature.verify(&material, &alice_id));
	}

	#[test]
	fn long_calls_are_signed_over_their_hash() {
		let call = Call::new("DataAvailability", "submit_data", vec![CallArg::Bytes(vec![7; 1024])])
			.unwrap();
		let options = immortal();
		let mut xt = Extrinsic::new(call);
		xt.sign(&alice(), &options).unwrap();

		let payload = xt.signature_payload(&options);
		let material = payload.signing_material();
		assert_eq!(material.len(), 32);
		let alice_id = ExtrinsicSigner::account_id(&alice());
		assert!(xt.signature().unwrap().signature.verify(&material, &alice_id));
	}

	#[test]
	fn legacy_unprefixed_hex_decodes_to_the_same_extrinsic() {
		let xt = signed_transfer(&immortal());
		let prefixed = xt.to_hex();
		let unprefixed = format!("0x{}", hex::encode(xt.encode_inner()));
		assert_ne!(prefixed, unprefixed);

		assert_eq!(Extrinsic::from_hex(&prefixed).unwrap(), xt);
		assert_eq!(Extrinsic::from_hex(&unprefixed).unwrap(), xt);
		assert_eq!(Extrinsic::from_hex(prefixed.trim_start_matches("0x")).unwrap(), xt);
	}

	#[test]
	fn unsigned_extrinsic_round_trips() {
		let xt = Extrinsic::new(Call { pallet_index: 3, call_index: 0, args: vec![0x0b, 1, 2] });
		assert_eq!(xt.encode(), vec![6 << 2, 0x04, 3, 0, 0x0b, 1, 2]);
		assert_eq!(Extrinsic::from_hex(&xt.to_hex()).unwrap(), xt);
	}

	#[test]
	fn other_versions_are_rejected() {
		assert_matches!(
			Extrinsic::decode_inner(&[0x85, 0, 0]),
			Err(Error::UnsupportedExtrinsicVersion { version: 5, signed: true })
		);
		assert!(Extrinsic::decode(&mut &[0x0c, 0x03, 6, 0][..]).is_err());
	}

	#[test]
	fn truncated_input_is_an_error() {
		let encoded = signed_transfer(&immortal()).encode();
		assert_matches!(Extrinsic::decode_from(&mut &encoded[..encoded.len() - 1]), Err(Error::Codec(_)));
		assert!(Extrinsic::decode_inner(&encoded[1..40]).is_err());
	}

	#[test]
	fn hash_covers_the_prefixed_encoding() {
		let xt = signed_transfer(&immortal());
		assert_eq!(xt.hash(), H256(sp_core::blake2_256(&xt.encode())));
	}

	#[test]
	fn json_uses_prefixed_hex() {
		let xt = signed_transfer(&immortal());
		let json = serde_json::to_string(&xt).unwrap();
		assert_eq!(json, format!("\"{}\"", xt.to_hex()));
		assert_eq!(serde_json::from_str::<Extrinsic>(&json).unwrap(), xt);
	}
}
