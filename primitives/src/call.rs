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

//! Runtime calls and the typed builder used to assemble them.
//!
//! Each supported call is described by a [`CallDescriptor`] carrying its pallet and call
//! indices and the kinds of its parameters. [`CallBuilder`] checks supplied arguments
//! against the descriptor before any bytes are produced, so a malformed call is rejected
//! when it is built rather than by the node.

use crate::{
	address::MultiAddress,
	compact::CompactInteger,
	error::{Error, Result},
};
use codec::{Decode, Encode, Input, Output};
use sp_core::crypto::{AccountId32, Ss58Codec};
use std::{fmt, str::FromStr};

/// Pallet indices of the Avail runtime.
pub mod pallet {
	/// `Balances`.
	pub const BALANCES: u8 = 6;
	/// `TransactionPayment`.
	pub const TRANSACTION_PAYMENT: u8 = 7;
	/// `Staking`.
	pub const STAKING: u8 = 10;
	/// `Sudo`.
	pub const SUDO: u8 = 19;
	/// `DataAvailability`.
	pub const DATA_AVAILABILITY: u8 = 29;
}

/// An encoded runtime call: pallet index, call index and the SCALE encoded arguments.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Call {
	/// Index of the pallet in the runtime.
	pub pallet_index: u8,
	/// Index of the call inside the pallet.
	pub call_index: u8,
	/// Concatenated argument encodings.
	pub args: Vec<u8>,
}

impl Call {
	/// Build a call by name, validating the arguments against the call table.
	pub fn new(pallet: &str, call: &str, args: Vec<CallArg>) -> Result<Self> {
		let mut builder = CallBuilder::new(pallet, call)?;
		for arg in args {
			builder = builder.arg(arg);
		}
		builder.build()
	}

	/// The descriptor of this call, if it is one of the known calls.
	pub fn descriptor(&self) -> Option<&'static CallDescriptor> {
		CallDescriptor::by_index(self.pallet_index, self.call_index)
	}
}

impl Encode for Call {
	fn size_hint(&self) -> usize {
		2 + self.args.len()
	}

	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		dest.push_byte(self.pallet_index);
		dest.push_byte(self.call_index);
		dest.write(&self.args);
	}
}

/// A call owns every byte that follows its indices, so decoding needs to know how much input
/// is left.
impl Decode for Call {
	fn decode<I: Input>(input: &mut I) -> std::result::Result<Self, codec::Error> {
		let pallet_index = input.read_byte()?;
		let call_index = input.read_byte()?;
		let remaining = input
			.remaining_len()?
			.ok_or_else(|| codec::Error::from("call arguments need a bounded input"))?;
		let mut args = vec![0u8; remaining];
		input.read(&mut args)?;
		Ok(Call { pallet_index, call_index, args })
	}
}

/// Shape of a call parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArgKind {
	/// Fixed width `u8`.
	U8,
	/// Fixed width `u32`.
	U32,
	/// Fixed width `u64`.
	U64,
	/// Fixed width `u128`.
	U128,
	/// Single byte boolean.
	Bool,
	/// Compact encoded unsigned integer.
	Compact,
	/// Length prefixed byte vector.
	Bytes,
	/// [`MultiAddress`].
	Address,
	/// Raw 32 byte account id.
	AccountId,
	/// Length prefixed list of [`MultiAddress`].
	Addresses,
	/// Staking reward destination.
	Payee,
	/// A nested call.
	Call,
	/// Pre-encoded bytes appended verbatim.
	Raw,
}

impl ArgKind {
	/// Human readable name of the kind.
	pub fn name(&self) -> &'static str {
		match self {
			ArgKind::U8 => "u8",
			ArgKind::U32 => "u32",
			ArgKind::U64 => "u64",
			ArgKind::U128 => "u128",
			ArgKind::Bool => "bool",
			ArgKind::Compact => "compact",
			ArgKind::Bytes => "bytes",
			ArgKind::Address => "address",
			ArgKind::AccountId => "account id",
			ArgKind::Addresses => "address list",
			ArgKind::Payee => "payee",
			ArgKind::Call => "call",
			ArgKind::Raw => "raw",
		}
	}
}

impl fmt::Display for ArgKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A typed call argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CallArg {
	/// See [`ArgKind::U8`].
	U8(u8),
	/// See [`ArgKind::U32`].
	U32(u32),
	/// See [`ArgKind::U64`].
	U64(u64),
	/// See [`ArgKind::U128`].
	U128(u128),
	/// See [`ArgKind::Bool`].
	Bool(bool),
	/// See [`ArgKind::Compact`].
	Compact(CompactInteger),
	/// See [`ArgKind::Bytes`].
	Bytes(Vec<u8>),
	/// See [`ArgKind::Address`].
	Address(MultiAddress),
	/// See [`ArgKind::AccountId`].
	AccountId(AccountId32),
	/// See [`ArgKind::Addresses`].
	Addresses(Vec<MultiAddress>),
	/// See [`ArgKind::Payee`].
	Payee(Payee),
	/// See [`ArgKind::Call`].
	Call(Box<Call>),
	/// See [`ArgKind::Raw`].
	Raw(Vec<u8>),
}

impl CallArg {
	/// Kind of this argument.
	pub fn kind(&self) -> ArgKind {
		match self {
			CallArg::U8(_) => ArgKind::U8,
			CallArg::U32(_) => ArgKind::U32,
			CallArg::U64(_) => ArgKind::U64,
			CallArg::U128(_) => ArgKind::U128,
			CallArg::Bool(_) => ArgKind::Bool,
			CallArg::Compact(_) => ArgKind::Compact,
			CallArg::Bytes(_) => ArgKind::Bytes,
			CallArg::Address(_) => ArgKind::Address,
			CallArg::AccountId(_) => ArgKind::AccountId,
			CallArg::Addresses(_) => ArgKind::Addresses,
			CallArg::Payee(_) => ArgKind::Payee,
			CallArg::Call(_) => ArgKind::Call,
			CallArg::Raw(_) => ArgKind::Raw,
		}
	}

	/// Convert into an argument of kind `kind` when no information is lost.
	///
	/// An account id becomes an [`MultiAddress::Id`] and any unsigned integer becomes a compact
	/// integer. Everything else must already have the requested kind.
	fn coerce(self, kind: ArgKind) -> std::result::Result<CallArg, CallArg> {
		match (self, kind) {
			(arg, kind) if arg.kind() == kind => Ok(arg),
			(CallArg::AccountId(id), ArgKind::Address) => Ok(CallArg::Address(MultiAddress::Id(id))),
			(CallArg::U8(v), ArgKind::Compact) => Ok(CallArg::Compact(v.into())),
			(CallArg::U32(v), ArgKind::Compact) => Ok(CallArg::Compact(v.into())),
			(CallArg::U64(v), ArgKind::Compact) => Ok(CallArg::Compact(v.into())),
			(CallArg::U128(v), ArgKind::Compact) => Ok(CallArg::Compact(v.into())),
			(arg, _) => Err(arg),
		}
	}
}

impl Encode for CallArg {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		match self {
			CallArg::U8(v) => v.encode_to(dest),
			CallArg::U32(v) => v.encode_to(dest),
			CallArg::U64(v) => v.encode_to(dest),
			CallArg::U128(v) => v.encode_to(dest),
			CallArg::Bool(v) => v.encode_to(dest),
			CallArg::Compact(v) => v.encode_to(dest),
			CallArg::Bytes(v) => v.encode_to(dest),
			CallArg::Address(v) => v.encode_to(dest),
			CallArg::AccountId(v) => v.encode_to(dest),
			CallArg::Addresses(v) => v.encode_to(dest),
			CallArg::Payee(v) => v.encode_to(dest),
			CallArg::Call(v) => v.encode_to(dest),
			CallArg::Raw(v) => dest.write(v),
		}
	}
}

macro_rules! impl_call_arg_from {
	($($variant:ident($t:ty)),* $(,)?) => {
		$(
			impl From<$t> for CallArg {
				fn from(value: $t) -> Self {
					CallArg::$variant(value.into())
				}
			}
		)*
	};
}

impl_call_arg_from!(
	U8(u8),
	U32(u32),
	U64(u64),
	U128(u128),
	Bool(bool),
	Compact(CompactInteger),
	Bytes(Vec<u8>),
	Address(MultiAddress),
	AccountId(AccountId32),
	Addresses(Vec<MultiAddress>),
	Payee(Payee),
	Call(Call),
);

/// Where staking rewards are paid to.
#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode)]
pub enum Payee {
	/// Pay into the stash account, increasing the amount at stake accordingly.
	#[codec(index = 0)]
	Staked,
	/// Pay into the stash account, not increasing the amount at stake.
	#[codec(index = 1)]
	Stash,
	/// Pay into the controller account.
	#[codec(index = 2)]
	Controller,
	/// Pay into a specified account.
	#[codec(index = 3)]
	Account(AccountId32),
	/// Receive no reward.
	#[codec(index = 4)]
	None,
}

impl fmt::Display for Payee {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Payee::Staked => f.write_str("Staked"),
			Payee::Stash => f.write_str("Stash"),
			Payee::Controller => f.write_str("Controller"),
			Payee::Account(id) => write!(f, "Account({id})"),
			Payee::None => f.write_str("None"),
		}
	}
}

/// Parses `staked`, `stash`, `controller`, `none` (any case) or an SS58 address.
impl FromStr for Payee {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"staked" => Ok(Payee::Staked),
			"stash" => Ok(Payee::Stash),
			"controller" => Ok(Payee::Controller),
			"none" => Ok(Payee::None),
			_ => AccountId32::from_ss58check(s)
				.map(Payee::Account)
				.map_err(|e| format!("invalid payee `{s}`: {e:?}")),
		}
	}
}

/// Static description of a runtime call.
#[derive(Debug, PartialEq, Eq)]
pub struct CallDescriptor {
	/// Pallet name.
	pub pallet: &'static str,
	/// Pallet index.
	pub pallet_index: u8,
	/// Call name.
	pub name: &'static str,
	/// Call index.
	pub call_index: u8,
	/// `Pallet.call`.
	pub path: &'static str,
	/// Parameter names and kinds, in order.
	pub params: &'static [(&'static str, ArgKind)],
}

macro_rules! descriptor {
	($pallet:literal [$pidx:expr] . $call:literal [$cidx:literal] ($($param:literal: $kind:ident),*)) => {
		CallDescriptor {
			pallet: $pallet,
			pallet_index: $pidx,
			name: $call,
			call_index: $cidx,
			path: concat!($pallet, ".", $call),
			params: &[$(($param, ArgKind::$kind)),*],
		}
	};
}

/// Every call this crate knows how to build.
#[rustfmt::skip]
pub const CALLS: &[CallDescriptor] = &[
	descriptor!("Balances"[pallet::BALANCES]."transfer_allow_death"[0]("dest": Address, "value": Compact)),
	descriptor!("Balances"[pallet::BALANCES]."force_transfer"[2]("source": Address, "dest": Address, "value": Compact)),
	descriptor!("Balances"[pallet::BALANCES]."transfer_keep_alive"[3]("dest": Address, "value": Compact)),
	descriptor!("Balances"[pallet::BALANCES]."transfer_all"[4]("dest": Address, "keep_alive": Bool)),
	descriptor!("Staking"[pallet::STAKING]."bond"[0]("value": Compact, "payee": Payee)),
	descriptor!("Staking"[pallet::STAKING]."bond_extra"[1]("max_additional": Compact)),
	descriptor!("Staking"[pallet::STAKING]."unbond"[2]("value": Compact)),
	descriptor!("Staking"[pallet::STAKING]."validate"[4]("commission": Compact, "blocked": Bool)),
	descriptor!("Staking"[pallet::STAKING]."nominate"[5]("targets": Addresses)),
	descriptor!("Staking"[pallet::STAKING]."chill"[6]()),
	descriptor!("Staking"[pallet::STAKING]."chill_other"[21]("stash": AccountId)),
	descriptor!("Sudo"[pallet::SUDO]."sudo"[0]("call": Call)),
	descriptor!("DataAvailability"[pallet::DATA_AVAILABILITY]."create_application_key"[0]("key": Bytes)),
	descriptor!("DataAvailability"[pallet::DATA_AVAILABILITY]."submit_data"[1]("data": Bytes)),
	descriptor!("DataAvailability"[pallet::DATA_AVAILABILITY]."submit_block_length_proposal"[2]("rows": U32, "cols": U32)),
	descriptor!("DataAvailability"[pallet::DATA_AVAILABILITY]."set_application_key"[3]("old_key": Bytes, "new_key": Bytes)),
	descriptor!("DataAvailability"[pallet::DATA_AVAILABILITY]."set_submit_data_fee_modifier"[4]("modifier": Raw)),
];

impl CallDescriptor {
	/// Find a call by pallet and call name.
	pub fn lookup(pallet: &str, call: &str) -> Result<&'static CallDescriptor> {
		CALLS
			.iter()
			.find(|d| d.pallet == pallet && d.name == call)
			.ok_or_else(|| Error::UnknownCall { pallet: pallet.into(), call: call.into() })
	}

	/// Find a call by its indices.
	pub fn by_index(pallet_index: u8, call_index: u8) -> Option<&'static CallDescriptor> {
		CALLS.iter().find(|d| d.pallet_index == pallet_index && d.call_index == call_index)
	}
}

/// Accumulates arguments for a call and validates them on [`CallBuilder::build`].
#[derive(Debug, Clone)]
pub struct CallBuilder {
	descriptor: &'static CallDescriptor,
	args: Vec<CallArg>,
}

impl CallBuilder {
	/// Start building the named call.
	pub fn new(pallet: &str, call: &str) -> Result<Self> {
		CallDescriptor::lookup(pallet, call).map(Self::from_descriptor)
	}

	/// Start building the described call.
	pub fn from_descriptor(descriptor: &'static CallDescriptor) -> Self {
		Self { descriptor, args: Vec::with_capacity(descriptor.params.len()) }
	}

	/// Append the next argument.
	pub fn arg(mut self, arg: impl Into<CallArg>) -> Self {
		self.args.push(arg.into());
		self
	}

	/// Check arity and argument kinds, then encode.
	pub fn build(self) -> Result<Call> {
		let descriptor = self.descriptor;
		if self.args.len() != descriptor.params.len() {
			return Err(Error::CallArity {
				call: descriptor.path,
				expected: descriptor.params.len(),
				got: self.args.len(),
			})
		}

		let mut args = Vec::new();
		for (index, (arg, (_, kind))) in self.args.into_iter().zip(descriptor.params).enumerate() {
			let arg = arg.coerce(*kind).map_err(|arg| Error::CallArgument {
				call: descriptor.path,
				index,
				expected: kind.name(),
				got: arg.kind().name(),
			})?;
			arg.encode_to(&mut args);
		}

		Ok(Call { pallet_index: descriptor.pallet_index, call_index: descriptor.call_index, args })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use hex_literal::hex;

	fn dest() -> AccountId32 {
		AccountId32::new([0x11; 32])
	}

	#[test]
	fn transfer_keep_alive_encoding() {
		let call = CallBuilder::new("Balances", "transfer_keep_alive")
			.unwrap()
			.arg(MultiAddress::Id(dest()))
			.arg(CompactInteger::new(10_000_000_000_000_000_000))
			.build()
			.unwrap();

		assert_eq!(call.pallet_index, 6);
		assert_eq!(call.call_index, 3);
		let mut expected = vec![6, 3, 0];
		expected.extend_from_slice(&[0x11; 32]);
		expected.extend(codec::Compact(10_000_000_000_000_000_000u128).encode());
		assert_eq!(call.encode(), expected);
		assert_eq!(call.descriptor().map(|d| d.path), Some("Balances.transfer_keep_alive"));
	}

	#[test]
	fn lossless_coercions_are_applied() {
		let coerced = Call::new(
			"Balances",
			"transfer_keep_alive",
			vec![dest().into(), 1_000u128.into()],
		)
		.unwrap();
		let explicit = Call::new(
			"Balances",
			"transfer_keep_alive",
			vec![MultiAddress::Id(dest()).into(), CompactInteger::new(1_000).into()],
		)
		.unwrap();
		assert_eq!(coerced, explicit);
	}

	#[test]
	fn arity_is_checked() {
		assert_matches!(
			Call::new("Balances", "transfer_keep_alive", vec![dest().into()]),
			Err(Error::CallArity { call: "Balances.transfer_keep_alive", expected: 2, got: 1 })
		);
		assert_matches!(
			Call::new("Staking", "chill", vec![true.into()]),
			Err(Error::CallArity { expected: 0, got: 1, .. })
		);
	}

	#[test]
	fn argument_kinds_are_checked() {
		assert_matches!(
			Call::new("DataAvailability", "submit_data", vec![42u32.into()]),
			Err(Error::CallArgument { index: 0, expected: "bytes", got: "u32", .. })
		);
		// a compact value cannot be narrowed to a fixed width integer
		assert_matches!(
			Call::new(
				"DataAvailability",
				"submit_block_length_proposal",
				vec![CompactInteger::new(256).into(), 256u32.into()]
			),
			Err(Error::CallArgument { index: 0, expected: "u32", got: "compact", .. })
		);
	}

	#[test]
	fn unknown_calls_are_rejected() {
		assert_matches!(
			CallBuilder::new("Balances", "transfer"),
			Err(Error::UnknownCall { pallet, call }) if pallet == "Balances" && call == "transfer"
		);
	}

	#[test]
	fn bond_and_nested_calls() {
		let bond = Call::new(
			"Staking",
			"bond",
			vec![CompactInteger::new(1).into(), Payee::Account(dest()).into()],
		)
		.unwrap();
		let mut expected = vec![10, 0, 0x04, 3];
		expected.extend_from_slice(&[0x11; 32]);
		assert_eq!(bond.encode(), expected);

		let sudo = Call::new("Sudo", "sudo", vec![bond.clone().into()]).unwrap();
		assert_eq!(sudo.encode(), [&[19u8, 0][..], &bond.encode()[..]].concat());

		let submit = Call::new("DataAvailability", "submit_data", vec![b"hi".to_vec().into()]).unwrap();
		assert_eq!(submit.encode(), hex!("1d01086869"));
	}

	#[test]
	fn call_decodes_remaining_input() {
		let call = Call { pallet_index: 29, call_index: 1, args: vec![8, 0x68, 0x69] };
		let decoded = Call::decode(&mut &call.encode()[..]).unwrap();
		assert_eq!(decoded, call);
	}

	#[test]
	fn payee_parsing_and_display() {
		assert_eq!("Staked".parse::<Payee>().unwrap(), Payee::Staked);
		assert_eq!("none".parse::<Payee>().unwrap(), Payee::None);
		assert_eq!(Payee::Controller.to_string(), "Controller");
		let alice = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
		assert_matches!(alice.parse::<Payee>(), Ok(Payee::Account(_)));
		assert!("nobody".parse::<Payee>().is_err());
	}

	#[test]
	fn descriptor_indices_are_unique() {
		for (i, a) in CALLS.iter().enumerate() {
			for b in &CALLS[i + 1..] {
				assert!((a.pallet_index, a.call_index) != (b.pallet_index, b.call_index), "{}", a.path);
			}
		}
	}
}
