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

//! Canonical SCALE compact integers.
//!
//! The two lowest bits of the first byte select the width class:
//!
//! - `0b00`: single byte, value in the upper six bits (`0..2^6`).
//! - `0b01`: two bytes little endian (`2^6..2^14`).
//! - `0b10`: four bytes little endian (`2^14..2^30`).
//! - `0b11`: big integer mode, the upper six bits hold `byte_len - 4` and the value follows
//!   in `byte_len` little endian bytes.
//!
//! Decoding rejects any encoding that is wider than necessary.

use crate::error::{Error, Result};
use codec::{Decode, Encode, Input, Output};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const SINGLE_BYTE_MAX: u128 = (1 << 6) - 1;
const TWO_BYTE_MAX: u128 = (1 << 14) - 1;
const FOUR_BYTE_MAX: u128 = (1 << 30) - 1;

/// An unsigned integer of up to 128 bits, carried in compact form on the wire.
///
/// Nonces, tips, application ids and balances all use it.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompactInteger(pub u128);

impl CompactInteger {
	/// Wrap a value.
	pub const fn new(value: u128) -> Self {
		Self(value)
	}

	/// The wrapped value.
	pub const fn value(&self) -> u128 {
		self.0
	}

	/// Number of bytes the canonical encoding of this value takes.
	pub fn encoded_len(&self) -> usize {
		match self.0 {
			0..=SINGLE_BYTE_MAX => 1,
			0..=TWO_BYTE_MAX => 2,
			0..=FOUR_BYTE_MAX => 4,
			value => 1 + big_mode_len(value),
		}
	}

	/// Decode from a byte slice, returning the value and the number of bytes consumed.
	pub fn decode_prefix(bytes: &[u8]) -> Result<(Self, usize)> {
		let mut input = bytes;
		let value = Self::decode_from(&mut input)?;
		Ok((value, bytes.len() - input.len()))
	}

	/// Decode a compact integer from `input`, enforcing the canonical form.
	pub fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
		let prefix = input.read_byte()?;
		let value = match prefix & 0b11 {
			0b00 => u128::from(prefix >> 2),
			0b01 => {
				let mut buf = [prefix, 0];
				input.read(&mut buf[1..])?;
				let value = u128::from(u16::from_le_bytes(buf) >> 2);
				if value <= SINGLE_BYTE_MAX {
					return Err(Error::NonCanonicalCompact)
				}
				value
			},
			0b10 => {
				let mut buf = [prefix, 0, 0, 0];
				input.read(&mut buf[1..])?;
				let value = u128::from(u32::from_le_bytes(buf) >> 2);
				if value <= TWO_BYTE_MAX {
					return Err(Error::NonCanonicalCompact)
				}
				value
			},
			_ => {
				let len = usize::from(prefix >> 2) + 4;
				if len > 16 {
					return Err(codec::Error::from("compact integer wider than 128 bits").into())
				}
				let mut buf = [0u8; 16];
				input.read(&mut buf[..len])?;
				// the most significant byte must be used, otherwise a shorter form exists
				if buf[len - 1] == 0 {
					return Err(Error::NonCanonicalCompact)
				}
				let value = u128::from_le_bytes(buf);
				if value <= FOUR_BYTE_MAX {
					return Err(Error::NonCanonicalCompact)
				}
				value
			},
		};
		Ok(Self(value))
	}
}

fn big_mode_len(value: u128) -> usize {
	let significant = 16 - (value.leading_zeros() / 8) as usize;
	significant.max(4)
}

impl Encode for CompactInteger {
	fn size_hint(&self) -> usize {
		self.encoded_len()
	}

	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		match self.0 {
			0..=SINGLE_BYTE_MAX => dest.push_byte((self.0 as u8) << 2),
			0..=TWO_BYTE_MAX => dest.write(&(((self.0 as u16) << 2) | 0b01).to_le_bytes()),
			0..=FOUR_BYTE_MAX => dest.write(&(((self.0 as u32) << 2) | 0b10).to_le_bytes()),
			value => {
				let len = big_mode_len(value);
				dest.push_byte((((len - 4) as u8) << 2) | 0b11);
				dest.write(&value.to_le_bytes()[..len]);
			},
		}
	}
}

impl Decode for CompactInteger {
	fn decode<I: Input>(input: &mut I) -> std::result::Result<Self, codec::Error> {
		Self::decode_from(input).map_err(Into::into)
	}
}

impl fmt::Debug for CompactInteger {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Compact({})", self.0)
	}
}

impl fmt::Display for CompactInteger {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

macro_rules! impl_from_unsigned {
	($($t:ty),*) => {
		$(
			impl From<$t> for CompactInteger {
				fn from(value: $t) -> Self {
					Self(value as u128)
				}
			}
		)*
	};
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

impl From<CompactInteger> for u128 {
	fn from(value: CompactInteger) -> Self {
		value.0
	}
}

// JSON carries compact integers as decimal strings so that values above 2^53 survive
// JavaScript-based tooling and nothing is truncated to 64 bits.
impl Serialize for CompactInteger {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.collect_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for CompactInteger {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct CompactVisitor;

		impl<'de> de::Visitor<'de> for CompactVisitor {
			type Value = CompactInteger;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("an unsigned integer, a decimal string or a 0x-prefixed hex string")
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
				Ok(CompactInteger(v.into()))
			}

			fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Self::Value, E> {
				Ok(CompactInteger(v))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
				u128::try_from(v)
					.map(CompactInteger)
					.map_err(|_| E::custom("compact integers are unsigned"))
			}

			fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
				let parsed = match v.strip_prefix("0x") {
					Some(hex) => u128::from_str_radix(hex, 16),
					None => v.parse::<u128>(),
				};
				parsed.map(CompactInteger).map_err(E::custom)
			}
		}

		deserializer.deserialize_any(CompactVisitor)
	}
}
