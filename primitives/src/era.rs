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

//! Transaction mortality.

use crate::error::{Error, Result};
use codec::{Decode, Encode, Input, Output};
use serde::{Deserialize, Serialize};

/// Period of a mortal era, in blocks.
pub type Period = u64;
/// Phase of a mortal era, in blocks.
pub type Phase = u64;

const MIN_PERIOD: Period = 4;
const MAX_PERIOD: Period = 1 << 16;

/// An era to describe the longevity of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Era {
	/// The transaction is valid forever. The genesis hash takes the place of the reference
	/// block hash in the signed content.
	Immortal,

	/// Period and phase are encoded:
	/// - The period of validity from the block hash found in the signing material.
	/// - The phase in the period that this transaction's lifetime begins (and, importantly,
	/// implies which block hash is included in the signature material). If the `period` is
	/// greater than 1 << 12, then it will be a factor of the times greater than 1 << 12 that
	/// `period` is.
	Mortal(Period, Phase),
}

/*
E.g. with period == 4:
0         10        20        30        40
0123456789012345678901234567890123456789012
			 |...|
   authored -/   \- expiry
phase = 1
n = Q(current - phase, period) + phase
*/
impl Era {
	/// Create a mortal era for a transaction authored at `current`, with a validity period
	/// derived from the chain's block hash retention count.
	///
	/// The period is half of `block_hash_count` rounded up to a power of two, bounded to
	/// `[4, 65536]`. The phase is `current % period`, quantized for long periods.
	pub fn mortal(current: u64, block_hash_count: u64) -> Self {
		let base = block_hash_count.checked_next_power_of_two().map(|c| c / 2).unwrap_or(2);
		Self::new(base, current)
	}

	/// Create a new era based on a period (which should be a power of two between 4 and 65536
	/// inclusive) and a block number on which it should start (or, for long periods, be shortly
	/// after the start).
	pub fn new(period: u64, current: u64) -> Self {
		let period = period
			.checked_next_power_of_two()
			.unwrap_or(MAX_PERIOD)
			.clamp(MIN_PERIOD, MAX_PERIOD);
		let phase = current % period;
		let quantize_factor = (period >> 12).max(1);
		let quantized_phase = phase / quantize_factor * quantize_factor;

		Era::Mortal(period, quantized_phase)
	}

	/// Create an "immortal" transaction.
	pub fn immortal() -> Self {
		Era::Immortal
	}

	/// `true` if this is an immortal transaction.
	pub fn is_immortal(&self) -> bool {
		matches!(self, Era::Immortal)
	}

	/// Get the block number of the start of the era whose properties this object describes
	/// that `current` belongs to.
	pub fn birth(self, current: u64) -> u64 {
		match self {
			Era::Immortal => 0,
			Era::Mortal(period, phase) => (current.max(phase) - phase) / period * period + phase,
		}
	}

	/// Get the block number of the first block at which the era has ended.
	pub fn death(self, current: u64) -> u64 {
		match self {
			Era::Immortal => u64::MAX,
			Era::Mortal(period, _) => self.birth(current) + period,
		}
	}

	/// Check that the era can be encoded without loss.
	///
	/// A mortal period must be a power of two in `[4, 65536]`, and the phase must be below the
	/// period and a multiple of the quantize factor.
	pub fn validate(self) -> Result<Self> {
		match self {
			Era::Immortal => Ok(self),
			Era::Mortal(period, phase) => {
				let quantize_factor = (period >> 12).max(1);
				if period.is_power_of_two() &&
					(MIN_PERIOD..=MAX_PERIOD).contains(&period) &&
					phase < period && phase % quantize_factor == 0
				{
					Ok(self)
				} else {
					Err(Error::InvalidEra { period, phase })
				}
			},
		}
	}

	/// Rebuild an era from its two wire bytes. `first` must be non-zero.
	fn from_encoded(first: u8, second: u8) -> Result<Self> {
		let encoded = u64::from(first) + (u64::from(second) << 8);
		let period: Period = 2 << (encoded % (1 << 4));
		let quantize_factor = (period >> 12).max(1);
		let phase = (encoded >> 4) * quantize_factor;
		Era::Mortal(period, phase).validate()
	}

	/// Decode an era from `input`, reporting invalid bit patterns as [`Error::InvalidEra`].
	pub fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
		let first = input.read_byte()?;
		if first == 0 {
			return Ok(Era::Immortal)
		}
		let second = input.read_byte()?;
		Self::from_encoded(first, second)
	}
}

impl Encode for Era {
	fn size_hint(&self) -> usize {
		match self {
			Era::Immortal => 1,
			Era::Mortal(..) => 2,
		}
	}

	fn encode_to<T: Output + ?Sized>(&self, output: &mut T) {
		match self {
			Era::Immortal => output.push_byte(0),
			Era::Mortal(period, phase) => {
				let quantize_factor = (*period >> 12).max(1);
				let encoded = (period.trailing_zeros().saturating_sub(1)).clamp(1, 15) as u16 |
					((phase / quantize_factor) << 4) as u16;
				encoded.encode_to(output);
			},
		}
	}
}

impl Decode for Era {
	fn decode<I: Input>(input: &mut I) -> std::result::Result<Self, codec::Error> {
		Self::decode_from(input).map_err(Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn immortal_works() {
		let e = Era::immortal();
		assert_eq!(e.birth(0), 0);
		assert_eq!(e.death(0), u64::MAX);
		assert_eq!(e.birth(1), 0);
		assert_eq!(e.death(1), u64::MAX);
		assert_eq!(e.birth(u64::MAX), 0);
		assert_eq!(e.death(u64::MAX), u64::MAX);
		assert!(e.is_immortal());

		assert_eq!(e.encode(), vec![0u8]);
		assert_eq!(e, Era::decode(&mut &[0u8][..]).unwrap());
	}

	#[test]
	fn mortal_codec_works() {
		let e = Era::new(64, 42);
		assert!(!e.is_immortal());

		let expected = vec![5 + 42 % 16 * 16, 42 / 16];
		assert_eq!(e.encode(), expected);
		assert_eq!(e, Era::decode(&mut &expected[..]).unwrap());
	}

	#[test]
	fn long_period_mortal_codec_works() {
		let e = Era::new(32768, 20000);

		let expected = vec![(14 + 2500 % 16 * 16) as u8, (2500 / 16) as u8];
		assert_eq!(e.encode(), expected);
		assert_eq!(e, Era::decode(&mut &expected[..]).unwrap());
	}

	#[test]
	fn era_initialization_works() {
		assert_eq!(Era::new(64, 42), Era::Mortal(64, 42));
		assert_eq!(Era::new(32768, 20000), Era::Mortal(32768, 20000));
		assert_eq!(Era::new(200, 513), Era::Mortal(256, 1));
		assert_eq!(Era::new(2, 1), Era::Mortal(4, 1));
		assert_eq!(Era::new(4, 5), Era::Mortal(4, 1));
		assert_eq!(Era::new(u64::MAX, 70_000), Era::Mortal(65536, 4464));
	}

	#[test]
	fn quantized_clamped_era_initialization_works() {
		// clamp 1000000 to 65536, quantize 1000001 % 65536 to the nearest 16
		assert_eq!(Era::new(1000000, 1000001), Era::Mortal(65536, 1000001 % 65536 / 16 * 16));
	}

	#[test]
	fn mortal_birth_death_works() {
		let e = Era::mortal(10, 4);
		for i in 10..14 {
			assert_eq!(e.birth(i), 10);
			assert_eq!(e.death(i), 14);
		}
	}

	#[test]
	fn mortal_from_block_hash_count() {
		// 250 rounds up to 256, halved to 128; 1000 % 128 == 104
		assert_eq!(Era::mortal(1000, 250), Era::Mortal(128, 104));
		// 2400 rounds up to 4096, halved to 2048
		assert_eq!(Era::mortal(1_000_000, 2400), Era::Mortal(2048, 1_000_000 % 2048));
		// the period never drops below four
		assert_eq!(Era::mortal(7, 1), Era::Mortal(4, 3));
		// a zero count falls back to a period of four as well
		assert_eq!(Era::mortal(7, 0), Era::Mortal(4, 3));
		// quantization kicks in above 2^12
		assert_eq!(Era::mortal(100_003, 1 << 17), Era::Mortal(65536, 100_003 % 65536 / 16 * 16));
	}

	#[test]
	fn aligned_mortal_eras_round_trip() {
		let mut period = 4u64;
		while period <= MAX_PERIOD {
			let quantize_factor = (period >> 12).max(1);
			for phase in [0, quantize_factor, period / 2, period - quantize_factor] {
				let era = Era::Mortal(period, phase);
				let decoded = Era::decode(&mut &era.encode()[..]).unwrap();
				assert_eq!(decoded, era, "period {period} phase {phase}");
			}
			period <<= 1;
		}
	}

	#[test]
	fn unencodable_mortal_eras_fail_validation() {
		assert_eq!(Era::Immortal.validate().unwrap(), Era::Immortal);
		assert_eq!(Era::Mortal(64, 42).validate().unwrap(), Era::Mortal(64, 42));
		// phase beyond the period
		assert_matches!(
			Era::Mortal(64, 100).validate(),
			Err(Error::InvalidEra { period: 64, phase: 100 })
		);
		// period not a power of two
		assert_matches!(Era::Mortal(100, 4).validate(), Err(Error::InvalidEra { .. }));
		// period out of range
		assert_matches!(Era::Mortal(2, 1).validate(), Err(Error::InvalidEra { .. }));
		assert_matches!(Era::Mortal(1 << 17, 0).validate(), Err(Error::InvalidEra { .. }));
		// phase lost to quantization
		assert_matches!(Era::Mortal(65536, 17).validate(), Err(Error::InvalidEra { .. }));
	}

	#[test]
	fn invalid_bit_patterns_are_rejected() {
		// period 2 is below the minimum
		assert_matches!(
			Era::decode_from(&mut &[0x10, 0x00][..]),
			Err(Error::InvalidEra { period: 2, phase: 1 })
		);
		// period 4 (low nibble 1), phase 4
		assert_matches!(
			Era::decode_from(&mut &[0x41, 0x00][..]),
			Err(Error::InvalidEra { period: 4, phase: 4 })
		);
		// truncated mortal era
		assert_matches!(Era::decode_from(&mut &[0x41][..]), Err(Error::Codec(_)));
		assert!(Era::decode(&mut &[0x41, 0x00][..]).is_err());
	}
}
