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

//! Errors produced while building, signing and decoding extrinsics.

use sp_core::H256;
use thiserror::Error;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type of the primitives crate.
#[derive(Error, Debug)]
pub enum Error {
	/// Underlying SCALE codec error, usually truncated input.
	#[error(transparent)]
	Codec(#[from] codec::Error),
	/// A compact integer used a wider encoding than its value requires.
	#[error("non-canonical compact integer encoding")]
	NonCanonicalCompact,
	/// The extrinsic format version is not the one this crate speaks.
	#[error("unsupported extrinsic version: {version} (signed: {signed})")]
	UnsupportedExtrinsicVersion {
		/// The raw format version (without the signed bit).
		version: u8,
		/// Whether the signed bit was set.
		signed: bool,
	},
	/// The era bytes do not describe a valid mortal era.
	#[error("invalid era: period {period}, phase {phase}")]
	InvalidEra {
		/// Decoded period.
		period: u64,
		/// Decoded phase.
		phase: u64,
	},
	/// Signature payloads are write-only.
	#[error("decoding of a signature payload is not supported")]
	PayloadDecodeUnsupported,
	/// A key pair could not be derived from the supplied secret.
	#[error("invalid signing key: {0}")]
	Signing(String),
	/// The extrinsic already carries a signature.
	#[error("extrinsic is already signed")]
	AlreadySigned,
	/// Hex transport encoding error.
	#[error("invalid hex: {0}")]
	Hex(#[from] hex::FromHexError),
	/// The requested pallet call is not in the call table.
	#[error("unknown call {pallet}.{call}")]
	UnknownCall {
		/// Pallet name.
		pallet: String,
		/// Call name.
		call: String,
	},
	/// Wrong number of arguments for a call.
	#[error("{call} expects {expected} arguments, got {got}")]
	CallArity {
		/// Qualified call name.
		call: &'static str,
		/// Declared parameter count.
		expected: usize,
		/// Supplied argument count.
		got: usize,
	},
	/// An argument does not have the kind declared for its position.
	#[error("{call}: argument {index} should be {expected}, got {got}")]
	CallArgument {
		/// Qualified call name.
		call: &'static str,
		/// Position of the offending argument.
		index: usize,
		/// Declared kind.
		expected: &'static str,
		/// Supplied kind.
		got: &'static str,
	},
	/// No extrinsic with the given hash was found in the block.
	#[error("extrinsic {0:?} not found in block")]
	ExtrinsicNotFound(H256),
	/// An event field is missing or has an unexpected shape.
	#[error("event {event}: field `{field}` {reason}")]
	EventField {
		/// Qualified event name.
		event: String,
		/// Field name or position.
		field: String,
		/// What went wrong.
		reason: &'static str,
	},
	/// A proof returned by the node is malformed.
	#[error("invalid proof: {0}")]
	InvalidProof(String),
}

impl Error {
	/// Static description used when the error has to travel through `codec::Error`.
	pub(crate) fn as_codec_str(&self) -> &'static str {
		match self {
			Error::Codec(_) => "SCALE decoding failed",
			Error::NonCanonicalCompact => "non-canonical compact integer",
			Error::UnsupportedExtrinsicVersion { .. } => "unsupported extrinsic version",
			Error::InvalidEra { .. } => "invalid era",
			Error::PayloadDecodeUnsupported => "decoding of a signature payload is not supported",
			_ => "invalid input",
		}
	}
}

impl From<Error> for codec::Error {
	fn from(err: Error) -> Self {
		match err {
			Error::Codec(inner) => inner,
			other => codec::Error::from(other.as_codec_str()),
		}
	}
}
