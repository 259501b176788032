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

//! Key pairs able to authorize extrinsics.

use crate::{
	address::{MultiAddress, MultiSignature},
	error::{Error, Result},
};
use sp_core::{crypto::AccountId32, ed25519, sr25519, Pair};

/// Something that can sign extrinsics on behalf of an account.
pub trait ExtrinsicSigner: Send + Sync {
	/// Account the signatures are attributed to.
	fn account_id(&self) -> AccountId32;

	/// Address written into the signature section.
	fn address(&self) -> MultiAddress {
		MultiAddress::Id(self.account_id())
	}

	/// Sign the (already hashed, if long) signing material.
	fn sign(&self, message: &[u8]) -> MultiSignature;
}

impl ExtrinsicSigner for sr25519::Pair {
	fn account_id(&self) -> AccountId32 {
		self.public().into()
	}

	fn sign(&self, message: &[u8]) -> MultiSignature {
		Pair::sign(self, message).into()
	}
}

impl ExtrinsicSigner for ed25519::Pair {
	fn account_id(&self) -> AccountId32 {
		self.public().into()
	}

	fn sign(&self, message: &[u8]) -> MultiSignature {
		Pair::sign(self, message).into()
	}
}

/// Derive a key pair from a secret URI: a mnemonic phrase, a hex seed or a dev path such as
/// `//Alice`, optionally followed by derivation junctions.
pub fn pair_from_suri<P: Pair>(suri: &str) -> Result<P> {
	P::from_string(suri, None).map_err(|e| Error::Signing(format!("{e:?}")))
}
