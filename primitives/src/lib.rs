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

//! Client side primitives for Avail-flavoured Substrate chains.
//!
//! Everything needed to turn a call into a signed extrinsic and back: the compact integer and
//! era codecs, the signature payload, the extrinsic envelope with its legacy hex handling, and
//! the block, event and proof types used to follow an extrinsic once it is on chain.
//!
//! ```
//! use avail_tx_primitives::{pair_from_suri, CallBuilder, Extrinsic, SignatureOptions};
//! use sp_core::{crypto::AccountId32, sr25519, H256};
//!
//! let alice: sr25519::Pair = pair_from_suri("//Alice").unwrap();
//! let call = CallBuilder::new("Balances", "transfer_keep_alive")
//! 	.unwrap()
//! 	.arg(AccountId32::new([1; 32]))
//! 	.arg(1_000_000_000_000_000_000u128)
//! 	.build()
//! 	.unwrap();
//!
//! let mut xt = Extrinsic::new(call);
//! xt.sign(&alice, &SignatureOptions::immortal(0u32, 39, 1, H256::zero())).unwrap();
//! assert!(xt.is_signed());
//! assert_eq!(Extrinsic::from_hex(&xt.to_hex()).unwrap(), xt);
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod block;
pub mod call;
pub mod compact;
pub mod era;
pub mod error;
pub mod events;
pub mod extrinsic;
pub mod payload;
pub mod proof;
pub mod signer;

pub use address::{MultiAddress, MultiSignature};
pub use block::{find_extrinsic, Block, BlockNumber, FoundExtrinsic, Header, SignedBlock};
pub use call::{pallet, ArgKind, Call, CallArg, CallBuilder, CallDescriptor, Payee, CALLS};
pub use compact::CompactInteger;
pub use era::Era;
pub use error::{Error, Result};
pub use events::{decode_event, decode_events, ChainEvent, EventField, EventValue, RawEvent};
pub use extrinsic::{Extrinsic, SignatureSection, EXTRINSIC_FORMAT_VERSION};
pub use payload::{SignatureOptions, SignaturePayload};
pub use proof::{
	AddressedMessage, Cell, DataProof, GDataProof, GProof, GRow, Message, ProofResponse,
	TxDataRoots,
};
pub use signer::{pair_from_suri, ExtrinsicSigner};

pub use sp_core::{crypto::AccountId32, H256, U256};

/// Log target of this crate.
pub const LOG_TARGET: &str = "avail-tx";
