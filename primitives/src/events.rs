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

//! Typed views over runtime events.
//!
//! Events arrive already split into fields by a metadata aware decoder (see [`RawEvent`]).
//! [`decode_event`] picks the fields of the events this crate cares about, by name or by
//! position, and converts them into [`ChainEvent`].

use crate::{
	compact::CompactInteger,
	error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use sp_core::{crypto::AccountId32, H256};

/// A decoded event field value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventValue {
	/// Boolean.
	Bool(bool),
	/// Any unsigned integer up to 128 bits.
	Uint(CompactInteger),
	/// Account id.
	AccountId(AccountId32),
	/// 32 byte hash.
	Hash(H256),
	/// Byte string.
	Bytes(Vec<u8>),
	/// Homogeneous sequence.
	Sequence(Vec<EventValue>),
	/// Struct or tuple.
	Composite(Vec<EventField>),
}

/// A possibly named event field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventField {
	/// Field name, possibly qualified with its type path such as
	/// `sp_core.crypto.AccountId32.who`.
	#[serde(default)]
	pub name: Option<String>,
	/// Field value.
	pub value: EventValue,
}

impl EventField {
	/// A named field.
	pub fn named(name: &str, value: EventValue) -> Self {
		Self { name: Some(name.into()), value }
	}

	/// An unnamed field.
	pub fn unnamed(value: EventValue) -> Self {
		Self { name: None, value }
	}

	fn has_name(&self, wanted: &str) -> bool {
		self.name.as_deref().map_or(false, |name| {
			name == wanted || name.rsplit_once('.').map_or(false, |(_, last)| last == wanted)
		})
	}
}

/// An event split into fields, e.g. `Balances.Transfer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
	/// `Pallet.Event`.
	pub name: String,
	/// Fields in declaration order.
	pub fields: Vec<EventField>,
}

/// Events understood by [`decode_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
	/// `Balances.Transfer`.
	Transfer {
		/// Sender.
		from: AccountId32,
		/// Receiver.
		to: AccountId32,
		/// Amount moved.
		amount: u128,
	},
	/// `TransactionPayment.TransactionFeePaid`.
	TransactionFeePaid {
		/// Account that paid.
		who: AccountId32,
		/// Fee actually charged, tip included.
		actual_fee: u128,
		/// Tip.
		tip: u128,
	},
	/// `Staking.Bonded`.
	Bonded {
		/// Stash account.
		stash: AccountId32,
		/// Amount bonded.
		amount: u128,
	},
	/// `DataAvailability.DataSubmitted`.
	DataSubmitted {
		/// Submitter.
		who: AccountId32,
		/// Hash of the submitted data.
		data_hash: H256,
	},
	/// `DataAvailability.ApplicationKeyCreated`.
	ApplicationKeyCreated {
		/// The new key.
		key: Vec<u8>,
		/// Its owner.
		owner: AccountId32,
		/// Assigned application id.
		id: u32,
	},
	/// `DataAvailability.ApplicationKeySet`.
	ApplicationKeySet {
		/// Replaced key.
		old_key: Vec<u8>,
		/// Replacement.
		new_key: Vec<u8>,
	},
}

struct Fields<'a> {
	event: &'a RawEvent,
}

impl<'a> Fields<'a> {
	/// Field called `name`, falling back to the field at `index` when no field carries a name.
	fn get(&self, name: &str, index: usize) -> Result<&'a EventValue> {
		let fields = &self.event.fields;
		fields
			.iter()
			.find(|f| f.has_name(name))
			.or_else(|| fields.get(index).filter(|f| f.name.is_none()))
			.map(|f| &f.value)
			.ok_or_else(|| self.error(name, "is missing"))
	}

	fn error(&self, field: &str, reason: &'static str) -> Error {
		Error::EventField { event: self.event.name.clone(), field: field.into(), reason }
	}

	fn account(&self, name: &str, index: usize) -> Result<AccountId32> {
		as_bytes32(self.get(name, index)?)
			.map(AccountId32::new)
			.ok_or_else(|| self.error(name, "is not an account id"))
	}

	fn hash(&self, name: &str, index: usize) -> Result<H256> {
		as_bytes32(self.get(name, index)?)
			.map(H256)
			.ok_or_else(|| self.error(name, "is not a hash"))
	}

	fn uint(&self, name: &str, index: usize) -> Result<u128> {
		as_uint(self.get(name, index)?).ok_or_else(|| self.error(name, "is not an unsigned integer"))
	}

	fn bytes(&self, name: &str, index: usize) -> Result<Vec<u8>> {
		as_bytes(self.get(name, index)?).ok_or_else(|| self.error(name, "is not a byte string"))
	}
}

/// Single field composites are newtype wrappers (`AppId(u32)`, `AccountId32([u8; 32])`).
fn unwrap_newtype(value: &EventValue) -> &EventValue {
	match value {
		EventValue::Composite(fields) if fields.len() == 1 => unwrap_newtype(&fields[0].value),
		other => other,
	}
}

fn as_uint(value: &EventValue) -> Option<u128> {
	match unwrap_newtype(value) {
		EventValue::Uint(v) => Some(v.value()),
		_ => None,
	}
}

fn as_bytes(value: &EventValue) -> Option<Vec<u8>> {
	match unwrap_newtype(value) {
		EventValue::Bytes(bytes) => Some(bytes.clone()),
		EventValue::Sequence(items) => items
			.iter()
			.map(|item| as_uint(item).and_then(|v| u8::try_from(v).ok()))
			.collect(),
		_ => None,
	}
}

fn as_bytes32(value: &EventValue) -> Option<[u8; 32]> {
	match unwrap_newtype(value) {
		EventValue::AccountId(id) => Some(*AsRef::<[u8; 32]>::as_ref(id)),
		EventValue::Hash(hash) => Some(hash.0),
		other => as_bytes(other).and_then(|bytes| bytes.try_into().ok()),
	}
}

/// Decode `event` into a [`ChainEvent`].
///
/// Returns `Ok(None)` for events this crate does not know. A known event with a missing or
/// mistyped field is an [`Error::EventField`].
pub fn decode_event(event: &RawEvent) -> Result<Option<ChainEvent>> {
	let f = Fields { event };
	let decoded = match event.name.as_str() {
		"Balances.Transfer" => ChainEvent::Transfer {
			from: f.account("from", 0)?,
			to: f.account("to", 1)?,
			amount: f.uint("amount", 2)?,
		},
		"TransactionPayment.TransactionFeePaid" => ChainEvent::TransactionFeePaid {
			who: f.account("who", 0)?,
			actual_fee: f.uint("actual_fee", 1)?,
			tip: f.uint("tip", 2)?,
		},
		"Staking.Bonded" =>
			ChainEvent::Bonded { stash: f.account("stash", 0)?, amount: f.uint("amount", 1)? },
		"DataAvailability.DataSubmitted" => ChainEvent::DataSubmitted {
			who: f.account("who", 0)?,
			data_hash: f.hash("data_hash", 1)?,
		},
		"DataAvailability.ApplicationKeyCreated" => {
			let id = f.uint("id", 2)?;
			ChainEvent::ApplicationKeyCreated {
				key: f.bytes("key", 0)?,
				owner: f.account("owner", 1)?,
				id: u32::try_from(id).map_err(|_| f.error("id", "does not fit in u32"))?,
			}
		},
		"DataAvailability.ApplicationKeySet" => ChainEvent::ApplicationKeySet {
			old_key: f.bytes("old_key", 0)?,
			new_key: f.bytes("new_key", 1)?,
		},
		_ => return Ok(None),
	};
	Ok(Some(decoded))
}

/// Decode every known event in `events`, skipping the rest.
pub fn decode_events<'a>(
	events: impl IntoIterator<Item = &'a RawEvent>,
) -> Result<Vec<ChainEvent>> {
	let mut decoded = Vec::new();
	for event in events {
		if let Some(e) = decode_event(event)? {
			decoded.push(e);
		}
	}
	Ok(decoded)
}
