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

//! Chain queries and extrinsic submission on top of an [`RpcClient`].

use crate::{
	error::{Error, Result},
	options::{Mortality, NonceSource, TransactionOptions},
	rpc::RpcClient,
	status::WaitFor,
	subscription::StatusSubscription,
	tracker::{self, TransactionTracker},
	ws::WsRpcClient,
	LOG_TARGET,
};
use avail_tx_primitives::{
	find_extrinsic, AccountId32, BlockNumber, Call, Era, Extrinsic, ExtrinsicSigner,
	FoundExtrinsic, Header, SignatureOptions, SignedBlock, H256,
};
use codec::Decode;
use log::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use sp_core::{
	crypto::Ss58Codec,
	hashing::{blake2_128, twox_128},
	Bytes,
};
use std::{sync::Arc, time::Duration};

/// Version information of the runtime, as returned by `state_getRuntimeVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
	/// Runtime name.
	pub spec_name: String,
	/// Implementation name.
	pub impl_name: String,
	/// Version of the runtime specification.
	pub spec_version: u32,
	/// Version of the implementation.
	pub impl_version: u32,
	/// Version of the extrinsic interface.
	pub transaction_version: u32,
}

/// Storage key of `System.Account` for `account`.
pub fn account_info_key(account: &AccountId32) -> Vec<u8> {
	let account: &[u8] = account.as_ref();
	[&twox_128(b"System")[..], &twox_128(b"Account")[..], &blake2_128(account)[..], account].concat()
}

pub(crate) fn to_params<T: Serialize>(items: &[T]) -> Result<Vec<Value>> {
	items.iter().map(|item| serde_json::to_value(item).map_err(Error::from)).collect()
}

/// A node connection bound to one chain.
pub struct Client<R: ?Sized = WsRpcClient> {
	rpc: Arc<R>,
	genesis_hash: H256,
}

impl<R: ?Sized> Clone for Client<R> {
	fn clone(&self) -> Self {
		Self { rpc: self.rpc.clone(), genesis_hash: self.genesis_hash }
	}
}

impl Client<WsRpcClient> {
	/// Connect over WebSocket.
	pub async fn connect(uri: impl Into<String>) -> Result<Self> {
		Self::new(Arc::new(WsRpcClient::new(uri).await?)).await
	}
}

impl<R: RpcClient + ?Sized> Client<R> {
	/// Bind to the chain behind `rpc`, fetching its genesis hash.
	pub async fn new(rpc: Arc<R>) -> Result<Self> {
		let genesis_hash = fetch_block_hash(&*rpc, 0).await?;
		debug!(target: LOG_TARGET, "Connected to chain with genesis {genesis_hash:?}");
		Ok(Self { rpc, genesis_hash })
	}

	/// The underlying transport.
	pub fn rpc(&self) -> &Arc<R> {
		&self.rpc
	}

	/// Genesis hash of the chain.
	pub fn genesis_hash(&self) -> H256 {
		self.genesis_hash
	}

	pub(crate) async fn call<T: DeserializeOwned>(
		&self,
		method: &str,
		params: Vec<Value>,
	) -> Result<T> {
		let response = self.rpc.request(method, params).await?;
		Ok(serde_json::from_value(response)?)
	}

	/// Hash of block `number`, or of the best block.
	pub async fn block_hash(&self, number: Option<BlockNumber>) -> Result<H256> {
		match number {
			Some(number) => fetch_block_hash(&*self.rpc, number).await,
			None => self
				.call::<Option<H256>>("chain_getBlockHash", vec![])
				.await?
				.ok_or(Error::Transport("node returned no best block hash".into())),
		}
	}

	/// Hash of the last finalized block.
	pub async fn finalized_head(&self) -> Result<H256> {
		self.call("chain_getFinalizedHead", vec![]).await
	}

	/// Header of block `at`, or of the best block.
	pub async fn header(&self, at: Option<H256>) -> Result<Header> {
		let header: Option<Header> = self.call("chain_getHeader", to_params(&[at])?).await?;
		header.ok_or(Error::BlockNotFound(at.unwrap_or_default()))
	}

	/// Block `at`, or the best block.
	pub async fn block(&self, at: Option<H256>) -> Result<SignedBlock> {
		let block: Option<SignedBlock> = self.call("chain_getBlock", to_params(&[at])?).await?;
		block.ok_or(Error::BlockNotFound(at.unwrap_or_default()))
	}

	/// Runtime version at `at`, or at the best block.
	pub async fn runtime_version(&self, at: Option<H256>) -> Result<RuntimeVersion> {
		self.call("state_getRuntimeVersion", to_params(&[at])?).await
	}

	/// SCALE encoded runtime metadata at `at`, or at the best block.
	pub async fn metadata(&self, at: Option<H256>) -> Result<Vec<u8>> {
		let metadata: Bytes = self.call("state_getMetadata", to_params(&[at])?).await?;
		Ok(metadata.0)
	}

	/// Raw storage value under `key`.
	pub async fn storage(&self, key: &[u8], at: Option<H256>) -> Result<Option<Vec<u8>>> {
		let params = vec![serde_json::to_value(Bytes(key.to_vec()))?, serde_json::to_value(at)?];
		let value: Option<Bytes> = self.call("state_getStorage", params).await?;
		Ok(value.map(|bytes| bytes.0))
	}

	/// Chain properties such as the token symbol and decimals.
	pub async fn system_properties(&self) -> Result<serde_json::Map<String, Value>> {
		self.call("system_properties", vec![]).await
	}

	/// Nonce of `account`, read from `source`.
	///
	/// An account without state has nonce zero.
	pub async fn account_nonce(&self, account: &AccountId32, source: NonceSource) -> Result<u32> {
		let at = match source {
			NonceSource::Custom(nonce) => return Ok(nonce),
			NonceSource::TxPool => {
				let params = vec![Value::String(account.to_ss58check())];
				return self.call("system_accountNextIndex", params).await
			},
			NonceSource::FinalizedState => Some(self.finalized_head().await?),
			NonceSource::BestState => None,
		};

		// `AccountInfo` starts with the nonce.
		match self.storage(&account_info_key(account), at).await? {
			Some(info) => Ok(u32::decode(&mut &info[..]).map_err(avail_tx_primitives::Error::from)?),
			None => Ok(0),
		}
	}

	/// Resolve `options` for `account` against the current chain state.
	pub async fn signature_options(
		&self,
		account: &AccountId32,
		options: &TransactionOptions,
	) -> Result<SignatureOptions> {
		let nonce = self.account_nonce(account, options.nonce).await?;
		let version = self.runtime_version(None).await?;

		let (era, block_hash) = match options.mortality {
			Mortality::Immortal => (Era::Immortal, self.genesis_hash),
			Mortality::Mortal { block_hash_count } => {
				let finalized = self.header(Some(self.finalized_head().await?)).await?;
				let current = u64::from(finalized.number);
				let era = Era::mortal(current, block_hash_count);
				let birth = era.birth(current) as BlockNumber;
				(era, self.block_hash(Some(birth)).await?)
			},
		};
		trace!(
			target: LOG_TARGET,
			"Signing {account} with nonce {nonce}, {era:?}, spec {} tx {}",
			version.spec_version,
			version.transaction_version,
		);

		Ok(SignatureOptions {
			era,
			nonce: nonce.into(),
			tip: options.tip.into(),
			app_id: options.app_id.into(),
			spec_version: version.spec_version,
			transaction_version: version.transaction_version,
			genesis_hash: self.genesis_hash,
			block_hash,
		})
	}

	/// Build a signed extrinsic for `call`.
	pub async fn sign<S: ExtrinsicSigner + ?Sized>(
		&self,
		call: Call,
		signer: &S,
		options: &TransactionOptions,
	) -> Result<Extrinsic> {
		let signature_options = self.signature_options(&signer.account_id(), options).await?;
		let mut xt = Extrinsic::new(call);
		xt.sign(signer, &signature_options)?;
		Ok(xt)
	}

	/// Submit without watching. Returns the extrinsic hash reported by the node.
	pub async fn submit(&self, xt: &Extrinsic) -> Result<H256> {
		self.call("author_submitExtrinsic", vec![Value::String(xt.to_hex())])
			.await
			.map_err(Error::into_submission)
	}

	/// Submit and subscribe to status updates.
	pub async fn submit_and_watch(&self, xt: &Extrinsic) -> Result<StatusSubscription> {
		tracker::submit_and_watch(&*self.rpc, xt).await
	}

	/// Sign `call`, submit it and follow it until `milestone` in the background.
	pub async fn sign_and_submit<S: ExtrinsicSigner + ?Sized>(
		&self,
		call: Call,
		signer: &S,
		options: &TransactionOptions,
		milestone: WaitFor,
		timeout: Duration,
	) -> Result<TransactionTracker> {
		let xt = self.sign(call, signer, options).await?;
		info!(
			target: LOG_TARGET,
			"Submitting {} from {}",
			xt.call().descriptor().map_or("unknown call", |d| d.path),
			signer.account_id(),
		);
		TransactionTracker::submit(&*self.rpc, xt, milestone, timeout).await
	}

	/// Locate the signed extrinsic `tx_hash` in block `block_hash`.
	pub async fn find_extrinsic(&self, block_hash: H256, tx_hash: H256) -> Result<FoundExtrinsic> {
		let block = self.block(Some(block_hash)).await?;
		Ok(find_extrinsic(&block.block, tx_hash)?)
	}
}

async fn fetch_block_hash<R: RpcClient + ?Sized>(rpc: &R, number: BlockNumber) -> Result<H256> {
	let response = rpc.request("chain_getBlockHash", vec![Value::from(number)]).await?;
	let hash: Option<H256> = serde_json::from_value(response)?;
	hash.ok_or(Error::MissingBlockHash(number))
}
