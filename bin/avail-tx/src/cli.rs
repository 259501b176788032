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

//! Command line interface.

use crate::config::Config;
use anyhow::{anyhow, Result};
use avail_tx_client::{Mortality, NonceSource, TransactionOptions, WaitFor};
use avail_tx_primitives::{AccountId32, CompactInteger, Payee, H256};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "avail-tx", version)]
#[command(about = "Build, sign and submit extrinsics to an Avail node", long_about = None)]
pub struct Cli {
	/// Config file, TOML or JSON (by extension)
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// WebSocket endpoint of the node (e.g., ws://127.0.0.1:9944)
	#[arg(long, global = true)]
	pub api_url: Option<String>,

	/// Secret URI of the signing account (mnemonic, hex seed or dev path such as //Alice)
	#[arg(long, global = true)]
	pub seed: Option<String>,

	/// Application key to submit under
	#[arg(long, global = true)]
	pub app_id: Option<u32>,

	/// Milestone to wait for: inclusion or finalization
	#[arg(long, global = true)]
	pub wait_for: Option<WaitFor>,

	/// Seconds to wait for the milestone
	#[arg(long, global = true)]
	pub timeout_secs: Option<u64>,

	/// Tip for the block author, in the smallest unit
	#[arg(long, global = true)]
	pub tip: Option<u128>,

	/// Mortality window in blocks, 0 for immortal extrinsics
	#[arg(long, global = true)]
	pub block_hash_count: Option<u64>,

	/// Use this nonce instead of asking the node
	#[arg(long, global = true)]
	pub nonce: Option<u32>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Transfer funds with `Balances.transfer_keep_alive`
	Transfer {
		/// SS58 address of the recipient
		#[arg(long)]
		dest: AccountId32,
		/// Amount in the smallest unit
		#[arg(long)]
		amount: u128,
		/// Allow the sender account to be reaped (`transfer_allow_death`)
		#[arg(long, default_value = "false")]
		allow_death: bool,
	},
	/// Submit a data blob with `DataAvailability.submit_data`
	SubmitData {
		/// The data, as text or as 0x prefixed hex
		data: String,
	},
	/// Register an application key with `DataAvailability.create_application_key`
	CreateAppKey {
		/// The key
		key: String,
	},
	/// Bond funds with `Staking.bond`
	Bond {
		/// Amount to bond, in the smallest unit
		#[arg(long)]
		value: u128,
		/// Reward destination: staked, stash, controller, none or an SS58 address
		#[arg(long, default_value = "staked")]
		payee: Payee,
	},
	/// Print the next nonce of an account (the signing account by default)
	Nonce {
		/// SS58 address
		#[arg(long)]
		account: Option<AccountId32>,
	},
	/// Print a block, or locate an extrinsic in it
	Block {
		/// Block hash, the best block if omitted
		#[arg(long, value_parser = parse_hash)]
		hash: Option<H256>,
		/// Hash of a signed extrinsic to locate in the block
		#[arg(long, value_parser = parse_hash)]
		tx: Option<H256>,
	},
	/// Print the data proof of an extrinsic
	DataProof {
		/// Block hash
		#[arg(long, value_parser = parse_hash)]
		block: H256,
		/// Index of the extrinsic within the block
		#[arg(long)]
		index: u32,
	},
}

pub fn parse_hash(s: &str) -> Result<H256> {
	let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
	if bytes.len() != 32 {
		return Err(anyhow!("expected 32 bytes, got {}", bytes.len()))
	}
	Ok(H256::from_slice(&bytes))
}

/// Data given as `0x` hex is decoded, anything else is taken as UTF-8 text.
pub fn parse_data(data: &str) -> Result<Vec<u8>> {
	match data.strip_prefix("0x") {
		Some(hex_data) => Ok(hex::decode(hex_data)?),
		None => Ok(data.as_bytes().to_vec()),
	}
}

/// Config file values with command line overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub api_url: String,
	pub seed: Option<String>,
	pub wait_for: WaitFor,
	pub timeout: Duration,
	pub options: TransactionOptions,
}

impl Cli {
	pub fn settings(&self) -> Result<Settings> {
		let config = match &self.config {
			Some(path) => Config::load(path)?,
			None => Config::default(),
		};
		Ok(self.apply(config))
	}

	fn apply(&self, config: Config) -> Settings {
		let tip = self.tip.map(CompactInteger::new).unwrap_or(config.tip);
		let nonce = match self.nonce.or(config.nonce) {
			Some(nonce) => NonceSource::Custom(nonce),
			None => NonceSource::TxPool,
		};
		let mortality = match self.block_hash_count.unwrap_or(config.block_hash_count) {
			0 => Mortality::Immortal,
			block_hash_count => Mortality::Mortal { block_hash_count },
		};

		Settings {
			api_url: self.api_url.clone().unwrap_or(config.api_url),
			seed: self.seed.clone().or(config.seed),
			wait_for: self.wait_for.unwrap_or(config.wait_for),
			timeout: Duration::from_secs(self.timeout_secs.unwrap_or(config.timeout_secs)),
			options: TransactionOptions {
				app_id: self.app_id.unwrap_or(config.app_id),
				tip: tip.value(),
				nonce,
				mortality,
			},
		}
	}
}
