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

//! Execution of the subcommands.

use crate::cli::{parse_data, Command, Settings};
use anyhow::{anyhow, Context, Result};
use avail_tx_client::{Client, NonceSource, TransactionResult};
use avail_tx_primitives::{pair_from_suri, Call, CallBuilder, ExtrinsicSigner, LOG_TARGET};
use log::*;
use sp_core::sr25519;

pub async fn run(command: Command, settings: Settings) -> Result<()> {
	info!(target: LOG_TARGET, "Connecting to {}", settings.api_url);
	let client = Client::connect(settings.api_url.clone())
		.await
		.with_context(|| format!("Failed to connect to {}", settings.api_url))?;

	match command {
		Command::Transfer { dest, amount, allow_death } => {
			let name = if allow_death { "transfer_allow_death" } else { "transfer_keep_alive" };
			let call = CallBuilder::new("Balances", name)?.arg(dest).arg(amount).build()?;
			submit(&client, call, &settings).await
		},
		Command::SubmitData { data } => {
			let call =
				CallBuilder::new("DataAvailability", "submit_data")?.arg(parse_data(&data)?).build()?;
			submit(&client, call, &settings).await
		},
		Command::CreateAppKey { key } => {
			let call = CallBuilder::new("DataAvailability", "create_application_key")?
				.arg(key.into_bytes())
				.build()?;
			submit(&client, call, &settings).await
		},
		Command::Bond { value, payee } => {
			let call = CallBuilder::new("Staking", "bond")?.arg(value).arg(payee).build()?;
			submit(&client, call, &settings).await
		},
		Command::Nonce { account } => {
			let account = match account {
				Some(account) => account,
				None => signer(&settings)?.account_id(),
			};
			let source = match settings.options.nonce {
				NonceSource::Custom(_) => NonceSource::TxPool,
				source => source,
			};
			let nonce = client.account_nonce(&account, source).await?;
			println!("{nonce}");
			Ok(())
		},
		Command::Block { hash, tx } => {
			let block = client.block(hash).await?;
			match tx {
				Some(tx) => {
					let block_hash = match hash {
						Some(hash) => hash,
						None => client.block_hash(Some(block.block.header.number)).await?,
					};
					let found = client.find_extrinsic(block_hash, tx).await?;
					println!(
						"{} at index {} signed by {:?}",
						found.descriptor.path, found.index, found.signer
					);
				},
				None => println!("{}", serde_json::to_string_pretty(&block)?),
			}
			Ok(())
		},
		Command::DataProof { block, index } => {
			let proof = client.query_data_proof(index, block).await?;
			println!("{}", serde_json::to_string_pretty(&proof)?);
			Ok(())
		},
	}
}

fn signer(settings: &Settings) -> Result<sr25519::Pair> {
	let seed = settings
		.seed
		.as_deref()
		.ok_or_else(|| anyhow!("No signing account: pass --seed or set `seed` in the config"))?;
	Ok(pair_from_suri(seed)?)
}

async fn submit(client: &Client, call: Call, settings: &Settings) -> Result<()> {
	let signer = signer(settings)?;
	let mut tracker = client
		.sign_and_submit(call, &signer, &settings.options, settings.wait_for, settings.timeout)
		.await?;
	let tx_hash = tracker.tx_hash().await?;
	info!(target: LOG_TARGET, "Submitted {tx_hash:?}, waiting for {}", settings.wait_for);

	let TransactionResult { block_hash, .. } = tracker.result().await?;
	let found = client.find_extrinsic(block_hash, tx_hash).await?;
	println!(
		"{tx_hash:?} reached {} in block {block_hash:?} at index {}",
		settings.wait_for, found.index
	);
	Ok(())
}
