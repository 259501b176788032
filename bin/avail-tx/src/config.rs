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

//! Settings file.

use anyhow::{Context, Result};
use avail_tx_client::{WaitFor, DEFAULT_BLOCK_HASH_COUNT, DEFAULT_WAIT_TIMEOUT};
use avail_tx_primitives::CompactInteger;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Node used when neither the config file nor the command line names one.
pub const DEFAULT_API_URL: &str = "ws://127.0.0.1:9944";

/// Contents of the optional config file. Command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// WebSocket endpoint of the node.
	pub api_url: String,
	/// Secret URI of the signing account.
	pub seed: Option<String>,
	/// Application key extrinsics are submitted under.
	pub app_id: u32,
	/// Milestone to wait for after submission.
	pub wait_for: WaitFor,
	/// Seconds to wait for the milestone.
	pub timeout_secs: u64,
	/// Tip for the block author.
	pub tip: CompactInteger,
	/// Mortality window in blocks; `0` submits immortal extrinsics.
	pub block_hash_count: u64,
	/// Fixed nonce instead of asking the node.
	pub nonce: Option<u32>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_url: DEFAULT_API_URL.into(),
			seed: None,
			app_id: 0,
			wait_for: WaitFor::default(),
			timeout_secs: DEFAULT_WAIT_TIMEOUT.as_secs(),
			tip: CompactInteger::default(),
			block_hash_count: DEFAULT_BLOCK_HASH_COUNT,
			nonce: None,
		}
	}
}

impl Config {
	/// Read a `.json` or `.toml` config file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file {}", path.display()))?;
		match path.extension().and_then(|ext| ext.to_str()) {
			Some("json") => Self::from_json(&content),
			_ => Self::from_toml(&content),
		}
		.with_context(|| format!("Invalid config file {}", path.display()))
	}

	fn from_json(content: &str) -> Result<Self> {
		Ok(serde_json::from_str(content)?)
	}

	fn from_toml(content: &str) -> Result<Self> {
		Ok(toml::from_str(content)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn toml_and_json_agree() {
		let from_toml = Config::from_toml(
			r#"
			api_url = "wss://turing-rpc.avail.so/ws"
			seed = "//Bob"
			app_id = 7
			wait_for = "block_inclusion"
			tip = "1000000000000000000000"
			"#,
		)
		.unwrap();
		let from_json = Config::from_json(
			r#"{
				"api_url": "wss://turing-rpc.avail.so/ws",
				"seed": "//Bob",
				"app_id": 7,
				"wait_for": "block_inclusion",
				"tip": "1000000000000000000000"
			}"#,
		)
		.unwrap();

		assert_eq!(from_toml, from_json);
		assert_eq!(from_toml.wait_for, WaitFor::BlockInclusion);
		assert_eq!(from_toml.tip.value(), 1_000_000_000_000_000_000_000);
		assert_eq!(from_toml.timeout_secs, 180);
		assert_eq!(from_toml.block_hash_count, DEFAULT_BLOCK_HASH_COUNT);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(Config::from_toml("api = \"ws://localhost:9944\"").is_err());
	}
}
