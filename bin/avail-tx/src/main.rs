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

//! `avail-tx`: build, sign and submit extrinsics to an Avail node.

mod cli;
mod command;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("{}=info", avail_tx_primitives::LOG_TARGET)));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	init_logging();

	let cli = cli::Cli::parse();
	let settings = cli.settings()?;
	command::run(cli.command, settings).await
}
