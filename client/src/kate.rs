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

//! Data availability queries served by the `kate` RPC namespace.

use crate::{
	client::{to_params, Client},
	error::{Error, Result},
	rpc::RpcClient,
};
use avail_tx_primitives::{
	proof::{Cell, GDataProof, GRow, ProofResponse, MAX_CELLS},
	H256,
};

impl<R: RpcClient + ?Sized> Client<R> {
	/// Cell values and their KZG opening proofs at block `at`.
	pub async fn query_proof(&self, cells: &[Cell], at: H256) -> Result<Vec<GDataProof>> {
		if cells.len() > MAX_CELLS {
			return Err(Error::TooManyCells { requested: cells.len(), max: MAX_CELLS })
		}
		let params = vec![serde_json::to_value(cells)?, serde_json::to_value(at)?];
		self.call("kate_queryProof", params).await
	}

	/// Merkle proof of the data or bridge leaf of extrinsic `transaction_index` in block `at`.
	pub async fn query_data_proof(&self, transaction_index: u32, at: H256) -> Result<ProofResponse> {
		let params = vec![serde_json::to_value(transaction_index)?, serde_json::to_value(at)?];
		self.call("kate_queryDataProof", params).await
	}

	/// Rows of the extended data matrix of block `at`.
	pub async fn query_rows(&self, rows: &[u32], at: H256) -> Result<Vec<GRow>> {
		let params = vec![serde_json::to_value(rows)?, serde_json::to_value(at)?];
		self.call("kate_queryRows", params).await
	}

	/// Rows of the data matrix holding application `app_id`'s data in block `at`. Rows without
	/// data of the application are `None`.
	pub async fn query_app_data(&self, app_id: u32, at: H256) -> Result<Vec<Option<Vec<u8>>>> {
		let params = vec![serde_json::to_value(app_id)?, serde_json::to_value(at)?];
		self.call("kate_queryAppData", params).await
	}

	/// Matrix dimensions and chunk size in effect at block `at`, as opaque JSON.
	pub async fn block_length(&self, at: H256) -> Result<serde_json::Value> {
		self.call("kate_blockLength", to_params(&[at])?).await
	}
}
