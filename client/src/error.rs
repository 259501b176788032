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

//! Errors of the RPC client.

use crate::status::{TransactionStatus, WaitFor};
use avail_tx_primitives::{BlockNumber, H256};
use jsonrpsee::core::ClientError;
use std::time::Duration;
use thiserror::Error;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type of the client crate.
#[derive(Error, Debug)]
pub enum Error {
	/// Building, signing or decoding an extrinsic failed.
	#[error(transparent)]
	Primitives(#[from] avail_tx_primitives::Error),
	/// The node answered a request with a JSON-RPC error object.
	#[error("RPC call failed with code {code}: {message}")]
	RpcCall {
		/// JSON-RPC error code.
		code: i32,
		/// Error message.
		message: String,
		/// Additional data attached by the node.
		data: Option<String>,
	},
	/// The connection to the node failed or the request could not be sent.
	#[error("RPC transport error: {0}")]
	Transport(String),
	/// A response did not have the expected shape.
	#[error("unexpected RPC response: {0}")]
	Serialization(#[from] serde_json::Error),
	/// The node refused to accept the extrinsic into its pool.
	#[error("extrinsic rejected by the node ({code}): {message}")]
	Submission {
		/// JSON-RPC error code.
		code: i32,
		/// Rejection reason.
		message: String,
		/// Additional data, e.g. the transaction validity error.
		data: Option<String>,
	},
	/// The milestone was not reached in time.
	#[error("timed out after {after:?} waiting for {milestone}")]
	Timeout {
		/// What was awaited.
		milestone: WaitFor,
		/// The configured timeout.
		after: Duration,
	},
	/// The transaction reached a state it can not recover from.
	#[error("transaction failed: {0}")]
	TransactionFailed(TransactionStatus),
	/// The node closed the status subscription before a milestone was reached.
	#[error("status subscription closed by the node")]
	SubscriptionClosed,
	/// Tracking was cancelled by the caller.
	#[error("transaction tracking cancelled")]
	Cancelled,
	/// A background task went away without producing a result.
	#[error("background task failed: {0}")]
	Task(String),
	/// The node does not know a block with this number.
	#[error("no block hash for block #{0}")]
	MissingBlockHash(BlockNumber),
	/// The node does not know a block with this hash.
	#[error("block {0:?} not found")]
	BlockNotFound(H256),
	/// More cells were requested than a single proof query allows.
	#[error("too many cells requested: {requested}, at most {max} allowed")]
	TooManyCells {
		/// Number of requested cells.
		requested: usize,
		/// Upper bound per query.
		max: usize,
	},
}

impl Error {
	/// Whether this error is the node rejecting a request, as opposed to a transport, decoding or
	/// timeout failure.
	pub fn is_rejection(&self) -> bool {
		matches!(self, Error::RpcCall { .. } | Error::Submission { .. })
	}

	/// Re-tag a failed `author_*` call as a submission rejection.
	pub(crate) fn into_submission(self) -> Self {
		match self {
			Error::RpcCall { code, message, data } => Error::Submission { code, message, data },
			other => other,
		}
	}
}

impl From<ClientError> for Error {
	fn from(err: ClientError) -> Self {
		match err {
			ClientError::Call(obj) => Error::RpcCall {
				code: obj.code(),
				message: obj.message().to_owned(),
				data: obj.data().map(|raw| raw.get().to_owned()),
			},
			ClientError::ParseError(e) => Error::Serialization(e),
			other => Error::Transport(other.to_string()),
		}
	}
}
