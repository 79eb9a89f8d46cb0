// This file is part of the terraform-provider-redash project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Result type of every client call
pub type Result<T> = std::result::Result<T, RedashError>;

/// Errors returned by the Redash client
#[derive(Error, Debug)]
pub enum RedashError {
    /// The client configuration is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The Redash URI could not be parsed
    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Redash answered with a non-success status code
    #[error("API error ({status}) at {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Redash answered with 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response body does not have the expected shape
    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server kept answering with a transient error
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),
}

impl RedashError {
    /// Check if an HTTP status is worth retrying
    ///
    /// Only rate limiting and gateway errors are considered transient.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if the error means the remote object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
