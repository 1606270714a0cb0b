// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Index error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type for oracle index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised while loading, fitting or validating a model
#[derive(Debug, Error)]
pub enum IndexError {
    /// No fitted model artifact at the expected path
    #[error("Missing model artifact at {}", path.display())]
    MissingModel { path: PathBuf },

    /// A triple references an entity or relation the embeddings do not cover
    #[error("No {kind} embedding for '{label}'")]
    MissingEmbedding { kind: &'static str, label: String },

    /// A vector does not have the model dimension
    #[error("Embedding for '{label}' has dimension {found}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    /// Malformed embedding file or inconsistent model
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Unknown scoring function name
    #[error("Unknown scoring function: {0}")]
    UnknownScoring(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for IndexError {
    fn from(e: bincode::Error) -> Self {
        IndexError::Serialization(e.to_string())
    }
}
