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

//! Recipegraph Storage
//!
//! Offline side of the recommender:
//! - **Ingest**: raw recipe CSV into cleaned, normalized records
//! - **Artifacts**: triple table, graph, records and unique-value lists,
//!   persisted once and reloaded at service startup

pub mod artifacts;
pub mod error;
pub mod ingest;

pub use artifacts::{preprocess, preprocess_records, ArtifactBundle, ArtifactKind, ArtifactStore, BatchOutput};
pub use error::{Result, StorageError};
pub use ingest::{read_records, read_records_from_path, unique_values, RawRecipeRow};
