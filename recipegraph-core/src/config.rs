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

//! Ranking configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Knobs for [`crate::ranking::rank`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Upper bound on one oracle query, in milliseconds
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,

    /// Truncate the ranked list to this many entries
    #[serde(default)]
    pub max_results: Option<usize>,
}

fn default_oracle_timeout_ms() -> u64 {
    30_000
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            oracle_timeout_ms: default_oracle_timeout_ms(),
            max_results: None,
        }
    }
}

impl RankingConfig {
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}
