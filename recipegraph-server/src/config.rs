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

use anyhow::Result;
use axum::http::HeaderValue;
use recipegraph_core::RankingConfig;
use recipegraph_index::OracleKind;
use recipegraph_storage::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Recipegraph Server Configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:47200")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty = allow all)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the preprocessed artifacts
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub kind: OracleKind,

    /// Fitted model file; `model.bin` inside the data directory when unset
    #[serde(default)]
    pub model_file: Option<PathBuf>,
}

// Default values
fn default_http_addr() -> String {
    "127.0.0.1:47200".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./recipegraph-data")
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
            cors_origins: vec![],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - RECIPEGRAPH_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:47200)
    /// - RECIPEGRAPH_DATA_DIR: Artifact directory (default: ./recipegraph-data)
    /// - RECIPEGRAPH_ORACLE_TIMEOUT_MS: Per-criterion oracle timeout (default: 30000)
    /// - RECIPEGRAPH_ORACLE_KIND: `embedding` or `graph` (default: embedding)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("RECIPEGRAPH_HTTP_ADDR") {
            config.server.listen_addr = addr;
        }

        if let Ok(data_dir) = std::env::var("RECIPEGRAPH_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(timeout) = std::env::var("RECIPEGRAPH_ORACLE_TIMEOUT_MS") {
            if let Ok(val) = timeout.parse() {
                config.ranking.oracle_timeout_ms = val;
            }
        }

        if let Ok(kind) = std::env::var("RECIPEGRAPH_ORACLE_KIND") {
            match kind.parse() {
                Ok(kind) => config.oracle.kind = kind,
                Err(e) => tracing::warn!("Ignoring RECIPEGRAPH_ORACLE_KIND: {}", e),
            }
        }

        config
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        Ok(Self::merge_with_env(config))
    }

    /// Merge config with environment variables (env takes priority)
    fn merge_with_env(mut config: Self) -> Self {
        let env_config = Self::from_env();

        // Only override if env var was explicitly set
        if std::env::var("RECIPEGRAPH_HTTP_ADDR").is_ok() {
            config.server.listen_addr = env_config.server.listen_addr;
        }
        if std::env::var("RECIPEGRAPH_DATA_DIR").is_ok() {
            config.storage.data_dir = env_config.storage.data_dir;
        }
        if std::env::var("RECIPEGRAPH_ORACLE_TIMEOUT_MS").is_ok() {
            config.ranking.oracle_timeout_ms = env_config.ranking.oracle_timeout_ms;
        }
        if std::env::var("RECIPEGRAPH_ORACLE_KIND").is_ok() {
            config.oracle.kind = env_config.oracle.kind;
        }

        config
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Path of the fitted model artifact
    pub fn model_path(&self) -> PathBuf {
        self.oracle
            .model_file
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join(ArtifactKind::Model.file_name()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.ranking.oracle_timeout_ms == 0 {
            anyhow::bail!("ranking.oracle_timeout_ms must be greater than 0");
        }
        for origin in &self.server.cors_origins {
            if origin.parse::<HeaderValue>().is_err() {
                anyhow::bail!("server.cors_origins: invalid origin {:?}", origin);
            }
        }
        if self.ranking.max_results == Some(0) {
            anyhow::bail!("ranking.max_results must be greater than 0 when set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:47200");
        assert!(config.server.enable_cors);
        assert_eq!(config.ranking.oracle_timeout_ms, 30_000);
        assert_eq!(config.oracle.kind, OracleKind::Embedding);
        assert_eq!(
            config.model_path(),
            PathBuf::from("./recipegraph-data").join("model.bin")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipegraph.toml");
        std::fs::write(
            &path,
            r#"
[server]
cors_origins = ["http://localhost:3000"]

[ranking]
max_results = 25

[oracle]
kind = "graph"
model_file = "/srv/models/quate.bin"
"#,
        )
        .unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.ranking.max_results, Some(25));
        assert_eq!(config.ranking.oracle_timeout_ms, 30_000);
        assert_eq!(config.oracle.kind, OracleKind::Graph);
        assert_eq!(config.model_path(), PathBuf::from("/srv/models/quate.bin"));
        assert_eq!(config.storage.data_dir, PathBuf::from("./recipegraph-data"));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("RECIPEGRAPH_ORACLE_TIMEOUT_MS", "1500");
        std::env::set_var("RECIPEGRAPH_ORACLE_KIND", "graph");

        let config = ServerConfig::from_env();
        assert_eq!(config.ranking.oracle_timeout_ms, 1500);
        assert_eq!(config.oracle.kind, OracleKind::Graph);

        std::env::remove_var("RECIPEGRAPH_ORACLE_TIMEOUT_MS");
        std::env::remove_var("RECIPEGRAPH_ORACLE_KIND");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.server.listen_addr = "not an address".into();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.ranking.oracle_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.server.cors_origins = vec!["http://bad\norigin".into()];
        assert!(config.validate().is_err());
    }
}
