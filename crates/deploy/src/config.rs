// Copyright (C) Use Ink (UK) Ltd.
// This file is part of contract-deployer.
//
// contract-deployer is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// contract-deployer is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with contract-deployer.  If not, see <http://www.gnu.org/licenses/>.

//! Loading of the deployment configuration file and resolution of the
//! explorer credential from the environment.

use std::{
    collections::BTreeMap,
    path::{
        Path,
        PathBuf,
    },
};

use url::Url;

use crate::{
    account::NamedAccounts,
    network::Network,
};

/// The deployment configuration, usually read from `deploy.toml`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DeployConfig {
    pub contract: ContractConfig,
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub accounts: NamedAccounts,
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

/// The contract to deploy. The artifact is an opaque, pre-built binary;
/// this tool neither compiles nor inspects it.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ContractConfig {
    /// Name the deployment is registered under.
    pub name: String,
    /// Path to the built contract binary.
    pub artifact: PathBuf,
    /// Hex-encoded constructor arguments, in call order. Empty for
    /// contracts with an argument-less constructor.
    #[serde(default)]
    pub constructor_args: Vec<String>,
    /// Tags the deploy task registers itself under, consumed by the task
    /// runner's tag filter.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

fn default_tags() -> Vec<String> {
    vec!["all".to_string()]
}

/// Per-network settings under `[networks.<name>]`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NetworkConfig {
    /// Websocket endpoint of a node on this network.
    pub url: Url,
    /// Blocks to await on top of the inclusion block.
    #[serde(default)]
    pub block_confirmations: u32,
}

/// Block-explorer settings under `[explorer]`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ExplorerConfig {
    /// Base URL of the explorer's verification API.
    pub url: Option<Url>,
}

impl DeployConfig {
    /// Reads and parses the configuration file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ConfigError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        toml::from_str(&raw).map_err(|err| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })
    }

    /// Assembles the [`Network`] descriptor for the named network.
    pub fn network(&self, name: &str) -> Result<Network, ConfigError> {
        let network = self.networks.get(name).ok_or_else(|| {
            ConfigError::UnknownNetwork {
                name: name.to_string(),
                known: self.networks.keys().cloned().collect(),
            }
        })?;
        Ok(Network {
            name: name.to_string(),
            url: network.url.clone(),
            block_confirmations: network.block_confirmations,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unknown network `{name}`, expected one of {known:?}")]
    UnknownNetwork { name: String, known: Vec<String> },
}

/// The explorer credential, read from the environment. Its presence gates
/// verification; its absence is a deliberate skip, never an error.
#[derive(Debug, Clone, Default)]
pub struct VerificationConfig {
    api_key: Option<String>,
}

impl VerificationConfig {
    /// Environment variable holding the explorer API key.
    pub const ENV_KEY: &'static str = "EXPLORER_API_KEY";

    /// Reads the credential from the process environment.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(Self::ENV_KEY).ok())
    }

    /// An unset, empty or whitespace-only value counts as absent.
    pub fn from_value(raw: Option<String>) -> Self {
        let api_key = raw
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self { api_key }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether a usable credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
