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

//! Network descriptors and the classification of local development chains.
//! Deployments to a chain in the development set never trigger explorer
//! verification.

use std::str::FromStr;

use url::Url;

/// Macro to generate an enum of well-known development chains together with
/// their default endpoints and the required trait implementations.
macro_rules! define_chains {
    (
        $(#[$($attrs:tt)*])*
        pub enum $root:ident { $( $c:ident = ($name:tt, $ep:tt) ),* $(,)? }
    ) => {
        $(#[$($attrs)*])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $root { $($c),* }

        impl $root {
            /// Returns the chain name as used in configuration files.
            pub fn name(&self) -> &'static str {
                match self {
                    $(
                        $root::$c => $name
                    ),*
                }
            }

            /// Returns the default endpoint URL of a chain.
            pub fn end_point(&self) -> &'static str {
                match self {
                    $(
                        $root::$c => $ep
                    ),*
                }
            }
        }

        impl std::fmt::Display for $root {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $root {
            type Err = anyhow::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(
                        $name => Ok($root::$c),
                    )*
                    _ => Err(anyhow::anyhow!("Unrecognised chain name"))
                }
            }
        }
    };
}

define_chains! {
    /// Chains which only run locally for development. Contracts deployed
    /// there are not registered with a block explorer.
    pub enum DevelopmentChain {
        Development = ("development", "ws://localhost:9944"),
        Localhost = ("localhost", "ws://localhost:9944"),
        ContractsNode = ("substrate-contracts-node", "ws://127.0.0.1:9944"),
    }
}

/// Returns true if `name` identifies a local development chain.
pub fn is_development(name: &str) -> bool {
    DevelopmentChain::from_str(name).is_ok()
}

/// Descriptor of the chain a deployment targets.
///
/// Read-only to the deployment task; assembled from the configuration file
/// for the network selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Network name as configured, e.g. `localhost` or `aleph-zero`.
    pub name: String,
    /// Websocket endpoint of a node on this network.
    pub url: Url,
    /// Number of blocks that must be built on top of the inclusion block
    /// before a deployment counts as settled.
    pub block_confirmations: u32,
}

impl Network {
    /// Whether contracts deployed to this network are candidates for
    /// explorer verification.
    pub fn is_public(&self) -> bool {
        !is_development(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_chains_are_classified() {
        assert!(is_development("localhost"));
        assert!(is_development("development"));
        assert!(is_development("substrate-contracts-node"));
        assert!(!is_development("mainnet"));
        assert!(!is_development("aleph-zero"));
        // membership is by exact name
        assert!(!is_development("Localhost"));
        assert!(!is_development(""));
    }

    #[test]
    fn chain_name_round_trips() {
        let chain = DevelopmentChain::from_str("substrate-contracts-node").unwrap();
        assert_eq!(chain, DevelopmentChain::ContractsNode);
        assert_eq!(chain.to_string(), "substrate-contracts-node");
        assert_eq!(chain.end_point(), "ws://127.0.0.1:9944");
        assert!(DevelopmentChain::from_str("shiden").is_err());
    }

    #[test]
    fn public_network_classification_follows_name() {
        let mut network = Network {
            name: "mainnet".to_string(),
            url: Url::parse("wss://rpc.example.network:443").unwrap(),
            block_confirmations: 6,
        };
        assert!(network.is_public());

        network.name = "localhost".to_string();
        assert!(!network.is_public());
    }
}
