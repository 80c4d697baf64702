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

//! Deployment orchestration for a single smart contract: submit the
//! contract-creation transaction, await the network's confirmation count,
//! and register the source with a block explorer when deploying to a
//! public network.

mod account;
mod config;
mod deployer;
mod network;
mod task;
mod verifier;

pub use account::{
    AccountError,
    NamedAccounts,
    DEPLOYER,
};
pub use config::{
    ConfigError,
    ContractConfig,
    DeployConfig,
    ExplorerConfig,
    NetworkConfig,
    VerificationConfig,
};
pub use deployer::{
    ChainDeployer,
    Deployment,
    DeploymentError,
    DeploymentFacility,
    DeployRequest,
};
pub use network::{
    is_development,
    DevelopmentChain,
    Network,
};
pub use task::{
    DeployTask,
    TaskError,
};
pub use verifier::{
    ExplorerVerifier,
    VerificationError,
    Verifier,
};

/// The deployed contract address type, as used by the chain client.
pub use subxt::utils::H160;
