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

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use contract_deploy::{
    DeployConfig,
    ExplorerVerifier,
    VerificationConfig,
    Verifier as _,
    H160,
};

/// Registers an already-deployed contract with the block explorer, for
/// deployments whose verification was skipped or failed.
#[derive(Debug, clap::Args)]
pub struct VerifyCommand {
    /// The target network, as configured in the deployment config.
    #[clap(long, short)]
    network: String,
    /// Path to the deployment configuration file.
    #[clap(long, default_value = "deploy.toml", value_parser)]
    config: PathBuf,
    /// Address of the deployed contract instance.
    #[clap(long, value_parser = parse_address)]
    address: H160,
}

/// Parse a hex encoded contract address.
fn parse_address(input: &str) -> Result<H160> {
    let bytes = hex::decode(input.strip_prefix("0x").unwrap_or(input))?;
    if bytes.len() != 20 {
        anyhow::bail!("Contract address should be 20 bytes in length")
    }
    let mut arr = [0u8; 20];
    arr.copy_from_slice(&bytes);
    Ok(H160(arr))
}

impl VerifyCommand {
    pub async fn run(&self) -> Result<()> {
        let config = DeployConfig::from_path(&self.config)?;
        let network = config.network(&self.network)?;
        anyhow::ensure!(
            network.is_public(),
            "`{}` is a development network; its contracts cannot be verified",
            network.name
        );

        let verification = VerificationConfig::from_env();
        anyhow::ensure!(
            verification.is_enabled(),
            "no explorer API key is configured, set `{}`",
            VerificationConfig::ENV_KEY
        );

        let verifier =
            ExplorerVerifier::new(config.explorer.url.clone(), verification.api_key())?;
        verifier
            .verify(&self.address, &config.contract.constructor_args)
            .await?;

        println!(
            "{} {}",
            "Successfully verified contract".bright_green().bold(),
            format!("`{:?}`!", self.address).bold(),
        );
        Ok(())
    }
}
