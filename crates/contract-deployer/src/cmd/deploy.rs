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
use contract_deploy::{
    ChainDeployer,
    DeployConfig,
    DeployTask,
    ExplorerVerifier,
    VerificationConfig,
};

use super::name_value_println;

#[derive(Debug, clap::Args)]
pub struct DeployCommand {
    /// The target network, as configured in the deployment config.
    #[clap(long, short)]
    network: String,
    /// Path to the deployment configuration file.
    #[clap(long, default_value = "deploy.toml", value_parser)]
    config: PathBuf,
    /// Only run deployment tasks registered under this tag.
    #[clap(long)]
    tag: Option<String>,
}

impl DeployCommand {
    pub async fn run(&self) -> Result<()> {
        let config = DeployConfig::from_path(&self.config)?;
        let network = config.network(&self.network)?;
        let verification = VerificationConfig::from_env();

        let facility = ChainDeployer::new(&network, &config.contract);
        let verifier =
            ExplorerVerifier::new(config.explorer.url.clone(), verification.api_key())?;

        let tasks = vec![DeployTask::new(&config.contract)];
        for task in tasks
            .iter()
            .filter(|task| task.matches_tag(self.tag.as_deref()))
        {
            tracing::debug!("running task `{}` on `{}`", task.name(), network.name);
            let deployment = task
                .run(
                    &facility,
                    &verifier,
                    &network,
                    &config.accounts,
                    &verification,
                )
                .await?;

            name_value_println!("Contract", format!("{:?}", deployment.address));
            name_value_println!("Block", deployment.block_number.to_string());
        }
        Ok(())
    }
}
