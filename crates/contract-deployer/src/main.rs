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

mod cmd;

use self::cmd::{
    DeployCommand,
    VerifyCommand,
};

use anyhow::Result;
use clap::{
    Parser,
    Subcommand,
};
use colored::Colorize;

#[derive(Debug, Parser)]
#[clap(name = "contract-deployer", version)]
#[clap(about = "Deploy a smart contract and register it with a block explorer")]
pub(crate) struct Opts {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the deployment tasks against the selected network
    #[clap(name = "deploy")]
    Deploy(DeployCommand),
    /// Verify an already-deployed contract with the block explorer
    #[clap(name = "verify")]
    Verify(VerifyCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    match exec(opts.cmd).await {
        Ok(()) => {}
        Err(err) => {
            eprintln!(
                "{} {}",
                "ERROR:".bright_red().bold(),
                format!("{err:?}").bright_red()
            );
            std::process::exit(1);
        }
    }
}

async fn exec(cmd: Command) -> Result<()> {
    match cmd {
        Command::Deploy(deploy) => deploy.run().await,
        Command::Verify(verify) => verify.run().await,
    }
}
