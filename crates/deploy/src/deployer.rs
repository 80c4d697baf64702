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

//! The deployment facility: submits the contract-creation extrinsic and
//! waits for the configured number of block confirmations.

use std::{
    collections::BTreeMap,
    path::PathBuf,
};

use async_trait::async_trait;
use futures::StreamExt as _;
use subxt::{
    backend::{
        legacy::LegacyRpcMethods,
        rpc::RpcClient,
    },
    config::DefaultExtrinsicParamsBuilder,
    events::StaticEvent,
    ext::{
        scale_decode,
        scale_encode,
        scale_encode::EncodeAsType,
    },
    tx,
    utils::H160,
    OnlineClient,
    PolkadotConfig as DefaultConfig,
};
use subxt_signer::sr25519::Keypair;

use crate::{
    account::{
        AccountError,
        NamedAccounts,
    },
    config::ContractConfig,
    network::Network,
};

type Client = OnlineClient<DefaultConfig>;
type Balance = u128;

/// What the deployment task asks the facility to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Name of the contract to deploy, resolved by the facility.
    pub contract: String,
    /// Secret URI of the deployer account, resolved from the named
    /// accounts before this request is built.
    pub from: String,
    /// Hex-encoded constructor arguments, in call order.
    pub args: Vec<String>,
    /// Blocks to await on top of the inclusion block before returning.
    pub wait_confirmations: u32,
    /// Whether the facility should emit progress output.
    pub log: bool,
}

/// The result of a settled deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Address of the newly created contract instance.
    pub address: H160,
    /// Number of the block the deployment transaction was included in.
    pub block_number: u64,
}

/// Submits a contract-creation transaction and awaits its confirmations.
///
/// Injected into the deployment task so that tests can run against a fake.
#[async_trait]
pub trait DeploymentFacility {
    async fn deploy(&self, request: &DeployRequest) -> Result<Deployment, DeploymentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("no artifact is configured for contract `{0}`")]
    UnknownContract(String),
    #[error("failed to read contract artifact {path}: {message}")]
    Artifact { path: PathBuf, message: String },
    #[error("invalid constructor argument `{arg}`: {source}")]
    ConstructorArg {
        arg: String,
        source: hex::FromHexError,
    },
    #[error(transparent)]
    Signer(#[from] AccountError),
    #[error(transparent)]
    Rpc(#[from] subxt::Error),
    #[error("the `Instantiated` event was not emitted")]
    MissingInstantiatedEvent,
    #[error("block subscription ended after {seen} of {requested} confirmations")]
    ConfirmationsInterrupted { seen: u32, requested: u32 },
}

/// Copied from `sp_weights` to additionally implement
/// `scale_encode::EncodeAsType`.
#[derive(Debug, Clone, Copy, EncodeAsType)]
#[encode_as_type(crate_path = "subxt::ext::scale_encode")]
struct Weight {
    #[codec(compact)]
    ref_time: u64,
    #[codec(compact)]
    proof_size: u64,
}

/// A raw call to `pallet-revive`'s `instantiate_with_code`.
#[derive(Debug, EncodeAsType)]
#[encode_as_type(crate_path = "subxt::ext::scale_encode")]
struct InstantiateWithCode {
    #[codec(compact)]
    value: Balance,
    gas_limit: Weight,
    #[codec(compact)]
    storage_deposit_limit: Balance,
    code: Vec<u8>,
    data: Vec<u8>,
    salt: Option<Vec<u8>>,
}

impl InstantiateWithCode {
    fn build(self) -> tx::DefaultPayload<Self> {
        tx::DefaultPayload::new("Revive", "instantiate_with_code", self)
    }
}

/// Contract deployed by deployer at the specified address.
#[derive(
    scale::Decode,
    scale::Encode,
    scale_decode::DecodeAsType,
    scale_encode::EncodeAsType,
    Debug,
)]
#[decode_as_type(crate_path = "subxt::ext::scale_decode")]
#[encode_as_type(crate_path = "subxt::ext::scale_encode")]
struct ContractInstantiated {
    /// Address of the deployer.
    deployer: H160,
    /// Address where the contract was instantiated to.
    contract: H160,
}

impl StaticEvent for ContractInstantiated {
    const PALLET: &'static str = "Revive";
    const EVENT: &'static str = "Instantiated";
}

// Submission limits. Estimating these via a pre-submission dry run requires
// the contract metadata, which this tool deliberately does not consume; the
// node refunds the unused portion.
const GAS_LIMIT: Weight = Weight {
    ref_time: 500_000_000_000,
    proof_size: 3 * 1024 * 1024,
};
const STORAGE_DEPOSIT_LIMIT: Balance = 1_000_000_000_000;

/// The chain-backed [`DeploymentFacility`].
pub struct ChainDeployer {
    url: url::Url,
    artifacts: BTreeMap<String, PathBuf>,
}

impl ChainDeployer {
    pub fn new(network: &Network, contract: &ContractConfig) -> Self {
        let artifacts = [(contract.name.clone(), contract.artifact.clone())]
            .into_iter()
            .collect();
        Self {
            url: network.url.clone(),
            artifacts,
        }
    }

    fn artifact_bytes(&self, contract: &str) -> Result<Vec<u8>, DeploymentError> {
        let path = self
            .artifacts
            .get(contract)
            .ok_or_else(|| DeploymentError::UnknownContract(contract.to_string()))?;
        std::fs::read(path).map_err(|err| {
            DeploymentError::Artifact {
                path: path.clone(),
                message: err.to_string(),
            }
        })
    }

    /// Wait for the transaction to be included successfully into a block.
    ///
    /// Local development nodes do not guarantee finality, so inclusion in a
    /// best block counts; the confirmation wait below is what hardens
    /// deployments on public networks.
    async fn submit_extrinsic(
        &self,
        client: &Client,
        rpc: &LegacyRpcMethods<DefaultConfig>,
        call: &tx::DefaultPayload<InstantiateWithCode>,
        signer: &Keypair,
    ) -> Result<(subxt::blocks::ExtrinsicEvents<DefaultConfig>, u64), DeploymentError> {
        let account_id = <Keypair as tx::Signer<DefaultConfig>>::account_id(signer);
        let account_nonce = get_account_nonce(client, rpc, &account_id).await?;

        let params = DefaultExtrinsicParamsBuilder::new()
            .nonce(account_nonce)
            .build();
        let mut tx = client
            .tx()
            .create_partial_offline(call, params)?
            .sign(signer)
            .submit_and_watch()
            .await?;

        use subxt::error::{
            RpcError,
            TransactionError,
        };
        use tx::TxStatus;

        while let Some(status) = tx.next().await {
            match status? {
                TxStatus::InBestBlock(tx_in_block)
                | TxStatus::InFinalizedBlock(tx_in_block) => {
                    let block_hash = tx_in_block.block_hash();
                    let events = tx_in_block.wait_for_success().await?;
                    let block_number =
                        client.blocks().at(block_hash).await?.number() as u64;
                    return Ok((events, block_number))
                }
                TxStatus::Error { message } => {
                    return Err(subxt::Error::from(TransactionError::Error(message)).into())
                }
                TxStatus::Invalid { message } => {
                    return Err(subxt::Error::from(TransactionError::Invalid(message)).into())
                }
                TxStatus::Dropped { message } => {
                    return Err(subxt::Error::from(TransactionError::Dropped(message)).into())
                }
                _ => continue,
            }
        }
        Err(subxt::Error::from(RpcError::SubscriptionDropped).into())
    }

    /// Awaits `confirmations` further blocks on top of `included_at`.
    async fn wait_for_confirmations(
        &self,
        client: &Client,
        included_at: u64,
        confirmations: u32,
        log: bool,
    ) -> Result<(), DeploymentError> {
        if confirmations == 0 {
            return Ok(())
        }
        let settled_at = included_at + confirmations as u64;
        let mut blocks = client.blocks().subscribe_best().await?;
        let mut best = included_at;
        while let Some(block) = blocks.next().await {
            let block = block?;
            best = best.max(block.number() as u64);
            if log {
                tracing::debug!(
                    "confirmation {}/{}",
                    best.saturating_sub(included_at).min(confirmations as u64),
                    confirmations
                );
            }
            if best >= settled_at {
                return Ok(())
            }
        }
        Err(DeploymentError::ConfirmationsInterrupted {
            seen: best.saturating_sub(included_at) as u32,
            requested: confirmations,
        })
    }
}

#[async_trait]
impl DeploymentFacility for ChainDeployer {
    async fn deploy(&self, request: &DeployRequest) -> Result<Deployment, DeploymentError> {
        let code = self.artifact_bytes(&request.contract)?;
        let data = encode_constructor_args(&request.args)?;
        let signer = NamedAccounts::signer(&request.from)?;

        let rpc_cli = RpcClient::from_url(self.url.as_str())
            .await
            .map_err(subxt::Error::from)?;
        let client = Client::from_rpc_client(rpc_cli.clone()).await?;
        let rpc = LegacyRpcMethods::new(rpc_cli);

        if request.log {
            tracing::info!(
                "deploying `{}` ({} bytes) via {}",
                request.contract,
                code.len(),
                self.url
            );
        }

        let call = InstantiateWithCode {
            value: 0,
            gas_limit: GAS_LIMIT,
            storage_deposit_limit: STORAGE_DEPOSIT_LIMIT,
            code,
            data,
            salt: None,
        }
        .build();

        let (events, block_number) =
            self.submit_extrinsic(&client, &rpc, &call, &signer).await?;

        let instantiated = events
            .find_last::<ContractInstantiated>()?
            .ok_or(DeploymentError::MissingInstantiatedEvent)?;

        if request.log {
            tracing::info!(
                "included in block {block_number}, awaiting {} confirmations",
                request.wait_confirmations
            );
        }
        self.wait_for_confirmations(
            &client,
            block_number,
            request.wait_confirmations,
            request.log,
        )
        .await?;

        Ok(Deployment {
            address: instantiated.contract,
            block_number,
        })
    }
}

/// Concatenates the hex-encoded constructor arguments into the constructor
/// input data.
fn encode_constructor_args(args: &[String]) -> Result<Vec<u8>, DeploymentError> {
    let decoded = args
        .iter()
        .map(|arg| {
            let arg = arg.strip_prefix("0x").unwrap_or(arg);
            hex::decode(arg).map_err(|source| {
                DeploymentError::ConstructorArg {
                    arg: arg.to_string(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(decoded.concat())
}

/// Return the account nonce at the *best* block for an account ID.
async fn get_account_nonce(
    client: &Client,
    rpc: &LegacyRpcMethods<DefaultConfig>,
    account_id: &<DefaultConfig as subxt::Config>::AccountId,
) -> Result<u64, subxt::Error> {
    let best_block = rpc
        .chain_get_block_hash(None)
        .await?
        .ok_or(subxt::Error::Other("Best block not found".into()))?;
    let account_nonce = client
        .blocks()
        .at(best_block)
        .await?
        .account_nonce(account_id)
        .await?;
    Ok(account_nonce)
}
