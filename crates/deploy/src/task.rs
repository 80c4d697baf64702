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

//! The deployment task: deploy the configured contract, await its
//! confirmations, then register it with the block explorer when the target
//! network is public and a credential is configured.

use colored::Colorize as _;

use crate::{
    account::{
        AccountError,
        NamedAccounts,
        DEPLOYER,
    },
    config::{
        ContractConfig,
        VerificationConfig,
    },
    deployer::{
        Deployment,
        DeploymentError,
        DeploymentFacility,
        DeployRequest,
    },
    network::Network,
    verifier::{
        VerificationError,
        Verifier,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// A named deployment task, registered under a set of tags which the task
/// runner matches against its tag filter.
#[derive(Debug, Clone)]
pub struct DeployTask {
    contract: String,
    args: Vec<String>,
    tags: Vec<String>,
}

impl DeployTask {
    pub fn new(contract: &ContractConfig) -> Self {
        Self {
            contract: contract.name.clone(),
            args: contract.constructor_args.clone(),
            tags: contract.tags.clone(),
        }
    }

    pub fn name(&self) -> String {
        format!("deploy-{}", self.contract)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether this task is selected by the runner's tag filter. No filter
    /// selects every task.
    pub fn matches_tag(&self, filter: Option<&str>) -> bool {
        match filter {
            Some(tag) => self.tags.iter().any(|t| t == tag),
            None => true,
        }
    }

    /// Runs the deployment and, when the verification predicate holds, the
    /// explorer registration.
    ///
    /// Deployment errors abort before any verification attempt. A failed
    /// verification surfaces as an error even though the deployment itself
    /// is final; on-chain deployments are not rolled back.
    pub async fn run(
        &self,
        facility: &dyn DeploymentFacility,
        verifier: &dyn Verifier,
        network: &Network,
        accounts: &NamedAccounts,
        verification: &VerificationConfig,
    ) -> Result<Deployment, TaskError> {
        // resolved before anything touches the network
        let deployer = accounts.resolve(DEPLOYER)?;

        println!("{}", "-".repeat(52));
        let request = DeployRequest {
            contract: self.contract.clone(),
            from: deployer.to_string(),
            args: self.args.clone(),
            wait_confirmations: network.block_confirmations,
            log: true,
        };
        let deployment = facility.deploy(&request).await?;

        if network.is_public() && verification.is_enabled() {
            println!("Verifying the contract ...");
            verifier.verify(&deployment.address, &self.args).await?;
            println!(
                "{}",
                format!("`{}` verification completed", self.contract).bright_green()
            );
        }

        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use subxt::utils::H160;
    use url::Url;

    fn network(name: &str, confirmations: u32) -> Network {
        Network {
            name: name.to_string(),
            url: Url::parse("ws://localhost:9944").unwrap(),
            block_confirmations: confirmations,
        }
    }

    fn task() -> DeployTask {
        DeployTask::new(&ContractConfig {
            name: "voting".to_string(),
            artifact: "target/ink/voting.polkavm".into(),
            constructor_args: vec![],
            tags: vec!["all".to_string(), "voting".to_string()],
        })
    }

    fn accounts() -> NamedAccounts {
        NamedAccounts::from([(DEPLOYER, "//Alice")])
    }

    const ADDRESS: [u8; 20] = [0xab; 20];

    /// Records every request and answers with a fixed deployment.
    struct RecordingFacility {
        requests: Mutex<Vec<DeployRequest>>,
        fail: bool,
    }

    impl RecordingFacility {
        fn new(fail: bool) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl DeploymentFacility for RecordingFacility {
        async fn deploy(
            &self,
            request: &DeployRequest,
        ) -> Result<Deployment, DeploymentError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(DeploymentError::MissingInstantiatedEvent)
            }
            Ok(Deployment {
                address: H160::from(ADDRESS),
                block_number: 1,
            })
        }
    }

    /// Records every verification call.
    #[derive(Default)]
    struct RecordingVerifier {
        calls: Mutex<Vec<(H160, Vec<String>)>>,
        fail: bool,
    }

    #[async_trait]
    impl Verifier for RecordingVerifier {
        async fn verify(
            &self,
            address: &H160,
            constructor_args: &[String],
        ) -> Result<(), VerificationError> {
            self.calls
                .lock()
                .unwrap()
                .push((*address, constructor_args.to_vec()));
            if self.fail {
                return Err(VerificationError::Rejected("source mismatch".to_string()))
            }
            Ok(())
        }
    }

    async fn run(
        task: &DeployTask,
        facility: &RecordingFacility,
        verifier: &RecordingVerifier,
        network: &Network,
        accounts: &NamedAccounts,
        credential: Option<&str>,
    ) -> Result<Deployment, TaskError> {
        let verification =
            VerificationConfig::from_value(credential.map(str::to_string));
        task.run(facility, verifier, network, accounts, &verification)
            .await
    }

    // Scenario A: development network, no credential.
    #[tokio::test]
    async fn development_network_deploys_without_verifying() {
        let facility = RecordingFacility::new(false);
        let verifier = RecordingVerifier::default();

        run(&task(), &facility, &verifier, &network("localhost", 0), &accounts(), None)
            .await
            .unwrap();

        assert_eq!(facility.requests.lock().unwrap().len(), 1);
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    // Verification stays off on development networks even with a credential.
    #[tokio::test]
    async fn development_network_ignores_the_credential() {
        let facility = RecordingFacility::new(false);
        let verifier = RecordingVerifier::default();

        run(
            &task(),
            &facility,
            &verifier,
            &network("localhost", 0),
            &accounts(),
            Some("ABC123"),
        )
        .await
        .unwrap();

        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    // Scenario B: public network, empty credential.
    #[tokio::test]
    async fn empty_credential_skips_verification() {
        let facility = RecordingFacility::new(false);
        let verifier = RecordingVerifier::default();

        run(
            &task(),
            &facility,
            &verifier,
            &network("mainnet", 6),
            &accounts(),
            Some(""),
        )
        .await
        .unwrap();

        assert_eq!(facility.requests.lock().unwrap().len(), 1);
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    // Scenario C: public network with a credential verifies exactly once.
    #[tokio::test]
    async fn public_network_verifies_the_deployed_address() {
        let facility = RecordingFacility::new(false);
        let verifier = RecordingVerifier::default();

        run(
            &task(),
            &facility,
            &verifier,
            &network("mainnet", 6),
            &accounts(),
            Some("ABC123"),
        )
        .await
        .unwrap();

        let requests = facility.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].from, "//Alice");
        assert_eq!(requests[0].wait_confirmations, 6);

        let calls = verifier.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, H160::from(ADDRESS));
        // the argument sequence passed to deploy and verify is identical
        assert_eq!(calls[0].1, requests[0].args);
        assert!(calls[0].1.is_empty());
    }

    // Scenario D: a deployment error aborts before any verification.
    #[tokio::test]
    async fn failed_deployment_never_verifies() {
        let facility = RecordingFacility::new(true);
        let verifier = RecordingVerifier::default();

        let err = run(
            &task(),
            &facility,
            &verifier,
            &network("mainnet", 6),
            &accounts(),
            Some("ABC123"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TaskError::Deployment(_)));
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    // The deployment is final; a failed verification still surfaces.
    #[tokio::test]
    async fn failed_verification_propagates() {
        let facility = RecordingFacility::new(false);
        let verifier = RecordingVerifier {
            fail: true,
            ..Default::default()
        };

        let err = run(
            &task(),
            &facility,
            &verifier,
            &network("mainnet", 6),
            &accounts(),
            Some("ABC123"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TaskError::Verification(_)));
        assert_eq!(facility.requests.lock().unwrap().len(), 1);
        assert_eq!(verifier.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_deployer_aborts_before_any_call() {
        let facility = RecordingFacility::new(false);
        let verifier = RecordingVerifier::default();

        let err = run(
            &task(),
            &facility,
            &verifier,
            &network("mainnet", 6),
            &NamedAccounts::default(),
            Some("ABC123"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TaskError::Account(AccountError::MissingRole(_))));
        assert!(facility.requests.lock().unwrap().is_empty());
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn tag_filter_selects_tasks() {
        let task = task();
        assert_eq!(task.name(), "deploy-voting");
        assert!(task.matches_tag(None));
        assert!(task.matches_tag(Some("all")));
        assert!(task.matches_tag(Some("voting")));
        assert!(!task.matches_tag(Some("marketplace")));
    }
}
