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

//! Registration of a deployed contract with a block explorer's source
//! verification service. The explorer owns the verification process itself;
//! this module only submits the request and reports the outcome.

use async_trait::async_trait;
use reqwest::header::{
    HeaderValue,
    CONTENT_TYPE,
};
use subxt::utils::H160;
use url::Url;

/// Submits a deployed contract for source verification.
///
/// Injected into the deployment task so that tests can run against a fake.
#[async_trait]
pub trait Verifier {
    async fn verify(
        &self,
        address: &H160,
        constructor_args: &[String],
    ) -> Result<(), VerificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("no explorer API key is configured")]
    MissingApiKey,
    #[error("no explorer URL is configured")]
    MissingUrl,
    #[error("explorer request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("explorer rejected the verification request: {0}")]
    Rejected(String),
}

#[derive(serde::Serialize)]
struct VerifyRequest<'a> {
    address: String,
    constructor_args: &'a [String],
}

#[derive(serde::Deserialize)]
struct VerifyResponse {
    status: String,
    #[serde(default)]
    result: String,
}

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// The HTTP-backed [`Verifier`].
pub struct ExplorerVerifier {
    client: reqwest::Client,
    url: Option<Url>,
    api_key: Option<String>,
}

impl ExplorerVerifier {
    pub fn new(url: Option<Url>, api_key: Option<&str>) -> Result<Self, VerificationError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url,
            api_key: api_key.map(str::to_string),
        })
    }

    fn verify_url(&self) -> Result<String, VerificationError> {
        let url = self.url.as_ref().ok_or(VerificationError::MissingUrl)?;
        let base = url.as_str().trim_end_matches('/');
        Ok(format!("{base}/api/contract/verify"))
    }
}

#[async_trait]
impl Verifier for ExplorerVerifier {
    async fn verify(
        &self,
        address: &H160,
        constructor_args: &[String],
    ) -> Result<(), VerificationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(VerificationError::MissingApiKey)?;
        let url = self.verify_url()?;
        let body = VerifyRequest {
            address: format!("{address:?}"),
            constructor_args,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VerificationError::Rejected(format!(
                "HTTP {status}: {message}"
            )))
        }

        // Explorers answer 200 even for rejected submissions; the body
        // carries the actual outcome.
        let outcome: VerifyResponse = response.json().await?;
        if outcome.status != "1" {
            return Err(VerificationError::Rejected(outcome.result))
        }
        tracing::debug!("verification accepted for {address:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn verifier(server: &MockServer, api_key: Option<&str>) -> ExplorerVerifier {
        let url = Url::parse(&server.base_url()).unwrap();
        ExplorerVerifier::new(Some(url), api_key).unwrap()
    }

    #[tokio::test]
    async fn submits_address_and_args() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/contract/verify")
                    .header("x-api-key", "ABC123")
                    .json_body_obj(&serde_json::json!({
                        "address": format!("{:?}", H160::from([0x11u8; 20])),
                        "constructor_args": Vec::<String>::new(),
                    }));
                then.status(200)
                    .json_body_obj(&serde_json::json!({ "status": "1", "result": "OK" }));
            })
            .await;

        let verifier = verifier(&server, Some("ABC123"));
        verifier
            .verify(&H160::from([0x11u8; 20]), &[])
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_submission_surfaces_the_reason() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contract/verify");
                then.status(200).json_body_obj(&serde_json::json!({
                    "status": "0",
                    "result": "source mismatch",
                }));
            })
            .await;

        let verifier = verifier(&server, Some("ABC123"));
        let err = verifier
            .verify(&H160::from([0x22u8; 20]), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::Rejected(reason) if reason == "source mismatch"));
    }

    #[tokio::test]
    async fn http_failure_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contract/verify");
                then.status(503).body("maintenance");
            })
            .await;

        let verifier = verifier(&server, Some("ABC123"));
        let err = verifier
            .verify(&H160::from([0x33u8; 20]), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::Rejected(_)));
    }

    #[tokio::test]
    async fn missing_api_key_never_reaches_the_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contract/verify");
                then.status(200);
            })
            .await;

        let verifier = verifier(&server, None);
        let err = verifier
            .verify(&H160::from([0x44u8; 20]), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::MissingApiKey));
        mock.assert_hits_async(0).await;
    }
}
