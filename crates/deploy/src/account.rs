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

use std::collections::BTreeMap;

use subxt_signer::{
    sr25519::Keypair,
    SecretUri,
};

/// The logical role every deployment is signed with.
pub const DEPLOYER: &str = "deployer";

/// Mapping from a logical role name to the secret URI of the account
/// fulfilling that role, as configured under `[accounts]`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct NamedAccounts(BTreeMap<String, String>);

impl NamedAccounts {
    /// Resolves a role to its configured secret URI.
    ///
    /// A missing role is a configuration error and is raised before any
    /// network interaction takes place.
    pub fn resolve(&self, role: &str) -> Result<&str, AccountError> {
        self.0
            .get(role)
            .map(String::as_str)
            .ok_or_else(|| AccountError::MissingRole(role.to_string()))
    }

    /// Returns the signing keypair for a secret URI resolved via
    /// [`NamedAccounts::resolve`].
    pub fn signer(suri: &str) -> Result<Keypair, AccountError> {
        let uri = <SecretUri as std::str::FromStr>::from_str(suri)
            .map_err(|err| AccountError::InvalidSuri(err.to_string()))?;
        Keypair::from_uri(&uri).map_err(|err| AccountError::InvalidSuri(err.to_string()))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for NamedAccounts {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(role, suri)| (role.to_string(), suri.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("no `{0}` account is configured")]
    MissingRole(String),
    #[error("invalid secret URI: {0}")]
    InvalidSuri(String),
}
