//! Logical-name resolution of the deployed contracts.
//!
//! Deployments are recorded per chain in a JSON manifest:
//!
//! ```json
//! {
//!     "chainId": 1,
//!     "contracts": {
//!         "ProxyAdmin": "0x...",
//!         "CarbonController": "0x...",
//!         "CarbonVortex": "0x..."
//!     }
//! }
//! ```

use crate::error::{Result, SetupError};
use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

pub const PROXY_ADMIN: &str = "ProxyAdmin";
pub const CARBON_CONTROLLER: &str = "CarbonController";
pub const CARBON_VORTEX: &str = "CarbonVortex";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    chain_id: u64,
    contracts: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct DeploymentManifest {
    pub chain_id: u64,
    contracts: BTreeMap<String, Address>,
}

impl DeploymentManifest {
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: RawManifest = serde_json::from_str(raw).map_err(|e| {
            SetupError::InvalidConfig(format!("deployment manifest is not valid JSON: {e}"))
        })?;
        let mut contracts = BTreeMap::new();
        for (name, raw_address) in parsed.contracts {
            let address = Address::from_str(raw_address.trim()).map_err(|e| {
                SetupError::InvalidConfig(format!(
                    "deployment `{name}` has an invalid address `{raw_address}`: {e}"
                ))
            })?;
            contracts.insert(name, address);
        }
        Ok(Self {
            chain_id: parsed.chain_id,
            contracts,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SetupError::InvalidConfig(format!(
                "cannot read deployment manifest `{}`: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn address_of(&self, name: &str) -> Result<Address> {
        self.contracts.get(name).copied().ok_or_else(|| {
            SetupError::UnknownDeployment {
                name: name.to_string(),
                chain_id: self.chain_id,
            }
            .into()
        })
    }
}
