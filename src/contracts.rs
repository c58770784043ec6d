//! Typed read surfaces of the deployed collaborator contracts.
//!
//! The contracts themselves are external; only the call shapes the verifier
//! relies on are declared here.

use crate::access_control::{AccessControlHandle, ProtocolRole, RoleRegistry};
use crate::error::{Result, SetupError};
use crate::utils::rpc::{read_call, HttpProvider};
use alloy::primitives::{Address, B256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

alloy::sol! {
    interface IProxyAdmin {
        function getProxyAdmin(address proxy) external view returns (address);
        function getProxyImplementation(address proxy) external view returns (address);
    }

    interface IAccessControlEnumerable {
        function getRoleAdmin(bytes32 role) external view returns (bytes32);
        function getRoleMemberCount(bytes32 role) external view returns (uint256);
        function getRoleMember(bytes32 role, uint256 index) external view returns (address);
    }

    interface ICarbonController {
        function roleAdmin() external view returns (bytes32);
        function roleFeesManager() external view returns (bytes32);
        function roleEmergencyStopper() external view returns (bytes32);
    }

    interface ICarbonVortex {
        function version() external view returns (uint16);
        function rewardsPPM() external view returns (uint32);
        function initialize(address rewardsTarget) external;
    }
}

/// The `ProxyAdmin` that administers the protocol's upgradeable proxies.
pub struct ProxyAdminHandle<'a> {
    provider: &'a HttpProvider,
    pub address: Address,
}

impl<'a> ProxyAdminHandle<'a> {
    pub fn new(provider: &'a HttpProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub async fn proxy_admin_of(&self, proxy: Address) -> Result<Address> {
        let ret = read_call(
            self.provider,
            self.address,
            IProxyAdmin::getProxyAdminCall { proxy },
            "ProxyAdmin.getProxyAdmin",
        )
        .await?;
        Ok(ret._0)
    }

    pub async fn implementation_of(&self, proxy: Address) -> Result<Address> {
        let ret = read_call(
            self.provider,
            self.address,
            IProxyAdmin::getProxyImplementationCall { proxy },
            "ProxyAdmin.getProxyImplementation",
        )
        .await?;
        Ok(ret._0)
    }
}

/// The `CarbonVortex` behind its upgradeable proxy.
pub struct VortexHandle<'a> {
    provider: &'a HttpProvider,
    pub address: Address,
}

impl<'a> VortexHandle<'a> {
    pub fn new(provider: &'a HttpProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub async fn version(&self) -> Result<u16> {
        let ret = read_call(
            self.provider,
            self.address,
            ICarbonVortex::versionCall {},
            "CarbonVortex.version",
        )
        .await?;
        Ok(ret._0)
    }

    pub async fn rewards_ppm(&self) -> Result<u32> {
        let ret = read_call(
            self.provider,
            self.address,
            ICarbonVortex::rewardsPPMCall {},
            "CarbonVortex.rewardsPPM",
        )
        .await?;
        Ok(ret._0)
    }

    /// Calldata for the initializer probe. Encoded here so the probe can be
    /// submitted against the implementation address, not the proxy.
    pub fn initialize_calldata(rewards_target: Address) -> Vec<u8> {
        ICarbonVortex::initializeCall {
            rewardsTarget: rewards_target,
        }
        .abi_encode()
    }
}

/// The `CarbonController` behind its upgradeable proxy.
pub struct ControllerHandle<'a> {
    provider: &'a HttpProvider,
    pub address: Address,
}

impl<'a> ControllerHandle<'a> {
    pub fn new(provider: &'a HttpProvider, address: Address) -> Self {
        Self { provider, address }
    }

    /// Role-membership view over the controller's `AccessControlEnumerable`
    /// surface.
    pub fn roles(&self) -> AccessControlHandle<'a> {
        AccessControlHandle::new(self.provider, self.address, "CarbonController")
    }
}

#[async_trait]
impl RoleRegistry for ControllerHandle<'_> {
    fn declared_roles(&self) -> &'static [ProtocolRole] {
        &[
            ProtocolRole::Admin,
            ProtocolRole::FeesManager,
            ProtocolRole::EmergencyStopper,
        ]
    }

    async fn declared_role_id(&self, role: ProtocolRole) -> Result<B256> {
        match role {
            ProtocolRole::Admin => {
                let ret = read_call(
                    self.provider,
                    self.address,
                    ICarbonController::roleAdminCall {},
                    "CarbonController.roleAdmin",
                )
                .await?;
                Ok(ret._0)
            }
            ProtocolRole::FeesManager => {
                let ret = read_call(
                    self.provider,
                    self.address,
                    ICarbonController::roleFeesManagerCall {},
                    "CarbonController.roleFeesManager",
                )
                .await?;
                Ok(ret._0)
            }
            ProtocolRole::EmergencyStopper => {
                let ret = read_call(
                    self.provider,
                    self.address,
                    ICarbonController::roleEmergencyStopperCall {},
                    "CarbonController.roleEmergencyStopper",
                )
                .await?;
                Ok(ret._0)
            }
            ProtocolRole::Minter => Err(SetupError::InvalidConfig(
                "ROLE_MINTER has no accessor on CarbonController".to_string(),
            )
            .into()),
        }
    }
}
