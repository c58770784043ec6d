//! Post-deployment verification suite.
//!
//! Checks run sequentially in declaration order. A failed assertion aborts
//! the check it belongs to; the remaining checks still run and the suite
//! reports every outcome.

use crate::access_control::{
    enumerate_role_members, expect_role, expect_roles, occurrences, ProtocolRole,
};
use crate::contracts::{ControllerHandle, ProxyAdminHandle, VortexHandle};
use crate::error::{CheckError, Result, RpcError, SentinelError, SetupError};
use crate::utils::config::CheckFilter;
use crate::utils::error::compact_error_message;
use crate::utils::rpc::{HttpProvider, RPC_ERR_MAX_LEN};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::eth::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

pub const CARBON_VORTEX_VERSION: u16 = 3;
pub const VORTEX_REWARDS_PPM: u32 = 20_000;
/// Pinned so the initializer probe is submitted without gas estimation;
/// nodes reject estimation of reverting calls instead of letting them
/// revert on-chain.
pub const REINIT_PROBE_GAS_LIMIT: u64 = 6_000_000;

/// Everything a check needs: the provider, the resolved contract
/// addresses, and the optional probe signer.
pub struct VerifyContext<'a> {
    pub provider: &'a HttpProvider,
    pub chain_id: u64,
    pub proxy_admin: Address,
    pub controller: Address,
    pub vortex: Address,
    pub signer: Option<PrivateKeySigner>,
    pub expected_role_admin_members: Vec<Address>,
}

/// Suite order. Filter names match these.
pub const CHECK_NAMES: &[&str] = &[
    "proxy_admin_wiring",
    "vortex_version",
    "vortex_is_fee_manager",
    "vortex_rewards_ppm",
    "role_accessors",
    "admin_role_assignment",
    "implementation_initializer_locked",
];

#[derive(Debug)]
pub enum CheckOutcome {
    Passed,
    Skipped(String),
    Failed(SentinelError),
}

impl CheckOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckOutcome::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Passed => "PASSED",
            CheckOutcome::Skipped(_) => "SKIPPED",
            CheckOutcome::Failed(_) => "FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CheckReport {
    pub name: &'static str,
    pub outcome: CheckOutcome,
}

pub fn all_passed(reports: &[CheckReport]) -> bool {
    !reports.iter().any(|report| report.outcome.is_failure())
}

enum CheckRun {
    Done,
    Skipped(String),
}

pub async fn run_deployment_checks(
    ctx: &VerifyContext<'_>,
    filter: &CheckFilter,
) -> Vec<CheckReport> {
    let mut reports = Vec::with_capacity(CHECK_NAMES.len());
    for name in CHECK_NAMES.iter().copied() {
        if !filter.allows(name) {
            tracing::info!(check = name, "skipped by operator filter");
            reports.push(CheckReport {
                name,
                outcome: CheckOutcome::Skipped("operator filter".to_string()),
            });
            continue;
        }
        tracing::info!(check = name, "running");
        let outcome = match run_check(ctx, name).await {
            Ok(CheckRun::Done) => {
                tracing::info!(check = name, "passed");
                CheckOutcome::Passed
            }
            Ok(CheckRun::Skipped(reason)) => {
                tracing::info!(check = name, reason = %reason, "skipped");
                CheckOutcome::Skipped(reason)
            }
            Err(err) => {
                tracing::error!(check = name, error = %err, "failed");
                CheckOutcome::Failed(err)
            }
        };
        reports.push(CheckReport { name, outcome });
    }
    reports
}

async fn run_check(ctx: &VerifyContext<'_>, name: &str) -> Result<CheckRun> {
    match name {
        "proxy_admin_wiring" => check_proxy_admin_wiring(ctx).await.map(|_| CheckRun::Done),
        "vortex_version" => check_vortex_version(ctx).await.map(|_| CheckRun::Done),
        "vortex_is_fee_manager" => check_vortex_is_fee_manager(ctx).await.map(|_| CheckRun::Done),
        "vortex_rewards_ppm" => check_vortex_rewards_ppm(ctx).await.map(|_| CheckRun::Done),
        "role_accessors" => check_role_accessors(ctx).await.map(|_| CheckRun::Done),
        "admin_role_assignment" => check_admin_role_assignment(ctx).await,
        "implementation_initializer_locked" => check_implementation_initializer_locked(ctx)
            .await
            .map(|_| CheckRun::Done),
        other => Err(SetupError::InvalidConfig(format!("unknown check `{other}`")).into()),
    }
}

/// The proxy admin must report itself as the admin of the vortex proxy.
pub async fn check_proxy_admin_wiring(ctx: &VerifyContext<'_>) -> Result<()> {
    let proxy_admin = ProxyAdminHandle::new(ctx.provider, ctx.proxy_admin);
    let reported = proxy_admin.proxy_admin_of(ctx.vortex).await?;
    if reported != ctx.proxy_admin {
        return Err(CheckError::Mismatch {
            check: "proxy admin of CarbonVortex".to_string(),
            expected: ctx.proxy_admin.to_string(),
            actual: reported.to_string(),
        }
        .into());
    }
    Ok(())
}

pub async fn check_vortex_version(ctx: &VerifyContext<'_>) -> Result<()> {
    let vortex = VortexHandle::new(ctx.provider, ctx.vortex);
    let version = vortex.version().await?;
    if version != CARBON_VORTEX_VERSION {
        return Err(CheckError::Mismatch {
            check: "CarbonVortex.version".to_string(),
            expected: CARBON_VORTEX_VERSION.to_string(),
            actual: version.to_string(),
        }
        .into());
    }
    Ok(())
}

/// The vortex address must appear exactly once among the controller's
/// fee-manager role members. Zero means the upgrade never granted the
/// role; more than one means the enumeration is corrupt.
pub async fn check_vortex_is_fee_manager(ctx: &VerifyContext<'_>) -> Result<()> {
    let controller = ControllerHandle::new(ctx.provider, ctx.controller);
    let members =
        enumerate_role_members(&controller.roles(), ProtocolRole::FeesManager.id()).await?;
    match occurrences(&members, ctx.vortex) {
        1 => Ok(()),
        0 => Err(CheckError::Mismatch {
            check: "ROLE_FEES_MANAGER membership of CarbonVortex".to_string(),
            expected: "exactly one member entry".to_string(),
            actual: "absent".to_string(),
        }
        .into()),
        n => Err(CheckError::Mismatch {
            check: "ROLE_FEES_MANAGER membership of CarbonVortex".to_string(),
            expected: "exactly one member entry".to_string(),
            actual: format!("{n} member entries"),
        }
        .into()),
    }
}

pub async fn check_vortex_rewards_ppm(ctx: &VerifyContext<'_>) -> Result<()> {
    let vortex = VortexHandle::new(ctx.provider, ctx.vortex);
    let rewards_ppm = vortex.rewards_ppm().await?;
    if rewards_ppm != VORTEX_REWARDS_PPM {
        return Err(CheckError::Mismatch {
            check: "CarbonVortex.rewardsPPM".to_string(),
            expected: VORTEX_REWARDS_PPM.to_string(),
            actual: rewards_ppm.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Every role-id accessor the controller declares must return the
/// hash-derived identifier of its canonical name.
pub async fn check_role_accessors(ctx: &VerifyContext<'_>) -> Result<()> {
    let controller = ControllerHandle::new(ctx.provider, ctx.controller);
    expect_roles(&controller).await
}

/// Opt-in: when the operator supplies the expected admin member set, the
/// controller's `ROLE_ADMIN` must be self-governed and held by exactly
/// that set.
async fn check_admin_role_assignment(ctx: &VerifyContext<'_>) -> Result<CheckRun> {
    if ctx.expected_role_admin_members.is_empty() {
        return Ok(CheckRun::Skipped(
            "EXPECTED_ROLE_ADMIN_MEMBERS is not configured".to_string(),
        ));
    }
    let controller = ControllerHandle::new(ctx.provider, ctx.controller);
    expect_role(
        &controller.roles(),
        ProtocolRole::Admin,
        ProtocolRole::Admin.id(),
        &ctx.expected_role_admin_members,
    )
    .await?;
    Ok(CheckRun::Done)
}

/// Submits `initialize(address(0))` to the vortex *implementation* and
/// requires the transaction to revert. A successful confirmation means the
/// implementation was deployed with its initialization guard disarmed.
pub async fn check_implementation_initializer_locked(ctx: &VerifyContext<'_>) -> Result<()> {
    let Some(signer) = ctx.signer.as_ref() else {
        return Err(SetupError::MissingConfig(
            "ETH_PRIVATE_KEY must be set for the initializer probe".to_string(),
        )
        .into());
    };

    let proxy_admin = ProxyAdminHandle::new(ctx.provider, ctx.proxy_admin);
    let implementation = proxy_admin.implementation_of(ctx.vortex).await?;
    tracing::info!(implementation = %implementation, "probing initializer on the vortex implementation");

    let nonce = ctx
        .provider
        .get_transaction_count(signer.address())
        .await
        .map_err(|err| RpcError::Call {
            context: "eth_getTransactionCount".to_string(),
            reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
        })?;
    let gas_price = ctx
        .provider
        .get_gas_price()
        .await
        .map_err(|err| RpcError::Call {
            context: "eth_gasPrice".to_string(),
            reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
        })?;

    let mut tx = TransactionRequest::default()
        .with_to(implementation)
        .with_input(VortexHandle::initialize_calldata(Address::ZERO))
        .with_chain_id(ctx.chain_id)
        .with_nonce(nonce)
        .with_gas_limit(REINIT_PROBE_GAS_LIMIT)
        .with_gas_price(gas_price);
    tx.from = Some(signer.address());

    let wallet = EthereumWallet::from(signer.clone());
    let envelope = tx.build(&wallet).await.map_err(|err| RpcError::Call {
        context: "initializer probe signing".to_string(),
        reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
    })?;

    let pending = ctx
        .provider
        .send_raw_transaction(envelope.encoded_2718().as_slice())
        .await
        .map_err(|err| RpcError::Call {
            context: "eth_sendRawTransaction".to_string(),
            reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
        })?;
    let receipt = pending.get_receipt().await.map_err(|err| {
        RpcError::Confirmation {
            context: "initializer probe".to_string(),
            reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
        }
    })?;

    if receipt.status() {
        return Err(CheckError::RevertExpected {
            check: "initializer probe on the vortex implementation".to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{all_passed, CheckOutcome, CheckReport, CHECK_NAMES};
    use crate::error::{CheckError, SentinelError};
    use std::collections::HashSet;

    #[test]
    fn test_check_names_are_unique() {
        let unique: HashSet<&str> = CHECK_NAMES.iter().copied().collect();
        assert_eq!(unique.len(), CHECK_NAMES.len());
    }

    #[test]
    fn test_all_passed_treats_skips_as_non_failures() {
        let reports = vec![
            CheckReport {
                name: "a",
                outcome: CheckOutcome::Passed,
            },
            CheckReport {
                name: "b",
                outcome: CheckOutcome::Skipped("operator filter".to_string()),
            },
        ];
        assert!(all_passed(&reports));
    }

    #[test]
    fn test_all_passed_flags_any_failure() {
        let reports = vec![
            CheckReport {
                name: "a",
                outcome: CheckOutcome::Passed,
            },
            CheckReport {
                name: "b",
                outcome: CheckOutcome::Failed(SentinelError::Check(CheckError::RevertExpected {
                    check: "probe".to_string(),
                })),
            },
        ];
        assert!(!all_passed(&reports));
        assert_eq!(reports[1].outcome.label(), "FAILED");
    }
}
