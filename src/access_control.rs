//! Role-membership assertions over `AccessControlEnumerable` contracts.
//!
//! Membership is enumerated through the paginated on-chain accessors and
//! compared order-independently. The [`RoleView`] / [`RoleRegistry`] seams
//! exist so the assertions can run against a stub in tests.

use crate::contracts::IAccessControlEnumerable;
use crate::error::{CheckError, Result};
use crate::utils::rpc::{read_call, HttpProvider};
use alloy::primitives::{keccak256, Address, B256, U256};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// OpenZeppelin's default admin role: the zero hash.
pub const DEFAULT_ADMIN_ROLE: B256 = B256::ZERO;

/// The protocol's access-control roles. The identifier of each role is the
/// keccak hash of its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolRole {
    Admin,
    FeesManager,
    EmergencyStopper,
    Minter,
}

impl ProtocolRole {
    pub const ALL: [ProtocolRole; 4] = [
        ProtocolRole::Admin,
        ProtocolRole::FeesManager,
        ProtocolRole::EmergencyStopper,
        ProtocolRole::Minter,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProtocolRole::Admin => "ROLE_ADMIN",
            ProtocolRole::FeesManager => "ROLE_FEES_MANAGER",
            ProtocolRole::EmergencyStopper => "ROLE_EMERGENCY_STOPPER",
            ProtocolRole::Minter => "ROLE_MINTER",
        }
    }

    pub fn id(self) -> B256 {
        keccak256(self.label().as_bytes())
    }
}

impl std::fmt::Display for ProtocolRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Read access to one contract's role bookkeeping.
#[async_trait]
pub trait RoleView: Send + Sync {
    fn contract_label(&self) -> &str;
    async fn role_admin(&self, role_id: B256) -> Result<B256>;
    async fn role_member_count(&self, role_id: B256) -> Result<u64>;
    async fn role_member(&self, role_id: B256, index: u64) -> Result<Address>;
}

/// The role-id accessors one contract declares, as an explicit static
/// mapping. Each implementation dispatches a concrete accessor call per
/// role; nothing is derived from role names at runtime.
#[async_trait]
pub trait RoleRegistry: Send + Sync {
    fn declared_roles(&self) -> &'static [ProtocolRole];
    async fn declared_role_id(&self, role: ProtocolRole) -> Result<B256>;
}

/// [`RoleView`] over a deployed `AccessControlEnumerable` contract.
pub struct AccessControlHandle<'a> {
    provider: &'a HttpProvider,
    pub address: Address,
    label: &'static str,
}

impl<'a> AccessControlHandle<'a> {
    pub fn new(provider: &'a HttpProvider, address: Address, label: &'static str) -> Self {
        Self {
            provider,
            address,
            label,
        }
    }
}

#[async_trait]
impl RoleView for AccessControlHandle<'_> {
    fn contract_label(&self) -> &str {
        self.label
    }

    async fn role_admin(&self, role_id: B256) -> Result<B256> {
        let ret = read_call(
            self.provider,
            self.address,
            IAccessControlEnumerable::getRoleAdminCall { role: role_id },
            "getRoleAdmin",
        )
        .await?;
        Ok(ret._0)
    }

    async fn role_member_count(&self, role_id: B256) -> Result<u64> {
        let ret = read_call(
            self.provider,
            self.address,
            IAccessControlEnumerable::getRoleMemberCountCall { role: role_id },
            "getRoleMemberCount",
        )
        .await?;
        Ok(u64::try_from(ret._0).unwrap_or(u64::MAX))
    }

    async fn role_member(&self, role_id: B256, index: u64) -> Result<Address> {
        let ret = read_call(
            self.provider,
            self.address,
            IAccessControlEnumerable::getRoleMemberCall {
                role: role_id,
                index: U256::from(index),
            },
            "getRoleMember",
        )
        .await?;
        Ok(ret._0)
    }
}

/// Reads the full member list of a role by sequential index.
pub async fn enumerate_role_members<V: RoleView + ?Sized>(
    view: &V,
    role_id: B256,
) -> Result<Vec<Address>> {
    let count = view.role_member_count(role_id).await?;
    let mut members = Vec::new();
    for index in 0..count {
        members.push(view.role_member(role_id, index).await?);
    }
    Ok(members)
}

/// Multiset difference between the expected and actual member lists:
/// `(missing, unexpected)`. Both outputs are empty iff the lists are equal
/// as multisets, regardless of ordering.
pub fn multiset_diff(expected: &[Address], actual: &[Address]) -> (Vec<Address>, Vec<Address>) {
    let mut counts: BTreeMap<Address, i64> = BTreeMap::new();
    for addr in expected {
        *counts.entry(*addr).or_default() += 1;
    }
    for addr in actual {
        *counts.entry(*addr).or_default() -= 1;
    }
    let mut missing = Vec::new();
    let mut unexpected = Vec::new();
    for (addr, surplus) in counts {
        for _ in 0..surplus.max(0) {
            missing.push(addr);
        }
        for _ in 0..(-surplus).max(0) {
            unexpected.push(addr);
        }
    }
    (missing, unexpected)
}

/// How many times `target` occurs in `members`.
pub fn occurrences(members: &[Address], target: Address) -> usize {
    members.iter().filter(|member| **member == target).count()
}

fn fmt_addresses(list: &[Address]) -> String {
    list.iter()
        .map(|addr| addr.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn role_context<V: RoleView + ?Sized>(view: &V, role: ProtocolRole) -> String {
    format!("{}::{}", view.contract_label(), role.label())
}

/// Asserts that the role's current member set equals `expected`,
/// order-independently. The size check runs first; a same-size content
/// difference is reported as a set-membership mismatch naming the
/// differing members.
pub async fn expect_role_members<V: RoleView + ?Sized>(
    view: &V,
    role: ProtocolRole,
    expected: &[Address],
) -> Result<()> {
    let actual = enumerate_role_members(view, role.id()).await?;
    if actual.len() != expected.len() {
        return Err(CheckError::MemberCount {
            role: role_context(view, role),
            expected: expected.len(),
            actual: actual.len(),
        }
        .into());
    }
    let (missing, unexpected) = multiset_diff(expected, &actual);
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(CheckError::MemberSet {
            role: role_context(view, role),
            missing: fmt_addresses(&missing),
            unexpected: fmt_addresses(&unexpected),
        }
        .into());
    }
    tracing::debug!(role = role.label(), members = actual.len(), "role membership matches");
    Ok(())
}

/// Asserts the role's recorded admin-role identifier, then delegates to
/// [`expect_role_members`].
pub async fn expect_role<V: RoleView + ?Sized>(
    view: &V,
    role: ProtocolRole,
    admin_role: B256,
    expected_members: &[Address],
) -> Result<()> {
    let actual_admin = view.role_admin(role.id()).await?;
    if actual_admin != admin_role {
        return Err(CheckError::Mismatch {
            check: format!("{} admin role", role_context(view, role)),
            expected: admin_role.to_string(),
            actual: actual_admin.to_string(),
        }
        .into());
    }
    expect_role_members(view, role, expected_members).await
}

/// Asserts that every role-id accessor the contract declares returns the
/// identifier derived from the canonical role name.
pub async fn expect_roles<R: RoleRegistry + ?Sized>(registry: &R) -> Result<()> {
    for role in registry.declared_roles() {
        let actual = registry.declared_role_id(*role).await?;
        let expected = role.id();
        if actual != expected {
            return Err(CheckError::Mismatch {
                check: format!("{} accessor", role.label()),
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{multiset_diff, occurrences, ProtocolRole, DEFAULT_ADMIN_ROLE};
    use alloy::primitives::{Address, B256};
    use std::collections::HashSet;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_role_ids_are_distinct_and_nonzero() {
        let ids: HashSet<B256> = ProtocolRole::ALL.iter().map(|role| role.id()).collect();
        assert_eq!(ids.len(), ProtocolRole::ALL.len());
        assert!(!ids.contains(&DEFAULT_ADMIN_ROLE));
    }

    #[test]
    fn test_multiset_diff_ignores_ordering() {
        let expected = [addr(1), addr(2)];
        let actual = [addr(2), addr(1)];
        let (missing, unexpected) = multiset_diff(&expected, &actual);
        assert!(missing.is_empty());
        assert!(unexpected.is_empty());
    }

    #[test]
    fn test_multiset_diff_reports_both_directions() {
        let expected = [addr(1), addr(3)];
        let actual = [addr(1), addr(2)];
        let (missing, unexpected) = multiset_diff(&expected, &actual);
        assert_eq!(missing, vec![addr(3)]);
        assert_eq!(unexpected, vec![addr(2)]);
    }

    #[test]
    fn test_multiset_diff_counts_duplicates() {
        let expected = [addr(1)];
        let actual = [addr(1), addr(1)];
        let (missing, unexpected) = multiset_diff(&expected, &actual);
        assert!(missing.is_empty());
        assert_eq!(unexpected, vec![addr(1)]);
    }

    #[test]
    fn test_occurrences() {
        let members = [addr(1), addr(2), addr(1)];
        assert_eq!(occurrences(&members, addr(1)), 2);
        assert_eq!(occurrences(&members, addr(3)), 0);
    }
}
