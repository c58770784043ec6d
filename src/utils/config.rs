use crate::error::{Result, SetupError};
use alloy::primitives::Address;
use std::env;
use std::str::FromStr;

/// Runtime configuration for the verification binary, resolved from the
/// environment. Missing or malformed values surface as [`SetupError`] before
/// any network traffic happens.
pub struct Config {
    pub eth_rpc_url: String,
    pub chain_id: u64,
    pub eth_private_key: Option<String>,
    pub deployments_path: String,
    pub expected_role_admin_members: Vec<Address>,
}

/// Operator filter over check names, mirroring allow/deny list semantics of
/// the rest of the tooling: the denylist always wins, an unset allowlist
/// admits everything.
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    allowlist: Option<Vec<String>>,
    denylist: Vec<String>,
}

impl CheckFilter {
    pub fn from_env() -> Self {
        Self::from_lists(
            env::var("CHECK_ALLOWLIST").ok().as_deref(),
            env::var("CHECK_DENYLIST").ok().as_deref(),
        )
    }

    pub fn from_lists(allowlist: Option<&str>, denylist: Option<&str>) -> Self {
        let parse = |raw: &str| -> Vec<String> {
            raw.split(',')
                .map(|item| item.trim().to_ascii_lowercase())
                .filter(|item| !item.is_empty())
                .collect()
        };
        let allowlist = allowlist.map(parse).filter(|names| !names.is_empty());
        let denylist = denylist.map(parse).unwrap_or_default();
        Self {
            allowlist,
            denylist,
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        if self.denylist.iter().any(|denied| denied == &name) {
            return false;
        }
        match &self.allowlist {
            Some(allowed) => allowed.iter().any(|entry| entry == &name),
            None => true,
        }
    }
}

pub fn validate_http_url(name: &str, raw: &str) -> Result<()> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        SetupError::InvalidConfig(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SetupError::InvalidConfig(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))
        .into()),
    }
}

fn parse_expected_members(raw: &str) -> Result<Vec<Address>> {
    let mut members = Vec::new();
    for item in raw.split(',') {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed = Address::from_str(trimmed).map_err(|e| {
            SetupError::InvalidConfig(format!(
                "EXPECTED_ROLE_ADMIN_MEMBERS entry must be an address, got `{trimmed}`: {e}"
            ))
        })?;
        members.push(parsed);
    }
    Ok(members)
}

impl Config {
    pub fn load() -> Result<Self> {
        let eth_rpc_url = env::var("ETH_RPC_URL")
            .map_err(|_| SetupError::MissingConfig("ETH_RPC_URL must be set".to_string()))?;
        validate_http_url("ETH_RPC_URL", &eth_rpc_url)?;

        let chain_id_raw = env::var("CHAIN_ID")
            .map_err(|_| SetupError::MissingConfig("CHAIN_ID must be set".to_string()))?;
        let chain_id = chain_id_raw.parse::<u64>().map_err(|_| {
            SetupError::InvalidConfig(format!("CHAIN_ID must be a valid u64, got `{chain_id_raw}`"))
        })?;

        let deployments_path = env::var("DEPLOYMENTS_PATH")
            .map_err(|_| SetupError::MissingConfig("DEPLOYMENTS_PATH must be set".to_string()))?;

        // The initializer probe is the only check that signs anything; the key
        // stays optional so read-only runs work without one.
        let eth_private_key = env::var("ETH_PRIVATE_KEY").ok();
        if let Some(pk) = eth_private_key.as_deref() {
            let trimmed = pk.trim().trim_start_matches("0x");
            let hexish = !trimmed.is_empty()
                && trimmed.len() % 2 == 0
                && trimmed.as_bytes().iter().all(|b| b.is_ascii_hexdigit());
            if !hexish {
                return Err(SetupError::InvalidConfig(
                    "ETH_PRIVATE_KEY must be hex (optionally 0x-prefixed)".to_string(),
                )
                .into());
            }
        }

        let expected_role_admin_members = match env::var("EXPECTED_ROLE_ADMIN_MEMBERS") {
            Ok(raw) => parse_expected_members(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            eth_rpc_url,
            chain_id,
            eth_private_key,
            deployments_path,
            expected_role_admin_members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_expected_members, validate_http_url, CheckFilter};

    #[test]
    fn test_validate_http_url_accepts_http_and_https_only() {
        assert!(validate_http_url("ETH_RPC_URL", "https://rpc.example.org").is_ok());
        assert!(validate_http_url("ETH_RPC_URL", "http://127.0.0.1:8545").is_ok());
        assert!(validate_http_url("ETH_RPC_URL", "wss://rpc.example.org").is_err());
        assert!(validate_http_url("ETH_RPC_URL", "not a url").is_err());
    }

    #[test]
    fn test_check_filter_denylist_wins() {
        let filter = CheckFilter::from_lists(Some("vortex_version,proxy_admin_wiring"), Some("vortex_version"));
        assert!(filter.allows("proxy_admin_wiring"));
        assert!(!filter.allows("vortex_version"));
        assert!(!filter.allows("vortex_rewards_ppm"));
    }

    #[test]
    fn test_check_filter_unset_allowlist_admits_everything() {
        let filter = CheckFilter::from_lists(None, None);
        assert!(filter.allows("anything"));

        let filter = CheckFilter::from_lists(Some("  ,  "), None);
        assert!(filter.allows("anything"));
    }

    #[test]
    fn test_check_filter_is_case_insensitive() {
        let filter = CheckFilter::from_lists(Some("Vortex_Version"), None);
        assert!(filter.allows("vortex_version"));
        assert!(filter.allows("VORTEX_VERSION"));
    }

    #[test]
    fn test_parse_expected_members_rejects_non_addresses() {
        let parsed =
            parse_expected_members("0x0000000000000000000000000000000000000001, ").unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parse_expected_members("0x01,nonsense").is_err());
    }
}
