/// Static metadata for the networks the protocol is deployed to. Used for
/// operator-facing logging and to sanity-check the manifest against the
/// configured chain, not for address resolution.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub block_time_ms: u64,
}

impl ChainConfig {
    pub fn get(chain_id: u64) -> Self {
        match chain_id {
            1 => Self::mainnet(),
            11155111 => Self::sepolia(),
            8453 => Self::base(),
            42161 => Self::arbitrum(),
            _ => Self {
                chain_id,
                name: format!("chain-{chain_id}"),
                block_time_ms: 12_000,
            },
        }
    }

    pub fn is_known(chain_id: u64) -> bool {
        matches!(chain_id, 1 | 11155111 | 8453 | 42161)
    }

    pub fn mainnet() -> Self {
        Self {
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            block_time_ms: 12_000,
        }
    }

    pub fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            name: "Sepolia".to_string(),
            block_time_ms: 12_000,
        }
    }

    pub fn base() -> Self {
        Self {
            chain_id: 8453,
            name: "Base".to_string(),
            block_time_ms: 2_000,
        }
    }

    pub fn arbitrum() -> Self {
        Self {
            chain_id: 42161,
            name: "Arbitrum One".to_string(),
            block_time_ms: 250,
        }
    }
}
