use thiserror::Error;

pub type Result<T> = std::result::Result<T, SentinelError>;

#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("network error: {0}")]
    Net(#[from] RpcError),
    #[error("check failed: {0}")]
    Check(#[from] CheckError),
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("call `{context}` failed: {reason}")]
    Call { context: String, reason: String },
    #[error("decoding `{context}` return data failed: {reason}")]
    Decode { context: String, reason: String },
    #[error("confirmation of `{context}` failed: {reason}")]
    Confirmation { context: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{check}: expected {expected}, got {actual}")]
    Mismatch {
        check: String,
        expected: String,
        actual: String,
    },
    #[error("role {role}: member count mismatch: expected {expected}, got {actual}")]
    MemberCount {
        role: String,
        expected: usize,
        actual: usize,
    },
    #[error("role {role}: membership mismatch: missing [{missing}], unexpected [{unexpected}]")]
    MemberSet {
        role: String,
        missing: String,
        unexpected: String,
    },
    #[error("{check}: transaction succeeded where a revert was expected")]
    RevertExpected { check: String },
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("missing required configuration: {0}")]
    MissingConfig(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no deployment recorded for `{name}` on chain {chain_id}")]
    UnknownDeployment { name: String, chain_id: u64 },
}

pub type NetError = RpcError;
pub type AssertionError = CheckError;
