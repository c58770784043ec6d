use crate::error::{Result, RpcError};
use crate::utils::error::compact_error_message;
use alloy::primitives::Address;
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use alloy::transports::http::Http;
use reqwest::Client;

pub type HttpProvider = RootProvider<Http<Client>>;

pub const RPC_ERR_MAX_LEN: usize = 260;

/// Builds the HTTP provider used for every call the verifier issues.
///
/// Calls go out one at a time and rely on the client's own defaults; there is
/// no retry or cooldown layer here.
pub fn connect_http(raw_url: &str) -> Result<HttpProvider> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err(RpcError::InvalidUrl {
            url: raw_url.to_string(),
            reason: "empty URL".to_string(),
        }
        .into());
    }
    let parsed = trimmed.parse::<reqwest::Url>().map_err(|err| RpcError::InvalidUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    Ok(RootProvider::new_http(parsed))
}

/// Issues a read-only `eth_call` for a typed `sol!` call and decodes the
/// return value. `context` names the call site for error reports.
pub async fn read_call<C: SolCall>(
    provider: &HttpProvider,
    to: Address,
    call: C,
    context: &str,
) -> Result<C::Return> {
    let req = TransactionRequest::default()
        .to(to)
        .input(alloy::rpc::types::TransactionInput::new(
            call.abi_encode().into(),
        ));
    let raw = provider.call(&req).await.map_err(|err| RpcError::Call {
        context: context.to_string(),
        reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
    })?;
    C::abi_decode_returns(raw.as_ref(), true).map_err(|err| {
        RpcError::Decode {
            context: context.to_string(),
            reason: compact_error_message(&err.to_string(), RPC_ERR_MAX_LEN),
        }
        .into()
    })
}
