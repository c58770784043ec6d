//! `deploy-sentinel`: runs the post-deployment verification suite against a
//! configured network and exits nonzero when any check fails.

use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use anyhow::Context;
use deploy_sentinel::config::chains::ChainConfig;
use deploy_sentinel::deployments::{
    DeploymentManifest, CARBON_CONTROLLER, CARBON_VORTEX, PROXY_ADMIN,
};
use deploy_sentinel::utils::config::{CheckFilter, Config};
use deploy_sentinel::utils::rpc::connect_http;
use deploy_sentinel::verifier::{all_passed, run_deployment_checks, CheckOutcome, VerifyContext};
use std::path::Path;
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match std::env::var("RUST_LOG") {
        Ok(val) => println!("[STARTUP] RUST_LOG is set to: '{}'", val),
        Err(_) => println!("[STARTUP] RUST_LOG is unset."),
    }

    // Default to `info` when `RUST_LOG` is unset or invalid to avoid silent startup.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        println!("[STARTUP] RUST_LOG invalid or unset; defaulting to 'info'");
        tracing_subscriber::EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr) // Logs to stderr; the summary goes to stdout.
        .init();

    let config = Config::load().context("configuration")?;
    let chain = ChainConfig::get(config.chain_id);
    tracing::info!(
        chain = %chain.name,
        chain_id = config.chain_id,
        block_time_ms = chain.block_time_ms,
        "verifying deployment"
    );
    if !ChainConfig::is_known(config.chain_id) {
        tracing::warn!(chain_id = config.chain_id, "chain is not in the static registry");
    }

    let provider = connect_http(&config.eth_rpc_url)?;

    // Probe the endpoint early so connectivity and chain mismatches are
    // visible before the first check runs.
    let block_number = provider
        .get_block_number()
        .await
        .context("RPC connectivity probe")?;
    let reported_chain_id = provider.get_chain_id().await.context("eth_chainId probe")?;
    tracing::info!(block_number, "RPC endpoint is reachable");
    if reported_chain_id != config.chain_id {
        anyhow::bail!(
            "CHAIN_ID is {} but the endpoint reports chain {}",
            config.chain_id,
            reported_chain_id
        );
    }

    let manifest = DeploymentManifest::load(Path::new(&config.deployments_path))?;
    if manifest.chain_id != config.chain_id {
        anyhow::bail!(
            "deployment manifest is for chain {} but CHAIN_ID is {}",
            manifest.chain_id,
            config.chain_id
        );
    }

    let signer = match config.eth_private_key.as_deref() {
        Some(raw) => {
            let clean = raw.trim().trim_start_matches("0x");
            Some(PrivateKeySigner::from_str(clean).context("ETH_PRIVATE_KEY")?)
        }
        None => None,
    };

    let ctx = VerifyContext {
        provider: &provider,
        chain_id: config.chain_id,
        proxy_admin: manifest.address_of(PROXY_ADMIN)?,
        controller: manifest.address_of(CARBON_CONTROLLER)?,
        vortex: manifest.address_of(CARBON_VORTEX)?,
        signer,
        expected_role_admin_members: config.expected_role_admin_members,
    };

    let filter = CheckFilter::from_env();
    let reports = run_deployment_checks(&ctx, &filter).await;

    println!();
    for report in &reports {
        match &report.outcome {
            CheckOutcome::Passed => println!("{:>7}  {}", report.outcome.label(), report.name),
            CheckOutcome::Skipped(reason) => {
                println!("{:>7}  {}: {}", report.outcome.label(), report.name, reason)
            }
            CheckOutcome::Failed(err) => {
                println!("{:>7}  {}: {}", report.outcome.label(), report.name, err)
            }
        }
    }

    if all_passed(&reports) {
        tracing::info!("deployment verification passed");
        Ok(())
    } else {
        tracing::error!("deployment verification failed");
        std::process::exit(1);
    }
}
