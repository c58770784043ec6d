//! Post-deployment verification for the Carbon protocol contracts.
//!
//! Resolves the deployed `ProxyAdmin`, `CarbonController`, and `CarbonVortex`
//! from a manifest, then checks proxy-admin wiring, the version counter, role
//! assignments, the rewards configuration, and the implementation's
//! initialization guard over JSON-RPC. The `deploy-sentinel` binary wraps the
//! suite; exit code reflects aggregate pass/fail.

pub mod access_control;
pub mod contracts;
pub mod deployments;
pub mod error;
pub mod verifier;

pub mod config {
    pub mod chains;
}

pub mod utils {
    pub mod config;
    pub mod error;
    pub mod rpc;
}
