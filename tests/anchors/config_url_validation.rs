//! Anchor Test: config validates URL shape/scheme before any call goes out.

use std::fs;

#[test]
fn test_config_load_validates_rpc_url_and_lifts_into_setup_errors() {
    let src = fs::read_to_string("src/utils/config.rs")
        .expect("src/utils/config.rs must be readable from workspace root");

    assert!(src.contains("fn validate_http_url("));
    assert!(src.contains("validate_http_url(\"ETH_RPC_URL\""));

    // Missing/invalid values are typed setup errors, not ad-hoc anyhow.
    assert!(src.contains("SetupError::MissingConfig"));
    assert!(src.contains("SetupError::InvalidConfig"));
    assert!(!src.contains("anyhow::"));
}
