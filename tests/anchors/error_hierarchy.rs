//! Anchor Test: the failure taxonomy stays structured; network failures,
//! check failures, and setup failures are distinct typed branches.

use std::fs;

#[test]
fn test_sentinel_error_hierarchy_is_structured_and_wired() {
    let error_source = fs::read_to_string("src/error.rs").expect("src/error.rs must be readable");
    let config_source =
        fs::read_to_string("src/utils/config.rs").expect("src/utils/config.rs must be readable");

    for needle in [
        "pub enum SentinelError",
        "Net(#[from] RpcError)",
        "Check(#[from] CheckError)",
        "Setup(#[from] SetupError)",
        "pub enum RpcError",
        "pub enum CheckError",
        "pub enum SetupError",
    ] {
        assert!(
            error_source.contains(needle),
            "error hierarchy must contain `{needle}`"
        );
    }

    assert!(
        config_source.contains("SetupError::MissingConfig"),
        "config loader must lift missing env vars into SetupError"
    );
    assert!(
        !config_source.contains("anyhow::"),
        "config loader should avoid ad-hoc anyhow usage"
    );
}
