//! Generation settings read from the process environment.

use crate::test_helpers::GenerationEnvGuard;
use keystone::config::EngineConfig;
use keystone::report::services::ReportContentGenerator;
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn placeholder_key_from_environment_selects_fallback() {
    let _guard = GenerationEnvGuard::with(&[(
        "KEYSTONE_GENERATION_API_KEY",
        "your_openai_api_key_here",
    )]);

    let config = EngineConfig::from_env().expect("valid environment");

    assert!(!config.generation.is_configured());
    assert!(!ReportContentGenerator::from_config(&config.generation).uses_external_service());
}

#[rstest]
fn environment_overrides_generation_settings() {
    let _guard = GenerationEnvGuard::with(&[
        ("KEYSTONE_GENERATION_API_KEY", "sk-integration"),
        ("KEYSTONE_GENERATION_MODEL", "gpt-4o-mini"),
        ("KEYSTONE_GENERATION_TIMEOUT_MS", "2500"),
    ]);

    let config = EngineConfig::from_env().expect("valid environment");

    assert_eq!(config.generation.usable_api_key(), Some("sk-integration"));
    assert_eq!(config.generation.model, "gpt-4o-mini");
    assert_eq!(config.generation.timeout(), Duration::from_millis(2500));
    assert!(ReportContentGenerator::from_config(&config.generation).uses_external_service());
}

#[rstest]
fn malformed_temperature_is_rejected() {
    let _guard = GenerationEnvGuard::with(&[("KEYSTONE_GENERATION_TEMPERATURE", "warm")]);

    let result = EngineConfig::from_env();

    assert!(result.is_err());
}
