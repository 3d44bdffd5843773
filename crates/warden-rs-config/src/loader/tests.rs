//! Tests for startup configuration assembly.

use super::*;
use crate::{CorsOrigin, NODE_ENV};
use pretty_assertions::assert_eq;
use serde_json::json;

const JWT_SECRET: &str = "jwt-secret-0123456789abcdefghijklmnop";
const SESSION_SECRET: &str = "session-secret-0123456789abcdefghijkl";

/// Snapshot with every required variable set.
fn required_env() -> EnvVars {
    EnvVars::from_iter([
        ("DESCOPE_PROJECT_ID", "P2abc"),
        ("DESCOPE_MANAGEMENT_KEY", "K2abc"),
        ("GOOGLE_CLIENT_ID", "google-id"),
        ("GOOGLE_CLIENT_SECRET", "google-secret"),
        ("SLACK_CLIENT_ID", "slack-id"),
        ("SLACK_CLIENT_SECRET", "slack-secret"),
        ("NOTION_CLIENT_ID", "notion-id"),
        ("NOTION_CLIENT_SECRET", "notion-secret"),
        ("REDIS_HOST", "redis.internal"),
        ("JWT_SECRET", JWT_SECRET),
        ("SESSION_SECRET", SESSION_SECRET),
    ])
}

fn production_env() -> EnvVars {
    required_env()
        .with(NODE_ENV, "production")
        .with("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T000/B000/XXX")
        .with("ALERT_EMAIL", "oncall@example.com")
}

fn assemble(options: AssemblerOptions) -> (ConfigAssembler, Result<RuntimeConfig, ConfigError>) {
    let mut assembler = ConfigAssembler::new(options);
    let result = assembler.assemble();
    (assembler, result)
}

fn validation_paths(err: ConfigError) -> Vec<String> {
    match err {
        ConfigError::Validation(errors) => errors
            .into_violations()
            .into_iter()
            .map(|violation| violation.path)
            .collect(),
        other => panic!("expected validation error, got {other}"),
    }
}

/// Assemble development when `NODE_ENV` is unset.
#[test]
fn assembles_development_by_default() {
    let (assembler, result) = assemble(AssemblerOptions::new(required_env()));
    let runtime = result.expect("config");

    assert_eq!(assembler.state(), &AssemblyState::Validated);
    assert!(runtime.is_development());
    assert!(!runtime.is_production());
    assert!(!runtime.is_test());

    let config = runtime.config();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.node_env, Environment::Development);
    assert_eq!(
        config.server.cors.origin.as_list(),
        vec![
            "http://localhost:3000",
            "http://localhost:3001",
            "http://127.0.0.1:3000"
        ]
    );
    assert_eq!(config.database.redis.host, "redis.internal");
    assert_eq!(config.database.redis.key_prefix, "dev:mcp:");
    assert_eq!(config.database.redis.password, None);
    assert_eq!(config.auth.jwt.secret, JWT_SECRET);
    assert!(!config.auth.session.secure);
    assert!(!config.security.headers.hsts);
    assert!(!config.monitoring.alerting.enabled);
    assert_eq!(config.apis.notion.version.as_deref(), Some("2022-06-28"));
}

/// Fail production when alert channel endpoints are unset.
#[test]
fn production_requires_alert_endpoints() {
    let env = required_env().with(NODE_ENV, "production");
    let (assembler, result) = assemble(AssemblerOptions::new(env));
    let err = result.unwrap_err();

    assert!(matches!(assembler.state(), AssemblyState::Failed(_)));
    assert_eq!(
        validation_paths(err),
        vec![
            "monitoring.alerting.channels[0].endpoint",
            "monitoring.alerting.channels[1].endpoint",
        ]
    );
}

/// Apply the production layer over module defaults.
#[test]
fn assembles_production() {
    let (_, result) = assemble(AssemblerOptions::new(production_env()));
    let runtime = result.expect("config");

    assert!(runtime.is_production());
    let config = runtime.config();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(
        config.server.cors.origin,
        CorsOrigin::Many(vec!["https://your-production-domain.com".to_string()])
    );
    assert!(config.auth.session.secure);
    assert!(config.security.headers.hsts);
    assert!(config.security.policies.require_mfa);
    assert_eq!(config.logging.transports.len(), 3);
    assert_eq!(config.logging.transports[2].endpoint, None);
    assert_eq!(config.monitoring.alerting.channels.len(), 2);
    assert_eq!(
        config.monitoring.metrics.labels.get("region").map(String::as_str),
        Some("us-east-1")
    );
}

/// Validate the staging and test layers.
#[test]
fn staging_and_test_layers_validate() {
    for (name, environment) in [("staging", Environment::Staging), ("test", Environment::Test)] {
        let env = required_env().with(NODE_ENV, name);
        let (_, result) = assemble(AssemblerOptions::new(env));
        let runtime = result.expect("config");
        assert_eq!(runtime.environment(), environment);
        assert_eq!(runtime.config().server.node_env, environment);
    }
}

/// List every blank required variable and record the failure.
#[test]
fn missing_variables_fail_before_any_merge() {
    let env = required_env()
        .with("GOOGLE_CLIENT_SECRET", "")
        .with("JWT_SECRET", "")
        .with("NOTION_CLIENT_ID", " ");
    let (assembler, result) = assemble(AssemblerOptions::new(env));
    let err = result.unwrap_err();

    let ConfigError::MissingEnvironmentVariables(missing) = err else {
        panic!("expected missing-variables error");
    };
    assert_eq!(
        missing,
        vec!["GOOGLE_CLIENT_SECRET", "NOTION_CLIENT_ID", "JWT_SECRET"]
    );
    assert_eq!(
        assembler.state(),
        &AssemblyState::Failed(
            "missing required environment variables: GOOGLE_CLIENT_SECRET, NOTION_CLIENT_ID, JWT_SECRET"
                .to_string()
        )
    );
}

/// Refuse a second run on the same assembler.
#[test]
fn assembler_runs_once() {
    let mut assembler = ConfigAssembler::new(AssemblerOptions::new(required_env()));
    assembler.assemble().expect("first run");
    let err = assembler.assemble().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert_eq!(assembler.state(), &AssemblyState::Validated);
}

/// Fall back to development for an unknown environment name.
#[test]
fn unknown_environment_falls_back_to_development() {
    let env = required_env().with(NODE_ENV, "qa");
    let (_, result) = assemble(AssemblerOptions::new(env));
    let runtime = result.expect("config");
    assert!(runtime.is_development());
    assert_eq!(runtime.config().database.redis.key_prefix, "dev:mcp:");
}

/// Prefer an explicit environment and pin it into `server.nodeEnv`.
#[test]
fn explicit_environment_wins_and_is_pinned() {
    let env = required_env().with(NODE_ENV, "production");
    let options = AssemblerOptions::new(env)
        .with_environment(Environment::Test)
        .with_overrides(json!({ "server": { "nodeEnv": "production" } }));
    let (_, result) = assemble(options);
    let runtime = result.expect("config");

    assert!(runtime.is_test());
    assert_eq!(runtime.get("server.nodeEnv"), Some(&json!("test")));
    assert_eq!(runtime.config().database.redis.db, 15);
}

/// Apply caller overrides after the environment layer.
#[test]
fn caller_overrides_apply_last() {
    let options = AssemblerOptions::new(required_env()).with_overrides(json!({
        "server": { "port": 9090, "cors": { "methods": ["GET"] } },
        "database": { "redis": { "password": "hunter2" } },
    }));
    let (_, result) = assemble(options);
    let config = result.expect("config").shared();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.cors.methods, vec!["GET"]);
    assert_eq!(
        config.server.cors.allowed_headers,
        vec!["Content-Type", "Authorization", "X-Requested-With"]
    );
    assert_eq!(config.database.redis.password.as_deref(), Some("hunter2"));
}

/// Reject misspelled override keys.
#[test]
fn override_typos_are_rejected() {
    let options = AssemblerOptions::new(required_env())
        .with_overrides(json!({ "server": { "prot": 9090 } }));
    let (_, result) = assemble(options);
    assert_eq!(validation_paths(result.unwrap_err()), vec!["server.prot"]);
}

/// Report a non-numeric env value at its config path.
#[test]
fn unparseable_env_number_is_reported_at_its_path() {
    let env = required_env().with("PORT", "eighty");
    let (_, result) = assemble(AssemblerOptions::new(env));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("server.port: expected integer"));
}

/// Report all violations from one override at once.
#[test]
fn reports_every_violation_at_once() {
    let options = AssemblerOptions::new(required_env()).with_overrides(json!({
        "server": { "port": -1 },
        "auth": { "session": { "sameSite": "loose" } },
        "logging": { "level": "loud" },
    }));
    let (_, result) = assemble(options);
    assert_eq!(
        validation_paths(result.unwrap_err()),
        vec!["server.port", "auth.session.sameSite", "logging.level"]
    );
}

/// Reject signing secrets shorter than 32 characters.
#[test]
fn short_secrets_are_rejected() {
    let env = required_env()
        .with("JWT_SECRET", "too-short")
        .with("SESSION_SECRET", "also-short");
    let (_, result) = assemble(AssemblerOptions::new(env));
    assert_eq!(
        validation_paths(result.unwrap_err()),
        vec!["auth.jwt.secret", "auth.session.secret"]
    );
}

/// Produce equal snapshots from equal inputs.
#[test]
fn assembly_is_idempotent() {
    let first = RuntimeConfig::load_with_options(AssemblerOptions::new(production_env()))
        .expect("first");
    let second = RuntimeConfig::load_with_options(AssemblerOptions::new(production_env()))
        .expect("second");
    assert_eq!(first, second);
    assert_eq!(first.config(), second.config());
}

/// Use caller-supplied defaults and environment layers.
#[test]
fn custom_layers_and_defaults() {
    let defaults = layers::module_defaults(&required_env(), Environment::Development);
    let custom = EnvironmentLayers::new().with_layer(
        Environment::Development,
        json!({ "server": { "port": 4242 } }),
    );
    let options = AssemblerOptions::new(required_env())
        .with_defaults(defaults)
        .with_layers(custom);
    let (_, result) = assemble(options);
    let config = result.expect("config").shared();
    assert_eq!(config.server.port, 4242);
    assert_eq!(config.database.redis.key_prefix, "mcp:");
}

/// Guard a caller-supplied variable list.
#[test]
fn custom_required_variables() {
    const ONLY: &[&str] = &["WARDEN_LICENSE"];
    let options = AssemblerOptions::new(required_env()).with_required_variables(ONLY);
    let (_, result) = assemble(options);
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required environment variables: WARDEN_LICENSE"
    );
}

/// Values too large for a typed field are violations, reported with the rest.
#[test]
fn oversized_integers_are_reported_with_other_violations() {
    let env = required_env()
        .with("GOOGLE_REQUESTS_PER_HOUR", "5000000000")
        .with("DB_POOL_MAX", "4294967296")
        .with("PORT", "eighty");
    let (_, result) = assemble(AssemblerOptions::new(env));
    assert_eq!(
        validation_paths(result.unwrap_err()),
        vec![
            "server.port",
            "database.connectionPool.max",
            "apis.google.quotaLimits.requestsPerHour",
        ]
    );
}

/// The largest value a `u32` field holds still validates and decodes.
#[test]
fn u32_upper_bound_decodes() {
    let env = required_env().with("GOOGLE_REQUESTS_PER_HOUR", "4294967295");
    let (_, result) = assemble(AssemblerOptions::new(env));
    let config = result.expect("config").shared();
    assert_eq!(config.apis.google.quota_limits.requests_per_hour, u32::MAX);
}

/// `NODE_ENV` must be an exact lowercase name to select a layer.
#[test]
fn differently_cased_node_env_falls_back_to_development() {
    let env = production_env().with(NODE_ENV, "PRODUCTION");
    let (_, result) = assemble(AssemblerOptions::new(env));
    let runtime = result.expect("config");
    assert!(runtime.is_development());
    assert!(!runtime.is_production());
    assert_eq!(runtime.config().server.port, 3000);
}
