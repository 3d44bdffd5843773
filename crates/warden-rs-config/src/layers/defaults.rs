//! Base layer shared by every environment, one function per section.

use crate::{EnvVars, Environment, Layer};
use serde_json::json;

/// Merge base: every section with values that hold unless an environment
/// layer or caller override replaces them.
pub fn module_defaults(env: &EnvVars, environment: Environment) -> Layer {
    json!({
        "server": server(env),
        "auth": auth(env, environment),
        "database": database(env),
        "logging": logging(env),
        "security": security(env),
        "apis": apis(env),
        "monitoring": monitoring(env),
    })
}

fn server(env: &EnvVars) -> Layer {
    json!({
        "port": env.integer_or("PORT", 3000),
        "host": env.text_or("HOST", "localhost"),
        "nodeEnv": "development",
        "cors": {
            "origin": "http://localhost:3000",
            "credentials": true,
            "methods": ["GET", "POST", "PUT", "DELETE"],
            "allowedHeaders": ["Content-Type", "Authorization"],
        },
        "rateLimiting": {
            "windowMs": 15 * 60 * 1000,
            "maxRequests": 100,
            "skipSuccessfulRequests": false,
            "standardHeaders": true,
        },
    })
}

fn oauth_provider(env: &EnvVars, prefix: &str, callback: &str, scopes: &[&str]) -> Layer {
    json!({
        "clientId": env.text(&format!("{prefix}_CLIENT_ID")),
        "clientSecret": env.text(&format!("{prefix}_CLIENT_SECRET")),
        "redirectUri": env.text_or(
            &format!("{prefix}_REDIRECT_URI"),
            &format!("http://localhost:3000/auth/{callback}/callback"),
        ),
        "scopes": scopes,
    })
}

fn auth(env: &EnvVars, environment: Environment) -> Layer {
    json!({
        "descope": {
            "projectId": env.text("DESCOPE_PROJECT_ID"),
            "managementKey": env.text("DESCOPE_MANAGEMENT_KEY"),
            "baseUrl": env.text_or("DESCOPE_BASE_URL", "https://api.descope.com"),
            "timeout": env.integer_or("DESCOPE_TIMEOUT", 10_000),
        },
        "jwt": {
            "secret": env.text("JWT_SECRET"),
            "issuer": env.text_or("JWT_ISSUER", "warden-server"),
            "audience": env.text_or("JWT_AUDIENCE", "mcp-client"),
            "algorithm": env.text_or("JWT_ALGORITHM", "HS256"),
            "expiresIn": env.text_or("JWT_EXPIRES_IN", "1h"),
            "refreshExpiresIn": env.text_or("JWT_REFRESH_EXPIRES_IN", "7d"),
        },
        "oauth": {
            "google": oauth_provider(env, "GOOGLE", "google", &[
                "https://www.googleapis.com/auth/drive.readonly",
                "https://www.googleapis.com/auth/userinfo.profile",
                "https://www.googleapis.com/auth/userinfo.email",
            ]),
            "slack": oauth_provider(env, "SLACK", "slack", &[
                "search:read",
                "channels:read",
                "chat:write",
                "users:read",
                "files:read",
            ]),
            "notion": oauth_provider(env, "NOTION", "notion", &[
                "read_content",
                "read_user_with_email",
            ]),
        },
        "session": {
            "secret": env.text("SESSION_SECRET"),
            "maxAge": env.integer_or("SESSION_MAX_AGE", 3_600_000),
            "secure": environment == Environment::Production,
            "httpOnly": true,
            "sameSite": env.text_or("SESSION_SAME_SITE", "strict"),
        },
    })
}

fn database(env: &EnvVars) -> Layer {
    json!({
        "redis": {
            "host": env.text_or("REDIS_HOST", "localhost"),
            "port": env.integer_or("REDIS_PORT", 6379),
            "password": env.text("REDIS_PASSWORD"),
            "db": env.integer_or("REDIS_DB", 0),
            "keyPrefix": "mcp:",
            "retryDelayOnFailover": 100,
            "maxRetriesPerRequest": 3,
            "lazyConnect": true,
        },
        "connectionPool": {
            "min": env.integer_or("DB_POOL_MIN", 2),
            "max": env.integer_or("DB_POOL_MAX", 10),
            "acquireTimeoutMillis": 30_000,
            "idleTimeoutMillis": 30_000,
        },
    })
}

fn logging(env: &EnvVars) -> Layer {
    json!({
        "level": env.text_or("LOG_LEVEL", "info"),
        "format": env.text_or("LOG_FORMAT", "json"),
        "transports": [
            { "type": "console", "level": "info" },
        ],
        "audit": {
            "enabled": true,
            "retention": 30,
            "events": ["auth", "api_call", "error", "security"],
            "destinations": ["file"],
        },
    })
}

fn security(env: &EnvVars) -> Layer {
    json!({
        "encryption": {
            "algorithm": "aes-256-gcm",
            "keyLength": 32,
            "ivLength": 16,
            "saltLength": 64,
        },
        "headers": {
            "hsts": true,
            "noSniff": true,
            "xssProtection": true,
            "frameguard": "deny",
            "contentTypeOptions": true,
        },
        "validation": {
            "maxPayloadSize": env.text_or("MAX_PAYLOAD_SIZE", "10mb"),
            "allowedMimeTypes": ["application/json"],
            "sanitization": true,
            "strictValidation": true,
        },
        "policies": {
            "maxLoginAttempts": env.integer_or("MAX_LOGIN_ATTEMPTS", 5),
            "lockoutDuration": env.integer_or("LOCKOUT_DURATION", 900_000),
            "passwordMinLength": 12,
            "requireMfa": env.flag("REQUIRE_MFA"),
        },
    })
}

/// Client settings for one upstream API, overridable under `{prefix}_*`.
fn api_client(env: &EnvVars, prefix: &str, base_url: &str, quota: [i64; 3]) -> Layer {
    let var = |suffix: &str| format!("{prefix}_{suffix}");
    json!({
        "baseUrl": base_url,
        "timeout": env.integer_or(&var("API_TIMEOUT"), 30_000),
        "retries": env.integer_or(&var("API_RETRIES"), 3),
        "backoffFactor": env.float_or(&var("API_BACKOFF_FACTOR"), 2.0),
        "quotaLimits": {
            "requestsPerMinute": env.integer_or(&var("REQUESTS_PER_MINUTE"), quota[0]),
            "requestsPerHour": env.integer_or(&var("REQUESTS_PER_HOUR"), quota[1]),
            "burstLimit": env.integer_or(&var("BURST_LIMIT"), quota[2]),
        },
    })
}

fn apis(env: &EnvVars) -> Layer {
    let mut notion = api_client(env, "NOTION", "https://api.notion.com", [3, 1000, 1]);
    if let Some(client) = notion.as_object_mut() {
        client.insert("version".to_string(), json!("2022-06-28"));
    }
    json!({
        "google": api_client(env, "GOOGLE", "https://www.googleapis.com", [100, 10_000, 10]),
        "slack": api_client(env, "SLACK", "https://slack.com/api", [60, 1000, 5]),
        "notion": notion,
        "caching": {
            "defaultTtl": env.integer_or("CACHE_DEFAULT_TTL", 600),
            "maxItems": env.integer_or("CACHE_MAX_ITEMS", 5000),
            "checkPeriod": env.integer_or("CACHE_CHECK_PERIOD", 600),
            "useClones": env.flag("CACHE_USE_CLONES"),
        },
    })
}

fn monitoring(env: &EnvVars) -> Layer {
    json!({
        "metrics": {
            "enabled": true,
            "endpoint": "/metrics",
            "interval": env.integer_or("METRICS_INTERVAL", 15_000),
            "labels": { "service": "mcp-server" },
        },
        "health": {
            "enabled": true,
            "endpoint": "/health",
            "timeout": 5000,
            "checks": ["redis", "auth"],
        },
        "alerting": {
            "enabled": false,
            "channels": [],
            "thresholds": {
                "errorRate": 0.05,
                "responseTime": 2000,
                "memoryUsage": 0.9,
                "cpuUsage": 0.9,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn session_cookie_is_secure_only_in_production() {
        let env = EnvVars::new();
        let dev = module_defaults(&env, Environment::Development);
        let prod = module_defaults(&env, Environment::Production);
        assert_eq!(dev["auth"]["session"]["secure"], json!(false));
        assert_eq!(prod["auth"]["session"]["secure"], json!(true));
    }

    #[test]
    fn api_overrides_read_prefixed_variables() {
        let env = EnvVars::new()
            .with("SLACK_API_RETRIES", "7")
            .with("SLACK_BURST_LIMIT", "9");
        let defaults = module_defaults(&env, Environment::Development);
        let slack = &defaults["apis"]["slack"];
        assert_eq!(slack["retries"], json!(7));
        assert_eq!(slack["quotaLimits"]["burstLimit"], json!(9));
        assert_eq!(defaults["apis"]["notion"]["version"], json!("2022-06-28"));
        assert!(defaults["apis"]["google"].get("version").is_none());
    }

    #[test]
    fn secrets_come_from_the_environment() {
        let env = EnvVars::new().with("GOOGLE_CLIENT_SECRET", "g-secret");
        let defaults = module_defaults(&env, Environment::Development);
        let google = &defaults["auth"]["oauth"]["google"];
        assert_eq!(google["clientSecret"], json!("g-secret"));
        assert_eq!(google["clientId"], serde_json::Value::Null);
        assert_eq!(
            google["redirectUri"],
            json!("http://localhost:3000/auth/google/callback")
        );
    }
}
