//! Schema for the full application configuration tree.

use super::{
    Field, FieldKind, Schema, alternatives, array_of, boolean, hostname, integer_range,
    non_negative_u32, object, one_of_strings, port, positive_integer, positive_number,
    positive_u32, ratio, string, string_map, string_min, uri,
};
use std::sync::LazyLock;

const ENVIRONMENTS: &[&str] = &["development", "staging", "production", "test"];
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "http", "verbose", "debug", "silly"];
const LOG_FORMATS: &[&str] = &["json", "combined", "simple", "pretty"];
const TRANSPORT_TYPES: &[&str] = &["console", "file", "rotate", "elasticsearch"];
const JWT_ALGORITHMS: &[&str] = &["HS256", "RS256", "ES256"];
const SAME_SITE: &[&str] = &["strict", "lax", "none"];
const FRAMEGUARD: &[&str] = &["deny", "sameorigin"];
const ALERT_CHANNELS: &[&str] = &["slack", "email", "webhook"];
const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

/// Secrets shorter than this are rejected.
const MIN_SECRET_LEN: usize = 32;

static APP_SCHEMA: LazyLock<Schema> = LazyLock::new(build_app_schema);

/// Process-wide schema, built on first use.
pub fn app_schema() -> &'static Schema {
    &APP_SCHEMA
}

fn build_app_schema() -> Schema {
    Schema::new(vec![
        Field::required("server", server()),
        Field::required("auth", auth()),
        Field::required("database", database()),
        Field::required("logging", logging()),
        Field::required("security", security()),
        Field::required("apis", apis()),
        Field::required("monitoring", monitoring()),
    ])
}

fn server() -> FieldKind {
    object(vec![
        Field::required("port", port()),
        Field::required("host", hostname()),
        Field::required("nodeEnv", one_of_strings(ENVIRONMENTS)),
        Field::required(
            "cors",
            object(vec![
                Field::required("origin", alternatives(vec![uri(), array_of(uri())])),
                Field::required("credentials", boolean()),
                Field::required("methods", array_of(string())),
                Field::required("allowedHeaders", array_of(string())),
            ]),
        ),
        Field::required(
            "rateLimiting",
            object(vec![
                Field::required("windowMs", positive_integer()),
                Field::required("maxRequests", positive_integer()),
                Field::required("skipSuccessfulRequests", boolean()),
                Field::required("standardHeaders", boolean()),
            ]),
        ),
    ])
}

fn oauth_provider() -> FieldKind {
    object(vec![
        Field::required("clientId", string()),
        Field::required("clientSecret", string()),
        Field::required("redirectUri", uri()),
        Field::required("scopes", array_of(string())),
    ])
}

fn auth() -> FieldKind {
    object(vec![
        Field::required(
            "descope",
            object(vec![
                Field::required("projectId", string()),
                Field::required("managementKey", string()),
                Field::required("baseUrl", uri()),
                Field::required("timeout", positive_integer()),
            ]),
        ),
        Field::required(
            "jwt",
            object(vec![
                Field::required("secret", string_min(MIN_SECRET_LEN)),
                Field::required("issuer", string()),
                Field::required("audience", string()),
                Field::required("algorithm", one_of_strings(JWT_ALGORITHMS)),
                Field::required("expiresIn", string()),
                Field::required("refreshExpiresIn", string()),
            ]),
        ),
        Field::required(
            "oauth",
            object(vec![
                Field::required("google", oauth_provider()),
                Field::required("slack", oauth_provider()),
                Field::required("notion", oauth_provider()),
            ]),
        ),
        Field::required(
            "session",
            object(vec![
                Field::required("secret", string_min(MIN_SECRET_LEN)),
                Field::required("maxAge", positive_integer()),
                Field::required("secure", boolean()),
                Field::required("httpOnly", boolean()),
                Field::required("sameSite", one_of_strings(SAME_SITE)),
            ]),
        ),
    ])
}

fn database() -> FieldKind {
    object(vec![
        Field::required(
            "redis",
            object(vec![
                Field::required("host", hostname()),
                Field::required("port", port()),
                Field::optional("password", string()),
                Field::required("db", integer_range(0, 15)),
                Field::required("keyPrefix", string()),
                Field::required("retryDelayOnFailover", positive_integer()),
                Field::required("maxRetriesPerRequest", positive_u32()),
                Field::required("lazyConnect", boolean()),
            ]),
        ),
        Field::required(
            "connectionPool",
            object(vec![
                Field::required("min", non_negative_u32()),
                Field::required("max", positive_u32()),
                Field::required("acquireTimeoutMillis", positive_integer()),
                Field::required("idleTimeoutMillis", positive_integer()),
            ]),
        ),
    ])
}

fn logging() -> FieldKind {
    object(vec![
        Field::required("level", one_of_strings(LOG_LEVELS)),
        Field::required("format", one_of_strings(LOG_FORMATS)),
        Field::required(
            "transports",
            array_of(object(vec![
                Field::required("type", one_of_strings(TRANSPORT_TYPES)),
                Field::optional("level", one_of_strings(LOG_LEVELS)),
                Field::optional("filename", string()),
                Field::optional("maxFiles", positive_u32()),
                Field::optional("maxSize", string()),
                Field::optional("endpoint", uri()),
            ])),
        ),
        Field::required(
            "audit",
            object(vec![
                Field::required("enabled", boolean()),
                Field::required("retention", positive_u32()),
                Field::required("events", array_of(string())),
                Field::required("destinations", array_of(string())),
            ]),
        ),
    ])
}

fn security() -> FieldKind {
    object(vec![
        Field::required(
            "encryption",
            object(vec![
                Field::required("algorithm", string()),
                Field::required("keyLength", positive_u32()),
                Field::required("ivLength", positive_u32()),
                Field::required("saltLength", positive_u32()),
            ]),
        ),
        Field::required(
            "headers",
            object(vec![
                Field::required("hsts", boolean()),
                Field::required("noSniff", boolean()),
                Field::required("xssProtection", boolean()),
                Field::required("frameguard", one_of_strings(FRAMEGUARD)),
                Field::required("contentTypeOptions", boolean()),
            ]),
        ),
        Field::required(
            "validation",
            object(vec![
                Field::required("maxPayloadSize", string()),
                Field::required("allowedMimeTypes", array_of(string())),
                Field::required("sanitization", boolean()),
                Field::required("strictValidation", boolean()),
            ]),
        ),
        Field::required(
            "policies",
            object(vec![
                Field::required("maxLoginAttempts", positive_u32()),
                Field::required("lockoutDuration", positive_integer()),
                Field::required("passwordMinLength", positive_u32()),
                Field::required("requireMfa", boolean()),
            ]),
        ),
    ])
}

fn quota_limits() -> FieldKind {
    object(vec![
        Field::required("requestsPerMinute", positive_u32()),
        Field::required("requestsPerHour", positive_u32()),
        Field::required("burstLimit", positive_u32()),
    ])
}

/// Upstream API client settings; notion additionally pins an API version.
fn api_client(with_version: bool) -> FieldKind {
    let mut fields = vec![Field::required("baseUrl", uri())];
    if with_version {
        fields.push(Field::required("version", string()));
    }
    fields.extend([
        Field::required("timeout", positive_integer()),
        Field::required("retries", non_negative_u32()),
        Field::required("backoffFactor", positive_number()),
        Field::required("quotaLimits", quota_limits()),
    ]);
    object(fields)
}

fn apis() -> FieldKind {
    object(vec![
        Field::required("google", api_client(false)),
        Field::required("slack", api_client(false)),
        Field::required("notion", api_client(true)),
        Field::required(
            "caching",
            object(vec![
                Field::required("defaultTtl", positive_integer()),
                Field::required("maxItems", positive_integer()),
                Field::required("checkPeriod", positive_integer()),
                Field::required("useClones", boolean()),
            ]),
        ),
    ])
}

fn monitoring() -> FieldKind {
    object(vec![
        Field::required(
            "metrics",
            object(vec![
                Field::required("enabled", boolean()),
                Field::required("endpoint", string()),
                Field::required("interval", positive_integer()),
                Field::required("labels", string_map()),
            ]),
        ),
        Field::required(
            "health",
            object(vec![
                Field::required("enabled", boolean()),
                Field::required("endpoint", string()),
                Field::required("timeout", positive_integer()),
                Field::required("checks", array_of(string())),
            ]),
        ),
        Field::required(
            "alerting",
            object(vec![
                Field::required("enabled", boolean()),
                Field::required(
                    "channels",
                    array_of(object(vec![
                        Field::required("type", one_of_strings(ALERT_CHANNELS)),
                        Field::required("endpoint", string()),
                        Field::required("severity", one_of_strings(SEVERITIES)),
                    ])),
                ),
                Field::required(
                    "thresholds",
                    object(vec![
                        Field::required("errorRate", ratio()),
                        Field::required("responseTime", positive_integer()),
                        Field::required("memoryUsage", ratio()),
                        Field::required("cpuUsage", ratio()),
                    ]),
                ),
            ]),
        ),
    ])
}
