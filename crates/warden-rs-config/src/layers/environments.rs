//! Per-environment override layers.

use crate::{EnvVars, Environment, Layer};
use serde_json::json;

/// The shipped override layer for `environment`.
pub fn environment_layer(environment: Environment, env: &EnvVars) -> Layer {
    match environment {
        Environment::Development => development(env),
        Environment::Staging => staging(env),
        Environment::Production => production(env),
        Environment::Test => test(env),
    }
}

fn development(env: &EnvVars) -> Layer {
    json!({
        "server": {
            "port": env.integer_or("PORT", 3000),
            "host": env.text_or("HOST", "localhost"),
            "nodeEnv": "development",
            "cors": {
                "origin": [
                    "http://localhost:3000",
                    "http://localhost:3001",
                    "http://127.0.0.1:3000",
                ],
                "credentials": true,
                "methods": ["GET", "POST", "PUT", "DELETE", "OPTIONS"],
                "allowedHeaders": ["Content-Type", "Authorization", "X-Requested-With"],
            },
            "rateLimiting": {
                "windowMs": 15 * 60 * 1000,
                "maxRequests": 1000,
                "skipSuccessfulRequests": true,
                "standardHeaders": true,
            },
        },
        "logging": {
            "level": "debug",
            "format": "combined",
            "transports": [
                { "type": "console", "level": "debug" },
                {
                    "type": "file",
                    "level": "info",
                    "filename": "logs/development.log",
                    "maxFiles": 5,
                    "maxSize": "10m",
                },
            ],
            "audit": {
                "enabled": true,
                "retention": 7,
                "events": ["auth", "api_call", "error"],
                "destinations": ["file"],
            },
        },
        "database": {
            "redis": {
                "host": env.text_or("REDIS_HOST", "localhost"),
                "port": env.integer_or("REDIS_PORT", 6379),
                "db": 0,
                "keyPrefix": "dev:mcp:",
                "retryDelayOnFailover": 100,
                "maxRetriesPerRequest": 3,
                "lazyConnect": true,
            },
        },
        "security": {
            "headers": {
                "hsts": false,
                "noSniff": true,
                "xssProtection": true,
                "frameguard": "deny",
                "contentTypeOptions": true,
            },
            "validation": {
                "maxPayloadSize": "50mb",
                "allowedMimeTypes": ["application/json", "text/plain", "multipart/form-data"],
                "sanitization": true,
                "strictValidation": false,
            },
        },
        "apis": {
            "caching": {
                "defaultTtl": 300,
                "maxItems": 1000,
                "checkPeriod": 600,
                "useClones": false,
            },
        },
        "monitoring": {
            "metrics": {
                "enabled": true,
                "endpoint": "/metrics",
                "interval": 5000,
                "labels": {
                    "environment": "development",
                    "service": "mcp-server",
                },
            },
            "health": {
                "enabled": true,
                "endpoint": "/health",
                "timeout": 5000,
                "checks": ["redis", "auth", "apis"],
            },
        },
    })
}

fn staging(env: &EnvVars) -> Layer {
    json!({
        "server": {
            "port": env.integer_or("PORT", 8080),
            "host": env.text_or("HOST", "0.0.0.0"),
            "nodeEnv": "staging",
            "cors": {
                "origin": env.list_or("ALLOWED_ORIGINS", &["https://staging.your-production-domain.com"]),
                "credentials": true,
                "methods": ["GET", "POST", "PUT", "DELETE", "OPTIONS"],
                "allowedHeaders": ["Content-Type", "Authorization"],
            },
            "rateLimiting": {
                "windowMs": 15 * 60 * 1000,
                "maxRequests": 500,
                "skipSuccessfulRequests": false,
                "standardHeaders": true,
            },
        },
        "logging": {
            "level": "debug",
            "format": "json",
            "transports": [
                { "type": "console", "level": "info" },
                {
                    "type": "rotate",
                    "level": "debug",
                    "filename": "logs/staging-%DATE%.log",
                    "maxFiles": 14,
                    "maxSize": "50m",
                },
            ],
            "audit": {
                "enabled": true,
                "retention": 30,
                "events": ["auth", "api_call", "error", "security"],
                "destinations": ["file"],
            },
        },
        "database": {
            "redis": {
                "host": env.text("REDIS_HOST"),
                "port": env.integer_or("REDIS_PORT", 6379),
                "password": env.text("REDIS_PASSWORD"),
                "db": env.integer_or("REDIS_DB", 1),
                "keyPrefix": "staging:mcp:",
                "retryDelayOnFailover": 300,
                "maxRetriesPerRequest": 5,
                "lazyConnect": false,
            },
        },
        "security": {
            "validation": {
                "maxPayloadSize": "20mb",
                "allowedMimeTypes": ["application/json", "text/plain"],
                "sanitization": true,
                "strictValidation": true,
            },
        },
        "apis": {
            "caching": {
                "defaultTtl": 900,
                "maxItems": 5000,
                "checkPeriod": 900,
                "useClones": true,
            },
        },
        "monitoring": {
            "metrics": {
                "enabled": true,
                "endpoint": "/metrics",
                "interval": 15_000,
                "labels": {
                    "environment": "staging",
                    "service": "mcp-server",
                },
            },
            "health": {
                "enabled": true,
                "endpoint": "/health",
                "timeout": 10_000,
                "checks": ["redis", "auth", "apis", "external-services"],
            },
        },
    })
}

fn production(env: &EnvVars) -> Layer {
    json!({
        "server": {
            "port": env.integer_or("PORT", 8080),
            "host": env.text_or("HOST", "0.0.0.0"),
            "nodeEnv": "production",
            "cors": {
                "origin": env.list_or("ALLOWED_ORIGINS", &["https://your-production-domain.com"]),
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
        },
        "logging": {
            "level": "info",
            "format": "json",
            "transports": [
                { "type": "console", "level": "warn" },
                {
                    "type": "rotate",
                    "level": "info",
                    "filename": "logs/production-%DATE%.log",
                    "maxFiles": 30,
                    "maxSize": "100m",
                },
                {
                    "type": "elasticsearch",
                    "level": "error",
                    "endpoint": env.text("ELASTICSEARCH_URL"),
                },
            ],
            "audit": {
                "enabled": true,
                "retention": 90,
                "events": ["auth", "api_call", "error", "security"],
                "destinations": ["elasticsearch", "file"],
            },
        },
        "database": {
            "redis": {
                "host": env.text("REDIS_HOST"),
                "port": env.integer_or("REDIS_PORT", 6379),
                "password": env.text("REDIS_PASSWORD"),
                "db": env.integer_or("REDIS_DB", 0),
                "keyPrefix": "prod:mcp:",
                "retryDelayOnFailover": 500,
                "maxRetriesPerRequest": 5,
                "lazyConnect": false,
            },
        },
        "security": {
            "headers": {
                "hsts": true,
                "noSniff": true,
                "xssProtection": true,
                "frameguard": "deny",
                "contentTypeOptions": true,
            },
            "validation": {
                "maxPayloadSize": "10mb",
                "allowedMimeTypes": ["application/json"],
                "sanitization": true,
                "strictValidation": true,
            },
            "policies": {
                "maxLoginAttempts": 5,
                "lockoutDuration": 900_000,
                "passwordMinLength": 12,
                "requireMfa": true,
            },
        },
        "apis": {
            "caching": {
                "defaultTtl": 1800,
                "maxItems": 10_000,
                "checkPeriod": 1800,
                "useClones": true,
            },
        },
        "monitoring": {
            "metrics": {
                "enabled": true,
                "endpoint": "/metrics",
                "interval": 30_000,
                "labels": {
                    "environment": "production",
                    "service": "mcp-server",
                    "region": env.text_or("AWS_REGION", "us-east-1"),
                },
            },
            "health": {
                "enabled": true,
                "endpoint": "/health",
                "timeout": 10_000,
                "checks": ["redis", "auth", "apis", "external-services"],
            },
            "alerting": {
                "enabled": true,
                "channels": [
                    {
                        "type": "slack",
                        "endpoint": env.text("SLACK_WEBHOOK_URL"),
                        "severity": "high",
                    },
                    {
                        "type": "email",
                        "endpoint": env.text("ALERT_EMAIL"),
                        "severity": "critical",
                    },
                ],
                "thresholds": {
                    "errorRate": 0.05,
                    "responseTime": 2000,
                    "memoryUsage": 0.85,
                    "cpuUsage": 0.80,
                },
            },
        },
    })
}

fn test(env: &EnvVars) -> Layer {
    json!({
        "server": {
            "port": env.integer_or("PORT", 0),
            "host": "127.0.0.1",
            "nodeEnv": "test",
            "rateLimiting": {
                "windowMs": 60 * 1000,
                "maxRequests": 10_000,
                "skipSuccessfulRequests": true,
                "standardHeaders": false,
            },
        },
        "logging": {
            "level": "error",
            "format": "simple",
            "transports": [
                { "type": "console", "level": "error" },
            ],
            "audit": {
                "enabled": false,
                "retention": 1,
                "events": [],
                "destinations": [],
            },
        },
        "database": {
            "redis": {
                "host": env.text_or("REDIS_HOST", "localhost"),
                "db": 15,
                "keyPrefix": "test:mcp:",
                "lazyConnect": true,
            },
        },
        "apis": {
            "caching": {
                "defaultTtl": 1,
                "maxItems": 100,
                "checkPeriod": 1,
                "useClones": false,
            },
        },
        "monitoring": {
            "metrics": {
                "enabled": false,
                "interval": 60_000,
                "labels": {
                    "environment": "test",
                },
            },
            "health": {
                "checks": [],
            },
        },
    })
}
