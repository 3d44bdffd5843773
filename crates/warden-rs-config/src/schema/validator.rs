//! Depth-first schema validation that collects every violation.

use super::{Field, FieldKind, Schema, StringFormat, StringRule};
use crate::{ValidationErrors, Violation};
use log::debug;
use serde_json::{Map, Value};
use std::net::IpAddr;

/// Validate a tree against a schema.
///
/// Walks declared fields in order, then flags undeclared keys. Never stops at
/// the first problem. On success the tree is returned unchanged.
pub fn validate(tree: &Value, schema: &Schema) -> Result<Value, ValidationErrors> {
    let mut violations = Vec::new();
    check_object(tree, schema.fields(), "", &mut violations);
    match ValidationErrors::from_violations(violations) {
        None => Ok(tree.clone()),
        Some(errors) => {
            debug!("schema validation failed (violations={})", errors.len());
            Err(errors)
        }
    }
}

/// Check an object: declared fields first, then unknown keys.
fn check_object(value: &Value, fields: &[Field], path: &str, out: &mut Vec<Violation>) {
    let Some(map) = expect_object(value, path, out) else {
        return;
    };

    for field in fields {
        let field_path = join_path(path, field.name);
        match map.get(field.name) {
            // A null leaf stands for "not provided".
            None | Some(Value::Null) => {
                if field.required {
                    out.push(violation(&field_path, "missing required field"));
                }
            }
            Some(value) => check_kind(value, &field.kind, &field_path, out),
        }
    }

    ensure_allowed_keys(map, fields, path, out);
}

fn check_kind(value: &Value, kind: &FieldKind, path: &str, out: &mut Vec<Violation>) {
    match kind {
        FieldKind::String(rule) => check_string(value, rule, path, out),
        FieldKind::Integer { min, max } => check_integer(value, *min, *max, path, out),
        FieldKind::Number { min, max, positive } => {
            check_number(value, *min, *max, *positive, path, out)
        }
        FieldKind::Bool => {
            if !value.is_boolean() {
                out.push(violation(path, "expected bool"));
            }
        }
        FieldKind::Array(item) => {
            let Value::Array(items) = value else {
                out.push(violation(path, "expected array"));
                return;
            };
            for (idx, entry) in items.iter().enumerate() {
                check_kind(entry, item, &format!("{path}[{idx}]"), out);
            }
        }
        FieldKind::Object(fields) => check_object(value, fields, path, out),
        FieldKind::StringMap => {
            let Some(map) = expect_object(value, path, out) else {
                return;
            };
            for (key, entry) in map {
                if !entry.is_string() {
                    out.push(violation(&join_path(path, key), "expected string"));
                }
            }
        }
        FieldKind::OneOf(kinds) => check_alternatives(value, kinds, path, out),
    }
}

/// Accept the first matching alternative. Otherwise report the violations of
/// the first alternative whose JSON type fits, or a summary when none does.
fn check_alternatives(value: &Value, kinds: &[FieldKind], path: &str, out: &mut Vec<Violation>) {
    let mut closest: Option<Vec<Violation>> = None;
    for kind in kinds {
        let mut scratch = Vec::new();
        check_kind(value, kind, path, &mut scratch);
        if scratch.is_empty() {
            return;
        }
        if closest.is_none() && same_shape(value, kind) {
            closest = Some(scratch);
        }
    }
    match closest {
        Some(violations) => out.extend(violations),
        None => {
            let expected = kinds
                .iter()
                .map(FieldKind::describe)
                .collect::<Vec<_>>()
                .join(" or ");
            out.push(violation(path, &format!("expected {expected}")));
        }
    }
}

/// Whether the value's JSON type is the one `kind` expects.
fn same_shape(value: &Value, kind: &FieldKind) -> bool {
    match kind {
        FieldKind::String(_) => value.is_string(),
        FieldKind::Integer { .. } | FieldKind::Number { .. } => value.is_number(),
        FieldKind::Bool => value.is_boolean(),
        FieldKind::Array(_) => value.is_array(),
        FieldKind::Object(_) | FieldKind::StringMap => value.is_object(),
        FieldKind::OneOf(kinds) => kinds.iter().any(|kind| same_shape(value, kind)),
    }
}

fn check_string(value: &Value, rule: &StringRule, path: &str, out: &mut Vec<Violation>) {
    let Some(text) = value.as_str() else {
        out.push(violation(path, "expected string"));
        return;
    };
    if text.is_empty() {
        out.push(violation(path, "must not be empty"));
        return;
    }
    if let Some(min_len) = rule.min_len {
        if text.chars().count() < min_len {
            out.push(violation(
                path,
                &format!("must be at least {min_len} characters long"),
            ));
        }
    }
    if let Some(allowed) = rule.allowed {
        if !allowed.contains(&text) {
            out.push(violation(
                path,
                &format!("must be one of [{}]", allowed.join(", ")),
            ));
        }
    }
    match rule.format {
        StringFormat::Any => {}
        StringFormat::Uri => {
            if url::Url::parse(text).is_err() {
                out.push(violation(path, "must be a valid uri"));
            }
        }
        StringFormat::Hostname => {
            if !is_hostname(text) {
                out.push(violation(path, "must be a valid hostname"));
            }
        }
    }
}

fn check_integer(
    value: &Value,
    min: Option<i64>,
    max: Option<i64>,
    path: &str,
    out: &mut Vec<Violation>,
) {
    let number = value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from));
    let Some(number) = number else {
        out.push(violation(path, "expected integer"));
        return;
    };
    if let Some(min) = min {
        if number < i128::from(min) {
            out.push(violation(
                path,
                &format!("must be greater than or equal to {min}"),
            ));
        }
    }
    if let Some(max) = max {
        if number > i128::from(max) {
            out.push(violation(path, &format!("must be less than or equal to {max}")));
        }
    }
}

fn check_number(
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
    positive: bool,
    path: &str,
    out: &mut Vec<Violation>,
) {
    let Some(number) = value.as_f64() else {
        out.push(violation(path, "expected number"));
        return;
    };
    if positive && number <= 0.0 {
        out.push(violation(path, "must be a positive number"));
    }
    if let Some(min) = min {
        if number < min {
            out.push(violation(
                path,
                &format!("must be greater than or equal to {min}"),
            ));
        }
    }
    if let Some(max) = max {
        if number > max {
            out.push(violation(path, &format!("must be less than or equal to {max}")));
        }
    }
}

/// DNS name (labels of 1-63 alphanumerics or inner hyphens) or IP literal.
fn is_hostname(text: &str) -> bool {
    if text.parse::<IpAddr>().is_ok() {
        return true;
    }
    let name = text.strip_suffix('.').unwrap_or(text);
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Expect a JSON object or record a violation.
fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => {
            out.push(violation(path, "expected object"));
            None
        }
    }
}

/// Flag every key not declared in `fields`.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    fields: &[Field],
    path: &str,
    out: &mut Vec<Violation>,
) {
    for key in map.keys() {
        if !fields.iter().any(|field| field.name == key) {
            out.push(violation(&join_path(path, key), "unknown key"));
        }
    }
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn violation(path: &str, message: &str) -> Violation {
    let normalized_path = if path.is_empty() { "root" } else { path };
    Violation::new(normalized_path, message)
}
