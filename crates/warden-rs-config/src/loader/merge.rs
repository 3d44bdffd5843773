//! JSON merge helpers for layered configuration.

use serde_json::{Map, Value};

/// A partial configuration tree; any key may be absent.
pub type Layer = Value;

/// Merge `overlay` over `base` without touching either input.
///
/// Objects merge key by key at every depth. Anything else in `overlay`
/// (scalar, array, null, or a value whose type differs from `base`) replaces
/// the base value outright. Result keys keep `base` order, followed by keys
/// only `overlay` has.
pub fn merge(base: &Layer, overlay: &Layer) -> Layer {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = Map::with_capacity(base_map.len() + overlay_map.len());
            for (key, base_value) in base_map {
                let value = match overlay_map.get(key) {
                    Some(overlay_value) => merge(base_value, overlay_value),
                    None => base_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            for (key, overlay_value) in overlay_map {
                if !base_map.contains_key(key) {
                    merged.insert(key.clone(), overlay_value.clone());
                }
            }
            Value::Object(merged)
        }
        (_, overlay_value) => overlay_value.clone(),
    }
}

/// Merge layers in order, later layers taking precedence, starting from an
/// empty object.
pub fn merge_all<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Layer {
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), |merged, layer| merge(&merged, layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn overlay_scalar_wins() {
        let base = json!({ "a": 1, "b": "keep" });
        let overlay = json!({ "a": 2 });
        assert_eq!(merge(&base, &overlay), json!({ "a": 2, "b": "keep" }));
    }

    #[test]
    fn nested_objects_merge_like_their_children() {
        let base = json!({ "server": { "host": "localhost", "port": 3000 } });
        let overlay = json!({ "server": { "port": 8080, "tls": true } });
        let merged = merge(&base, &overlay);
        assert_eq!(merged["server"], merge(&base["server"], &overlay["server"]));
        assert_eq!(
            merged,
            json!({ "server": { "host": "localhost", "port": 8080, "tls": true } })
        );
    }

    #[test]
    fn inputs_are_not_mutated() {
        let base = json!({ "server": { "cors": { "methods": ["GET"] } } });
        let overlay = json!({ "server": { "cors": { "methods": ["POST"] }, "port": 1 } });
        let (base_before, overlay_before) = (base.clone(), overlay.clone());
        let _ = merge(&base, &overlay);
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let base = json!({ "methods": ["GET"] });
        let overlay = json!({ "methods": ["POST"] });
        assert_eq!(merge(&base, &overlay), json!({ "methods": ["POST"] }));
    }

    #[test]
    fn cors_methods_scenario() {
        let base = json!({ "server": { "port": 3000, "cors": { "methods": ["GET"] } } });
        let overlay = json!({ "server": { "cors": { "methods": ["POST", "PUT"] } } });
        assert_eq!(
            merge(&base, &overlay),
            json!({ "server": { "port": 3000, "cors": { "methods": ["POST", "PUT"] } } })
        );
    }

    #[test]
    fn overlay_shape_wins_on_type_mismatch() {
        let base = json!({ "origin": { "primary": "https://a.example" }, "level": "info" });
        let overlay = json!({ "origin": "https://b.example", "level": { "root": "warn" } });
        assert_eq!(merge(&base, &overlay), overlay);
    }

    #[test]
    fn three_level_overrides_fully_recurse() {
        let base = json!({
            "auth": { "oauth": { "google": { "clientId": "id", "scopes": ["a", "b"] } } }
        });
        let overlay = json!({ "auth": { "oauth": { "google": { "scopes": ["c"] } } } });
        assert_eq!(
            merge(&base, &overlay),
            json!({ "auth": { "oauth": { "google": { "clientId": "id", "scopes": ["c"] } } } })
        );
    }

    #[test]
    fn key_order_is_base_then_new_overlay_keys() {
        let base = json!({ "z": 1, "a": 1 });
        let overlay = json!({ "m": 2, "z": 2 });
        let merged = merge(&base, &overlay);
        let keys: Vec<&str> = merged
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn merge_all_applies_layers_in_order() {
        let layers = [json!({ "a": 1, "b": 1 }), json!({ "b": 2 }), json!({ "c": 3 })];
        assert_eq!(merge_all(&layers), json!({ "a": 1, "b": 2, "c": 3 }));
        assert_eq!(merge_all(std::iter::empty::<&Layer>()), json!({}));
    }
}
