//! Shorthand expansion of raw metadata records into strict swagger shape.
//!
//! A raw record may use three convenience shorthands:
//!
//! - `parameters` as a name-to-spec map, expanded to an array of parameter
//!   objects with `in` and `required` inferred from the path template;
//! - `body` as a field-to-spec map, expanded to a single `payload` body
//!   parameter carrying a JSON-schema object;
//! - `response` as a single response object, expanded to `responses["200"]`.
//!
//! Expansion works on a copy. The attached record is read on every document
//! rebuild and must stay stable across rebuilds.

use log::warn;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::http::Method;
use crate::metadata::Metadata;

/// Normalizes one verb's metadata record for the given path.
///
/// `annotation` is `None` when the entry point carries no metadata at all,
/// which is reported as [`Error::MissingAnnotation`]. A record that ends up
/// without a `responses` key is reported as [`Error::MissingResponseShape`].
/// Both are caught by the assembler, which drops the verb and keeps building.
pub fn normalize(
    annotation: Option<&Metadata>,
    path: &str,
    handler: &str,
    method: Method,
) -> Result<Map<String, Value>> {
    let meta = annotation.ok_or_else(|| Error::MissingAnnotation {
        handler: handler.to_string(),
        method,
    })?;

    let mut record = meta.as_map().clone();
    expand_parameters(&mut record, path);
    expand_body(&mut record);
    if !record.contains_key("parameters") {
        // Absence is never left implicit.
        record.insert("parameters".to_string(), json!([]));
    }
    if !expand_response(&mut record) {
        return Err(Error::MissingResponseShape {
            handler: handler.to_string(),
            method,
        });
    }
    Ok(record)
}

/// Expands the `parameters` shorthand map into an array of parameter objects,
/// in declaration order. A parameter whose name appears as a `{name}` segment
/// in the path is forced to `in=path, required=true`; otherwise `in` defaults
/// to `query`. Entries already carrying an `in` are left alone. An
/// already-normalized array passes through untouched.
fn expand_parameters(record: &mut Map<String, Value>, path: &str) {
    let raw = match record.remove("parameters") {
        Some(Value::Object(map)) => map,
        Some(normalized @ Value::Array(_)) => {
            record.insert("parameters".to_string(), normalized);
            return;
        }
        Some(other) => {
            warn!("ignoring malformed parameters shorthand: {}", other);
            return;
        }
        None => return,
    };

    let mut parameters = Vec::with_capacity(raw.len());
    for (name, spec) in raw {
        let mut spec = match spec {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        spec.insert("name".to_string(), Value::String(name.clone()));
        if !spec.contains_key("in") {
            if path.contains(&format!("{{{}}}", name)) {
                spec.insert("in".to_string(), json!("path"));
                spec.insert("required".to_string(), json!(true));
            } else {
                spec.insert("in".to_string(), json!("query"));
            }
        }
        parameters.push(Value::Object(spec));
    }
    record.insert("parameters".to_string(), Value::Array(parameters));
}

/// Expands the `body` shorthand map into a single body parameter named
/// `payload`, appended after any expanded `parameters` entries. Body fields
/// that declared `required=true` contribute their key to the schema's
/// `required` list; the flag is stripped from the copied spec either way.
fn expand_body(record: &mut Map<String, Value>) {
    let fields = match record.remove("body") {
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!("ignoring malformed body shorthand: {}", other);
            return;
        }
        None => return,
    };

    let mut required = Vec::new();
    let mut properties = Map::new();
    for (name, spec) in fields {
        let spec = match spec {
            Value::Object(mut map) => {
                if map.remove("required") == Some(json!(true)) {
                    required.push(Value::String(name.clone()));
                }
                Value::Object(map)
            }
            other => other,
        };
        properties.insert(name, spec);
    }

    let payload = json!({
        "name": "payload",
        "in": "body",
        "schema": {
            "type": "object",
            "required": required,
            "properties": properties,
        }
    });

    let parameters = record
        .entry("parameters".to_string())
        .or_insert_with(|| json!([]));
    if let Value::Array(entries) = parameters {
        entries.push(payload);
    }
}

/// Moves the singular `response` shorthand to `responses["200"]`. Returns
/// whether the record ends up with a `responses` key.
fn expand_response(record: &mut Map<String, Value>) -> bool {
    if let Some(response) = record.remove("response") {
        let mut responses = Map::new();
        responses.insert("200".to_string(), response);
        record.insert("responses".to_string(), Value::Object(responses));
    }
    record.contains_key("responses")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn meta(value: Value) -> Metadata {
        Metadata::from_value(value)
    }

    fn normalize_ok(value: Value, path: &str) -> Map<String, Value> {
        normalize(Some(&meta(value)), path, "TestResource", Method::Get)
            .expect("normalization should succeed")
    }

    #[test]
    fn test_path_parameter_is_inferred_from_template() {
        let record = normalize_ok(
            json!({
                "parameters": {"id": {"type": "integer"}},
                "response": {"description": "ok"}
            }),
            "/items/{id}",
        );

        assert_eq!(
            record["parameters"],
            json!([{"type": "integer", "name": "id", "in": "path", "required": true}])
        );
    }

    #[test]
    fn test_non_template_parameter_defaults_to_query() {
        let record = normalize_ok(
            json!({
                "parameters": {"page": {"type": "integer"}},
                "response": {"description": "ok"}
            }),
            "/items",
        );

        let param = &record["parameters"][0];
        assert_eq!(param["in"], json!("query"));
        assert_eq!(param.get("required"), None);
    }

    #[test]
    fn test_explicit_in_is_preserved() {
        let record = normalize_ok(
            json!({
                "parameters": {"id": {"type": "string", "in": "query"}},
                "response": {"description": "ok"}
            }),
            "/items/{id}",
        );

        let param = &record["parameters"][0];
        assert_eq!(param["in"], json!("query"));
        assert_eq!(param.get("required"), None);
    }

    #[test]
    fn test_parameters_keep_declaration_order() {
        let record = normalize_ok(
            json!({
                "parameters": {
                    "zulu": {"type": "string"},
                    "alpha": {"type": "string"},
                    "mike": {"type": "string"}
                },
                "response": {"description": "ok"}
            }),
            "/items",
        );

        let names: Vec<&str> = record["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_body_shorthand_becomes_payload_parameter() {
        let record = normalize_ok(
            json!({
                "body": {
                    "name": {"type": "string", "required": true},
                    "age": {"type": "integer", "required": false},
                    "nickname": {"type": "string"}
                },
                "response": {"description": "ok"}
            }),
            "/items",
        );

        assert_eq!(
            record["parameters"],
            json!([{
                "name": "payload",
                "in": "body",
                "schema": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": {"type": "string"},
                        "age": {"type": "integer"},
                        "nickname": {"type": "string"}
                    }
                }
            }])
        );
    }

    #[test]
    fn test_body_is_appended_after_parameters() {
        let record = normalize_ok(
            json!({
                "parameters": {"id": {"type": "integer"}},
                "body": {"name": {"type": "string"}},
                "response": {"description": "ok"}
            }),
            "/items/{id}",
        );

        let params = record["parameters"].as_array().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], json!("id"));
        assert_eq!(params[1]["name"], json!("payload"));
    }

    #[test]
    fn test_missing_parameters_becomes_empty_array() {
        let record = normalize_ok(json!({"response": {"description": "ok"}}), "/items");
        assert_eq!(record["parameters"], json!([]));
    }

    #[test]
    fn test_response_shorthand_moves_to_responses_200() {
        let record = normalize_ok(
            json!({"response": {"description": "the item"}}),
            "/items",
        );

        assert_eq!(record.get("response"), None);
        assert_eq!(record["responses"], json!({"200": {"description": "the item"}}));
    }

    #[test]
    fn test_strict_responses_pass_through() {
        let record = normalize_ok(
            json!({
                "responses": {
                    "200": {"description": "ok"},
                    "404": {"description": "not found"}
                }
            }),
            "/items",
        );

        assert_eq!(record["responses"]["404"], json!({"description": "not found"}));
    }

    #[test]
    fn test_missing_annotation_error() {
        let err = normalize(None, "/items", "ItemResource", Method::Put).unwrap_err();
        assert!(matches!(err, Error::MissingAnnotation { .. }));
        assert_eq!(
            err.to_string(),
            "missing swagger annotation for ItemResource.on_put()"
        );
    }

    #[test]
    fn test_missing_response_shape_error() {
        let err = normalize(
            Some(&meta(json!({"summary": "no responses here"}))),
            "/items",
            "ItemResource",
            Method::Get,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingResponseShape { .. }));
    }

    #[test]
    fn test_passthrough_keys_are_copied_verbatim() {
        let record = normalize_ok(
            json!({
                "summary": "List items",
                "tags": ["items"],
                "deprecated": true,
                "response": {"description": "ok"}
            }),
            "/items",
        );

        assert_eq!(record["summary"], json!("List items"));
        assert_eq!(record["tags"], json!(["items"]));
        assert_eq!(record["deprecated"], json!(true));
    }

    #[test]
    fn test_normalization_does_not_mutate_the_attached_record() {
        let attached = meta(json!({
            "parameters": {"id": {"type": "integer"}},
            "body": {"name": {"type": "string", "required": true}},
            "response": {"description": "ok"}
        }));
        let before = attached.clone();

        let first = normalize(Some(&attached), "/items/{id}", "ItemResource", Method::Get).unwrap();
        let second = normalize(Some(&attached), "/items/{id}", "ItemResource", Method::Get).unwrap();

        assert_eq!(attached, before);
        assert_eq!(first, second);
    }
}
