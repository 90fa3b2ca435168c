//! JSON parameter attributes
//!
//! Module and path parameters are JSON objects stored as strings. The API
//! echoes them back with some numbers turned into strings (`0.9` comes back
//! as `"0.9"`), which would show up as a diff on every plan. Values read
//! back from the API are merged with what the user declared so the declared
//! types survive, then written out in canonical form: keys sorted at every
//! depth, no whitespace, integral numbers without a fraction.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tfplug::plan_modifier::{PlanModifier, PlanModifyRequest, PlanModifyResponse};
use tfplug::types::{AttributePath, Diagnostic, Dynamic};
use tfplug::validator::Validator;

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum ParametersError {
    #[error("{0}")]
    InvalidParameters(String),
}

/// Parse a parameters string; only JSON objects are accepted
pub fn parse(raw: &str) -> Result<JsonObject, ParametersError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ParametersError::InvalidParameters(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
        Err(e) => Err(ParametersError::InvalidParameters(format!(
            "value is not valid JSON: {}",
            e
        ))),
    }
}

/// Merge the server's copy of a document into the user's
///
/// Key by key, recursing into objects present on both sides:
/// keys only one side has are kept as they are; a user number the server
/// returned as its exact decimal string stays a number; anything else takes
/// the server value. Arrays are compared as whole values.
pub fn merge_preserving_types(user: &JsonObject, server: &JsonObject) -> JsonObject {
    let mut merged = server.clone();
    for (key, user_value) in user {
        let value = match server.get(key) {
            Some(server_value) => merge_value(user_value, server_value),
            None => user_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

fn merge_value(user: &Value, server: &Value) -> Value {
    match (user, server) {
        (Value::Object(u), Value::Object(s)) => Value::Object(merge_preserving_types(u, s)),
        (Value::Number(n), Value::String(s)) if renders_number(s, n) => user.clone(),
        _ => server.clone(),
    }
}

/// Shortest decimal rendering of a number: `0.9`, `42`, `1` for `1.0`,
/// `1e-7` for `0.0000001`
pub fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let shortest = n.to_string();
    match n.as_f64() {
        Some(f) => {
            let fixed = format!("{}", f);
            if fixed.len() <= shortest.len() {
                fixed
            } else {
                shortest
            }
        }
        None => shortest,
    }
}

// The API may echo either the exponent or the fixed-point spelling
fn renders_number(s: &str, n: &Number) -> bool {
    if s == canonical_number(n) || s == n.to_string() {
        return true;
    }
    n.is_f64() && n.as_f64().is_some_and(|f| s == format!("{}", f))
}

/// Canonical string form of a document
pub fn to_canonical_string(object: &JsonObject) -> String {
    canonicalize(&Value::Object(object.clone())).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Number(n) => Value::Number(canonical_number_value(n)),
        other => other.clone(),
    }
}

// 1.0 and 1 must serialize the same way
fn canonical_number_value(n: &Number) -> Number {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                return Number::from(f as i64);
            }
        }
    }
    n.clone()
}

/// Value to store for a parameters attribute after the API answered
///
/// `declared` is the user's string (from the plan, or prior state on
/// refresh); `server` is what the API returned. An empty or missing server
/// object with nothing declared stays null.
pub fn reconcile(
    declared: Option<&str>,
    server: Option<&JsonObject>,
) -> Result<Option<String>, ParametersError> {
    let user = declared
        .filter(|raw| !raw.trim().is_empty())
        .map(parse)
        .transpose()?;
    let server = server.filter(|s| !s.is_empty());

    Ok(match (user, server) {
        (None, None) => None,
        (Some(user), None) => Some(to_canonical_string(&user)),
        (None, Some(server)) => Some(to_canonical_string(server)),
        (Some(user), Some(server)) => {
            Some(to_canonical_string(&merge_preserving_types(&user, server)))
        }
    })
}

/// Keep the user's own spelling when it means the same as the reconciled value
///
/// Terraform expects applied values to match the plan byte for byte, so
/// whitespace or key order in configuration must not be rewritten.
pub fn keep_declared(declared: Option<&str>, reconciled: Option<String>) -> Option<String> {
    match (declared, reconciled) {
        (Some(declared), Some(reconciled)) if semantically_equal(declared, &reconciled) => {
            Some(declared.to_string())
        }
        (_, reconciled) => reconciled,
    }
}

/// Two parameter strings describe the same object
///
/// Strings that do not parse are only equal to themselves.
pub fn semantically_equal(a: &str, b: &str) -> bool {
    match (parse(a), parse(b)) {
        (Ok(a), Ok(b)) => to_canonical_string(&a) == to_canonical_string(&b),
        _ => a == b,
    }
}

/// Object to send to the API for a configured parameters string
pub fn to_request(raw: Option<&str>) -> Result<Option<JsonObject>, ParametersError> {
    raw.filter(|raw| !raw.trim().is_empty()).map(parse).transpose()
}

pub fn invalid_parameters(path: &AttributePath, err: &ParametersError) -> Diagnostic {
    Diagnostic::error(
        "Invalid Parameters",
        format!("{} must be a JSON object: {}", path, err),
    )
    .with_attribute(path.clone())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Rejects parameter strings that are not JSON objects
pub struct JsonObjectValidator;

impl Validator for JsonObjectValidator {
    fn description(&self) -> String {
        "value must be a JSON object encoded as a string".to_string()
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(raw) = value.as_string() else {
            return;
        };
        if let Err(e) = parse(raw) {
            diagnostics.push(invalid_parameters(path, &e));
        }
    }
}

/// Plans the prior state string when the configured JSON means the same
pub struct SemanticJsonEquality;

impl PlanModifier for SemanticJsonEquality {
    fn description(&self) -> String {
        "formatting-only changes to this JSON value are ignored".to_string()
    }

    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        if let (Some(state), Some(plan)) = (request.state.as_string(), request.plan.as_string()) {
            if state != plan && semantically_equal(state, plan) {
                return PlanModifyResponse {
                    plan_value: request.state.clone(),
                    requires_replace: false,
                    diagnostics: Vec::new(),
                };
            }
        }
        PlanModifyResponse::unchanged(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn stringified_threshold_keeps_user_number() {
        let user = object(json!({"similarity": {"threshold": 0.9}}));
        let server = object(json!({"similarity": {"threshold": "0.9"}}));

        let merged = merge_preserving_types(&user, &server);

        assert_eq!(merged["similarity"]["threshold"], json!(0.9));
        assert_eq!(
            to_canonical_string(&merged),
            r#"{"similarity":{"threshold":0.9}}"#
        );
    }

    #[test]
    fn changed_value_takes_server_side() {
        let user = object(json!({"count": 1}));
        let server = object(json!({"count": "2"}));

        let merged = merge_preserving_types(&user, &server);
        assert_eq!(merged["count"], json!("2"));
    }

    #[test]
    fn one_sided_keys_are_kept() {
        let user = object(json!({"mine": true}));
        let server = object(json!({"defaulted": "x"}));

        let merged = merge_preserving_types(&user, &server);
        assert_eq!(Value::Object(merged), json!({"mine": true, "defaulted": "x"}));
    }

    #[test]
    fn type_disagreement_prefers_server() {
        let user = object(json!({"flag": "yes", "nested": {"a": 1}}));
        let server = object(json!({"flag": true, "nested": "gone"}));

        let merged = merge_preserving_types(&user, &server);
        assert_eq!(Value::Object(merged), json!({"flag": true, "nested": "gone"}));
    }

    #[test]
    fn arrays_are_not_recursed() {
        let user = object(json!({"weights": [1, 2]}));
        let server = object(json!({"weights": ["1", "2"]}));

        let merged = merge_preserving_types(&user, &server);
        assert_eq!(merged["weights"], json!(["1", "2"]));
    }

    #[test]
    fn integral_floats_match_integer_strings() {
        let user = object(json!({"limit": 1.0}));
        let server = object(json!({"limit": "1"}));

        let merged = merge_preserving_types(&user, &server);
        assert_eq!(to_canonical_string(&merged), r#"{"limit":1}"#);
    }

    #[test]
    fn canonical_numbers() {
        assert_eq!(canonical_number(&Number::from(42)), "42");
        assert_eq!(canonical_number(&Number::from(-7)), "-7");
        assert_eq!(canonical_number(&Number::from_f64(0.9).unwrap()), "0.9");
        assert_eq!(canonical_number(&Number::from_f64(1.0).unwrap()), "1");
        assert_eq!(canonical_number(&Number::from_f64(0.125).unwrap()), "0.125");
        assert_eq!(canonical_number(&Number::from_f64(1e-7).unwrap()), "1e-7");
        assert_eq!(canonical_number(&Number::from_f64(1e21).unwrap()), "1e21");
        assert_eq!(canonical_number(&Number::from_f64(1e16).unwrap()), "1e16");
    }

    #[test]
    fn extreme_magnitudes_keep_user_number() {
        for (declared, echoed) in [
            (1e-7, "1e-7"),
            (1e-7, "0.0000001"),
            (1e21, "1e21"),
            (1e16, "1e16"),
            (2.5e-12, "2.5e-12"),
        ] {
            let user = object(json!({"x": declared}));
            let server = object(json!({"x": echoed}));

            let merged = merge_preserving_types(&user, &server);
            assert_eq!(merged["x"], json!(declared), "echo {echoed}");
        }
    }

    #[test]
    fn canonical_string_sorts_keys_at_every_depth() {
        let doc = parse(r#"{ "b": 1, "a": { "z": [ 3, 1.0 ], "y": null } }"#).unwrap();
        assert_eq!(
            to_canonical_string(&doc),
            r#"{"a":{"y":null,"z":[3,1]},"b":1}"#
        );
    }

    #[test]
    fn parse_rejects_malformed_and_non_objects() {
        assert!(matches!(
            parse(r#"{"invalid": json}"#),
            Err(ParametersError::InvalidParameters(_))
        ));

        let err = parse("[1, 2]").unwrap_err();
        assert_eq!(
            err,
            ParametersError::InvalidParameters("expected a JSON object, got an array".into())
        );
    }

    #[test]
    fn reconcile_cases() {
        let server = object(json!({"threshold": "0.9", "model": "m"}));

        assert_eq!(reconcile(None, None).unwrap(), None);
        assert_eq!(reconcile(Some(""), Some(&JsonObject::new())).unwrap(), None);
        assert_eq!(
            reconcile(Some(r#"{"b":2,"a":1}"#), None).unwrap().as_deref(),
            Some(r#"{"a":1,"b":2}"#)
        );
        assert_eq!(
            reconcile(None, Some(&server)).unwrap().as_deref(),
            Some(r#"{"model":"m","threshold":"0.9"}"#)
        );
        assert_eq!(
            reconcile(Some(r#"{"threshold":0.9}"#), Some(&server))
                .unwrap()
                .as_deref(),
            Some(r#"{"model":"m","threshold":0.9}"#)
        );
        assert!(reconcile(Some("nope"), Some(&server)).is_err());
    }

    #[test]
    fn keep_declared_only_for_equivalent_values() {
        let declared = r#"{ "threshold": 0.9 }"#;

        assert_eq!(
            keep_declared(Some(declared), Some(r#"{"threshold":0.9}"#.to_string())).as_deref(),
            Some(declared)
        );
        assert_eq!(
            keep_declared(Some(declared), Some(r#"{"threshold":"0.8"}"#.to_string())).as_deref(),
            Some(r#"{"threshold":"0.8"}"#)
        );
        assert_eq!(keep_declared(Some(declared), None), None);
    }

    #[test]
    fn semantic_equality_ignores_formatting() {
        assert!(semantically_equal(r#"{"a":1,"b":[1,2]}"#, r#"{ "b": [1, 2], "a": 1.0 }"#));
        assert!(!semantically_equal(r#"{"a":1}"#, r#"{"a":"1"}"#));
        assert!(semantically_equal("garbage", "garbage"));
        assert!(!semantically_equal("garbage", "{}"));
    }

    #[test]
    fn validator_reports_invalid_parameters() {
        let path = AttributePath::new("module").index(0).attribute("parameters");
        let mut diags = Vec::new();

        JsonObjectValidator.validate(&Dynamic::from(r#"{"invalid": json}"#), &path, &mut diags);
        JsonObjectValidator.validate(&Dynamic::from(r#"{"valid": 1}"#), &path, &mut diags);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].summary, "Invalid Parameters");
        assert_eq!(diags[0].attribute, Some(path));
    }

    #[test]
    fn plan_modifier_keeps_equivalent_state() {
        let request = PlanModifyRequest {
            state: Dynamic::from(r#"{"a":1,"b":2}"#),
            plan: Dynamic::from(r#"{"b": 2, "a": 1}"#),
            config: Dynamic::from(r#"{"b": 2, "a": 1}"#),
            path: AttributePath::new("parameters"),
        };
        let response = SemanticJsonEquality.modify_plan(request);
        assert_eq!(response.plan_value, Dynamic::from(r#"{"a":1,"b":2}"#));

        let request = PlanModifyRequest {
            state: Dynamic::from(r#"{"a":1}"#),
            plan: Dynamic::from(r#"{"a":2}"#),
            config: Dynamic::from(r#"{"a":2}"#),
            path: AttributePath::new("parameters"),
        };
        let response = SemanticJsonEquality.modify_plan(request);
        assert_eq!(response.plan_value, Dynamic::from(r#"{"a":2}"#));
    }

    fn number() -> impl Strategy<Value = Value> {
        prop_oneof![
            (-100_000i64..100_000).prop_map(Value::from),
            (-100_000i64..100_000, 1u32..4).prop_map(|(n, scale)| {
                Value::from(n as f64 / 10f64.powi(scale as i32))
            }),
            (-99i64..100, -30i32..30)
                .prop_map(|(mantissa, exp)| Value::from(mantissa as f64 * 10f64.powi(exp))),
        ]
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            number(),
            "[a-z0-9.]{0,6}".prop_map(Value::from),
        ]
    }

    fn json_value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn json_object() -> impl Strategy<Value = JsonObject> {
        prop::collection::btree_map("[a-d]", json_value(), 0..5)
            .prop_map(|m| m.into_iter().collect())
    }

    // What the API does to numbers inside objects
    fn stringify_numbers(object: &JsonObject) -> JsonObject {
        object
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::Number(n) => Value::String(canonical_number(n)),
                    Value::Object(inner) => Value::Object(stringify_numbers(inner)),
                    other => other.clone(),
                };
                (k.clone(), v)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(user in json_object(), server in json_object()) {
            let once = merge_preserving_types(&user, &server);
            let twice = merge_preserving_types(&once, &server);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn canonical_form_survives_reparse(doc in json_object()) {
            let canonical = to_canonical_string(&doc);
            let reparsed = parse(&serde_json::to_string(&doc).unwrap()).unwrap();
            prop_assert_eq!(to_canonical_string(&reparsed), canonical.clone());
            prop_assert_eq!(to_canonical_string(&parse(&canonical).unwrap()), canonical);
        }

        #[test]
        fn stringified_echo_produces_no_diff(user in json_object()) {
            let server = stringify_numbers(&user);
            let merged = merge_preserving_types(&user, &server);
            prop_assert_eq!(to_canonical_string(&merged), to_canonical_string(&user));
        }
    }
}
