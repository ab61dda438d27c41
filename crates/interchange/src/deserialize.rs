//! Validating decoders from endpoint JSON into typed responses.
//!
//! Entry points take a `&serde_json::Value` (see [`parse_body`] for raw
//! response text). Every field the consumers rely on is checked; a body
//! that does not match one of the known shapes is an [`InterchangeError`]
//! naming the offending field, never a silently-undefined lookup.

use crate::types::*;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Errors while decoding an endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The body is not valid JSON.
    InvalidJson(String),
    /// The body (or a nested value) is not a JSON object.
    NotAnObject { field: String },
    /// A required field is absent or null.
    MissingField { field: String },
    /// A field is present but has the wrong type or an unusable value.
    InvalidField { field: String, message: String },
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::InvalidJson(msg) => write!(f, "invalid JSON: {}", msg),
            InterchangeError::NotAnObject { field } => {
                write!(f, "'{}' must be a JSON object", field)
            }
            InterchangeError::MissingField { field } => {
                write!(f, "missing required field: '{}'", field)
            }
            InterchangeError::InvalidField { field, message } => {
                write!(f, "invalid field '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Parse a raw response body as JSON.
pub fn parse_body(body: &str) -> Result<Value, InterchangeError> {
    serde_json::from_str(body).map_err(|e| InterchangeError::InvalidJson(e.to_string()))
}

/// [`decode_verification`] on a raw response body.
pub fn verification_from_json_str(body: &str) -> Result<VerificationResponse, InterchangeError> {
    decode_verification(&parse_body(body)?)
}

/// [`decode_promo`] on a raw response body.
pub fn promo_from_json_str(body: &str) -> Result<PromoResponse, InterchangeError> {
    decode_promo(&parse_body(body)?)
}

/// [`decode_chart_data`] on a raw JSON document.
pub fn chart_data_from_json_str(body: &str) -> Result<ChartData, InterchangeError> {
    decode_chart_data(&parse_body(body)?)
}

/// Decode a PIN verification response.
///
/// `result: true` requires `participant`; `accents` and `french_accents`
/// are optional and may each be null. `result: false` requires `reason`.
pub fn decode_verification(body: &Value) -> Result<VerificationResponse, InterchangeError> {
    expect_object(body, "response")?;

    if !required_bool(body, "result")? {
        let reason = required_str(body, "reason")?;
        return Ok(VerificationResponse::Failure { reason });
    }

    let participant = required_str(body, "participant")?;

    let accents = match body.get("accents") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_accent_sheet(v)?),
    };

    let french_accents = match body.get("french_accents") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_route_map("french_accents", v)?),
    };

    Ok(VerificationResponse::Success(PinMatch {
        participant,
        accents,
        french_accents,
    }))
}

/// Decode a promo code response.
///
/// On `result: false` any other field (servers send `price: 0`) is ignored.
pub fn decode_promo(body: &Value) -> Result<PromoResponse, InterchangeError> {
    expect_object(body, "response")?;

    if !required_bool(body, "result")? {
        return Ok(PromoResponse::Rejected);
    }

    let price = match body.get("price") {
        None | Some(Value::Null) => {
            return Err(InterchangeError::MissingField {
                field: "price".to_string(),
            })
        }
        Some(v) => parse_decimal("price", v)?,
    };

    let promocode_id = match body.get("promocode_id") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_u64("promocode_id", v)?),
    };

    Ok(PromoResponse::Applied {
        price,
        promocode_id,
    })
}

/// Decode a `{labels, data}` chart aggregate.
///
/// Labels may be strings or numbers (group indices are sent as numbers);
/// data points may be numbers or numeric strings, and must be finite.
/// Both arrays must have the same length.
pub fn decode_chart_data(body: &Value) -> Result<ChartData, InterchangeError> {
    expect_object(body, "chart")?;

    let labels = required_array(body, "labels")?
        .iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(InterchangeError::InvalidField {
                field: format!("labels[{}]", i),
                message: "expected a string or number".to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = required_array(body, "data")?
        .iter()
        .enumerate()
        .map(|(i, v)| parse_f64(&format!("data[{}]", i), v))
        .collect::<Result<Vec<_>, _>>()?;

    if labels.len() != data.len() {
        return Err(InterchangeError::InvalidField {
            field: "data".to_string(),
            message: format!(
                "{} data points for {} labels",
                data.len(),
                labels.len()
            ),
        });
    }

    Ok(ChartData { labels, data })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn expect_object(value: &Value, field: &str) -> Result<(), InterchangeError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(InterchangeError::NotAnObject {
            field: field.to_string(),
        })
    }
}

fn required<'a>(obj: &'a Value, field: &str) -> Result<&'a Value, InterchangeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(InterchangeError::MissingField {
            field: field.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn required_bool(obj: &Value, field: &str) -> Result<bool, InterchangeError> {
    required(obj, field)?
        .as_bool()
        .ok_or_else(|| InterchangeError::InvalidField {
            field: field.to_string(),
            message: "expected a boolean".to_string(),
        })
}

fn required_str(obj: &Value, field: &str) -> Result<String, InterchangeError> {
    required(obj, field)?
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| InterchangeError::InvalidField {
            field: field.to_string(),
            message: "expected a string".to_string(),
        })
}

fn required_array<'a>(obj: &'a Value, field: &str) -> Result<&'a Vec<Value>, InterchangeError> {
    required(obj, field)?
        .as_array()
        .ok_or_else(|| InterchangeError::InvalidField {
            field: field.to_string(),
            message: "expected an array".to_string(),
        })
}

fn parse_accent_sheet(value: &Value) -> Result<AccentSheet, InterchangeError> {
    let map = value
        .as_object()
        .ok_or_else(|| InterchangeError::NotAnObject {
            field: "accents".to_string(),
        })?;

    // The first entry decides the variant; the rest must agree.
    let ranked = map.values().next().is_some_and(|v| v.is_object());

    if ranked {
        return parse_route_map("accents", value).map(AccentSheet::Ranked);
    }

    let mut marks = BTreeMap::new();
    for (key, v) in map {
        let marker = v.as_str().ok_or_else(|| InterchangeError::InvalidField {
            field: format!("accents.{}", key),
            message: "expected a marker string (mixed accents variants)".to_string(),
        })?;
        marks.insert(key.clone(), AccentMark::from_wire(marker));
    }
    Ok(AccentSheet::Marks(marks))
}

fn parse_route_map(
    field: &str,
    value: &Value,
) -> Result<BTreeMap<String, RouteResult>, InterchangeError> {
    let map = value
        .as_object()
        .ok_or_else(|| InterchangeError::NotAnObject {
            field: field.to_string(),
        })?;

    let mut routes = BTreeMap::new();
    for (key, v) in map {
        let path = format!("{}.{}", field, key);
        expect_object(v, &path)?;
        let top = optional_u32(v, &path, "top")?;
        let zone = optional_u32(v, &path, "zone")?;
        routes.insert(key.clone(), RouteResult { top, zone });
    }
    Ok(routes)
}

fn optional_u32(obj: &Value, path: &str, field: &str) -> Result<u32, InterchangeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(v) => {
            let n = parse_u64(&format!("{}.{}", path, field), v)?;
            u32::try_from(n).map_err(|_| InterchangeError::InvalidField {
                field: format!("{}.{}", path, field),
                message: format!("{} is out of range", n),
            })
        }
    }
}

/// Non-negative integer, given as a JSON number or a digit string.
fn parse_u64(field: &str, value: &Value) -> Result<u64, InterchangeError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| InterchangeError::InvalidField {
        field: field.to_string(),
        message: format!("expected a non-negative integer, got {}", value),
    })
}

fn parse_decimal(field: &str, value: &Value) -> Result<Decimal, InterchangeError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => {
            return Err(InterchangeError::InvalidField {
                field: field.to_string(),
                message: "expected a number or numeric string".to_string(),
            })
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| InterchangeError::InvalidField {
            field: field.to_string(),
            message: format!("'{}' is not a decimal: {}", text, e),
        })
}

fn parse_f64(field: &str, value: &Value) -> Result<f64, InterchangeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        Some(_) => Err(InterchangeError::InvalidField {
            field: field.to_string(),
            message: format!("expected a finite number, got {}", value),
        }),
        None => Err(InterchangeError::InvalidField {
            field: field.to_string(),
            message: format!("expected a number, got {}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_str_entry_points() {
        assert_eq!(
            verification_from_json_str(r#"{"result": false, "reason": "closed"}"#).unwrap(),
            VerificationResponse::Failure {
                reason: "closed".to_string()
            }
        );
        assert_eq!(
            promo_from_json_str(r#"{"result": false, "price": 0}"#).unwrap(),
            PromoResponse::Rejected
        );
        assert_eq!(
            chart_data_from_json_str(r#"{"labels": ["a"], "data": ["2.5"]}"#)
                .unwrap()
                .data,
            vec![2.5]
        );
        assert!(matches!(
            promo_from_json_str("<html>"),
            Err(InterchangeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_simple_accents_success() {
        let body = json!({
            "result": true,
            "participant": "Ivanova Anna",
            "accents": {"0": "-", "1": "F", "2": "RP"}
        });
        match decode_verification(&body).unwrap() {
            VerificationResponse::Success(m) => {
                assert_eq!(m.participant, "Ivanova Anna");
                assert!(m.french_accents.is_none());
                match m.accents.unwrap() {
                    AccentSheet::Marks(marks) => {
                        assert_eq!(marks["0"], AccentMark::None);
                        assert_eq!(marks["1"], AccentMark::Flash);
                        assert_eq!(marks["2"], AccentMark::Redpoint);
                    }
                    other => panic!("expected Marks, got {:?}", other),
                }
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[test]
    fn test_ranked_accents_success() {
        let body = json!({
            "result": true,
            "participant": "Petrov Ivan",
            "accents": {"0": {"top": 0, "zone": 0}, "1": {"top": 2, "zone": 1}, "2": {"top": 5}}
        });
        let VerificationResponse::Success(m) = decode_verification(&body).unwrap() else {
            panic!("expected Success");
        };
        match m.accents.unwrap() {
            AccentSheet::Ranked(routes) => {
                assert_eq!(routes["0"].rank(), 0);
                assert_eq!(routes["1"], RouteResult { top: 2, zone: 1 });
                assert_eq!(routes["2"].zone, 0);
                assert_eq!(routes["2"].rank(), 2);
            }
            other => panic!("expected Ranked, got {:?}", other),
        }
    }

    #[test]
    fn test_french_accents_success() {
        let body = json!({
            "result": true,
            "participant": "Petrov Ivan",
            "french_accents": {"0": {"top": 3, "zone": 1}, "1": {"top": "0", "zone": "2"}}
        });
        let VerificationResponse::Success(m) = decode_verification(&body).unwrap() else {
            panic!("expected Success");
        };
        assert!(m.accents.is_none());
        let french = m.french_accents.unwrap();
        assert_eq!(french["0"], RouteResult { top: 3, zone: 1 });
        assert_eq!(french["1"], RouteResult { top: 0, zone: 2 });
    }

    #[test]
    fn test_empty_accents_is_empty_marks() {
        let body = json!({"result": true, "participant": "A B", "accents": {}});
        let VerificationResponse::Success(m) = decode_verification(&body).unwrap() else {
            panic!("expected Success");
        };
        assert_eq!(m.accents, Some(AccentSheet::Marks(BTreeMap::new())));
    }

    #[test]
    fn test_unrecognized_marker_is_preserved() {
        let body = json!({"result": true, "participant": "A B", "accents": {"0": "TOP"}});
        let VerificationResponse::Success(m) = decode_verification(&body).unwrap() else {
            panic!("expected Success");
        };
        let Some(AccentSheet::Marks(marks)) = m.accents else {
            panic!("expected Marks");
        };
        assert_eq!(marks["0"], AccentMark::Unrecognized("TOP".to_string()));
        assert_eq!(marks["0"].choice(), None);
        assert_eq!(marks["0"].as_wire(), "TOP");
    }

    #[test]
    fn test_mixed_accent_variants_rejected() {
        let body = json!({
            "result": true,
            "participant": "A B",
            "accents": {"0": {"top": 1}, "1": "F"}
        });
        let err = decode_verification(&body).unwrap_err();
        assert!(matches!(err, InterchangeError::NotAnObject { ref field } if field == "accents.1"));

        let body = json!({
            "result": true,
            "participant": "A B",
            "accents": {"0": "F", "1": {"top": 1}}
        });
        let err = decode_verification(&body).unwrap_err();
        assert!(matches!(err, InterchangeError::InvalidField { ref field, .. } if field == "accents.1"));
    }

    #[test]
    fn test_failure_response() {
        let body = json!({"result": false, "reason": "not found"});
        assert_eq!(
            decode_verification(&body).unwrap(),
            VerificationResponse::Failure {
                reason: "not found".to_string()
            }
        );
    }

    #[test]
    fn test_failure_without_reason_rejected() {
        let body = json!({"result": false});
        assert_eq!(
            decode_verification(&body).unwrap_err(),
            InterchangeError::MissingField {
                field: "reason".to_string()
            }
        );
    }

    #[test]
    fn test_success_without_participant_rejected() {
        let body = json!({"result": true, "accents": {}});
        assert_eq!(
            decode_verification(&body).unwrap_err().to_string(),
            "missing required field: 'participant'"
        );
    }

    #[test]
    fn test_result_must_be_bool() {
        let body = json!({"result": "yes", "participant": "A"});
        assert!(matches!(
            decode_verification(&body),
            Err(InterchangeError::InvalidField { ref field, .. }) if field == "result"
        ));
        assert!(matches!(
            decode_verification(&json!([])),
            Err(InterchangeError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_promo_applied_with_id() {
        let body = json!({"result": true, "price": 500, "promocode_id": 7});
        assert_eq!(
            decode_promo(&body).unwrap(),
            PromoResponse::Applied {
                price: Decimal::from(500),
                promocode_id: Some(7)
            }
        );
    }

    #[test]
    fn test_promo_applied_without_id_and_string_price() {
        let body = json!({"result": true, "price": "450.50"});
        match decode_promo(&body).unwrap() {
            PromoResponse::Applied {
                price,
                promocode_id,
            } => {
                assert_eq!(price.to_string(), "450.50");
                assert!(promocode_id.is_none());
            }
            other => panic!("expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_promo_rejected_ignores_price() {
        let body = json!({"result": false, "price": 0});
        assert_eq!(decode_promo(&body).unwrap(), PromoResponse::Rejected);
    }

    #[test]
    fn test_promo_applied_requires_price() {
        let body = json!({"result": true});
        assert!(matches!(
            decode_promo(&body),
            Err(InterchangeError::MissingField { ref field }) if field == "price"
        ));
        let body = json!({"result": true, "price": "cheap"});
        assert!(matches!(
            decode_promo(&body),
            Err(InterchangeError::InvalidField { ref field, .. }) if field == "price"
        ));
    }

    #[test]
    fn test_chart_data() {
        let body = json!({"labels": ["Moscow", 2], "data": [3, "4.5"]});
        let chart = decode_chart_data(&body).unwrap();
        assert_eq!(chart.labels, vec!["Moscow", "2"]);
        assert_eq!(chart.data, vec![3.0, 4.5]);
    }

    #[test]
    fn test_chart_data_rejects_non_finite_points() {
        for bad in ["NaN", "inf", "-Infinity"] {
            let body = json!({"labels": ["a", "b"], "data": [1, bad]});
            assert_eq!(
                decode_chart_data(&body).unwrap_err().to_string(),
                format!(
                    "invalid field 'data[1]': expected a finite number, got \"{}\"",
                    bad
                )
            );
        }
    }

    #[test]
    fn test_chart_data_length_mismatch() {
        let body = json!({"labels": ["a", "b"], "data": [1]});
        assert_eq!(
            decode_chart_data(&body).unwrap_err().to_string(),
            "invalid field 'data': 1 data points for 2 labels"
        );
    }

    #[test]
    fn test_parse_body_invalid_json() {
        assert!(matches!(
            parse_body("{\"result\": tru"),
            Err(InterchangeError::InvalidJson(_))
        ));
        assert!(parse_body("{\"result\": true}").is_ok());
    }
}
