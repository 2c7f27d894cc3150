//! Firestore REST payloads and typed-value codec.
//!
//! Firestore wraps every field value in a single-key object naming its type,
//! e.g. `{"stringValue": "a1"}` or `{"integerValue": "7"}` (64-bit integers
//! travel as decimal strings). Stored documents use plain JSON values; this
//! module converts between the two shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

use super::super::{Document, DocumentStoreError};

/// Document resource returned by `GET .../documents/{collection}/{key}`.
#[derive(Debug, Deserialize)]
pub(super) struct FirestoreDocumentDto {
    #[serde(default)]
    pub(super) fields: Map<String, Value>,
}

/// Body of create and patch requests.
#[derive(Debug, Serialize)]
pub(super) struct FirestoreWriteDto {
    pub(super) fields: Map<String, Value>,
}

/// Google API error envelope, e.g. `{"error": {"code": 404, ...}}`.
#[derive(Debug, Deserialize)]
pub(super) struct FirestoreErrorEnvelope {
    pub(super) error: FirestoreErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct FirestoreErrorDto {
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) status: String,
}

pub(super) fn encode_fields(document: &Document) -> Result<Map<String, Value>, DocumentStoreError> {
    document
        .iter()
        .map(|(name, value)| Ok((name.clone(), encode_value(value)?)))
        .collect()
}

fn encode_value(value: &Value) -> Result<Value, DocumentStoreError> {
    let encoded = match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) => encode_number(number)?,
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => {
            let values = items.iter().map(encode_value).collect::<Result<Vec<_>, _>>()?;
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields)? } }),
    };
    Ok(encoded)
}

fn encode_number(number: &Number) -> Result<Value, DocumentStoreError> {
    if let Some(integer) = number.as_i64() {
        return Ok(json!({ "integerValue": integer.to_string() }));
    }
    if number.is_u64() {
        return Err(DocumentStoreError::decode(format!(
            "integer {number} exceeds the 64-bit signed range"
        )));
    }
    match number.as_f64() {
        Some(double) => Ok(json!({ "doubleValue": double })),
        None => Err(DocumentStoreError::decode(format!(
            "number {number} is not representable"
        ))),
    }
}

pub(super) fn decode_fields(fields: Map<String, Value>) -> Result<Document, DocumentStoreError> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let decoded = decode_value(value)
                .map_err(|err| DocumentStoreError::decode(format!("field `{name}`: {err}")))?;
            Ok((name, decoded))
        })
        .collect()
}

fn decode_value(value: Value) -> Result<Value, String> {
    let Value::Object(wrapper) = value else {
        return Err("typed value must be an object".to_owned());
    };
    let mut entries = wrapper.into_iter();
    let (Some((kind, inner)), None) = (entries.next(), entries.next()) else {
        return Err("typed value must name exactly one type".to_owned());
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => match inner {
            Value::Bool(_) => Ok(inner),
            other => Err(format!("booleanValue holds {other}")),
        },
        "integerValue" => decode_integer(inner),
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner),
            other => Err(format!("doubleValue holds {other}")),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => match inner {
            Value::String(_) => Ok(inner),
            other => Err(format!("{kind} holds {other}")),
        },
        "geoPointValue" => Ok(inner),
        "arrayValue" => decode_array(inner),
        "mapValue" => decode_map(inner),
        other => Err(format!("unsupported value type `{other}`")),
    }
}

fn decode_integer(inner: Value) -> Result<Value, String> {
    match inner {
        Value::String(text) => text
            .parse::<i64>()
            .map(Value::from)
            .map_err(|err| format!("integerValue `{text}`: {err}")),
        Value::Number(number) if number.is_i64() => Ok(Value::Number(number)),
        other => Err(format!("integerValue holds {other}")),
    }
}

fn decode_array(inner: Value) -> Result<Value, String> {
    let values = match inner {
        Value::Object(mut array) => array.remove("values").unwrap_or(Value::Array(Vec::new())),
        other => return Err(format!("arrayValue holds {other}")),
    };
    let Value::Array(items) = values else {
        return Err("arrayValue.values must be a list".to_owned());
    };
    items
        .into_iter()
        .map(decode_value)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn decode_map(inner: Value) -> Result<Value, String> {
    let fields = match inner {
        Value::Object(mut map) => map.remove("fields").unwrap_or(Value::Object(Map::new())),
        other => return Err(format!("mapValue holds {other}")),
    };
    let Value::Object(fields) = fields else {
        return Err("mapValue.fields must be an object".to_owned());
    };
    decode_fields(fields)
        .map(Value::Object)
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(fields) => fields,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    #[rstest]
    fn encodes_user_fields_with_firestore_types() {
        let encoded =
            encode_fields(&document(json!({ "uuid": "a1", "count": -5 }))).expect("encodes");
        assert_eq!(
            Value::Object(encoded),
            json!({
                "uuid": { "stringValue": "a1" },
                "count": { "integerValue": "-5" },
            })
        );
    }

    #[rstest]
    fn encodes_nested_values() {
        let encoded = encode_fields(&document(json!({
            "flags": [true, null],
            "meta": { "ratio": 0.5 },
        })))
        .expect("encodes");
        assert_eq!(
            Value::Object(encoded),
            json!({
                "flags": { "arrayValue": { "values": [
                    { "booleanValue": true },
                    { "nullValue": null },
                ] } },
                "meta": { "mapValue": { "fields": {
                    "ratio": { "doubleValue": 0.5 },
                } } },
            })
        );
    }

    #[rstest]
    fn rejects_integers_beyond_signed_range() {
        let error = encode_fields(&document(json!({ "big": u64::MAX }))).expect_err("too big");
        assert!(matches!(error, DocumentStoreError::Decode { .. }));
    }

    #[rstest]
    fn decodes_firestore_document_fields() {
        let dto: FirestoreDocumentDto = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/Users/a1",
            "fields": {
                "uuid": { "stringValue": "a1" },
                "count": { "integerValue": "12" },
                "tags": { "arrayValue": {} },
                "meta": { "mapValue": { "fields": { "ok": { "booleanValue": true } } } },
            },
            "createTime": "2024-01-01T00:00:00Z",
        }))
        .expect("dto decodes");

        let decoded = decode_fields(dto.fields).expect("fields decode");
        assert_eq!(
            Value::Object(decoded),
            json!({ "uuid": "a1", "count": 12, "tags": [], "meta": { "ok": true } })
        );
    }

    #[rstest]
    fn missing_fields_decode_to_empty_document() {
        let dto: FirestoreDocumentDto =
            serde_json::from_value(json!({ "name": "x" })).expect("dto decodes");
        assert!(decode_fields(dto.fields).expect("decodes").is_empty());
    }

    #[rstest]
    #[case(json!({ "count": { "integerValue": "twelve" } }))]
    #[case(json!({ "count": { "mysteryValue": 1 } }))]
    #[case(json!({ "count": { "integerValue": "1", "stringValue": "1" } }))]
    #[case(json!({ "count": 1 }))]
    fn rejects_malformed_typed_values(#[case] fields: Value) {
        let error = decode_fields(document(fields)).expect_err("malformed value");
        assert!(
            error.to_string().contains("field `count`"),
            "error should name the field: {error}"
        );
    }

    #[rstest]
    fn parses_google_error_envelope() {
        let envelope: FirestoreErrorEnvelope = serde_json::from_value(json!({
            "error": { "code": 409, "message": "Document already exists", "status": "ALREADY_EXISTS" }
        }))
        .expect("envelope decodes");
        assert_eq!(envelope.error.status, "ALREADY_EXISTS");
        assert_eq!(envelope.error.message, "Document already exists");
    }
}
