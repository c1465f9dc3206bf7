use serde_json::{Map, Number, Value};
use crate::error::{FormError, FormResult};
use crate::schema::{Schema, SchemaId};
use crate::session::SessionState;
use crate::value::FieldValue;

/// Submission body for a completed form.
///
/// Every expected field must be set. Cancer Diagnosis values are recoded
/// to numbers for the scorer; other schemas are sent as recorded.
pub fn build_payload(schema: &Schema, state: &SessionState) -> FormResult<Value> {
    let missing = state.missing_fields(schema);
    if !missing.is_empty() {
        return Err(FormError::IncompleteForm {
            missing: missing.into_iter().map(String::from).collect(),
        });
    }

    match schema.id {
        SchemaId::CancerDiagnosis => cancer_payload(schema, state),
        _ => Ok(serde_json::to_value(state.values())?),
    }
}

fn cancer_payload(schema: &Schema, state: &SessionState) -> FormResult<Value> {
    let mut payload = Map::new();

    for name in schema.field_names() {
        let value = state.get(name).ok_or_else(|| FormError::IncompleteForm {
            missing: vec![name.to_string()],
        })?;

        let encoded = match name {
            "Gender" => flag(value.as_text() == Some("Male")),
            "Smoking" | "CancerHistory" => flag(value.as_text() == Some("Yes")),
            _ => number(name, value)?,
        };
        payload.insert(name.to_string(), encoded);
    }

    Ok(Value::Object(payload))
}

fn flag(set: bool) -> Value {
    Value::from(u8::from(set))
}

fn number(field: &str, value: &FieldValue) -> FormResult<Value> {
    if let FieldValue::Integer(n) = value {
        return Ok(Value::from(*n));
    }

    value
        .as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| FormError::InvalidPayloadValue {
            field: field.to_string(),
            value: value.to_string(),
        })
}
