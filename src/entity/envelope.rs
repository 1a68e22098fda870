//! Decoding of record and collection response bodies

use serde::de::Error as _;
use serde_json::Value;

use super::Entity;
use crate::error::Result;

/// Decode a single record from `{ <envelope_key>: record }` or from a bare record
pub fn decode_record<E: Entity>(body: Value) -> Result<E> {
    let key = E::schema().envelope_key;
    match body {
        Value::Object(mut map) => {
            if let Some(inner @ Value::Object(_)) = map.remove(key) {
                return Ok(serde_json::from_value(inner)?);
            }
            if map.contains_key("_id") || map.contains_key("id") {
                return Ok(serde_json::from_value(Value::Object(map))?);
            }
            Err(serde_json::Error::custom(format!(
                "response has neither a '{}' envelope nor a record identifier",
                key
            ))
            .into())
        }
        other => Err(serde_json::Error::custom(format!(
            "expected a {} record, found {}",
            E::schema().label,
            kind_of(&other)
        ))
        .into()),
    }
}

/// Decode a full collection; the body must be a JSON array
pub fn decode_list<E: Entity>(body: Value) -> Result<Vec<E>> {
    match body {
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        other => Err(serde_json::Error::custom(format!(
            "expected a list of {} records, found {}",
            E::schema().label,
            kind_of(&other)
        ))
        .into()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Expense, InventoryItem, Sale};
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_enveloped_and_bare_records() {
        let wrapped: Expense = decode_record(json!({
            "message": "Expense created",
            "expense": { "_id": "e1", "description": "Fuel", "amount": 5000 }
        }))
        .unwrap();
        let bare: InventoryItem = decode_record(json!({
            "_id": "inv1", "name": "Rice", "quantity": 4, "price": 1500
        }))
        .unwrap();

        assert_eq!(wrapped.id.as_deref(), Some("e1"));
        assert_eq!(bare.name, "Rice");
    }

    #[test]
    fn test_unrecognised_record_body() {
        let err = decode_record::<Expense>(json!({ "message": "ok" })).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(decode_record::<Expense>(json!([])).is_err());
    }

    #[test]
    fn test_plural_sale_envelope_is_rejected() {
        let body = json!({ "sales": [{ "_id": "s1", "items": [], "totalAmount": 10 }] });
        assert!(matches!(decode_record::<Sale>(body), Err(Error::Json(_))));

        let sale: Sale = decode_record(json!({ "sale": { "_id": "s1", "items": [] } })).unwrap();
        assert_eq!(sale.id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_list_must_be_array() {
        assert!(decode_list::<Expense>(json!([])).unwrap().is_empty());
        assert!(matches!(
            decode_list::<Expense>(json!({ "expenses": [] })),
            Err(Error::Json(_))
        ));
    }
}
